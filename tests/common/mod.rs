#![allow(dead_code)]

use chart_router::lifecycle::{Completer, Lifecycle};
use chart_router::scene::{Primitive, Scene};
use chart_router::surface::{ResourceHandle, ResourceKind, Resources};
use chart_router::utils::{bounds_from_f32, point_f32};
use chart_router::{
    ActivationToken, ChartPanel, Dataset, Deferred, MountPoint, NavPath, NavigationTree, PanelContext, PanelError, PanelId,
    PanelRegistry, PanelState, RouteSpec, Router, RouterConfig, RouterHandle, Surface,
    SurfaceHost, SurfaceId, Tick, TrackRecord,
};
use chrono::NaiveDate;
use gpui::{Bounds, Pixels};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

// --- Host ---

#[derive(Default)]
struct HostState {
    attached: HashMap<SurfaceId, MountPoint>,
    live: HashMap<u64, ResourceHandle>,
    next_handle: u64,
    draws: HashMap<SurfaceId, usize>,
    acquires: HashMap<SurfaceId, usize>,
}

/// Surface host that records mounts, resources and draws.
#[derive(Default)]
pub struct RecordingHost {
    state: Mutex<HostState>,
}

impl RecordingHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Currently attached mounts, shallowest first.
    pub fn attached(&self) -> Vec<MountPoint> {
        let mut mounts: Vec<MountPoint> = self.state.lock().attached.values().cloned().collect();
        mounts.sort_by_key(|m| m.depth);
        mounts
    }

    pub fn attached_paths(&self) -> Vec<String> {
        self.attached().iter().map(|m| m.path.to_string()).collect()
    }

    pub fn live_resources(&self) -> usize {
        self.state.lock().live.len()
    }

    /// Live resources held on surfaces that are no longer attached.
    pub fn orphaned_resources(&self) -> usize {
        let state = self.state.lock();
        state
            .live
            .values()
            .filter(|h| !state.attached.contains_key(&h.surface))
            .count()
    }

    pub fn total_draws(&self) -> usize {
        self.state.lock().draws.values().sum()
    }

    pub fn draws_on(&self, surface: SurfaceId) -> usize {
        self.state.lock().draws.get(&surface).copied().unwrap_or(0)
    }

    /// Resources ever acquired on `surface`, released or not.
    pub fn acquires_on(&self, surface: SurfaceId) -> usize {
        self.state.lock().acquires.get(&surface).copied().unwrap_or(0)
    }

    /// Surface currently attached at `raw`.
    pub fn surface_at(&self, raw: &str) -> Option<SurfaceId> {
        self.state
            .lock()
            .attached
            .iter()
            .find(|(_, m)| m.path.to_string() == raw)
            .map(|(id, _)| *id)
    }
}

impl SurfaceHost for RecordingHost {
    fn mount_bounds(&self, mount: &MountPoint) -> Bounds<Pixels> {
        bounds_from_f32(0.0, 0.0, 800.0 - mount.depth as f32 * 20.0, 600.0)
    }

    fn attach(&self, surface: SurfaceId, mount: &MountPoint) {
        let mut state = self.state.lock();
        assert!(
            !state.attached.values().any(|m| m.path == mount.path),
            "{} attached twice",
            mount.path
        );
        state.attached.insert(surface, mount.clone());
    }

    fn detach(&self, surface: SurfaceId) {
        self.state.lock().attached.remove(&surface);
    }

    fn draw(&self, surface: SurfaceId, _scene: &Scene) {
        *self.state.lock().draws.entry(surface).or_default() += 1;
    }

    fn acquire(&self, surface: SurfaceId, kind: ResourceKind) -> ResourceHandle {
        let mut state = self.state.lock();
        *state.acquires.entry(surface).or_default() += 1;
        state.next_handle += 1;
        let handle = ResourceHandle {
            surface,
            kind,
            id: state.next_handle,
        };
        state.live.insert(handle.id, handle);
        handle
    }

    fn release(&self, handle: ResourceHandle) {
        let released = self.state.lock().live.remove(&handle.id);
        assert!(released.is_some(), "resource {} released twice", handle.id);
    }
}

// --- Journal ---

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Call {
    Init,
    Update,
    Resize,
    Destroy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fault {
    Factory,
    Init,
    Update,
    Destroy,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    /// Unique per panel instance.
    pub serial: u64,
    pub panel: String,
    pub call: Call,
}

#[derive(Default)]
struct JournalState {
    events: Vec<Event>,
    next_serial: u64,
    faults: HashMap<String, Fault>,
    requests: HashMap<String, Vec<NavPath>>,
    bounces: HashMap<String, NavPath>,
    deferred: Vec<String>,
    completers: HashMap<String, Completer<String>>,
}

/// Shared call log plus fault injection for [`RecordingPanel`]s.
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<JournalState>>);

impl Journal {
    pub fn fail(&self, panel: &str, fault: Fault) {
        self.0.lock().faults.insert(panel.to_string(), fault);
    }

    pub fn heal(&self, panel: &str) {
        self.0.lock().faults.remove(panel);
    }

    /// The next init of `panel` asks the router for each of `paths`, in order.
    pub fn request_on_init(&self, panel: &str, paths: &[&str]) {
        self.0
            .lock()
            .requests
            .insert(panel.to_string(), paths.iter().map(|p| path(p)).collect());
    }

    /// Every init of `panel`, not just the next, asks the router for `raw`.
    pub fn request_on_every_init(&self, panel: &str, raw: &str) {
        self.0.lock().bounces.insert(panel.to_string(), path(raw));
    }

    /// Every init of `panel` starts background work whose [`Completer`]
    /// is parked here until [`Journal::take_completer`].
    pub fn defer_on_init(&self, panel: &str) {
        self.0.lock().deferred.push(panel.to_string());
    }

    pub fn take_completer(&self, panel: &str) -> Option<Completer<String>> {
        self.0.lock().completers.remove(panel)
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().events.clone()
    }

    pub fn calls(&self) -> Vec<(String, Call)> {
        self.events().into_iter().map(|e| (e.panel, e.call)).collect()
    }

    pub fn clear(&self) {
        self.0.lock().events.clear();
    }

    /// Serials of every instance of `panel` that saw an init.
    pub fn instances_of(&self, panel: &str) -> Vec<u64> {
        self.events()
            .into_iter()
            .filter(|e| e.panel == panel && e.call == Call::Init)
            .map(|e| e.serial)
            .collect()
    }

    fn fault(&self, panel: &str) -> Option<Fault> {
        self.0.lock().faults.get(panel).copied()
    }

    fn next_serial(&self) -> u64 {
        let mut state = self.0.lock();
        state.next_serial += 1;
        state.next_serial
    }

    fn record(&self, serial: u64, panel: &PanelId, call: Call) {
        self.0.lock().events.push(Event {
            serial,
            panel: panel.to_string(),
            call,
        });
    }

    fn take_requests(&self, panel: &str) -> Vec<NavPath> {
        let mut state = self.0.lock();
        let mut paths = state.requests.remove(panel).unwrap_or_default();
        paths.extend(state.bounces.get(panel).cloned());
        paths
    }

    fn defers(&self, panel: &str) -> bool {
        self.0.lock().deferred.iter().any(|p| p == panel)
    }

    fn park_completer(&self, panel: &PanelId, completer: Completer<String>) {
        self.0.lock().completers.insert(panel.to_string(), completer);
    }
}

// --- Panel ---

/// Panel that journals every lifecycle call and holds one listener while active.
///
/// A deferred result delivered to it is painted, with a tooltip listener, on
/// the next tick.
pub struct RecordingPanel {
    id: PanelId,
    serial: u64,
    lifecycle: Lifecycle,
    journal: Journal,
    router: RouterHandle,
    token: ActivationToken,
    surface: Option<Surface>,
    resources: Resources,
    pending: Option<Deferred<String>>,
}

impl RecordingPanel {
    pub fn new(ctx: &PanelContext, journal: Journal) -> Self {
        Self {
            id: ctx.panel.clone(),
            serial: journal.next_serial(),
            lifecycle: Lifecycle::new(ctx.panel.clone()),
            journal,
            router: ctx.router.clone(),
            token: ctx.token.clone(),
            surface: None,
            resources: Resources::default(),
            pending: None,
        }
    }

    fn fault(&self, fault: Fault) -> bool {
        self.journal.fault(self.id.as_str()) == Some(fault)
    }

    fn injected(&self, what: &str) -> PanelError {
        PanelError::Render {
            panel: self.id.clone(),
            reason: format!("injected {what} fault"),
        }
    }
}

impl ChartPanel for RecordingPanel {
    fn id(&self) -> &PanelId {
        &self.id
    }

    fn state(&self) -> PanelState {
        self.lifecycle.state()
    }

    fn init(&mut self, surface: Surface) -> Result<(), PanelError> {
        self.journal.record(self.serial, &self.id, Call::Init);
        self.lifecycle.check_init()?;
        self.resources.acquire(&surface, ResourceKind::Listener);
        self.surface = Some(surface);
        for p in self.journal.take_requests(self.id.as_str()) {
            self.router.request(p);
        }
        if self.journal.defers(self.id.as_str()) {
            let (pending, completer) = Deferred::new(self.token.clone());
            self.pending = Some(pending);
            self.journal.park_completer(&self.id, completer);
        }
        if self.fault(Fault::Init) {
            return Err(self.injected("init"));
        }
        self.lifecycle.mark_active();
        Ok(())
    }

    fn update(&mut self, data: Arc<Dataset>) -> Result<(), PanelError> {
        self.journal.record(self.serial, &self.id, Call::Update);
        self.lifecycle.ensure_active()?;
        if self.fault(Fault::Update) {
            return Err(self.injected("update"));
        }
        if let Some(surface) = &self.surface {
            let mut scene = Scene::new();
            scene.push(Primitive::Label {
                origin: point_f32(0.0, 0.0),
                text: format!("{} tracks", data.len()),
                color: gpui::black(),
                size: gpui::px(12.0),
            });
            surface.draw(&scene);
        }
        Ok(())
    }

    fn resize(&mut self, bounds: Bounds<Pixels>) -> Result<(), PanelError> {
        self.journal.record(self.serial, &self.id, Call::Resize);
        self.lifecycle.ensure_active()?;
        if let Some(surface) = self.surface.as_mut() {
            surface.set_bounds(bounds);
        }
        Ok(())
    }

    fn tick(&mut self) -> Result<Tick, PanelError> {
        self.lifecycle.ensure_active()?;
        let Some(text) = self.pending.as_ref().and_then(Deferred::take) else {
            return Ok(Tick::Idle);
        };
        if let Some(surface) = &self.surface {
            self.resources.acquire(surface, ResourceKind::Listener);
            let mut scene = Scene::new();
            scene.push(Primitive::Label {
                origin: point_f32(0.0, 16.0),
                text,
                color: gpui::black(),
                size: gpui::px(12.0),
            });
            surface.draw(&scene);
        }
        Ok(Tick::Progress)
    }

    fn destroy(&mut self) -> Result<(), PanelError> {
        self.journal.record(self.serial, &self.id, Call::Destroy);
        self.lifecycle.destroy()?;
        if let Some(surface) = self.surface.take() {
            self.resources.release_all(&surface);
        }
        if self.fault(Fault::Destroy) {
            return Err(self.injected("destroy"));
        }
        Ok(())
    }
}

/// Registry where every id builds a [`RecordingPanel`].
pub fn recording_registry(ids: &[&str], journal: &Journal) -> PanelRegistry {
    let mut registry = PanelRegistry::new();
    for &id in ids {
        let journal = journal.clone();
        registry
            .register(id, move |ctx: &PanelContext| -> eyre::Result<Box<dyn ChartPanel>> {
                if journal.fault(ctx.panel.as_str()) == Some(Fault::Factory) {
                    eyre::bail!("injected factory fault for {}", ctx.panel);
                }
                Ok(Box::new(RecordingPanel::new(ctx, journal.clone())))
            })
            .unwrap();
    }
    registry
}

// --- Fixtures ---

pub const DASHBOARD_PANELS: [&str; 6] = ["time", "radar", "bar", "scatter", "sankey", "cartogram"];

/// TimeDV hosts a mode panel of its own; SpatialDV is a plain group.
pub fn dashboard_routes() -> Vec<RouteSpec> {
    vec![
        RouteSpec::group(
            "TimeDV",
            vec![
                RouteSpec::leaf("radar", "radar"),
                RouteSpec::leaf("bar", "bar"),
                RouteSpec::leaf("scatter", "scatter"),
            ],
        )
        .with_panel("time"),
        RouteSpec::group(
            "SpatialDV",
            vec![
                RouteSpec::leaf("sankey", "sankey"),
                RouteSpec::leaf("cartogram", "cartogram"),
            ],
        ),
    ]
}

pub fn router_for(routes: &[RouteSpec], panels: &[&str]) -> (Router, Arc<RecordingHost>, Journal) {
    let journal = Journal::default();
    let registry = recording_registry(panels, &journal);
    let tree = NavigationTree::build(routes, &registry).unwrap();
    let host = RecordingHost::new();
    let config = RouterConfig {
        default_path: None,
        ..Default::default()
    };
    let router = Router::new(tree, registry, host.clone(), config);
    (router, host, journal)
}

pub fn dashboard_router() -> (Router, Arc<RecordingHost>, Journal) {
    router_for(&dashboard_routes(), &DASHBOARD_PANELS)
}

pub fn path(raw: &str) -> NavPath {
    NavPath::parse(raw).unwrap()
}

pub fn track(artist: &str, region: &str, date: (i32, u32, u32), streams: u64, dance: f64, energy: f64) -> TrackRecord {
    TrackRecord {
        name: format!("{artist} song"),
        artist: artist.to_string(),
        region: region.to_string(),
        date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        streams,
        explicit: false,
        duration_minutes: 3.5,
        release_year: Some(date.0),
        tempo: 120.0,
        loudness: -6.0,
        features: chart_router::AudioFeatures {
            danceability: dance,
            energy,
            speechiness: 0.1,
            acousticness: 0.2,
            instrumentalness: 0.0,
            liveness: 0.15,
            valence: 0.5,
        },
    }
}

pub fn sample_dataset() -> Dataset {
    Dataset::new(vec![
        track("Bad Bunny", "us", (2023, 1, 5), 900_000, 0.8, 0.7),
        track("Bad Bunny", "mx", (2023, 1, 12), 700_000, 0.82, 0.72),
        track("Taylor Swift", "us", (2023, 2, 3), 1_200_000, 0.6, 0.5),
        track("Taylor Swift", "gb", (2023, 2, 10), 400_000, 0.58, 0.52),
        track("The Weeknd", "de", (2023, 3, 1), 350_000, 0.5, 0.8),
        track("The Weeknd", "us", (2023, 3, 8), 500_000, 0.52, 0.78),
        track("Karol G", "co", (2023, 3, 15), 300_000, 0.9, 0.6),
        track("Karol G", "mx", (2023, 4, 2), 250_000, 0.88, 0.65),
        track("Rosalia", "es", (2023, 4, 20), 200_000, 0.7, 0.4),
        track("BTS", "kr", (2023, 5, 1), 600_000, 0.65, 0.85),
        track("BTS", "jp", (2023, 5, 9), 450_000, 0.66, 0.83),
        track("Anitta", "br", (2023, 5, 30), 380_000, 0.85, 0.75),
    ])
}

pub fn bounds(w: f32, h: f32) -> Bounds<Pixels> {
    bounds_from_f32(0.0, 0.0, w, h)
}
