// Chart panel implementations

pub mod bar;
pub mod cartogram;
pub mod radar;
pub mod sankey;
pub mod scatter;

pub use bar::BarRenderer;
pub use cartogram::CartogramRenderer;
pub use radar::RadarRenderer;
pub use sankey::SankeyRenderer;
pub use scatter::ScatterRenderer;

use crate::dataset::Dataset;
use crate::error::PanelError;
use crate::lifecycle::{ActivationToken, Lifecycle, PanelState};
use crate::panel::{ChartPanel, PanelContext, PanelId, Tick};
use crate::scene::Scene;
use crate::surface::{ResourceKind, Resources, Surface};
use gpui::{Bounds, Pixels};
use std::sync::Arc;
use tracing::{debug, trace};

/// Trait for the chart-specific half of a panel: layout and painting.
pub trait PanelRenderer: Send {
    /// Host resources held for the whole activation.
    fn resources(&self) -> &'static [ResourceKind];

    /// Lays out `data` inside `bounds`. Called on every update and resize.
    fn render(&mut self, data: &Dataset, bounds: Bounds<Pixels>) -> Scene;

    /// One scheduling turn of incremental layout. Returns a fresh scene while
    /// work remains, None once settled.
    fn step(&mut self, _bounds: Bounds<Pixels>) -> Option<Scene> {
        None
    }
}

/// A [`ChartPanel`] built from a [`PanelRenderer`]; owns the lifecycle,
/// the surface, and the resources acquired on it.
pub struct Panel<R: PanelRenderer> {
    id: PanelId,
    lifecycle: Lifecycle,
    token: ActivationToken,
    renderer: R,
    surface: Option<Surface>,
    resources: Resources,
    data: Option<Arc<Dataset>>,
}

impl<R: PanelRenderer> Panel<R> {
    pub fn new(ctx: &PanelContext, renderer: R) -> Self {
        Self {
            id: ctx.panel.clone(),
            lifecycle: Lifecycle::new(ctx.panel.clone()),
            token: ctx.token.clone(),
            renderer,
            surface: None,
            resources: Resources::default(),
            data: None,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    fn repaint(&mut self) {
        let (Some(surface), Some(data)) = (&self.surface, &self.data) else {
            return;
        };
        let scene = self.renderer.render(data, surface.bounds());
        trace!(panel = %self.id, primitives = scene.len(), "repaint");
        surface.draw(&scene);
    }
}

impl<R: PanelRenderer> ChartPanel for Panel<R> {
    fn id(&self) -> &PanelId {
        &self.id
    }

    fn state(&self) -> PanelState {
        self.lifecycle.state()
    }

    fn init(&mut self, surface: Surface) -> Result<(), PanelError> {
        self.lifecycle.check_init()?;
        for &kind in self.renderer.resources() {
            self.resources.acquire(&surface, kind);
        }
        debug!(panel = %self.id, surface = surface.id().0, resources = self.resources.len(), "panel initialized");
        self.surface = Some(surface);
        self.lifecycle.mark_active();
        Ok(())
    }

    fn update(&mut self, data: Arc<Dataset>) -> Result<(), PanelError> {
        self.lifecycle.ensure_active()?;
        self.data = Some(data);
        self.repaint();
        Ok(())
    }

    fn resize(&mut self, bounds: Bounds<Pixels>) -> Result<(), PanelError> {
        self.lifecycle.ensure_active()?;
        if let Some(surface) = self.surface.as_mut() {
            surface.set_bounds(bounds);
        }
        self.repaint();
        Ok(())
    }

    fn destroy(&mut self) -> Result<(), PanelError> {
        self.lifecycle.destroy()?;
        self.token.revoke();
        if let Some(surface) = self.surface.take() {
            let released = self.resources.release_all(&surface);
            debug!(panel = %self.id, surface = surface.id().0, released, "panel destroyed");
        }
        self.data = None;
        Ok(())
    }

    fn tick(&mut self) -> Result<Tick, PanelError> {
        self.lifecycle.ensure_active()?;
        if !self.token.is_live() || self.data.is_none() {
            return Ok(Tick::Idle);
        }
        let Some(surface) = &self.surface else {
            return Ok(Tick::Idle);
        };
        match self.renderer.step(surface.bounds()) {
            Some(scene) => {
                surface.draw(&scene);
                Ok(Tick::Progress)
            }
            None => Ok(Tick::Idle),
        }
    }
}

/// Shared helpers for the built-in renderers.
pub mod layout {
    use crate::utils::bounds_to_f32;
    use gpui::{Bounds, Pixels};

    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct Margins {
        pub top: f32,
        pub right: f32,
        pub bottom: f32,
        pub left: f32,
    }

    impl Margins {
        pub const fn uniform(v: f32) -> Self {
            Self {
                top: v,
                right: v,
                bottom: v,
                left: v,
            }
        }
    }

    /// Plot area inside `bounds` after margins: (x, y, width, height), never negative.
    pub fn inner(bounds: &Bounds<Pixels>, m: Margins) -> (f32, f32, f32, f32) {
        let (x, y, w, h) = bounds_to_f32(bounds);
        (
            x + m.left,
            y + m.top,
            (w - m.left - m.right).max(0.0),
            (h - m.top - m.bottom).max(0.0),
        )
    }
}
