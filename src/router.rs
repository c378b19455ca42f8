//! Drives navigation: resolves paths, diffs the mounted chain against the
//! requested one, and runs panel lifecycles in a fixed order.
//!
//! Teardown runs leaf-to-root, mounting runs root-to-leaf. Nodes shared by the
//! old and new chain (same id at the same depth) keep their panel instance.
//!
//! Requests made while a transition is in flight go through a
//! [`RouterHandle`] into a single pending slot; a newer request replaces an
//! older one and the survivor runs once the current transition settles.

use crate::config::{AppConfig, RouterConfig};
use crate::dataset::Dataset;
use crate::error::{
    ConfigError, PanelError, RouterError, TransitionError, TransitionStage,
};
use crate::lifecycle::{ActivationToken, PanelState};
use crate::panel::{ChartPanel, PanelContext, PanelId, Tick};
use crate::path::NavPath;
use crate::registry::PanelRegistry;
use crate::surface::{MountPoint, Surface, SurfaceHost, SurfaceId};
use crate::theme::ChartTheme;
use crate::tree::{NavigationTree, NodeId};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouterState {
    Idle,
    Resolving,
    Transitioning,
}

/// Cloneable request channel into a [`Router`], safe to hand to panels.
#[derive(Clone, Debug, Default)]
pub struct RouterHandle {
    pending: Arc<Mutex<Option<NavPath>>>,
}

impl RouterHandle {
    /// Queues `path`. Returns the older pending request it replaced, if any.
    pub fn request(&self, path: NavPath) -> Option<NavPath> {
        let superseded = self.pending.lock().replace(path);
        if let Some(old) = &superseded {
            debug!(superseded = %old, "pending navigation replaced");
        }
        superseded
    }

    pub fn pending(&self) -> Option<NavPath> {
        self.pending.lock().clone()
    }

    fn take(&self) -> Option<NavPath> {
        self.pending.lock().take()
    }
}

/// Summary of a settled transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationOutcome {
    pub path: NavPath,
    /// Nodes shared with the previous chain.
    pub kept: usize,
    pub destroyed: usize,
    pub mounted: usize,
    /// Teardown failures that were logged and stepped over.
    pub recovered: Vec<PanelError>,
}

impl NavigationOutcome {
    pub fn is_clean(&self) -> bool {
        self.recovered.is_empty()
    }
}

struct ActiveEntry {
    node: NodeId,
    panel: Option<Box<dyn ChartPanel>>,
    token: Option<ActivationToken>,
    /// Dataset version the panel last painted.
    painted: Option<u64>,
}

impl ActiveEntry {
    fn grouping(node: NodeId) -> Self {
        Self {
            node,
            panel: None,
            token: None,
            painted: None,
        }
    }
}

pub struct Router {
    tree: NavigationTree,
    registry: PanelRegistry,
    host: Arc<dyn SurfaceHost>,
    config: RouterConfig,
    theme: ChartTheme,
    state: RouterState,
    chain: Vec<ActiveEntry>,
    data: Arc<Dataset>,
    data_version: u64,
    handle: RouterHandle,
    next_surface: u64,
    next_epoch: u64,
    degraded: bool,
}

impl Router {
    pub fn new(
        tree: NavigationTree,
        registry: PanelRegistry,
        host: Arc<dyn SurfaceHost>,
        config: RouterConfig,
    ) -> Self {
        Self {
            tree,
            registry,
            host,
            config,
            theme: ChartTheme::default(),
            state: RouterState::Idle,
            chain: Vec::new(),
            data: Arc::new(Dataset::default()),
            data_version: 0,
            handle: RouterHandle::default(),
            next_surface: 1,
            next_epoch: 1,
            degraded: false,
        }
    }

    /// Builds the navigation tree from `config` and wires the router.
    pub fn from_config(
        config: &AppConfig,
        registry: PanelRegistry,
        host: Arc<dyn SurfaceHost>,
    ) -> Result<Self, ConfigError> {
        let tree = NavigationTree::build(&config.routes, &registry)?;
        Ok(Self::new(tree, registry, host, config.router.clone()))
    }

    pub fn with_theme(mut self, theme: ChartTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_data(mut self, data: Arc<Dataset>) -> Self {
        self.data = data;
        self
    }

    /// Mounts the configured default view, if any.
    pub fn start(&mut self) -> Result<Option<NavigationOutcome>, RouterError> {
        match self.config.default_path.clone() {
            Some(path) => self.navigate(path).map(Some),
            None => Ok(None),
        }
    }

    pub fn navigate_str(&mut self, raw: &str) -> Result<NavigationOutcome, RouterError> {
        let path = NavPath::parse(raw)?;
        self.navigate(path)
    }

    /// Moves the mounted chain to `path`. Requests queued before this call are
    /// older than `path` and are dropped; requests queued while it runs are
    /// processed afterwards, latest only.
    pub fn navigate(&mut self, path: NavPath) -> Result<NavigationOutcome, RouterError> {
        if let Some(stale) = self.handle.take() {
            debug!(superseded = %stale, requested = %path, "dropping older pending navigation");
        }
        self.run_latest(path)
    }

    /// Runs the pending request left by a [`RouterHandle`], if any.
    pub fn process_pending(&mut self) -> Option<Result<NavigationOutcome, RouterError>> {
        let path = self.handle.take()?;
        Some(self.run_latest(path))
    }

    /// Follows superseding requests for at most one hop per tree node; past
    /// that the latest request stays pending for [`Router::process_pending`].
    fn run_latest(&mut self, path: NavPath) -> Result<NavigationOutcome, RouterError> {
        let max_hops = self.tree.len().max(1);
        let mut hops = 0;
        let mut current = path;
        loop {
            let result = self.transition(current.clone());
            if hops >= max_hops {
                if let Some(next) = self.handle.pending() {
                    warn!(path = %current, pending = %next, hops, "navigation keeps superseding itself, leaving request pending");
                }
                return result;
            }
            match self.handle.take() {
                Some(next) => {
                    if let Err(e) = &result {
                        warn!(path = %current, error = %e, "superseded navigation failed");
                    }
                    debug!(from = %current, to = %next, "running superseding navigation");
                    current = next;
                    hops += 1;
                }
                None => return result,
            }
        }
    }

    fn transition(&mut self, path: NavPath) -> Result<NavigationOutcome, RouterError> {
        info!(path = %path, "navigating");
        self.state = RouterState::Resolving;
        let target = match self.tree.resolve(&path) {
            Ok(chain) => chain,
            Err(e) => {
                self.state = RouterState::Idle;
                warn!(path = %path, error = %e, "navigation rejected");
                return Err(e.into());
            }
        };

        self.state = RouterState::Transitioning;
        let common = self
            .chain
            .iter()
            .zip(&target)
            .take_while(|(entry, node)| entry.node == **node)
            .count();

        // Construct entering panels first: a failing factory leaves the
        // mounted chain untouched.
        let mut prepared: Vec<(NodeId, Option<(Box<dyn ChartPanel>, ActivationToken)>)> =
            Vec::with_capacity(target.len() - common);
        for &node_id in &target[common..] {
            let node = self.tree.node(node_id);
            let Some(panel_id) = node.panel_id().cloned() else {
                prepared.push((node_id, None));
                continue;
            };
            let token = ActivationToken::new(self.next_epoch);
            self.next_epoch += 1;
            let ctx = PanelContext {
                panel: panel_id,
                token: token.clone(),
                router: self.handle.clone(),
                theme: self.theme.clone(),
                settings: self.config.panels,
            };
            match node.create_panel_instance(&self.registry, &ctx) {
                Ok(panel) => prepared.push((node_id, Some((panel, token)))),
                Err(source) => {
                    self.state = RouterState::Idle;
                    error!(path = %path, error = %source, "panel construction failed");
                    return Err(TransitionError {
                        path,
                        stage: TransitionStage::Prepare,
                        source,
                        degraded: false,
                    }
                    .into());
                }
            }
        }

        let previous_len = self.chain.len();
        let destroyed = previous_len - common;
        let recovered = self.unmount_from(common);

        let mut mounted = 0;
        for (node_id, instance) in prepared {
            let entry = match instance {
                None => ActiveEntry::grouping(node_id),
                Some((mut panel, token)) => {
                    let surface = self.open_surface(node_id, self.chain.len());
                    if let Err(source) = panel.init(surface) {
                        if let Err(e) = panel.destroy() {
                            warn!(panel = %panel.id(), error = %e, "cleanup of failed init also failed");
                        }
                        token.revoke();
                        return Err(self.fail_transition(
                            path,
                            TransitionStage::Mount,
                            source,
                            common,
                            previous_len,
                        ));
                    }
                    mounted += 1;
                    ActiveEntry {
                        node: node_id,
                        panel: Some(panel),
                        token: Some(token),
                        painted: None,
                    }
                }
            };
            self.chain.push(entry);
        }

        if let Err((index, source)) = self.paint_stale() {
            return Err(self.fail_transition(
                path,
                TransitionStage::Paint,
                source,
                index.min(common),
                previous_len,
            ));
        }

        self.degraded = false;
        self.state = RouterState::Idle;
        info!(path = %path, kept = common, destroyed, mounted, "navigation settled");
        Ok(NavigationOutcome {
            path,
            kept: common,
            destroyed,
            mounted,
            recovered,
        })
    }

    /// Rolls the chain back to its first `fallback_len` entries and reports the failure.
    fn fail_transition(
        &mut self,
        path: NavPath,
        stage: TransitionStage,
        source: PanelError,
        fallback_len: usize,
        previous_len: usize,
    ) -> RouterError {
        let extra = self.unmount_from(fallback_len);
        for e in &extra {
            warn!(error = %e, "rollback teardown failed");
        }
        // Degraded when the settled chain no longer matches the one we started from.
        let degraded = fallback_len < previous_len;
        self.degraded = degraded;
        self.state = RouterState::Idle;
        error!(path = %path, stage = %stage, degraded, error = %source, "transition failed");
        TransitionError {
            path,
            stage,
            source,
            degraded,
        }
        .into()
    }

    /// Destroys every entry at index >= `len`, deepest first. Each destroy is
    /// isolated; failures are logged and returned.
    fn unmount_from(&mut self, len: usize) -> Vec<PanelError> {
        let mut failures = Vec::new();
        while self.chain.len() > len {
            let Some(entry) = self.chain.pop() else {
                break;
            };
            if let Some(token) = &entry.token {
                token.revoke();
            }
            if let Some(mut panel) = entry.panel {
                match panel.destroy() {
                    Ok(()) => debug!(panel = %panel.id(), "unmounted"),
                    Err(e) => {
                        warn!(panel = %panel.id(), error = %e, "teardown failed, continuing");
                        failures.push(e);
                    }
                }
            }
        }
        failures
    }

    /// Updates every mounted panel that has not painted the current dataset.
    fn paint_stale(&mut self) -> Result<(), (usize, PanelError)> {
        let version = self.data_version;
        for (index, entry) in self.chain.iter_mut().enumerate() {
            let Some(panel) = entry.panel.as_mut() else {
                continue;
            };
            if entry.painted == Some(version) {
                continue;
            }
            panel.update(self.data.clone()).map_err(|e| (index, e))?;
            entry.painted = Some(version);
        }
        Ok(())
    }

    fn open_surface(&mut self, node: NodeId, depth: usize) -> Surface {
        let id = SurfaceId(self.next_surface);
        self.next_surface += 1;
        let mount = MountPoint {
            path: self.tree.path_of(node),
            depth,
        };
        Surface::open(id, mount, self.host.clone())
    }

    /// Binds a new dataset and repaints every mounted panel, root to leaf.
    /// A failing panel does not stop the others; the first failure is returned.
    pub fn set_data(&mut self, data: Arc<Dataset>) -> Result<(), PanelError> {
        self.data = data;
        self.data_version += 1;
        let version = self.data_version;
        let mut first = None;
        for entry in &mut self.chain {
            let Some(panel) = entry.panel.as_mut() else {
                continue;
            };
            match panel.update(self.data.clone()) {
                Ok(()) => entry.painted = Some(version),
                Err(e) => {
                    warn!(panel = %panel.id(), error = %e, "update failed");
                    first.get_or_insert(e);
                }
            }
        }
        first.map_or(Ok(()), Err)
    }

    /// Re-queries every mount's bounds from the host and resizes, root to leaf.
    pub fn resize(&mut self) -> Result<(), PanelError> {
        let mut first = None;
        for (depth, entry) in self.chain.iter_mut().enumerate() {
            let Some(panel) = entry.panel.as_mut() else {
                continue;
            };
            let mount = MountPoint {
                path: self.tree.path_of(entry.node),
                depth,
            };
            let bounds = self.host.mount_bounds(&mount);
            if let Err(e) = panel.resize(bounds) {
                warn!(panel = %panel.id(), error = %e, "resize failed");
                first.get_or_insert(e);
            }
        }
        first.map_or(Ok(()), Err)
    }

    /// One scheduling turn of incremental panel work. Returns how many panels
    /// still have work pending.
    pub fn tick(&mut self) -> usize {
        let mut busy = 0;
        for entry in &mut self.chain {
            let live = entry.token.as_ref().is_some_and(ActivationToken::is_live);
            let Some(panel) = entry.panel.as_mut() else {
                continue;
            };
            if !live {
                continue;
            }
            match panel.tick() {
                Ok(Tick::Progress) => busy += 1,
                Ok(Tick::Idle) => {}
                Err(e) => warn!(panel = %panel.id(), error = %e, "tick failed"),
            }
        }
        busy
    }

    /// Tears the whole chain down, leaf to root.
    pub fn shutdown(&mut self) -> Vec<PanelError> {
        if !self.chain.is_empty() {
            info!(path = ?self.active_path().map(|p| p.to_string()), "router shutting down");
        }
        self.unmount_from(0)
    }

    pub fn handle(&self) -> RouterHandle {
        self.handle.clone()
    }

    pub fn state(&self) -> RouterState {
        self.state
    }

    /// True when the last transition failed after teardown had committed and
    /// the router settled on a partial chain.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn active_path(&self) -> Option<NavPath> {
        self.chain.last().map(|e| self.tree.path_of(e.node))
    }

    pub fn active_nodes(&self) -> Vec<NodeId> {
        self.chain.iter().map(|e| e.node).collect()
    }

    /// Panel id and state for every mounted panel, root to leaf.
    pub fn active_states(&self) -> Vec<(PanelId, PanelState)> {
        self.chain
            .iter()
            .filter_map(|e| e.panel.as_ref())
            .map(|p| (p.id().clone(), p.state()))
            .collect()
    }

    pub fn data(&self) -> &Arc<Dataset> {
        &self.data
    }

    pub fn tree(&self) -> &NavigationTree {
        &self.tree
    }

    pub fn registry(&self) -> &PanelRegistry {
        &self.registry
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }
}

impl Drop for Router {
    fn drop(&mut self) {
        for e in self.shutdown() {
            warn!(error = %e, "teardown failed while dropping router");
        }
    }
}
