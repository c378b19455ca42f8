use crate::dataset::Dataset;
use crate::error::PanelError;
use crate::lifecycle::{ActivationToken, PanelState};
use crate::router::RouterHandle;
use crate::surface::Surface;
use crate::theme::ChartTheme;
use gpui::{Bounds, Pixels};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identifier a panel implementation is registered under.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelId(String);

impl PanelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PanelId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PanelId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Outcome of one scheduling turn of a panel's background work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// Nothing left to compute.
    Idle,
    /// Work advanced and more remains.
    Progress,
}

/// Capability contract every chart panel implements.
///
/// Instances are single-use: `init` once, any number of `update`/`resize`,
/// then `destroy`. After destroy every call fails.
pub trait ChartPanel: Send {
    fn id(&self) -> &PanelId;

    fn state(&self) -> PanelState;

    /// Takes ownership of the surface and acquires rendering resources on it.
    fn init(&mut self, surface: Surface) -> Result<(), PanelError>;

    /// Rebinds data and repaints. Must not acquire new long-lived resources.
    fn update(&mut self, data: Arc<Dataset>) -> Result<(), PanelError>;

    fn resize(&mut self, bounds: Bounds<Pixels>) -> Result<(), PanelError>;

    /// Releases everything init acquired and gives the surface back to the host.
    fn destroy(&mut self) -> Result<(), PanelError>;

    /// Advances incremental work by one scheduling turn.
    fn tick(&mut self) -> Result<Tick, PanelError> {
        Ok(Tick::Idle)
    }
}

/// Tuning knobs forwarded to panel factories.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelSettings {
    /// Cartogram collision iterations per scheduling turn.
    pub sim_iterations_per_tick: usize,
    /// Total Sankey relaxation passes, one per turn.
    pub sankey_iterations: usize,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            sim_iterations_per_tick: 10,
            sankey_iterations: 6,
        }
    }
}

/// Everything a factory gets to build one panel instance.
#[derive(Clone, Debug)]
pub struct PanelContext {
    pub panel: PanelId,
    pub token: ActivationToken,
    pub router: RouterHandle,
    pub theme: ChartTheme,
    pub settings: PanelSettings,
}

impl PanelContext {
    /// Context not bound to any router, for building panels by hand.
    pub fn detached(panel: impl Into<PanelId>) -> Self {
        Self {
            panel: panel.into(),
            token: ActivationToken::new(0),
            router: RouterHandle::default(),
            theme: ChartTheme::default(),
            settings: PanelSettings::default(),
        }
    }
}
