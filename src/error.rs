//! Error taxonomy for navigation and panel lifecycle.
//!
//! Navigation failures are user-visible and non-fatal: the previously mounted
//! view stays in place. Lifecycle violations abort the transition they occur
//! in but never the process.

use crate::panel::PanelId;
use crate::path::NavPath;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("navigation path is empty")]
    Empty,
    #[error("invalid path segment `{0}`")]
    InvalidSegment(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("panel `{0}` is already registered")]
    DuplicateId(PanelId),
    #[error("no panel registered under `{0}`")]
    UnknownPanel(PanelId),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("invalid route `{segment}`: {reason}")]
    InvalidRoute { segment: String, reason: String },
    #[error("view not found: `{path}` has no segment `{segment}`")]
    NotFound { path: NavPath, segment: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PanelError {
    #[error("panel `{panel}` could not be created: {reason}")]
    Creation { panel: PanelId, reason: String },
    #[error("panel `{panel}` is already initialized")]
    AlreadyInitialized { panel: PanelId },
    #[error("panel `{panel}` is not active")]
    NotActive { panel: PanelId },
    #[error("panel `{panel}` was already destroyed")]
    AlreadyDestroyed { panel: PanelId },
    #[error("panel `{panel}` is destroyed")]
    Destroyed { panel: PanelId },
    #[error("panel `{panel}` failed to render: {reason}")]
    Render { panel: PanelId, reason: String },
}

impl PanelError {
    pub fn panel(&self) -> &PanelId {
        match self {
            Self::Creation { panel, .. }
            | Self::AlreadyInitialized { panel }
            | Self::NotActive { panel }
            | Self::AlreadyDestroyed { panel }
            | Self::Destroyed { panel }
            | Self::Render { panel, .. } => panel,
        }
    }
}

/// Step of a transition during which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionStage {
    /// Panel construction, before anything was torn down.
    Prepare,
    /// init() of an entering panel.
    Mount,
    /// update() of an entering or stale panel.
    Paint,
}

impl std::fmt::Display for TransitionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Prepare => "prepare",
            Self::Mount => "mount",
            Self::Paint => "paint",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("transition to `{path}` failed during {stage}{}: {source}", degraded_suffix(.degraded))]
pub struct TransitionError {
    pub path: NavPath,
    pub stage: TransitionStage,
    #[source]
    pub source: PanelError,
    /// True when teardown had already committed and the router settled on a
    /// partial chain instead of the previous one.
    pub degraded: bool,
}

fn degraded_suffix(degraded: &bool) -> &'static str {
    if *degraded {
        " (degraded)"
    } else {
        ""
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterError {
    #[error(transparent)]
    InvalidPath(#[from] PathError),
    #[error(transparent)]
    Navigation(#[from] RouteError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl RouterError {
    /// Whether this is the user-facing "view not found" case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Navigation(RouteError::NotFound { .. }))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error(transparent)]
    Path(#[from] PathError),
}
