//! chart_router: navigation and panel lifecycle for GPUI chart dashboards

pub mod config;
pub mod dataset;
pub mod error;
pub mod lifecycle;
pub mod panel;
pub mod panels;
pub mod path;
pub mod regions;
pub mod registry;
pub mod route;
pub mod router;
pub mod scales;
pub mod scene;
pub mod surface;
pub mod theme;
pub mod tree;
pub mod utils;

pub use config::{AppConfig, RouterConfig};
pub use dataset::{AudioFeatures, Dataset, TrackRecord};
pub use error::{
    ConfigError, PanelError, PathError, RegistryError, RouteError, RouterError, TransitionError,
    TransitionStage,
};
pub use lifecycle::{ActivationToken, Completion, Deferred, PanelState};
pub use panel::{ChartPanel, PanelContext, PanelId, PanelSettings, Tick};
pub use path::NavPath;
pub use registry::{PanelFactory, PanelRegistry};
pub use route::{RouteSpec, RouteTable};
pub use router::{NavigationOutcome, Router, RouterHandle, RouterState};
pub use surface::{MountPoint, Surface, SurfaceHost, SurfaceId};
pub use tree::{NavigationTree, NodeId, ViewNode};
