use crate::error::ConfigError;
use crate::panel::PanelSettings;
use crate::path::NavPath;
use crate::route::{RouteSpec, RouteTable};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// View mounted by `Router::start`.
    pub default_path: Option<NavPath>,
    pub panels: PanelSettings,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            default_path: NavPath::parse("/TimeDV/radar").ok(),
            panels: PanelSettings::default(),
        }
    }
}

/// Startup configuration: route table plus router tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub routes: Vec<RouteSpec>,
    #[serde(default)]
    pub router: RouterConfig,
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            routes: RouteTable::default_routes(),
            router: RouterConfig::default(),
        }
    }
}
