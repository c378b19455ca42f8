use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Declarative route entry: one path segment, an optional panel hosted at
/// that level, and nested child routes. Child segments are relative to
/// their parent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteSpec {
    #[serde(alias = "path")]
    pub segment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteSpec>,
}

impl RouteSpec {
    /// Terminal chart view.
    pub fn leaf(segment: impl Into<String>, panel: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
            panel: Some(panel.into()),
            children: vec![],
        }
    }

    /// Grouping node without a panel of its own.
    pub fn group(segment: impl Into<String>, children: Vec<RouteSpec>) -> Self {
        Self {
            segment: segment.into(),
            panel: None,
            children,
        }
    }

    pub fn with_panel(mut self, panel: impl Into<String>) -> Self {
        self.panel = Some(panel.into());
        self
    }
}

pub struct RouteTable;

impl RouteTable {
    pub fn from_json(json: &str) -> Result<Vec<RouteSpec>, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The two analytical modes with their chart views.
    pub fn default_routes() -> Vec<RouteSpec> {
        vec![
            RouteSpec::group(
                "TimeDV",
                vec![
                    RouteSpec::leaf("radar", "radar"),
                    RouteSpec::leaf("bar", "bar"),
                    RouteSpec::leaf("scatter", "scatter"),
                ],
            ),
            RouteSpec::group(
                "SpatialDV",
                vec![
                    RouteSpec::leaf("sankey", "sankey"),
                    RouteSpec::leaf("cartogram", "cartogram"),
                ],
            ),
        ]
    }
}
