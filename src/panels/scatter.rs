use super::layout::{inner, Margins};
use super::PanelRenderer;
use crate::dataset::Dataset;
use crate::scales::ChartScale;
use crate::scene::{Primitive, Scene};
use crate::surface::ResourceKind;
use crate::theme::ChartTheme;
use crate::utils::point_f32;
use gpui::{px, Bounds, Pixels};
use rayon::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub struct ScatterConfig {
    pub min_radius: f32,
    pub max_radius: f32,
    pub point_alpha: f32,
    pub margins: Margins,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            min_radius: 2.0,
            max_radius: 14.0,
            point_alpha: 0.7,
            margins: Margins {
                top: 16.0,
                right: 16.0,
                bottom: 32.0,
                left: 40.0,
            },
        }
    }
}

/// Danceability (x) against energy (y), one circle per chart entry sized by streams.
pub struct ScatterRenderer {
    pub config: ScatterConfig,
    theme: ChartTheme,
}

impl ScatterRenderer {
    pub fn new(config: ScatterConfig, theme: ChartTheme) -> Self {
        Self { config, theme }
    }
}

impl PanelRenderer for ScatterRenderer {
    fn resources(&self) -> &'static [ResourceKind] {
        // brush selection
        &[ResourceKind::Listener]
    }

    fn render(&mut self, data: &Dataset, bounds: Bounds<Pixels>) -> Scene {
        let mut scene = Scene::new();
        let (x, y, w, h) = inner(&bounds, self.config.margins);
        let x_scale = ChartScale::new_linear((0.0, 1.0), (x, x + w));
        let y_scale = ChartScale::new_linear((0.0, 1.0), (y + h, y));
        let r_scale = ChartScale::new_sqrt(
            (0.0, data.max_streams().max(1) as f64),
            (self.config.min_radius, self.config.max_radius),
        );

        scene.push(Primitive::Polyline {
            points: vec![point_f32(x, y), point_f32(x, y + h), point_f32(x + w, y + h)],
            color: self.theme.axis_line,
            width: 1.0,
        });
        for (text, origin) in [
            ("danceability", point_f32(x + w / 2.0, y + h + 8.0)),
            ("energy", point_f32(x - self.config.margins.left + 2.0, y)),
        ] {
            scene.push(Primitive::Label {
                origin,
                text: text.to_string(),
                color: self.theme.axis_label,
                size: self.theme.axis_label_size,
            });
        }

        // Region colors follow the regions' stream ranking.
        let regions: Vec<String> = data.streams_by_region().into_iter().map(|(r, _)| r).collect();
        let theme = &self.theme;
        let alpha = self.config.point_alpha;
        let points: Vec<Primitive> = data
            .tracks
            .par_iter()
            .map(|t| {
                let idx = regions.iter().position(|r| r == &t.region).unwrap_or(0);
                Primitive::Circle {
                    center: point_f32(
                        x_scale.map(t.features.danceability.clamp(0.0, 1.0)),
                        y_scale.map(t.features.energy.clamp(0.0, 1.0)),
                    ),
                    radius: px(r_scale.map(t.streams as f64)),
                    color: theme.series_color(idx).alpha(alpha),
                }
            })
            .collect();
        scene.extend(points);
        scene
    }
}
