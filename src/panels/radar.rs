use super::layout::{inner, Margins};
use super::PanelRenderer;
use crate::dataset::{AudioFeatures, Dataset};
use crate::regions::region_name;
use crate::scene::{Primitive, Scene};
use crate::surface::ResourceKind;
use crate::theme::ChartTheme;
use crate::utils::point_f32;
use gpui::{px, Bounds, Pixels, Point};
use std::f32::consts::{FRAC_PI_2, TAU};

#[derive(Clone, Debug, PartialEq)]
pub struct RadarConfig {
    /// Concentric grid rings.
    pub levels: usize,
    /// How many of the largest regions get their own polygon.
    pub max_series: usize,
    pub margin: f32,
    pub fill_alpha: f32,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            levels: 5,
            max_series: 3,
            margin: 40.0,
            fill_alpha: 0.25,
        }
    }
}

/// Mean audio-feature profile of the top regions, one spoke per feature.
pub struct RadarRenderer {
    pub config: RadarConfig,
    theme: ChartTheme,
}

impl RadarRenderer {
    pub fn new(config: RadarConfig, theme: ChartTheme) -> Self {
        Self { config, theme }
    }

    fn vertex(center: (f32, f32), radius: f32, axis: usize, axes: usize, value: f64) -> Point<Pixels> {
        let angle = TAU * axis as f32 / axes as f32 - FRAC_PI_2;
        let r = radius * value.clamp(0.0, 1.0) as f32;
        point_f32(center.0 + r * angle.cos(), center.1 + r * angle.sin())
    }
}

impl PanelRenderer for RadarRenderer {
    fn resources(&self) -> &'static [ResourceKind] {
        &[ResourceKind::Listener]
    }

    fn render(&mut self, data: &Dataset, bounds: Bounds<Pixels>) -> Scene {
        let mut scene = Scene::new();
        let (x, y, w, h) = inner(&bounds, Margins::uniform(self.config.margin));
        let center = (x + w / 2.0, y + h / 2.0);
        let radius = w.min(h) / 2.0;
        let axes = AudioFeatures::NAMES.len();

        for level in 1..=self.config.levels {
            let v = level as f64 / self.config.levels as f64;
            let mut ring: Vec<_> = (0..axes)
                .map(|i| Self::vertex(center, radius, i, axes, v))
                .collect();
            ring.push(ring[0]);
            scene.push(Primitive::Polyline {
                points: ring,
                color: self.theme.grid_line,
                width: 1.0,
            });
        }

        for (i, name) in AudioFeatures::NAMES.iter().enumerate() {
            let outer = Self::vertex(center, radius, i, axes, 1.0);
            scene.push(Primitive::Polyline {
                points: vec![point_f32(center.0, center.1), outer],
                color: self.theme.axis_line,
                width: 1.0,
            });
            scene.push(Primitive::Label {
                origin: Self::vertex(center, radius * 1.1, i, axes, 1.0),
                text: (*name).to_string(),
                color: self.theme.axis_label,
                size: self.theme.axis_label_size,
            });
        }

        let regions = data.streams_by_region();
        for (idx, (region, _)) in regions.iter().take(self.config.max_series).enumerate() {
            let Some(profile) = data.mean_features(|t| &t.region == region) else {
                continue;
            };
            let color = self.theme.series_color(idx);
            let points = profile
                .values()
                .iter()
                .enumerate()
                .map(|(i, &v)| Self::vertex(center, radius, i, axes, v))
                .collect();
            scene.push(Primitive::Polygon {
                points,
                fill: color.alpha(self.config.fill_alpha),
                stroke: color,
            });
            scene.push(Primitive::Label {
                origin: point_f32(x, y + idx as f32 * 14.0),
                text: region_name(region),
                color,
                size: px(12.0),
            });
        }

        scene
    }
}
