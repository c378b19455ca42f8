use super::layout::{inner, Margins};
use super::PanelRenderer;
use crate::dataset::Dataset;
use crate::scales::{index_bands, ChartScale};
use crate::scene::{Primitive, Scene};
use crate::surface::ResourceKind;
use crate::theme::ChartTheme;
use crate::utils::{bounds_from_f32, point_f32};
use gpui::{Bounds, Hsla, Pixels};

#[derive(Clone, Debug, PartialEq)]
pub struct BarConfig {
    pub color: Hsla,
    /// 0.0 to 1.0, fraction of each band left empty
    pub padding: f32,
    pub y_ticks: usize,
    /// Minimum horizontal room for one month label
    pub min_label_spacing: f32,
    pub margins: Margins,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            color: gpui::blue(),
            padding: 0.2,
            y_ticks: 5,
            min_label_spacing: 48.0,
            margins: Margins {
                top: 16.0,
                right: 16.0,
                bottom: 28.0,
                left: 56.0,
            },
        }
    }
}

/// Total streams per month.
pub struct BarRenderer {
    pub config: BarConfig,
    theme: ChartTheme,
}

impl BarRenderer {
    pub fn new(config: BarConfig, theme: ChartTheme) -> Self {
        Self { config, theme }
    }
}

impl PanelRenderer for BarRenderer {
    fn resources(&self) -> &'static [ResourceKind] {
        // hover tooltip + click-to-filter
        &[ResourceKind::Listener, ResourceKind::Listener]
    }

    fn render(&mut self, data: &Dataset, bounds: Bounds<Pixels>) -> Scene {
        let mut scene = Scene::new();
        let (x, y, w, h) = inner(&bounds, self.config.margins);
        let months = data.monthly_streams();
        let max = months.iter().map(|(_, v)| *v).max().unwrap_or(0) as f64;

        let x_scale = index_bands(months.len(), (x, x + w), self.config.padding);
        let y_scale = ChartScale::new_linear((0.0, max.max(1.0)), (y + h, y));
        let baseline = y + h;

        for tick in y_scale.ticks(self.config.y_ticks) {
            let ty = y_scale.map(tick);
            scene.push(Primitive::Polyline {
                points: vec![point_f32(x, ty), point_f32(x + w, ty)],
                color: self.theme.grid_line,
                width: 1.0,
            });
            scene.push(Primitive::Label {
                origin: point_f32(x - self.config.margins.left + 4.0, ty),
                text: y_scale.format_tick(tick),
                color: self.theme.axis_label,
                size: self.theme.axis_label_size,
            });
        }

        // Thin out month labels so they never overlap.
        let step = x_scale.step() as f32;
        let label_every = if step > 0.0 {
            (self.config.min_label_spacing / step).ceil().max(1.0) as usize
        } else {
            1
        };

        for (i, (month, streams)) in months.iter().enumerate() {
            let Some(bx) = x_scale.scale(&i).map(|v| v as f32) else {
                continue;
            };
            let top = y_scale.map(*streams as f64);
            let height = (baseline - top).max(1.0);
            scene.push(Primitive::Rect {
                bounds: bounds_from_f32(bx, baseline - height, (x_scale.bandwidth() as f32).max(1.0), height),
                color: self.config.color,
            });
            if i % label_every == 0 {
                scene.push(Primitive::Label {
                    origin: point_f32(bx, baseline + 4.0),
                    text: month.format("%Y-%m").to_string(),
                    color: self.theme.axis_label,
                    size: self.theme.axis_label_size,
                });
            }
        }

        scene.push(Primitive::Polyline {
            points: vec![point_f32(x, baseline), point_f32(x + w, baseline)],
            color: self.theme.axis_line,
            width: 1.0,
        });
        scene
    }
}
