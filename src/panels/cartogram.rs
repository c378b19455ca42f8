use super::layout::{inner, Margins};
use super::PanelRenderer;
use crate::dataset::Dataset;
use crate::regions::{self, region_name};
use crate::scales::{world_projection, ChartScale};
use crate::scene::{Primitive, Scene};
use crate::surface::ResourceKind;
use crate::theme::ChartTheme;
use crate::utils::point_f32;
use d3rs::geo::Projection;
use gpui::{px, Bounds, Pixels};

#[derive(Clone, Debug, PartialEq)]
pub struct CartogramConfig {
    pub min_radius: f32,
    /// Largest circle as a fraction of the shorter plot side.
    pub max_radius_ratio: f32,
    /// Extra gap kept between neighbouring circles.
    pub padding: f32,
    /// Pull toward the geographic anchor, scaled by alpha.
    pub anchor_strength: f32,
    /// Fraction of an overlap removed per iteration.
    pub collide_strength: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
    pub iterations_per_tick: usize,
    pub margins: Margins,
}

impl Default for CartogramConfig {
    fn default() -> Self {
        Self {
            min_radius: 3.0,
            max_radius_ratio: 1.0 / 12.0,
            padding: 1.5,
            anchor_strength: 0.1,
            collide_strength: 0.5,
            alpha_min: 0.001,
            // reaches alpha_min after ~300 iterations
            alpha_decay: 1.0 - 0.001f32.powf(1.0 / 300.0),
            iterations_per_tick: 10,
            margins: Margins::uniform(12.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CartogramNode {
    pub code: String,
    pub streams: u64,
    pub anchor: (f32, f32),
    pub pos: (f32, f32),
    pub radius: f32,
}

/// Dorling cartogram: one circle per market, area proportional to streams,
/// pushed apart from its neighbours by an incremental collision simulation.
pub struct CartogramRenderer {
    pub config: CartogramConfig,
    theme: ChartTheme,
    nodes: Vec<CartogramNode>,
    alpha: f32,
}

impl CartogramRenderer {
    pub fn new(config: CartogramConfig, theme: ChartTheme) -> Self {
        Self {
            config,
            theme,
            nodes: Vec::new(),
            alpha: 0.0,
        }
    }

    pub fn nodes(&self) -> &[CartogramNode] {
        &self.nodes
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn is_settled(&self) -> bool {
        self.alpha < self.config.alpha_min
    }

    /// Sum of pairwise circle overlaps in pixels.
    pub fn total_overlap(&self) -> f32 {
        let mut total = 0.0;
        for i in 0..self.nodes.len() {
            for j in (i + 1)..self.nodes.len() {
                let (a, b) = (&self.nodes[i], &self.nodes[j]);
                let d = ((a.pos.0 - b.pos.0).powi(2) + (a.pos.1 - b.pos.1).powi(2)).sqrt();
                total += (a.radius + b.radius - d).max(0.0);
            }
        }
        total
    }

    fn layout(&mut self, data: &Dataset, bounds: &Bounds<Pixels>) {
        let (x, y, w, h) = inner(bounds, self.config.margins);
        let totals: Vec<(String, u64)> = data
            .streams_by_region()
            .into_iter()
            .filter(|(code, _)| regions::lookup(code).is_some())
            .collect();
        let max = totals.iter().map(|(_, v)| *v).max().unwrap_or(1).max(1);
        let r_scale = ChartScale::new_sqrt(
            (0.0, max as f64),
            (self.config.min_radius, (w.min(h) * self.config.max_radius_ratio).max(self.config.min_radius)),
        );

        let projection = world_projection(x, y, w, h);

        self.nodes = totals
            .into_iter()
            .filter_map(|(code, streams)| {
                let region = regions::lookup(&code)?;
                let (ax, ay) = projection.project(region.lon, region.lat);
                let (ax, ay) = (ax as f32, ay as f32);
                Some(CartogramNode {
                    radius: r_scale.map(streams as f64),
                    code,
                    streams,
                    anchor: (ax, ay),
                    pos: (ax, ay),
                })
            })
            .collect();
        self.alpha = 1.0;
    }

    fn iterate(&mut self) {
        let alpha = self.alpha;
        let k = self.config.anchor_strength * alpha;
        for node in &mut self.nodes {
            node.pos.0 += (node.anchor.0 - node.pos.0) * k;
            node.pos.1 += (node.anchor.1 - node.pos.1) * k;
        }

        let n = self.nodes.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (&self.nodes[i], &self.nodes[j]);
                let min_dist = a.radius + b.radius + self.config.padding;
                let (mut dx, mut dy) = (b.pos.0 - a.pos.0, b.pos.1 - a.pos.1);
                let mut dist = (dx * dx + dy * dy).sqrt();
                if dist >= min_dist {
                    continue;
                }
                if dist < 1e-6 {
                    // coincident centers: separate along a fixed per-pair direction
                    let angle = (i * 31 + j * 17) as f32 * 2.399_963;
                    dx = angle.cos();
                    dy = angle.sin();
                    dist = 1.0;
                }
                let push = (min_dist - dist) / dist * self.config.collide_strength * 0.5;
                let (ox, oy) = (dx * push, dy * push);
                self.nodes[i].pos.0 -= ox;
                self.nodes[i].pos.1 -= oy;
                self.nodes[j].pos.0 += ox;
                self.nodes[j].pos.1 += oy;
            }
        }

        self.alpha += (0.0 - self.alpha) * self.config.alpha_decay;
    }

    fn scene(&self) -> Scene {
        let mut scene = Scene::new();
        for (i, node) in self.nodes.iter().enumerate() {
            scene.push(Primitive::Circle {
                center: point_f32(node.pos.0, node.pos.1),
                radius: px(node.radius),
                color: self.theme.series_color(i),
            });
            if node.radius >= 10.0 {
                scene.push(Primitive::Label {
                    origin: point_f32(node.pos.0, node.pos.1),
                    text: region_name(&node.code),
                    color: self.theme.axis_label,
                    size: self.theme.axis_label_size,
                });
            }
        }
        scene
    }
}

impl PanelRenderer for CartogramRenderer {
    fn resources(&self) -> &'static [ResourceKind] {
        &[
            ResourceKind::Simulation,
            ResourceKind::AnimationFrame,
            ResourceKind::Listener,
        ]
    }

    /// Re-projects anchors and reheats the simulation.
    fn render(&mut self, data: &Dataset, bounds: Bounds<Pixels>) -> Scene {
        self.layout(data, &bounds);
        self.scene()
    }

    fn step(&mut self, _bounds: Bounds<Pixels>) -> Option<Scene> {
        if self.nodes.is_empty() || self.is_settled() {
            return None;
        }
        for _ in 0..self.config.iterations_per_tick.max(1) {
            self.iterate();
            if self.is_settled() {
                break;
            }
        }
        Some(self.scene())
    }
}
