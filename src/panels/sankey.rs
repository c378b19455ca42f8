use super::layout::{inner, Margins};
use super::PanelRenderer;
use crate::dataset::{Dataset, Flow};
use crate::regions::region_name;
use crate::scene::{Primitive, Scene};
use crate::surface::ResourceKind;
use crate::theme::ChartTheme;
use crate::utils::{bounds_from_f32, point_f32};
use gpui::{px, Bounds, Pixels};
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq)]
pub struct SankeyConfig {
    pub max_regions: usize,
    pub max_artists: usize,
    pub node_width: f32,
    pub node_padding: f32,
    /// Relaxation passes, one per scheduling turn.
    pub iterations: usize,
    pub margins: Margins,
}

impl Default for SankeyConfig {
    fn default() -> Self {
        Self {
            max_regions: 8,
            max_artists: 10,
            node_width: 12.0,
            node_padding: 8.0,
            iterations: 6,
            margins: Margins {
                top: 8.0,
                right: 120.0,
                bottom: 8.0,
                left: 100.0,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SankeyNode {
    pub label: String,
    /// 0 = regions (sources), 1 = artists (targets)
    pub column: usize,
    pub value: f64,
    pub y0: f32,
    pub y1: f32,
}

impl SankeyNode {
    fn center(&self) -> f32 {
        (self.y0 + self.y1) / 2.0
    }

    fn shift(&mut self, dy: f32) {
        self.y0 += dy;
        self.y1 += dy;
    }
}

#[derive(Clone, Debug, PartialEq)]
struct SankeyLink {
    source: usize,
    target: usize,
    value: f64,
}

/// Two-column Sankey layout: node bands scaled by value, positions relaxed
/// toward the weighted centers of connected nodes.
#[derive(Clone, Debug)]
pub struct SankeyLayout {
    nodes: Vec<SankeyNode>,
    links: Vec<SankeyLink>,
    column_x: [f32; 2],
    node_width: f32,
    padding: f32,
    top: f32,
    bottom: f32,
    ky: f32,
    alpha: f32,
}

impl SankeyLayout {
    pub fn build(flows: &[Flow], plot: (f32, f32, f32, f32), node_width: f32, padding: f32) -> Self {
        let (x, y, w, h) = plot;
        let mut nodes: Vec<SankeyNode> = Vec::new();
        let mut index: HashMap<(usize, &str), usize> = HashMap::new();
        let mut links = Vec::with_capacity(flows.len());

        for flow in flows {
            let s = node_index(&mut index, &mut nodes, 0, flow.source.as_str());
            let t = node_index(&mut index, &mut nodes, 1, flow.target.as_str());
            nodes[s].value += flow.value as f64;
            nodes[t].value += flow.value as f64;
            links.push(SankeyLink {
                source: s,
                target: t,
                value: flow.value as f64,
            });
        }

        let mut ky = f32::INFINITY;
        for column in 0..2 {
            let col: Vec<&SankeyNode> = nodes.iter().filter(|n| n.column == column).collect();
            if col.is_empty() {
                continue;
            }
            let total: f64 = col.iter().map(|n| n.value).sum();
            let room = (h - (col.len() - 1) as f32 * padding).max(0.0);
            if total > 0.0 {
                ky = ky.min(room / total as f32);
            }
        }
        if !ky.is_finite() {
            ky = 0.0;
        }

        // Initial placement: stack each column by descending value.
        for column in 0..2 {
            let mut order: Vec<usize> = (0..nodes.len()).filter(|&i| nodes[i].column == column).collect();
            order.sort_by(|&a, &b| nodes[b].value.total_cmp(&nodes[a].value));
            let mut cursor = y;
            for i in order {
                let height = nodes[i].value as f32 * ky;
                nodes[i].y0 = cursor;
                nodes[i].y1 = cursor + height;
                cursor += height + padding;
            }
        }

        Self {
            nodes,
            links,
            column_x: [x, x + (w - node_width).max(0.0)],
            node_width,
            padding,
            top: y,
            bottom: y + h,
            ky,
            alpha: 1.0,
        }
    }

    pub fn nodes(&self) -> &[SankeyNode] {
        &self.nodes
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// One relaxation pass: targets toward their sources, then sources toward
    /// their targets, resolving overlaps after each column.
    pub fn relax(&mut self) {
        for column in [1usize, 0] {
            let mut targets: Vec<(usize, f32)> = Vec::new();
            for (i, node) in self.nodes.iter().enumerate().filter(|(_, n)| n.column == column) {
                let mut weighted = 0.0f64;
                let mut total = 0.0f64;
                for link in &self.links {
                    let other = match (column, link.source == i, link.target == i) {
                        (1, _, true) => link.source,
                        (0, true, _) => link.target,
                        _ => continue,
                    };
                    weighted += self.nodes[other].center() as f64 * link.value;
                    total += link.value;
                }
                if total > 0.0 {
                    let dy = (weighted / total) as f32 - node.center();
                    targets.push((i, dy * self.alpha));
                }
            }
            for (i, dy) in targets {
                self.nodes[i].shift(dy);
            }
            self.resolve_collisions(column);
        }
        self.alpha *= 0.99;
    }

    fn resolve_collisions(&mut self, column: usize) {
        let mut order: Vec<usize> = (0..self.nodes.len())
            .filter(|&i| self.nodes[i].column == column)
            .collect();
        order.sort_by(|&a, &b| self.nodes[a].y0.total_cmp(&self.nodes[b].y0));

        // Push overlapping nodes down.
        let mut cursor = self.top;
        for &i in &order {
            let dy = cursor - self.nodes[i].y0;
            if dy > 0.0 {
                self.nodes[i].shift(dy);
            }
            cursor = self.nodes[i].y1 + self.padding;
        }

        // If the last node overflows, push back up.
        let mut cursor = self.bottom;
        for &i in order.iter().rev() {
            let dy = self.nodes[i].y1 - cursor;
            if dy > 0.0 {
                self.nodes[i].shift(-dy);
            }
            cursor = self.nodes[i].y0 - self.padding;
        }
    }

    pub fn scene(&self, theme: &ChartTheme) -> Scene {
        let mut scene = Scene::new();

        // Link offsets within each node, ordered by the other end's position.
        let mut out_offset = vec![0.0f32; self.nodes.len()];
        let mut in_offset = vec![0.0f32; self.nodes.len()];
        let mut order: Vec<usize> = (0..self.links.len()).collect();
        order.sort_by(|&a, &b| {
            let (la, lb) = (&self.links[a], &self.links[b]);
            self.nodes[la.target]
                .y0
                .total_cmp(&self.nodes[lb.target].y0)
                .then(self.nodes[la.source].y0.total_cmp(&self.nodes[lb.source].y0))
        });

        let mut ribbons = Vec::with_capacity(self.links.len());
        for &li in &order {
            let link = &self.links[li];
            let width = link.value as f32 * self.ky;
            let sy = self.nodes[link.source].y0 + out_offset[link.source] + width / 2.0;
            let ty = self.nodes[link.target].y0 + in_offset[link.target] + width / 2.0;
            out_offset[link.source] += width;
            in_offset[link.target] += width;
            ribbons.push(Primitive::Ribbon {
                from: point_f32(self.column_x[0] + self.node_width, sy),
                to: point_f32(self.column_x[1], ty),
                width: px(width.max(1.0)),
                color: theme.link,
            });
        }
        scene.extend(ribbons);

        let mut source_rank = 0;
        for node in &self.nodes {
            let x = self.column_x[node.column];
            let color = if node.column == 0 {
                source_rank += 1;
                theme.series_color(source_rank - 1)
            } else {
                theme.highlight
            };
            scene.push(Primitive::Rect {
                bounds: bounds_from_f32(x, node.y0, self.node_width, (node.y1 - node.y0).max(1.0)),
                color,
            });
            let (text, label_x) = if node.column == 0 {
                (region_name(&node.label), x - 96.0)
            } else {
                (node.label.clone(), x + self.node_width + 6.0)
            };
            scene.push(Primitive::Label {
                origin: point_f32(label_x, node.center()),
                text,
                color: theme.axis_label,
                size: theme.axis_label_size,
            });
        }
        scene
    }
}

fn node_index<'a>(
    index: &mut HashMap<(usize, &'a str), usize>,
    nodes: &mut Vec<SankeyNode>,
    column: usize,
    label: &'a str,
) -> usize {
    if let Some(&i) = index.get(&(column, label)) {
        return i;
    }
    nodes.push(SankeyNode {
        label: label.to_string(),
        column,
        value: 0.0,
        y0: 0.0,
        y1: 0.0,
    });
    let i = nodes.len() - 1;
    index.insert((column, label), i);
    i
}

/// Region -> artist stream flows.
pub struct SankeyRenderer {
    pub config: SankeyConfig,
    theme: ChartTheme,
    layout: Option<SankeyLayout>,
    remaining: usize,
}

impl SankeyRenderer {
    pub fn new(config: SankeyConfig, theme: ChartTheme) -> Self {
        Self {
            config,
            theme,
            layout: None,
            remaining: 0,
        }
    }

    pub fn layout(&self) -> Option<&SankeyLayout> {
        self.layout.as_ref()
    }
}

impl PanelRenderer for SankeyRenderer {
    fn resources(&self) -> &'static [ResourceKind] {
        &[ResourceKind::Listener]
    }

    fn render(&mut self, data: &Dataset, bounds: Bounds<Pixels>) -> Scene {
        let flows = data.region_artist_flows(self.config.max_regions, self.config.max_artists);
        let layout = SankeyLayout::build(
            &flows,
            inner(&bounds, self.config.margins),
            self.config.node_width,
            self.config.node_padding,
        );
        let scene = layout.scene(&self.theme);
        self.layout = Some(layout);
        self.remaining = self.config.iterations;
        scene
    }

    fn step(&mut self, _bounds: Bounds<Pixels>) -> Option<Scene> {
        if self.remaining == 0 {
            return None;
        }
        let layout = self.layout.as_mut()?;
        layout.relax();
        self.remaining -= 1;
        Some(layout.scene(&self.theme))
    }
}
