mod common;

use chart_router::dataset::Dataset;
use chart_router::panels::bar::{BarConfig, BarRenderer};
use chart_router::panels::cartogram::{CartogramConfig, CartogramRenderer};
use chart_router::panels::radar::{RadarConfig, RadarRenderer};
use chart_router::panels::sankey::{SankeyConfig, SankeyLayout, SankeyRenderer};
use chart_router::panels::scatter::{ScatterConfig, ScatterRenderer};
use chart_router::panels::PanelRenderer;
use chart_router::scene::PrimitiveKind;
use chart_router::theme::ChartTheme;
use chart_router::AudioFeatures;
use common::{bounds, sample_dataset};

#[test]
fn test_radar_draws_one_spoke_per_feature() {
    let mut radar = RadarRenderer::new(RadarConfig::default(), ChartTheme::default());
    let scene = radar.render(&sample_dataset(), bounds(600.0, 600.0));

    let labels: Vec<&str> = scene.labels().collect();
    for name in AudioFeatures::NAMES {
        assert!(labels.contains(&name), "missing axis {name}");
    }
    // top three regions: us, mx, kr
    assert_eq!(scene.count(PrimitiveKind::Polygon), 3);
    assert!(labels.contains(&"United States"));
    // 5 rings + 7 spokes
    assert_eq!(scene.count(PrimitiveKind::Polyline), 12);
}

#[test]
fn test_bar_one_rect_per_month() {
    let mut bar = BarRenderer::new(BarConfig::default(), ChartTheme::default());
    let scene = bar.render(&sample_dataset(), bounds(800.0, 400.0));

    assert_eq!(scene.count(PrimitiveKind::Rect), 5);
    let labels: Vec<&str> = scene.labels().collect();
    assert!(labels.contains(&"2023-01"));
    assert!(labels.contains(&"2023-05"));
}

#[test]
fn test_bar_thins_month_labels_in_narrow_views() {
    let mut bar = BarRenderer::new(BarConfig::default(), ChartTheme::default());
    let scene = bar.render(&sample_dataset(), bounds(160.0, 400.0));
    let months = scene.labels().filter(|l| l.starts_with("2023-")).count();
    assert!(months < 5, "{months} month labels in 88px");
    assert!(months >= 1);
}

#[test]
fn test_scatter_one_circle_per_track() {
    let mut scatter = ScatterRenderer::new(ScatterConfig::default(), ChartTheme::default());
    let data = sample_dataset();
    let scene = scatter.render(&data, bounds(500.0, 500.0));
    assert_eq!(scene.count(PrimitiveKind::Circle), data.len());
}

#[test]
fn test_renderers_handle_empty_data() {
    let empty = Dataset::default();
    let area = bounds(300.0, 200.0);
    let theme = ChartTheme::default();

    let radar = RadarRenderer::new(RadarConfig::default(), theme.clone()).render(&empty, area);
    assert_eq!(radar.count(PrimitiveKind::Polygon), 0);
    let bar = BarRenderer::new(BarConfig::default(), theme.clone()).render(&empty, area);
    assert_eq!(bar.count(PrimitiveKind::Rect), 0);
    let scatter = ScatterRenderer::new(ScatterConfig::default(), theme.clone()).render(&empty, area);
    assert_eq!(scatter.count(PrimitiveKind::Circle), 0);

    let mut sankey = SankeyRenderer::new(SankeyConfig::default(), theme.clone());
    assert!(sankey.render(&empty, area).is_empty());
    let mut cartogram = CartogramRenderer::new(CartogramConfig::default(), theme);
    assert!(cartogram.render(&empty, area).is_empty());
    assert!(cartogram.step(area).is_none());
}

#[test]
fn test_sankey_layout_stays_inside_plot() {
    let data = sample_dataset();
    let flows = data.region_artist_flows(8, 10);
    let plot = (100.0, 20.0, 500.0, 300.0);
    let mut layout = SankeyLayout::build(&flows, plot, 12.0, 8.0);
    assert_eq!(layout.link_count(), flows.len());

    for _ in 0..6 {
        layout.relax();
    }
    for node in layout.nodes() {
        assert!(node.y0 >= plot.1 - 0.01, "{} above plot: {}", node.label, node.y0);
        assert!(node.y1 <= plot.1 + plot.3 + 0.01, "{} below plot: {}", node.label, node.y1);
    }
}

#[test]
fn test_sankey_nodes_in_a_column_do_not_overlap() {
    let data = sample_dataset();
    let mut layout = SankeyLayout::build(&data.region_artist_flows(8, 10), (0.0, 0.0, 400.0, 400.0), 10.0, 6.0);
    layout.relax();
    for column in 0..2 {
        let mut spans: Vec<(f32, f32)> = layout
            .nodes()
            .iter()
            .filter(|n| n.column == column)
            .map(|n| (n.y0, n.y1))
            .collect();
        spans.sort_by(|a, b| a.0.total_cmp(&b.0));
        for pair in spans.windows(2) {
            assert!(pair[0].1 <= pair[1].0 + 0.01, "overlap in column {column}: {pair:?}");
        }
    }
}

#[test]
fn test_sankey_renderer_relaxes_one_pass_per_step() {
    let config = SankeyConfig {
        iterations: 3,
        ..Default::default()
    };
    let mut sankey = SankeyRenderer::new(config, ChartTheme::default());
    let area = bounds(700.0, 400.0);
    let scene = sankey.render(&sample_dataset(), area);
    assert!(scene.count(PrimitiveKind::Ribbon) > 0);

    assert!(sankey.step(area).is_some());
    assert!(sankey.step(area).is_some());
    assert!(sankey.step(area).is_some());
    assert!(sankey.step(area).is_none());
}

#[test]
fn test_cartogram_simulation_reduces_overlap() {
    let mut cartogram = CartogramRenderer::new(CartogramConfig::default(), ChartTheme::default());
    let area = bounds(400.0, 200.0);
    cartogram.render(&sample_dataset(), area);
    assert_eq!(cartogram.nodes().len(), 9);
    let initial = cartogram.total_overlap();

    let mut turns = 0;
    while cartogram.step(area).is_some() {
        turns += 1;
        assert!(turns < 1_000);
    }

    assert!(cartogram.is_settled());
    assert!(cartogram.total_overlap() <= initial);
    for node in cartogram.nodes() {
        assert!(node.pos.0.is_finite() && node.pos.1.is_finite(), "{} diverged", node.code);
    }
}

#[test]
fn test_cartogram_separates_coincident_markets() {
    // a zero-sized plot puts every anchor on the same point
    let data = Dataset::new(vec![
        common::track("A", "us", (2023, 1, 1), 1_000, 0.5, 0.5),
        common::track("A", "us", (2023, 1, 2), 1_000, 0.5, 0.5),
        common::track("B", "ca", (2023, 1, 1), 1_000, 0.5, 0.5),
    ]);
    let mut cartogram = CartogramRenderer::new(CartogramConfig::default(), ChartTheme::default());
    let area = bounds(24.0, 24.0);
    cartogram.render(&data, area);
    assert_eq!(cartogram.nodes()[0].pos, cartogram.nodes()[1].pos);
    while cartogram.step(area).is_some() {}

    let nodes = cartogram.nodes();
    assert_eq!(nodes.len(), 2);
    let d = ((nodes[0].pos.0 - nodes[1].pos.0).powi(2) + (nodes[0].pos.1 - nodes[1].pos.1).powi(2)).sqrt();
    assert!(d.is_finite() && d > 0.0);
}

#[test]
fn test_cartogram_reheats_on_new_data() {
    let mut cartogram = CartogramRenderer::new(CartogramConfig::default(), ChartTheme::default());
    let area = bounds(400.0, 200.0);
    cartogram.render(&sample_dataset(), area);
    while cartogram.step(area).is_some() {}
    assert!(cartogram.is_settled());

    cartogram.render(&sample_dataset(), area);
    assert_eq!(cartogram.alpha(), 1.0);
    assert!(cartogram.step(area).is_some());
}
