use d3rs::geo::Equirectangular;
use d3rs::scale::{sqrt_scale, BandScale, LinearScale, PowScale, Scale as D3Scale};
use std::f64::consts::{PI, TAU};

#[derive(Clone, Debug)]
pub enum ChartScale {
    Linear(LinearScale),
    Sqrt(PowScale),
}

impl ChartScale {
    pub fn new_linear(domain: (f64, f64), range: (f32, f32)) -> Self {
        let (d_min, d_max) = pad_domain(domain.0, domain.1);
        let scale = LinearScale::new()
            .domain(d_min, d_max)
            .range(range.0 as f64, range.1 as f64);
        Self::Linear(scale)
    }

    /// Square-root scale, used for circle radii so area tracks value.
    pub fn new_sqrt(domain: (f64, f64), range: (f32, f32)) -> Self {
        let (d_min, d_max) = pad_domain(domain.0.max(0.0), domain.1.max(0.0));
        let scale = sqrt_scale()
            .domain(d_min, d_max)
            .range(range.0 as f64, range.1 as f64);
        Self::Sqrt(scale)
    }

    pub fn map(&self, value: f64) -> f32 {
        let res = match self {
            Self::Linear(s) => s.scale(value) as f32,
            Self::Sqrt(s) => s.scale(value.max(0.0)) as f32,
        };
        if res.is_nan() || res.is_infinite() {
            0.0
        } else {
            res
        }
    }

    pub fn range(&self) -> (f32, f32) {
        let (r0, r1) = match self {
            Self::Linear(s) => s.range(),
            Self::Sqrt(s) => s.range(),
        };
        (r0 as f32, r1 as f32)
    }

    pub fn domain(&self) -> (f64, f64) {
        match self {
            Self::Linear(s) => s.domain(),
            Self::Sqrt(s) => s.domain(),
        }
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        if count == 0 {
            return vec![];
        }
        match self {
            Self::Linear(s) => s.ticks(count),
            Self::Sqrt(s) => s.ticks(count),
        }
    }

    pub fn format_tick(&self, value: f64) -> String {
        if value.abs() < 0.001 && value.abs() > 0.0 {
            format!("{:.4}", value)
        } else if value.abs() >= 1_000_000.0 {
            format!("{:.1}M", value / 1_000_000.0)
        } else if value.abs() >= 1000.0 {
            format!("{:.0}", value)
        } else {
            format!("{:.2}", value)
        }
    }
}

/// Bands for `count` ordered categories over `range`.
///
/// `padding` is the fraction of each step left empty, split evenly on both
/// sides of the band.
pub fn index_bands(count: usize, range: (f32, f32), padding: f32) -> BandScale<usize> {
    let padding = (padding as f64).clamp(0.0, 0.99);
    BandScale::new()
        .domain((0..count).collect())
        .range(range.0 as f64, range.1 as f64)
        .padding_inner(padding)
        .padding_outer(padding / 2.0)
}

/// Plate carrée projection of the whole globe, fitted and centered in the
/// given plot area.
pub fn world_projection(x: f32, y: f32, width: f32, height: f32) -> Equirectangular {
    let scale = (width as f64 / TAU).min(height as f64 / PI).max(0.0);
    Equirectangular::new()
        .scale(scale)
        .translate((x + width / 2.0) as f64, (y + height / 2.0) as f64)
}

fn pad_domain(min: f64, max: f64) -> (f64, f64) {
    let (mut d_min, mut d_max) = (min, max);
    if !d_min.is_finite() || !d_max.is_finite() {
        return (0.0, 1.0);
    }
    if (d_max - d_min).abs() < f64::EPSILON {
        d_min -= 0.5;
        d_max += 0.5;
    }
    (d_min, d_max)
}
