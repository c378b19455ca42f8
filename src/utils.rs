use gpui::{px, Bounds, Pixels, Point, Size};

pub trait PixelsExt {
    fn as_f32(&self) -> f32;
}

impl PixelsExt for Pixels {
    fn as_f32(&self) -> f32 {
        f32::from(*self)
    }
}

/// Builds pixel bounds from plain floats.
pub fn bounds_from_f32(x: f32, y: f32, width: f32, height: f32) -> Bounds<Pixels> {
    Bounds::new(
        Point::new(px(x), px(y)),
        Size::new(px(width.max(0.0)), px(height.max(0.0))),
    )
}

/// Plain-float view of a bounds: (x, y, width, height).
pub fn bounds_to_f32(bounds: &Bounds<Pixels>) -> (f32, f32, f32, f32) {
    (
        bounds.origin.x.as_f32(),
        bounds.origin.y.as_f32(),
        bounds.size.width.as_f32(),
        bounds.size.height.as_f32(),
    )
}

pub fn point_f32(x: f32, y: f32) -> Point<Pixels> {
    Point::new(px(x), px(y))
}
