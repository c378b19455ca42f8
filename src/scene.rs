//! Geometry handed to the host's drawing collaborator.

use gpui::{Bounds, Hsla, Pixels, Point};

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Rect {
        bounds: Bounds<Pixels>,
        color: Hsla,
    },
    Polygon {
        points: Vec<Point<Pixels>>,
        fill: Hsla,
        stroke: Hsla,
    },
    Polyline {
        points: Vec<Point<Pixels>>,
        color: Hsla,
        width: f32,
    },
    Circle {
        center: Point<Pixels>,
        radius: Pixels,
        color: Hsla,
    },
    /// Sankey link: a band of constant `width` from `from` to `to`.
    Ribbon {
        from: Point<Pixels>,
        to: Point<Pixels>,
        width: Pixels,
        color: Hsla,
    },
    Label {
        origin: Point<Pixels>,
        text: String,
        color: Hsla,
        size: Pixels,
    },
}

impl Primitive {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Rect { .. } => PrimitiveKind::Rect,
            Self::Polygon { .. } => PrimitiveKind::Polygon,
            Self::Polyline { .. } => PrimitiveKind::Polyline,
            Self::Circle { .. } => PrimitiveKind::Circle,
            Self::Ribbon { .. } => PrimitiveKind::Ribbon,
            Self::Label { .. } => PrimitiveKind::Label,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Rect,
    Polygon,
    Polyline,
    Circle,
    Ribbon,
    Label,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    primitives: Vec<Primitive>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn extend(&mut self, primitives: impl IntoIterator<Item = Primitive>) {
        self.primitives.extend(primitives);
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn count(&self, kind: PrimitiveKind) -> usize {
        self.primitives.iter().filter(|p| p.kind() == kind).count()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Label { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}
