use crate::core::{Point, Rgba8};

/// Stroke dash treatment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
}

/// Stroke width (in output pixels) plus dash treatment.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StrokeStyle {
    pub width_px: f64,
    pub line: LineStyle,
}

impl StrokeStyle {
    pub fn solid(width_px: f64) -> Self {
        Self {
            width_px,
            line: LineStyle::Solid,
        }
    }

    pub fn dashed(width_px: f64) -> Self {
        Self {
            width_px,
            line: LineStyle::Dashed,
        }
    }

    pub fn dotted(width_px: f64) -> Self {
        Self {
            width_px,
            line: LineStyle::Dotted,
        }
    }
}

/// One drawing command in world coordinates.
///
/// Curves and the scene only ever append ops; a
/// [`RenderBackend`](crate::render::RenderBackend) maps them to pixels
/// later. There is no ambient drawing state.
#[derive(Clone, Debug)]
pub enum DrawOp {
    Polyline {
        points: Vec<Point>,
        color: Rgba8,
        stroke: StrokeStyle,
    },
    Circle {
        center: Point,
        radius: f64,
        color: Rgba8,
        stroke: StrokeStyle,
    },
    /// Text anchored at `anchor`: left-aligned horizontally, centered
    /// vertically. `size_px` is the font size in output pixels.
    Text {
        anchor: Point,
        content: String,
        color: Rgba8,
        size_px: f32,
    },
}

/// Ordered list of draw ops for one frame. Later ops draw on top.
#[derive(Clone, Debug, Default)]
pub struct DisplayList {
    ops: Vec<DrawOp>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn polyline(&mut self, points: Vec<Point>, color: Rgba8, stroke: StrokeStyle) {
        self.ops.push(DrawOp::Polyline {
            points,
            color,
            stroke,
        });
    }

    pub fn segment(&mut self, a: Point, b: Point, color: Rgba8, stroke: StrokeStyle) {
        self.polyline(vec![a, b], color, stroke);
    }

    pub fn circle(&mut self, center: Point, radius: f64, color: Rgba8, stroke: StrokeStyle) {
        self.ops.push(DrawOp::Circle {
            center,
            radius,
            color,
            stroke,
        });
    }

    pub fn text(&mut self, anchor: Point, content: impl Into<String>, color: Rgba8, size_px: f32) {
        self.ops.push(DrawOp::Text {
            anchor,
            content: content.into(),
            color,
            size_px,
        });
    }
}
