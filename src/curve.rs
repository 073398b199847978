use std::f64::consts::TAU;

use crate::{
    core::{Point, Rgba8},
    display::{DisplayList, StrokeStyle},
    waveform::Waveform,
};

/// Fixed sampling step along the x axis for curve trails.
pub const SAMPLE_STEP: f64 = 0.01;

/// Font size used for per-curve annotations, in output pixels.
pub const ANNOTATION_SIZE_PX: f32 = 12.0;

const TRAIL_WIDTH_PX: f64 = 1.5;
const CONSTRUCTION_WIDTH_PX: f64 = 1.0;

/// Sample positions covering `[0, x_pos)` at [`SAMPLE_STEP`], with the exact
/// endpoint appended so the trail meets the construction path. An empty
/// range degenerates to the single point `0.0`.
fn sample_positions(x_pos: f64) -> Vec<f64> {
    if !(x_pos > 0.0) {
        return vec![0.0];
    }
    let mut xs = Vec::with_capacity((x_pos / SAMPLE_STEP) as usize + 2);
    let mut i = 0u64;
    loop {
        let x = (i as f64) * SAMPLE_STEP;
        if x >= x_pos {
            break;
        }
        xs.push(x);
        i += 1;
    }
    xs.push(x_pos);
    xs
}

/// One sine wave plus its generating phasor circle.
#[derive(Clone, Debug)]
pub struct SineCurve {
    wave: Waveform,
    color: Rgba8,
}

impl SineCurve {
    pub fn new(wave: Waveform, color: Rgba8) -> Self {
        Self { wave, color }
    }

    pub fn waveform(&self) -> &Waveform {
        &self.wave
    }

    pub fn color(&self) -> Rgba8 {
        self.color
    }

    pub(crate) fn draw(&self, x_pos: f64, circle_origin: f64, list: &mut DisplayList) {
        let trail: Vec<Point> = sample_positions(x_pos)
            .into_iter()
            .map(|x| Point::new(x, self.wave.value_at(x)))
            .collect();
        list.polyline(trail, self.color, StrokeStyle::solid(TRAIL_WIDTH_PX));

        list.circle(
            Point::new(circle_origin, 0.0),
            self.wave.amplitude(),
            self.color,
            StrokeStyle::dashed(CONSTRUCTION_WIDTH_PX),
        );

        // Vector tip, then across to the wave's current height, then down to
        // the axis. The real part is added to the circle origin; see
        // DESIGN.md for the sign convention.
        let tip = self.wave.phasor_at(x_pos);
        list.polyline(
            vec![
                Point::new(circle_origin, 0.0),
                Point::new(circle_origin + tip.x, tip.y),
                Point::new(x_pos, tip.y),
                Point::new(x_pos, 0.0),
            ],
            self.color,
            StrokeStyle::dotted(CONSTRUCTION_WIDTH_PX),
        );
    }

    pub(crate) fn describe(&self, anchor: Point, x_pos: f64, list: &mut DisplayList) {
        let angle = self.wave.radians_at(x_pos).rem_euclid(TAU);
        let y = self.wave.value_at(x_pos);
        let content = format!(
            "angle={angle:.2} rad, x={x_pos:.2}, y={y:.2}, \
             (velocity={:.2} rad/sec, amp={:.2}, phase={:.2})",
            self.wave.angular_velocity(),
            self.wave.amplitude(),
            self.wave.phase(),
        );
        list.text(anchor, content, self.color, ANNOTATION_SIZE_PX);
    }
}

/// An arbitrary scalar function plotted like a sine trail, without the
/// circle construction.
pub struct FunctionCurve {
    label: String,
    f: Box<dyn Fn(f64) -> f64 + Send + Sync>,
    color: Rgba8,
}

impl std::fmt::Debug for FunctionCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionCurve")
            .field("label", &self.label)
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}

impl FunctionCurve {
    pub fn new(
        label: impl Into<String>,
        f: impl Fn(f64) -> f64 + Send + Sync + 'static,
        color: Rgba8,
    ) -> Self {
        Self {
            label: label.into(),
            f: Box::new(f),
            color,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn color(&self) -> Rgba8 {
        self.color
    }

    pub(crate) fn draw(&self, x_pos: f64, _circle_origin: f64, list: &mut DisplayList) {
        let trail: Vec<Point> = sample_positions(x_pos)
            .into_iter()
            .map(|x| Point::new(x, (self.f)(x)))
            .collect();
        list.polyline(trail, self.color, StrokeStyle::solid(TRAIL_WIDTH_PX));
    }

    pub(crate) fn describe(&self, anchor: Point, _x_pos: f64, list: &mut DisplayList) {
        list.text(anchor, self.label.clone(), self.color, ANNOTATION_SIZE_PX);
    }
}

/// One renderable curve in a scene.
#[derive(Debug)]
pub enum Curve {
    Sine(SineCurve),
    Function(FunctionCurve),
}

impl Curve {
    pub(crate) fn draw(&self, x_pos: f64, circle_origin: f64, list: &mut DisplayList) {
        match self {
            Curve::Sine(c) => c.draw(x_pos, circle_origin, list),
            Curve::Function(c) => c.draw(x_pos, circle_origin, list),
        }
    }

    pub(crate) fn describe(&self, anchor: Point, x_pos: f64, list: &mut DisplayList) {
        match self {
            Curve::Sine(c) => c.describe(anchor, x_pos, list),
            Curve::Function(c) => c.describe(anchor, x_pos, list),
        }
    }

    pub fn color(&self) -> Rgba8 {
        match self {
            Curve::Sine(c) => c.color(),
            Curve::Function(c) => c.color(),
        }
    }
}
