use crate::{
    core::{Point, Rect, Rgba8},
    curve::{Curve, FunctionCurve, SineCurve},
    display::{DisplayList, StrokeStyle},
    error::{PhasorvizError, PhasorvizResult},
    waveform::Waveform,
};

const AXIS_WIDTH_PX: f64 = 1.25;
const TICK_HALF_LEN: f64 = 0.1; // world units
const TICK_LABEL_SIZE_PX: f32 = 10.0;

/// Ordered collection of curves sharing one coordinate frame.
///
/// The scene is immutable once built; [`Scene::display_list`] renders one
/// frame at a normalized time in `[0, 1)`.
#[derive(Debug)]
pub struct Scene {
    axis_length: f64,
    max_amplitude: f64,
    labels: bool,
    curves: Vec<Curve>,
}

/// Consuming builder for [`Scene`]. Sine adds are fallible (waveform
/// validation), so chains thread `?` through each step.
#[derive(Debug)]
pub struct SceneBuilder {
    axis_length: f64,
    max_amplitude: f64,
    labels: bool,
    curves: Vec<Curve>,
}

impl SceneBuilder {
    pub fn new(axis_length: f64) -> Self {
        Self {
            axis_length,
            max_amplitude: 0.0,
            labels: true,
            curves: Vec::new(),
        }
    }

    /// Append a sine curve and fold its amplitude into the running maximum.
    pub fn sine(
        mut self,
        amplitude: f64,
        phase: f64,
        period: f64,
        color: Rgba8,
    ) -> PhasorvizResult<Self> {
        let wave = Waveform::new(amplitude, phase, period)?;
        if wave.amplitude() > self.max_amplitude {
            self.max_amplitude = wave.amplitude();
        }
        self.curves.push(Curve::Sine(SineCurve::new(wave, color)));
        Ok(self)
    }

    /// Append a pre-built function curve. Does not affect amplitude
    /// tracking.
    pub fn curve(mut self, curve: FunctionCurve) -> Self {
        self.curves.push(Curve::Function(curve));
        self
    }

    /// Toggle textual annotations and tick labels (on by default). Scenes
    /// without labels render without any font configured.
    pub fn labels(mut self, on: bool) -> Self {
        self.labels = on;
        self
    }

    /// Running maximum over the amplitudes added so far. Monotonically
    /// non-decreasing.
    pub fn max_amplitude(&self) -> f64 {
        self.max_amplitude
    }

    pub fn build(self) -> PhasorvizResult<Scene> {
        if !self.axis_length.is_finite() || self.axis_length <= 0.0 {
            return Err(PhasorvizError::validation(format!(
                "scene axis length must be finite and > 0 (got {})",
                self.axis_length
            )));
        }
        Ok(Scene {
            axis_length: self.axis_length,
            max_amplitude: self.max_amplitude,
            labels: self.labels,
            curves: self.curves,
        })
    }
}

impl Scene {
    pub fn axis_length(&self) -> f64 {
        self.axis_length
    }

    pub fn max_amplitude(&self) -> f64 {
        self.max_amplitude
    }

    /// Center of every generator circle, to the left of the y axis.
    pub fn circle_origin(&self) -> f64 {
        -self.max_amplitude
    }

    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    /// Half-height of the vertical axis. Clamped so function-only scenes
    /// (running max 0) still get a visible frame.
    fn axis_half_height(&self) -> f64 {
        self.max_amplitude.max(1.0)
    }

    /// World-space bounding box of everything the scene can draw, used to
    /// fit the viewport. Stable across frames.
    pub fn world_bounds(&self) -> Rect {
        let half = self.axis_half_height();
        let left = (2.0 * self.circle_origin())
            .min(self.circle_origin() - self.max_amplitude)
            .min(0.0)
            - 0.5;
        let right = self.axis_length + 0.5;
        let bottom = -half - 1.0;
        let top = half + 1.0 + (self.curves.len() as f64) / 2.0 + 0.5;
        Rect::new(left, bottom, right, top)
    }

    /// Build the draw ops for one frame at `normalized_time ∈ [0, 1)`.
    ///
    /// Curves render in insertion order, each followed by its annotation at
    /// a vertical offset that grows with the curve index so the text lines
    /// stack instead of overlapping.
    pub fn display_list(&self, normalized_time: f64) -> PhasorvizResult<DisplayList> {
        if !normalized_time.is_finite() || !(0.0..1.0).contains(&normalized_time) {
            return Err(PhasorvizError::validation(format!(
                "normalized time must be in [0, 1) (got {normalized_time})"
            )));
        }

        let pos = normalized_time * self.axis_length;
        let mut list = DisplayList::new();
        self.draw_axes(&mut list);

        for (idx, curve) in self.curves.iter().enumerate() {
            curve.draw(pos, self.circle_origin(), &mut list);
            if self.labels {
                let anchor = Point::new(
                    2.0 * self.circle_origin(),
                    self.max_amplitude + 1.0 + (idx as f64) / 2.0,
                );
                curve.describe(anchor, pos, &mut list);
            }
        }

        Ok(list)
    }

    fn draw_axes(&self, list: &mut DisplayList) {
        let half = self.axis_half_height();
        let axis = StrokeStyle::solid(AXIS_WIDTH_PX);

        list.segment(
            Point::new(0.0, -half),
            Point::new(0.0, half),
            Rgba8::BLACK,
            axis,
        );
        list.segment(
            Point::new(self.circle_origin(), 0.0),
            Point::new(self.axis_length, 0.0),
            Rgba8::BLACK,
            axis,
        );

        // Tick marks at every integer position along the x axis.
        let mut i = 0u64;
        while (i as f64) <= self.axis_length {
            let x = i as f64;
            list.segment(
                Point::new(x, -TICK_HALF_LEN),
                Point::new(x, TICK_HALF_LEN),
                Rgba8::BLACK,
                StrokeStyle::solid(1.0),
            );
            if self.labels {
                list.text(
                    Point::new(x - 0.08, -0.45),
                    format!("{i}"),
                    Rgba8::BLACK,
                    TICK_LABEL_SIZE_PX,
                );
            }
            i += 1;
        }
    }
}
