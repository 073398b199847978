use std::f64::consts::TAU;

use crate::{
    core::Vec2,
    error::{PhasorvizError, PhasorvizResult},
};

/// Immutable description of one sinusoid: `amplitude · sin(ω·x + phase)`
/// with `ω = 2π / period`.
///
/// Validated at construction; every method is a pure function of the stored
/// parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Waveform {
    amplitude: f64,
    phase: f64,
    period: f64,
}

impl Waveform {
    /// Build a waveform, rejecting parameters that would make the angular
    /// velocity or the rendered circle meaningless.
    pub fn new(amplitude: f64, phase: f64, period: f64) -> PhasorvizResult<Self> {
        if !amplitude.is_finite() || amplitude < 0.0 {
            return Err(PhasorvizError::validation(format!(
                "waveform amplitude must be finite and >= 0 (got {amplitude})"
            )));
        }
        if !phase.is_finite() {
            return Err(PhasorvizError::validation(format!(
                "waveform phase must be finite (got {phase})"
            )));
        }
        if !period.is_finite() || period <= 0.0 {
            return Err(PhasorvizError::validation(format!(
                "waveform period must be finite and > 0 (got {period})"
            )));
        }
        Ok(Self {
            amplitude,
            phase,
            period,
        })
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    /// `2π / period`. Finite for every constructed waveform.
    pub fn angular_velocity(&self) -> f64 {
        TAU / self.period
    }

    /// Rotation angle of the phasor at sample position `x`.
    pub fn radians_at(&self, x: f64) -> f64 {
        self.angular_velocity() * x + self.phase
    }

    /// Instantaneous signal value at sample position `x`.
    pub fn value_at(&self, x: f64) -> f64 {
        self.amplitude * self.radians_at(x).sin()
    }

    /// Tip of the rotating vector at sample position `x`, as
    /// (real, imaginary) parts of `amplitude · e^(iθ)`.
    pub fn phasor_at(&self, x: f64) -> Vec2 {
        let theta = self.radians_at(x);
        Vec2::new(self.amplitude * theta.cos(), self.amplitude * theta.sin())
    }
}
