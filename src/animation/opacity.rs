use std::f64::consts::PI;

use crate::foundation::error::{CompositorError, CompositorResult};
use crate::foundation::math::{frac, smoothstep};

/// Occupant fade envelope: `smoothstep(0, threshold, sin(frac(t, period) / period * pi) ^ exponent)`.
///
/// Zero at every period boundary, a plateau at 1 around the middle of each period.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OpacityCurve {
    /// Shaping exponent applied to the sine lobe.
    pub exponent: f64,
    /// Lobe value at which the opacity saturates to 1.
    pub threshold: f64,
    /// Length of one fade-in/fade-out lobe.
    pub period: f64,
}

impl Default for OpacityCurve {
    fn default() -> Self {
        Self {
            exponent: 0.8,
            threshold: 0.75,
            period: 1.0,
        }
    }
}

impl OpacityCurve {
    /// Reject non-positive or non-finite parameters.
    pub fn validate(&self) -> CompositorResult<()> {
        for (name, v) in [
            ("exponent", self.exponent),
            ("threshold", self.threshold),
            ("period", self.period),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(CompositorError::animation(format!(
                    "opacity curve {name} must be finite and > 0, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Opacity at logical time `t`.
    pub fn sample(&self, t: f64) -> f32 {
        self.sample_unit(frac(t, self.period) / self.period)
    }

    /// Opacity at normalized position `u` in `[0, 1]` of one lobe.
    pub fn sample_unit(&self, u: f64) -> f32 {
        let lobe = (u.clamp(0.0, 1.0) * PI).sin().max(0.0).powf(self.exponent);
        smoothstep(0.0, self.threshold, lobe) as f32
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/opacity.rs"]
mod tests;
