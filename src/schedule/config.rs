use crate::foundation::error::{CompositorError, CompositorResult};
use crate::foundation::math::frac;

/// Repeating cycle of `cycle_length` split into `phase_count` equal phases.
///
/// `overlap` is the half-width of every transition window and must stay below half a phase, so
/// neighbouring phases never consume each other's plateau.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct CyclePhaseConfig {
    cycle_length: f64,
    phase_count: u32,
    overlap: f64,
}

impl CyclePhaseConfig {
    /// Create a validated cycle configuration.
    pub fn new(cycle_length: f64, phase_count: u32, overlap: f64) -> CompositorResult<Self> {
        if !cycle_length.is_finite() || cycle_length <= 0.0 {
            return Err(CompositorError::configuration(format!(
                "cycle_length must be finite and > 0, got {cycle_length}"
            )));
        }
        if phase_count == 0 {
            return Err(CompositorError::configuration("phase_count must be > 0"));
        }
        if !overlap.is_finite() || overlap < 0.0 {
            return Err(CompositorError::configuration(format!(
                "overlap must be finite and >= 0, got {overlap}"
            )));
        }
        let phase_width = cycle_length / f64::from(phase_count);
        if overlap >= phase_width / 2.0 {
            return Err(CompositorError::configuration(format!(
                "overlap {overlap} must be < half the phase width ({phase_width})"
            )));
        }
        Ok(Self {
            cycle_length,
            phase_count,
            overlap,
        })
    }

    /// Cycle length in logical time units.
    pub fn cycle_length(&self) -> f64 {
        self.cycle_length
    }

    /// Number of phases per cycle.
    pub fn phase_count(&self) -> u32 {
        self.phase_count
    }

    /// Transition half-width.
    pub fn overlap(&self) -> f64 {
        self.overlap
    }

    /// Length of one phase.
    pub fn phase_width(&self) -> f64 {
        self.cycle_length / f64::from(self.phase_count)
    }

    /// Position of `t` inside the current cycle, in `[0, cycle_length)`.
    pub fn cycle_time(&self, t: f64) -> f64 {
        frac(t, self.cycle_length)
    }

    /// Index of the phase containing `t`.
    pub fn phase_index(&self, t: f64) -> u32 {
        let idx = (self.cycle_time(t) / self.phase_width()).floor();
        (idx.max(0.0) as u32).min(self.phase_count - 1)
    }

    /// Offset of `t` from the start of its phase, in `[0, phase_width)`.
    pub fn phase_local(&self, t: f64) -> f64 {
        let start = f64::from(self.phase_index(t)) * self.phase_width();
        (self.cycle_time(t) - start).max(0.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/config.rs"]
mod tests;
