use std::f64::consts::PI;

use crate::foundation::math::smoothstep_unit;
use crate::schedule::config::CyclePhaseConfig;
use crate::schedule::{PhasePolicy, PhaseScheduler};

/// Lights only the active phase with a smoothed half-sine envelope.
///
/// The weight is 0 at both phase edges and 1 mid-phase, so consecutive phases dip through black
/// instead of crossfading.
#[derive(Clone, Debug)]
pub struct SmoothstepScheduler {
    config: CyclePhaseConfig,
}

impl SmoothstepScheduler {
    /// Create the scheduler. Any valid configuration is accepted.
    pub fn new(config: CyclePhaseConfig) -> Self {
        Self { config }
    }

    /// Envelope value for a phase-local offset.
    pub fn envelope(&self, local: f64) -> f64 {
        let width = self.config.phase_width();
        smoothstep_unit((PI * local / width).sin())
    }
}

impl PhaseScheduler for SmoothstepScheduler {
    fn config(&self) -> &CyclePhaseConfig {
        &self.config
    }

    fn policy(&self) -> PhasePolicy {
        PhasePolicy::Smoothstep
    }

    fn phase_weights_into(&self, t: f64, out: &mut [f32]) {
        out.fill(0.0);
        let active = self.config.phase_index(t) as usize;
        if let Some(w) = out.get_mut(active) {
            *w = self.envelope(self.config.phase_local(t)) as f32;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/smooth.rs"]
mod tests;
