use crate::schedule::config::CyclePhaseConfig;
use crate::schedule::{PhasePolicy, PhaseScheduler};

/// Show/hide scheduling: the active phase weighs 1, everything else 0.
#[derive(Clone, Debug)]
pub struct DiscreteScheduler {
    config: CyclePhaseConfig,
}

impl DiscreteScheduler {
    /// Create the scheduler. Any valid configuration is accepted.
    pub fn new(config: CyclePhaseConfig) -> Self {
        Self { config }
    }
}

impl PhaseScheduler for DiscreteScheduler {
    fn config(&self) -> &CyclePhaseConfig {
        &self.config
    }

    fn policy(&self) -> PhasePolicy {
        PhasePolicy::Discrete
    }

    fn phase_weights_into(&self, t: f64, out: &mut [f32]) {
        out.fill(0.0);
        if let Some(w) = out.get_mut(self.config.phase_index(t) as usize) {
            *w = 1.0;
        }
    }
}
