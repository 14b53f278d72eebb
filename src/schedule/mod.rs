//! Phase scheduling: maps logical time to per-phase fade weights.
//!
//! Every policy is a pure function of `t`; nothing is carried between frames.

pub(crate) mod config;
pub(crate) mod discrete;
pub(crate) mod ramp;
pub(crate) mod routing;
pub(crate) mod smooth;

use smallvec::SmallVec;

use crate::foundation::error::CompositorResult;
use config::CyclePhaseConfig;

/// Per-phase weights, indexed by phase.
pub type PhaseWeights = SmallVec<[f32; 8]>;

/// Selects the fade shape used by a [`PhaseScheduler`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhasePolicy {
    /// Trapezoid ramps centred on phase edges; neighbours crossfade.
    #[default]
    Ramp,
    /// Only the active phase is lit, following `smoothstep(sin(pi * local / width))`.
    Smoothstep,
    /// Hard cuts: the active phase weighs 1.
    Discrete,
}

/// Capability interface shared by all scheduling policies.
pub trait PhaseScheduler: Send + Sync + std::fmt::Debug {
    /// Cycle configuration this scheduler was built for.
    fn config(&self) -> &CyclePhaseConfig;

    /// Policy implemented by this scheduler.
    fn policy(&self) -> PhasePolicy;

    /// Write one weight per phase into `out`, which must hold `phase_count` entries.
    fn phase_weights_into(&self, t: f64, out: &mut [f32]);

    /// Allocate and return one weight per phase.
    fn phase_weights(&self, t: f64) -> PhaseWeights {
        let mut out: PhaseWeights = SmallVec::from_elem(0.0, self.config().phase_count() as usize);
        self.phase_weights_into(t, &mut out);
        out
    }
}

/// Build the scheduler for `policy`.
///
/// The ramp policy additionally requires a non-zero overlap.
pub fn build_scheduler(
    policy: PhasePolicy,
    config: CyclePhaseConfig,
) -> CompositorResult<Box<dyn PhaseScheduler>> {
    Ok(match policy {
        PhasePolicy::Ramp => Box::new(ramp::RampScheduler::new(config)?),
        PhasePolicy::Smoothstep => Box::new(smooth::SmoothstepScheduler::new(config)),
        PhasePolicy::Discrete => Box::new(discrete::DiscreteScheduler::new(config)),
    })
}
