use smallvec::SmallVec;

use crate::foundation::core::SlotId;
use crate::foundation::error::{CompositorError, CompositorResult};
use crate::schedule::config::CyclePhaseConfig;

/// Smallest composite width the full-screen shader accepts.
pub const MIN_COMPOSITE_INPUTS: usize = 2;
/// Largest composite width the full-screen shader accepts.
pub const MAX_COMPOSITE_INPUTS: usize = 3;

/// How phases are mapped onto composite inputs. Fixed for the lifetime of a configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompositeLayout {
    /// One composite input per slot; a slot's weight sums all of its phases.
    PerSlot,
    /// `channels` inputs shared round-robin by consecutive phases.
    ///
    /// A channel is re-pointed to its next slot only once its falling ramp is over.
    Rotating {
        /// Number of composite inputs (2 or 3).
        channels: u32,
    },
}

impl Default for CompositeLayout {
    fn default() -> Self {
        Self::Rotating { channels: 2 }
    }
}

/// Weight and source slot of one composite input.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ChannelWeight {
    /// Slot whose target feeds this input.
    pub slot: SlotId,
    /// Blend weight in `[0, 1]`.
    pub weight: f32,
}

/// Fixed-width list of composite inputs.
pub type ChannelWeights = SmallVec<[ChannelWeight; MAX_COMPOSITE_INPUTS]>;

/// Validated phase -> slot -> composite-input mapping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Routing {
    layout: CompositeLayout,
    slot_count: u32,
    phase_count: u32,
    width: usize,
}

impl Routing {
    /// Validate `layout` against the slot count and cycle configuration.
    pub fn new(
        layout: CompositeLayout,
        slot_count: u32,
        config: &CyclePhaseConfig,
    ) -> CompositorResult<Self> {
        if slot_count == 0 {
            return Err(CompositorError::configuration("slot_count must be > 0"));
        }
        let phase_count = config.phase_count();
        if phase_count % slot_count != 0 {
            return Err(CompositorError::configuration(format!(
                "phase_count {phase_count} must be a multiple of slot_count {slot_count}"
            )));
        }
        let width = match layout {
            CompositeLayout::PerSlot => slot_count as usize,
            CompositeLayout::Rotating { channels } => {
                if channels == 0 || phase_count % channels != 0 {
                    return Err(CompositorError::configuration(format!(
                        "phase_count {phase_count} must be a multiple of the {channels} rotating channels"
                    )));
                }
                channels as usize
            }
        };
        if !(MIN_COMPOSITE_INPUTS..=MAX_COMPOSITE_INPUTS).contains(&width) {
            return Err(CompositorError::configuration(format!(
                "composite width must be {MIN_COMPOSITE_INPUTS} or {MAX_COMPOSITE_INPUTS}, got {width}"
            )));
        }
        Ok(Self {
            layout,
            slot_count,
            phase_count,
            width,
        })
    }

    /// Layout this routing was built from.
    pub fn layout(&self) -> CompositeLayout {
        self.layout
    }

    /// Number of composite inputs, constant across the run.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of slots addressed by the routing.
    pub fn slot_count(&self) -> u32 {
        self.slot_count
    }

    /// Slot shown during `phase`.
    pub fn slot_of_phase(&self, phase: u32) -> SlotId {
        SlotId(phase % self.slot_count)
    }

    /// Fold per-phase weights into composite inputs at time `t`.
    pub fn route(
        &self,
        config: &CyclePhaseConfig,
        t: f64,
        phase_weights: &[f32],
    ) -> ChannelWeights {
        let mut out = ChannelWeights::new();
        match self.layout {
            CompositeLayout::PerSlot => {
                for s in 0..self.slot_count {
                    out.push(ChannelWeight {
                        slot: SlotId(s),
                        weight: self.sum_residue(phase_weights, s, self.slot_count),
                    });
                }
            }
            CompositeLayout::Rotating { channels } => {
                let current = config.phase_index(t);
                let local = config.phase_local(t);
                for c in 0..channels {
                    let phase = self.bound_phase(current, local, config.overlap(), c, channels);
                    out.push(ChannelWeight {
                        slot: self.slot_of_phase(phase),
                        weight: self.sum_residue(phase_weights, c, channels),
                    });
                }
            }
        }
        out
    }

    fn sum_residue(&self, phase_weights: &[f32], residue: u32, modulus: u32) -> f32 {
        phase_weights
            .iter()
            .enumerate()
            .filter(|(p, _)| *p as u32 % modulus == residue)
            .map(|(_, w)| *w)
            .sum::<f32>()
            .clamp(0.0, 1.0)
    }

    /// Phase currently bound to rotating channel `c`.
    ///
    /// The current phase if it belongs to `c`; the previous phase while its falling tail is still
    /// inside the overlap; otherwise the next phase of `c` (already rising or about to).
    fn bound_phase(&self, current: u32, local: f64, overlap: f64, c: u32, channels: u32) -> u32 {
        let n = self.phase_count;
        let residue = current % channels;
        if residue == c {
            return current;
        }
        if (residue + channels - 1) % channels == c && local < overlap {
            return (current + n - 1) % n;
        }
        let ahead = (c + channels - residue) % channels;
        (current + ahead) % n
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/routing.rs"]
mod tests;
