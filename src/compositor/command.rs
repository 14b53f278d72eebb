use smallvec::SmallVec;

use crate::foundation::core::{ShaderId, SlotId, TextureId};
use crate::schedule::PhaseWeights;
use crate::schedule::routing::MAX_COMPOSITE_INPUTS;

/// One bound composite input.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct BlendEntry {
    /// Slot feeding this input.
    pub slot: SlotId,
    /// Texture sampled by the shader; `None` when the slot has no target this frame.
    pub texture: Option<TextureId>,
    /// Blend weight in `[0, 1]`.
    pub weight: f32,
}

/// Ordered composite inputs. The length is fixed by configuration.
pub type BlendWeights = SmallVec<[BlendEntry; MAX_COMPOSITE_INPUTS]>;

/// Everything issued for one frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CompositeCommand {
    /// Frame counter, starting at 0.
    pub frame: u64,
    /// Logical time the frame was evaluated at.
    pub t: f64,
    /// Shader program used for the composite draw.
    pub shader: ShaderId,
    /// Composite inputs in shader order.
    pub entries: BlendWeights,
    /// Raw per-phase weights before routing.
    pub phase_weights: PhaseWeights,
    /// Slots rendered into their targets this frame.
    pub rendered: SmallVec<[SlotId; MAX_COMPOSITE_INPUTS]>,
    /// Slots left out because their target could not be allocated.
    pub degraded: SmallVec<[SlotId; MAX_COMPOSITE_INPUTS]>,
}

impl CompositeCommand {
    /// Textures in shader order.
    pub fn textures(&self) -> SmallVec<[Option<TextureId>; MAX_COMPOSITE_INPUTS]> {
        self.entries.iter().map(|e| e.texture).collect()
    }

    /// Weights in shader order.
    pub fn weights(&self) -> SmallVec<[f32; MAX_COMPOSITE_INPUTS]> {
        self.entries.iter().map(|e| e.weight).collect()
    }

    /// Sum of all weights; above 1 inside additive overlaps.
    pub fn weight_sum(&self) -> f32 {
        self.entries.iter().map(|e| e.weight).sum()
    }
}
