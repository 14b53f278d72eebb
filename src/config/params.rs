use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::core::SlotId;
use crate::foundation::error::{CompositorError, CompositorResult};
use crate::schedule::PhasePolicy;
use crate::schedule::config::CyclePhaseConfig;
use crate::schedule::routing::{CompositeLayout, Routing};

/// How phases reach the composite shader. Flat counterpart of [`CompositeLayout`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeMode {
    /// One input per slot.
    PerSlot,
    /// `channels` inputs shared by consecutive phases.
    #[default]
    Rotating,
}

/// Flat set of tunable scalars, supplied at start and optionally hot-reloaded between frames.
///
/// Every field has a default, so a JSON document only names what it changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompositorParams {
    /// Logical time units per raw second.
    pub time_scale: f64,
    /// Length of one full cycle.
    pub cycle_length: f64,
    /// Phases per cycle.
    pub phase_count: u32,
    /// Transition half-width around each phase edge.
    pub overlap: f64,
    /// Live amplitude of accents whose curve omits its own `spread`.
    pub spread: f64,
    /// Number of scene slots.
    pub slot_count: u32,
    /// Composite routing mode.
    pub composite: CompositeMode,
    /// Composite inputs used by [`CompositeMode::Rotating`].
    pub channels: u32,
    /// Fade shape.
    pub policy: PhasePolicy,
    /// Render only this slot, at full weight.
    pub solo: Option<SlotId>,
}

impl Default for CompositorParams {
    fn default() -> Self {
        Self {
            time_scale: 0.8,
            cycle_length: 6.0,
            phase_count: 6,
            overlap: 0.2,
            spread: 20.0,
            slot_count: 3,
            composite: CompositeMode::Rotating,
            channels: 2,
            policy: PhasePolicy::Ramp,
            solo: None,
        }
    }
}

impl std::str::FromStr for CompositorParams {
    type Err = CompositorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s)
            .map_err(|e| CompositorError::serde(format!("parse compositor params JSON: {e}")))
    }
}

impl CompositorParams {
    /// Parse params from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> CompositorResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| CompositorError::serde(format!("parse compositor params JSON: {e}")))
    }

    /// Parse params from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> CompositorResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CompositorError::configuration(format!("open params JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Routing layout described by `composite` and `channels`.
    pub fn layout(&self) -> CompositeLayout {
        match self.composite {
            CompositeMode::PerSlot => CompositeLayout::PerSlot,
            CompositeMode::Rotating => CompositeLayout::Rotating {
                channels: self.channels,
            },
        }
    }

    /// Cycle configuration described by these params.
    pub fn cycle_config(&self) -> CompositorResult<CyclePhaseConfig> {
        CyclePhaseConfig::new(self.cycle_length, self.phase_count, self.overlap)
    }

    /// Check every parameter and return the typed configuration derived from them.
    pub fn validate(&self) -> CompositorResult<(CyclePhaseConfig, Routing)> {
        if !self.time_scale.is_finite() || self.time_scale < 0.0 {
            return Err(CompositorError::configuration(format!(
                "time_scale must be finite and >= 0, got {}",
                self.time_scale
            )));
        }
        if !self.spread.is_finite() {
            return Err(CompositorError::configuration(format!(
                "spread must be finite, got {}",
                self.spread
            )));
        }
        let config = self.cycle_config()?;
        if self.policy == PhasePolicy::Ramp && self.overlap <= 0.0 {
            return Err(CompositorError::configuration(
                "ramp policy requires overlap > 0",
            ));
        }
        let routing = Routing::new(self.layout(), self.slot_count, &config)?;
        if let Some(solo) = self.solo
            && solo.0 >= self.slot_count
        {
            return Err(CompositorError::configuration(format!(
                "solo slot {} out of range for {} slots",
                solo.0, self.slot_count
            )));
        }
        Ok((config, routing))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/params.rs"]
mod tests;
