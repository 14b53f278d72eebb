use crate::animation::opacity::OpacityCurve;
use crate::foundation::core::NodeId;
use crate::foundation::error::{CompositorError, CompositorResult};
use crate::foundation::math::frac;
use crate::schedule::config::CyclePhaseConfig;

/// Window within one cycle during which an object is shown.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ObjectSchedule {
    /// Object driven by this window.
    pub object: NodeId,
    /// Window start, cycle time.
    pub phase_start: f64,
    /// Window end (exclusive), cycle time.
    pub phase_end: f64,
}

/// Evaluated visibility and opacity of one object.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct OccupantState {
    /// Object handle.
    pub object: NodeId,
    /// Whether any of the object's windows contains the current cycle time.
    pub visible: bool,
    /// Fade opacity inside the active window, 0 outside.
    pub opacity: f32,
}

/// Toggles interchangeable occupants of one slot from the cycle clock.
///
/// Each window fades with the opacity curve stretched to the window's length, so an occupant is
/// fully transparent at both ends of its window.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectScheduler {
    cycle_length: f64,
    opacity: OpacityCurve,
    windows: Vec<ObjectSchedule>,
    objects: Vec<NodeId>,
    round_robin: bool,
}

impl ObjectScheduler {
    /// Build from explicit windows.
    pub fn new(
        cycle_length: f64,
        windows: Vec<ObjectSchedule>,
        opacity: OpacityCurve,
    ) -> CompositorResult<Self> {
        if !cycle_length.is_finite() || cycle_length <= 0.0 {
            return Err(CompositorError::configuration(format!(
                "object scheduler cycle_length must be finite and > 0, got {cycle_length}"
            )));
        }
        opacity.validate()?;
        let mut objects = Vec::new();
        for w in &windows {
            let ok = w.phase_start.is_finite()
                && w.phase_end.is_finite()
                && w.phase_start >= 0.0
                && w.phase_end <= cycle_length
                && w.phase_start < w.phase_end;
            if !ok {
                return Err(CompositorError::configuration(format!(
                    "object {} window [{}, {}) must satisfy 0 <= start < end <= {cycle_length}",
                    w.object.0, w.phase_start, w.phase_end
                )));
            }
            if !objects.contains(&w.object) {
                objects.push(w.object);
            }
        }
        Ok(Self {
            cycle_length,
            opacity,
            windows,
            objects,
            round_robin: false,
        })
    }

    /// Hand phases to `objects` in turn: phase `p` belongs to `objects[p % len]`.
    pub fn round_robin(
        objects: &[NodeId],
        config: &CyclePhaseConfig,
        opacity: OpacityCurve,
    ) -> CompositorResult<Self> {
        if objects.is_empty() {
            return Err(CompositorError::configuration(
                "round-robin scheduling needs at least one object",
            ));
        }
        let w = config.phase_width();
        let windows = (0..config.phase_count())
            .map(|p| ObjectSchedule {
                object: objects[p as usize % objects.len()],
                phase_start: f64::from(p) * w,
                phase_end: f64::from(p + 1) * w,
            })
            .collect();
        let mut out = Self::new(config.cycle_length(), windows, opacity)?;
        out.round_robin = true;
        // Objects that never got a phase still report as hidden.
        for o in objects {
            if !out.objects.contains(o) {
                out.objects.push(*o);
            }
        }
        Ok(out)
    }

    /// The same schedule moved onto `config`.
    ///
    /// Round-robin schedules are rebuilt from the new phases; explicit windows are stretched by
    /// the ratio of the cycle lengths.
    pub fn retimed(&self, config: &CyclePhaseConfig) -> CompositorResult<Self> {
        if self.round_robin {
            return Self::round_robin(&self.objects, config, self.opacity);
        }
        let k = config.cycle_length() / self.cycle_length;
        let windows = self
            .windows
            .iter()
            .map(|w| ObjectSchedule {
                object: w.object,
                phase_start: w.phase_start * k,
                phase_end: (w.phase_end * k).min(config.cycle_length()),
            })
            .collect();
        Self::new(config.cycle_length(), windows, self.opacity)
    }

    /// Cycle length the windows are laid out on.
    pub fn cycle_length(&self) -> f64 {
        self.cycle_length
    }

    /// Distinct objects, in first-appearance order.
    pub fn objects(&self) -> &[NodeId] {
        &self.objects
    }

    /// Configured windows.
    pub fn windows(&self) -> &[ObjectSchedule] {
        &self.windows
    }

    /// Per-object state at `t`, ordered like [`Self::objects`].
    pub fn evaluate(&self, t: f64) -> Vec<OccupantState> {
        let tc = frac(t, self.cycle_length);
        self.objects
            .iter()
            .map(|&object| {
                let active = self
                    .windows
                    .iter()
                    .find(|w| w.object == object && w.phase_start <= tc && tc < w.phase_end);
                match active {
                    Some(w) => {
                        let u = (tc - w.phase_start) / (w.phase_end - w.phase_start);
                        OccupantState {
                            object,
                            visible: true,
                            opacity: self.opacity.sample_unit(u),
                        }
                    }
                    None => OccupantState {
                        object,
                        visible: false,
                        opacity: 0.0,
                    },
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/occupant.rs"]
mod tests;
