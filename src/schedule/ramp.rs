use crate::foundation::error::{CompositorError, CompositorResult};
use crate::schedule::config::CyclePhaseConfig;
use crate::schedule::{PhasePolicy, PhaseScheduler};

/// Trapezoid weight of `t` for an "on" window `[start_t, end_t]`.
///
/// Zero before `start_t - spread`, a linear rise over `2 * spread` centred on `start_t`, a plateau
/// at 1, a linear fall centred on `end_t`, then zero. `spread` must be positive.
pub fn interpolate(t: f64, start_t: f64, end_t: f64, spread: f64) -> f64 {
    if t < start_t - spread {
        0.0
    } else if t <= start_t + spread {
        ((t - (start_t - spread)) / (2.0 * spread)).clamp(0.0, 1.0)
    } else if t < end_t - spread {
        1.0
    } else if t <= end_t + spread {
        (1.0 - (t - (end_t - spread)) / (2.0 * spread)).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// One "on" window inside the cycle, in cycle-time units.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RampWindow {
    /// Window start (the rising ramp is centred here).
    pub start: f64,
    /// Window end (the falling ramp is centred here).
    pub end: f64,
}

/// Trapezoid-ramp scheduler: each phase fades in and out around its window edges.
#[derive(Clone, Debug)]
pub struct RampScheduler {
    config: CyclePhaseConfig,
    windows: Vec<Vec<RampWindow>>,
}

impl RampScheduler {
    /// One window per phase, `[p * width, (p + 1) * width]`.
    pub fn new(config: CyclePhaseConfig) -> CompositorResult<Self> {
        let w = config.phase_width();
        let windows = (0..config.phase_count())
            .map(|p| {
                vec![RampWindow {
                    start: f64::from(p) * w,
                    end: f64::from(p + 1) * w,
                }]
            })
            .collect();
        Self::with_windows(config, windows)
    }

    /// Explicit windows per phase. A phase may be "on" several times per cycle.
    ///
    /// Overlapping windows of different phases are allowed; their weights add up.
    pub fn with_windows(
        config: CyclePhaseConfig,
        windows: Vec<Vec<RampWindow>>,
    ) -> CompositorResult<Self> {
        let spread = config.overlap();
        if spread <= 0.0 {
            return Err(CompositorError::configuration(
                "ramp scheduling requires overlap > 0",
            ));
        }
        if windows.len() != config.phase_count() as usize {
            return Err(CompositorError::configuration(format!(
                "ramp scheduler expects {} window lists, got {}",
                config.phase_count(),
                windows.len()
            )));
        }
        let cycle = config.cycle_length();
        for (p, list) in windows.iter().enumerate() {
            for win in list {
                if !(win.start.is_finite() && win.end.is_finite()) {
                    return Err(CompositorError::configuration(format!(
                        "phase {p} has a non-finite ramp window"
                    )));
                }
                if win.start < 0.0 || win.end > cycle {
                    return Err(CompositorError::configuration(format!(
                        "phase {p} window [{}, {}] lies outside the cycle [0, {cycle}]",
                        win.start, win.end
                    )));
                }
                if win.end - win.start <= 2.0 * spread {
                    return Err(CompositorError::configuration(format!(
                        "phase {p} window [{}, {}] is too short for spread {spread}",
                        win.start, win.end
                    )));
                }
            }
        }
        Ok(Self { config, windows })
    }

    /// Windows configured for `phase`.
    pub fn windows(&self, phase: u32) -> &[RampWindow] {
        self.windows
            .get(phase as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn weight(&self, phase: usize, tc: f64) -> f64 {
        let cycle = self.config.cycle_length();
        let spread = self.config.overlap();
        let mut sum = 0.0;
        for win in &self.windows[phase] {
            // Neighbouring cycles contribute the tails that wrap across the cycle seam.
            for shift in [-cycle, 0.0, cycle] {
                sum += interpolate(tc, win.start + shift, win.end + shift, spread);
            }
        }
        sum
    }
}

impl PhaseScheduler for RampScheduler {
    fn config(&self) -> &CyclePhaseConfig {
        &self.config
    }

    fn policy(&self) -> PhasePolicy {
        PhasePolicy::Ramp
    }

    fn phase_weights_into(&self, t: f64, out: &mut [f32]) {
        let tc = self.config.cycle_time(t);
        for (p, w) in out.iter_mut().enumerate().take(self.windows.len()) {
            *w = self.weight(p, tc).clamp(0.0, 1.0) as f32;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/ramp.rs"]
mod tests;
