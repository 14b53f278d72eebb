//! Logical compositor clock.
//!
//! [`Clock`] maps raw elapsed seconds to the compositor's logical time:
//!
//! ```text
//! t = rate * elapsed_raw + offset
//! ```
//!
//! `offset` only changes when the rate is changed, so `t` stays continuous across hot reloads.

use crate::foundation::error::{CompositorError, CompositorResult};

/// Monotonic, rate-scaled clock. The only cross-frame mutable state of a compositor.
#[derive(Clone, Debug, PartialEq)]
pub struct Clock {
    elapsed_raw: f64,
    rate: f64,
    offset: f64,
    paused: bool,
}

impl Clock {
    /// Create a clock at `t = 0` advancing `rate` logical units per raw second.
    pub fn new(rate: f64) -> CompositorResult<Self> {
        validate_rate(rate)?;
        Ok(Self {
            elapsed_raw: 0.0,
            rate,
            offset: 0.0,
            paused: false,
        })
    }

    /// Advance by `dt` raw seconds and return the new logical time.
    ///
    /// Negative or non-finite steps are ignored: the clock never rolls back.
    pub fn advance(&mut self, dt: f64) -> f64 {
        if !dt.is_finite() || dt < 0.0 {
            tracing::warn!(dt, "ignoring non-monotonic clock step");
            return self.t();
        }
        if !self.paused {
            self.elapsed_raw += dt;
        }
        self.t()
    }

    /// Current logical time.
    pub fn t(&self) -> f64 {
        self.rate * self.elapsed_raw + self.offset
    }

    /// Raw elapsed seconds accumulated while running.
    pub fn elapsed_raw(&self) -> f64 {
        self.elapsed_raw
    }

    /// Current rate (logical units per raw second).
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Change the rate without moving the current logical time.
    pub fn set_rate(&mut self, rate: f64) -> CompositorResult<()> {
        validate_rate(rate)?;
        let now = self.t();
        self.rate = rate;
        self.offset = now - rate * self.elapsed_raw;
        Ok(())
    }

    /// Freeze logical time. Weights evaluated while paused stay constant.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume advancing from the frozen logical time.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Return `true` while paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

fn validate_rate(rate: f64) -> CompositorResult<()> {
    if !rate.is_finite() || rate < 0.0 {
        return Err(CompositorError::configuration(format!(
            "clock rate must be finite and >= 0, got {rate}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/timing/clock.rs"]
mod tests;
