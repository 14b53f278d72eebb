use std::f64::consts::PI;

use crate::foundation::core::Affine;
use crate::foundation::error::{CompositorError, CompositorResult};
use crate::foundation::math::frac;

/// Planar pose of an animated element. Rotation is in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationPose {
    /// Horizontal offset.
    pub x: f32,
    /// Vertical offset.
    pub y: f32,
    /// Rotation around the element origin, radians.
    pub rotation: f32,
}

impl AnimationPose {
    /// Build a pose from `f64` components.
    pub fn new(x: f64, y: f64, rotation: f64) -> Self {
        Self {
            x: x as f32,
            y: y as f32,
            rotation: rotation as f32,
        }
    }

    /// Same pose with the offset scaled by `k`; rotation is unchanged.
    pub fn scaled(self, k: f64) -> Self {
        Self::new(
            f64::from(self.x) * k,
            f64::from(self.y) * k,
            f64::from(self.rotation),
        )
    }

    /// `translate(x, y) * rotate(rotation)`.
    pub fn to_affine(self) -> Affine {
        Affine::translate((f64::from(self.x), f64::from(self.y)))
            * Affine::rotate(f64::from(self.rotation))
    }
}

/// Pure `t -> pose` function driving one element.
///
/// Implementations must be deterministic: equal `t` gives an equal pose.
pub trait AnimationCurve: Send + Sync + std::fmt::Debug {
    /// Pose at logical time `t`.
    fn pose(&self, t: f64) -> AnimationPose;
}

/// Circular orbit: `x = sin(t*pi) * spread`, `y = cos(t*pi) * spread`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orbit {
    /// Orbit radius.
    pub spread: f64,
    /// Half-turns of rotation per logical time unit.
    pub spin: f64,
}

impl AnimationCurve for Orbit {
    fn pose(&self, t: f64) -> AnimationPose {
        let a = t * PI;
        AnimationPose::new(a.sin() * self.spread, a.cos() * self.spread, self.spin * a)
    }
}

/// Orbit travelling the opposite way round: `x = sin(t*pi)`, `y = -cos(t*pi)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CounterOrbit {
    /// Orbit radius.
    pub spread: f64,
    /// Half-turns of rotation per logical time unit.
    pub spin: f64,
}

impl AnimationCurve for CounterOrbit {
    fn pose(&self, t: f64) -> AnimationPose {
        let a = t * PI;
        AnimationPose::new(a.sin() * self.spread, -a.cos() * self.spread, self.spin * a)
    }
}

/// Diagonal back-and-forth swing: `x = y = -cos(t*pi) * spread`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Swing {
    /// Swing amplitude along each axis.
    pub spread: f64,
    /// Half-turns of rotation per logical time unit.
    pub spin: f64,
}

impl AnimationCurve for Swing {
    fn pose(&self, t: f64) -> AnimationPose {
        let a = t * PI;
        let d = -a.cos() * self.spread;
        AnimationPose::new(d, d, self.spin * a)
    }
}

/// Triangle-wave bounce on `y` with a wide horizontal sweep.
///
/// `y` rises linearly from 0 to `spread` over `half_period`, then falls back, so `y(0) = 0` and
/// `y(half_period) = spread`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangleBounce {
    /// Bounce height.
    pub spread: f64,
    /// Time from floor to apex.
    pub half_period: f64,
    /// Horizontal amplitude as a multiple of `spread`; `x = cos(t*pi) * spread * sweep`.
    pub sweep: f64,
    /// Rotation amplitude in half-turns; `rotation = sin(t) * wobble * pi`.
    pub wobble: f64,
}

impl TriangleBounce {
    /// Bounce of height `spread` with a unit half period and no sweep or wobble.
    pub fn new(spread: f64) -> Self {
        Self {
            spread,
            half_period: 1.0,
            sweep: 0.0,
            wobble: 0.0,
        }
    }
}

impl AnimationCurve for TriangleBounce {
    fn pose(&self, t: f64) -> AnimationPose {
        let p = self.half_period;
        let y = self.spread * (1.0 - (frac(t, 2.0 * p) / p - 1.0).abs());
        let x = (t * PI).cos() * self.spread * self.sweep;
        AnimationPose::new(x, y, t.sin() * self.wobble * PI)
    }
}

/// Gentle floating bob with a small rock, for idle subjects.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Float {
    /// Oscillation speed multiplier.
    pub speed: f64,
    /// Rock amplitude scale.
    pub rotation_intensity: f64,
    /// Bob amplitude scale.
    pub float_intensity: f64,
}

impl Default for Float {
    fn default() -> Self {
        Self {
            speed: 4.0,
            rotation_intensity: 0.2,
            float_intensity: 0.1,
        }
    }
}

impl AnimationCurve for Float {
    fn pose(&self, t: f64) -> AnimationPose {
        let u = t * self.speed / 4.0;
        AnimationPose::new(
            0.0,
            u.sin() / 10.0 * self.float_intensity,
            (u / 2.0).sin() / 20.0 * self.rotation_intensity,
        )
    }
}

/// Branches between curves depending on which segment of the cycle `t` falls in.
///
/// The cycle is split into `segments.len()` equal parts; segment `i` delegates to `segments[i]`,
/// which is sampled at the absolute `t`.
#[derive(Debug)]
pub struct Segmented {
    cycle_length: f64,
    segments: Vec<Box<dyn AnimationCurve>>,
}

impl Segmented {
    /// Validate and build a segmented curve.
    pub fn new(
        cycle_length: f64,
        segments: Vec<Box<dyn AnimationCurve>>,
    ) -> CompositorResult<Self> {
        if !cycle_length.is_finite() || cycle_length <= 0.0 {
            return Err(CompositorError::animation(format!(
                "segmented curve cycle_length must be finite and > 0, got {cycle_length}"
            )));
        }
        if segments.is_empty() {
            return Err(CompositorError::animation(
                "segmented curve needs at least one segment",
            ));
        }
        Ok(Self {
            cycle_length,
            segments,
        })
    }

    /// Index of the segment active at `t`.
    pub fn segment_index(&self, t: f64) -> usize {
        let n = self.segments.len();
        let i = (frac(t, self.cycle_length) / self.cycle_length * n as f64).floor() as usize;
        i.min(n - 1)
    }
}

impl AnimationCurve for Segmented {
    fn pose(&self, t: f64) -> AnimationPose {
        self.segments[self.segment_index(t)].pose(t)
    }
}

/// Serializable curve description.
///
/// An omitted `spread` builds the curve at unit amplitude and marks it as following the
/// compositor's live `spread` (see [`CurveDef::follows_spread`]).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CurveDef {
    /// See [`Orbit`].
    Orbit {
        /// Orbit radius; `None` follows the compositor spread.
        #[serde(default)]
        spread: Option<f64>,
        /// Half-turns of rotation per logical time unit.
        #[serde(default)]
        spin: f64,
    },
    /// See [`CounterOrbit`].
    CounterOrbit {
        /// Orbit radius; `None` follows the compositor spread.
        #[serde(default)]
        spread: Option<f64>,
        /// Half-turns of rotation per logical time unit.
        #[serde(default = "default_counter_spin")]
        spin: f64,
    },
    /// See [`Swing`].
    Swing {
        /// Swing amplitude; `None` follows the compositor spread.
        #[serde(default)]
        spread: Option<f64>,
        /// Half-turns of rotation per logical time unit.
        #[serde(default = "default_swing_spin")]
        spin: f64,
    },
    /// See [`TriangleBounce`].
    TriangleBounce {
        /// Bounce height; `None` follows the compositor spread.
        #[serde(default)]
        spread: Option<f64>,
        /// Time from floor to apex.
        #[serde(default = "default_half_period")]
        half_period: f64,
        /// Horizontal amplitude as a multiple of the spread.
        #[serde(default)]
        sweep: f64,
        /// Rotation amplitude in half-turns.
        #[serde(default)]
        wobble: f64,
    },
    /// See [`Float`]. Never follows the compositor spread.
    Float {
        /// Oscillation speed multiplier.
        #[serde(default = "default_float_speed")]
        speed: f64,
        /// Rock amplitude scale.
        #[serde(default = "default_float_rotation")]
        rotation_intensity: f64,
        /// Bob amplitude scale.
        #[serde(default = "default_float_intensity")]
        float_intensity: f64,
    },
    /// See [`Segmented`].
    Segmented {
        /// Length of the cycle split into equal segments.
        cycle_length: f64,
        /// One curve per segment.
        segments: Vec<CurveDef>,
    },
}

fn default_counter_spin() -> f64 {
    1.2
}
fn default_swing_spin() -> f64 {
    -0.5
}
fn default_half_period() -> f64 {
    1.0
}
fn default_float_speed() -> f64 {
    Float::default().speed
}
fn default_float_rotation() -> f64 {
    Float::default().rotation_intensity
}
fn default_float_intensity() -> f64 {
    Float::default().float_intensity
}

impl CurveDef {
    /// Whether the built curve is unit-amplitude and should be scaled by the live spread.
    ///
    /// A segmented curve follows only when every segment does.
    pub fn follows_spread(&self) -> bool {
        match self {
            Self::Orbit { spread, .. }
            | Self::CounterOrbit { spread, .. }
            | Self::Swing { spread, .. }
            | Self::TriangleBounce { spread, .. } => spread.is_none(),
            Self::Float { .. } => false,
            Self::Segmented { segments, .. } => {
                !segments.is_empty() && segments.iter().all(CurveDef::follows_spread)
            }
        }
    }

    /// Validate and instantiate the described curve. An omitted `spread` is 1.
    pub fn build(&self) -> CompositorResult<Box<dyn AnimationCurve>> {
        Ok(match self {
            Self::Orbit { spread, spin } => {
                let spread = unit_or(*spread)?;
                finite("spin", *spin)?;
                Box::new(Orbit {
                    spread,
                    spin: *spin,
                })
            }
            Self::CounterOrbit { spread, spin } => {
                let spread = unit_or(*spread)?;
                finite("spin", *spin)?;
                Box::new(CounterOrbit {
                    spread,
                    spin: *spin,
                })
            }
            Self::Swing { spread, spin } => {
                let spread = unit_or(*spread)?;
                finite("spin", *spin)?;
                Box::new(Swing {
                    spread,
                    spin: *spin,
                })
            }
            Self::TriangleBounce {
                spread,
                half_period,
                sweep,
                wobble,
            } => {
                let spread = unit_or(*spread)?;
                finite("sweep", *sweep)?;
                finite("wobble", *wobble)?;
                if !half_period.is_finite() || *half_period <= 0.0 {
                    return Err(CompositorError::animation(format!(
                        "triangle bounce half_period must be finite and > 0, got {half_period}"
                    )));
                }
                Box::new(TriangleBounce {
                    spread,
                    half_period: *half_period,
                    sweep: *sweep,
                    wobble: *wobble,
                })
            }
            Self::Float {
                speed,
                rotation_intensity,
                float_intensity,
            } => {
                finite("speed", *speed)?;
                finite("rotation_intensity", *rotation_intensity)?;
                finite("float_intensity", *float_intensity)?;
                Box::new(Float {
                    speed: *speed,
                    rotation_intensity: *rotation_intensity,
                    float_intensity: *float_intensity,
                })
            }
            Self::Segmented {
                cycle_length,
                segments,
            } => {
                let built = segments
                    .iter()
                    .map(CurveDef::build)
                    .collect::<CompositorResult<Vec<_>>>()?;
                Box::new(Segmented::new(*cycle_length, built)?)
            }
        })
    }
}

fn unit_or(spread: Option<f64>) -> CompositorResult<f64> {
    let spread = spread.unwrap_or(1.0);
    finite("spread", spread)?;
    Ok(spread)
}

fn finite(name: &str, v: f64) -> CompositorResult<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(CompositorError::animation(format!(
            "curve parameter {name} must be finite, got {v}"
        )))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/curve.rs"]
mod tests;
