use crate::foundation::error::{CompositorError, CompositorResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
        )]
        pub struct $name(pub u32);

        impl $name {
            /// Index form of this handle, for arena lookups.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

handle!(
    /// Stable index of a scene slot inside its compositor.
    SlotId
);
handle!(
    /// Opaque scene container handle owned by the scene graph.
    SceneId
);
handle!(
    /// Opaque node (mesh/transform/accent) handle owned by the scene graph.
    NodeId
);
handle!(
    /// Offscreen render target handle owned by a backend.
    TargetId
);
handle!(
    /// Sampleable texture backing a render target.
    TextureId
);
handle!(
    /// Camera handle used when rendering a slot scene.
    CameraId
);
handle!(
    /// Full-screen composite shader program handle.
    ShaderId
);

/// Pixel dimensions of a render target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TargetSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl TargetSize {
    /// Create a validated size with both dimensions non-zero.
    pub fn new(width: u32, height: u32) -> CompositorResult<Self> {
        let size = Self { width, height };
        size.validate()?;
        Ok(size)
    }

    /// Reject zero-sized targets.
    pub fn validate(self) -> CompositorResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CompositorError::configuration(
                "target width/height must be > 0",
            ));
        }
        Ok(())
    }

    /// Byte length of a tightly packed RGBA8 buffer of this size.
    pub fn rgba8_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

/// Frames-per-second represented as a rational `num/den`.
///
/// Only used when driving the compositor with a fixed step (offline rendering, tests).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> CompositorResult<Self> {
        if den == 0 {
            return Err(CompositorError::configuration("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(CompositorError::configuration("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Convert frame count to seconds.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
