//! cyclefade composites several offscreen-rendered scenes into one frame with a cyclic,
//! time-driven crossfade.
//!
//! Each frame is a pure function of the logical time `t`:
//!
//! - a [`Clock`] turns raw elapsed seconds into `t`
//! - a [`PhaseScheduler`] maps `t` to one fade weight per phase
//! - a [`Routing`] folds phase weights into 2 or 3 composite inputs
//! - the [`Compositor`] poses and renders the contributing [`SceneSlot`]s, then issues one
//!   full-screen weighted-sum composite through a [`RenderBackend`]
//!
//! [`CpuBackend`] is a `vello_cpu` reference backend; [`RecordingBackend`] records commands for
//! tests and headless inspection. A [`StageDef`] JSON document wires both ends together.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod compositor;
pub(crate) mod config;
pub(crate) mod render;
pub(crate) mod scene;
pub(crate) mod schedule;
pub(crate) mod timing;

pub use crate::foundation::core::{
    Affine, BezPath, CameraId, Fps, NodeId, Point, Rect, SceneId, ShaderId, SlotId, TargetId,
    TargetSize, TextureId, Vec2,
};
pub use crate::foundation::error::{CompositorError, CompositorResult};
pub use crate::foundation::math::{frac, smoothstep, smoothstep_unit, unpremultiply_in_place};

pub use crate::animation::curve::{
    AnimationCurve, AnimationPose, CounterOrbit, CurveDef, Float, Orbit, Segmented, Swing,
    TriangleBounce,
};
pub use crate::animation::occupant::{ObjectSchedule, ObjectScheduler, OccupantState};
pub use crate::animation::opacity::OpacityCurve;
pub use crate::compositor::command::{BlendEntry, BlendWeights, CompositeCommand};
pub use crate::compositor::compositor::{Compositor, CompositorOpts, CompositorStats};
pub use crate::config::color::ColorDef;
pub use crate::config::params::{CompositeMode, CompositorParams};
pub use crate::config::stage::{
    NodeDef, OccupantWindowDef, ShapeDef, SlotDef, Stage, StageDef,
};
pub use crate::render::backend::{FrameRGBA, RenderBackend, SplitHost, WEIGHTED_SUM_SHADER};
pub use crate::render::composite::{CompositeInput, weighted_sum_into};
pub use crate::render::cpu::{CpuBackend, CpuBackendOpts, Shape};
pub use crate::render::recording::{RecordedCommand, RecordingBackend};
pub use crate::scene::graph::SceneGraph;
pub use crate::scene::slot::{Accent, SceneSlot, SlotState};
pub use crate::schedule::config::CyclePhaseConfig;
pub use crate::schedule::discrete::DiscreteScheduler;
pub use crate::schedule::ramp::{RampScheduler, RampWindow, interpolate};
pub use crate::schedule::routing::{
    ChannelWeight, ChannelWeights, CompositeLayout, MAX_COMPOSITE_INPUTS, MIN_COMPOSITE_INPUTS,
    Routing,
};
pub use crate::schedule::smooth::SmoothstepScheduler;
pub use crate::schedule::{PhasePolicy, PhaseScheduler, PhaseWeights, build_scheduler};
pub use crate::timing::clock::Clock;
