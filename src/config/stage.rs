use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::animation::curve::CurveDef;
use crate::animation::occupant::{ObjectSchedule, ObjectScheduler};
use crate::animation::opacity::OpacityCurve;
use crate::compositor::command::CompositeCommand;
use crate::compositor::compositor::{Compositor, CompositorOpts};
use crate::config::color::ColorDef;
use crate::config::params::CompositorParams;
use crate::foundation::core::{Affine, BezPath, Fps, NodeId, SlotId, TargetSize};
use crate::foundation::error::{CompositorError, CompositorResult};
use crate::render::backend::FrameRGBA;
use crate::render::cpu::{CpuBackend, CpuBackendOpts, Shape};
use crate::scene::slot::SceneSlot;

/// Geometry of a stage node.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeDef {
    /// Centred rectangle.
    Rect {
        /// Extent along x.
        width: f64,
        /// Extent along y.
        height: f64,
    },
    /// Centred circle.
    Circle {
        /// Circle radius.
        radius: f64,
    },
    /// SVG path data.
    Path {
        /// Path `d` attribute, in node-local units.
        svg_path_d: String,
    },
}

impl ShapeDef {
    fn to_shape(&self) -> CompositorResult<Shape> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(v)
            } else {
                Err(CompositorError::configuration(format!(
                    "shape {name} must be finite and > 0, got {v}"
                )))
            }
        };
        Ok(match self {
            Self::Rect { width, height } => Shape::Rect {
                width: positive("width", *width)?,
                height: positive("height", *height)?,
            },
            Self::Circle { radius } => Shape::Circle {
                radius: positive("radius", *radius)?,
            },
            Self::Path { svg_path_d } => {
                let p = BezPath::from_svg(svg_path_d.trim()).map_err(|e| {
                    CompositorError::configuration(format!("invalid svg_path_d: {e}"))
                })?;
                Shape::Path(p)
            }
        })
    }
}

/// One filled node of a slot scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeDef {
    /// Filled geometry.
    pub shape: ShapeDef,
    /// Fill color, straight alpha.
    pub color: ColorDef,
    /// Rest position, y up, relative to the canvas centre.
    #[serde(default)]
    pub position: [f64; 2],
    /// Rest rotation, radians.
    #[serde(default)]
    pub rotation: f64,
    /// Accent curve posing this node every frame. Omitting its `spread` ties the amplitude to
    /// `params.spread`, including after a reload.
    #[serde(default)]
    pub curve: Option<CurveDef>,
    /// Whether this node is one of the slot's interchangeable occupants.
    #[serde(default)]
    pub occupant: bool,
}

/// Explicit occupant window; `occupant` indexes the slot's occupant nodes in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OccupantWindowDef {
    /// Index into the slot's occupant nodes.
    pub occupant: usize,
    /// Window start, cycle time.
    pub start: f64,
    /// Window end (exclusive), cycle time.
    pub end: f64,
}

/// One slot: a scene and how its occupants rotate.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlotDef {
    /// Clear color of the slot scene; transparent when omitted.
    #[serde(default)]
    pub background: Option<ColorDef>,
    /// Nodes in paint order.
    #[serde(default)]
    pub nodes: Vec<NodeDef>,
    /// Fade of each occupant over its window.
    #[serde(default)]
    pub occupant_opacity: OpacityCurve,
    /// Explicit occupant windows. Empty means one occupant per phase, round-robin.
    #[serde(default)]
    pub occupant_windows: Vec<OccupantWindowDef>,
    /// Start hidden.
    #[serde(default)]
    pub hidden: bool,
}

/// Complete headless setup: params, canvas and the content of every slot.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageDef {
    /// Compositor parameters.
    #[serde(default)]
    pub params: CompositorParams,
    /// Output and render-target size.
    pub canvas: TargetSize,
    /// Frame rate for offline rendering.
    #[serde(default = "default_fps")]
    pub fps: Fps,
    /// One entry per slot, `params.slot_count` in total.
    pub slots: Vec<SlotDef>,
}

fn default_fps() -> Fps {
    Fps { num: 30, den: 1 }
}

impl std::str::FromStr for StageDef {
    type Err = CompositorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s)
            .map_err(|e| CompositorError::serde(format!("parse stage JSON: {e}")))
    }
}

impl StageDef {
    /// Parse a stage from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> CompositorResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| CompositorError::serde(format!("parse stage JSON: {e}")))
    }

    /// Parse a stage from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> CompositorResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CompositorError::configuration(format!("open stage JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Build the CPU scenes and the compositor driving them.
    #[tracing::instrument(skip_all, fields(slots = self.slots.len()))]
    pub fn build(&self, backend_opts: CpuBackendOpts) -> CompositorResult<Stage> {
        self.canvas.validate()?;
        Fps::new(self.fps.num, self.fps.den)?;
        let (config, _) = self.params.validate()?;

        let mut backend = CpuBackend::new(self.canvas, backend_opts)?;
        // Canvas centre is the origin, y up.
        let camera = backend.add_camera(
            Affine::translate((
                f64::from(self.canvas.width) / 2.0,
                f64::from(self.canvas.height) / 2.0,
            )) * Affine::scale_non_uniform(1.0, -1.0),
        );

        let mut slots = Vec::with_capacity(self.slots.len());
        for (i, def) in self.slots.iter().enumerate() {
            let scene = backend.add_scene(def.background.map(ColorDef::to_rgba8));
            let mut slot = SceneSlot::new(SlotId(i as u32), scene, camera);
            let mut occupants: Vec<NodeId> = Vec::new();
            for node in &def.nodes {
                let rest = Affine::translate((node.position[0], node.position[1]))
                    * Affine::rotate(node.rotation);
                let shape = node.shape.to_shape()?;
                let id = backend.add_node(scene, &shape, node.color.to_rgba8(), rest)?;
                if let Some(curve) = &node.curve {
                    slot = if curve.follows_spread() {
                        slot.with_spread_accent(id, curve.build()?)
                    } else {
                        slot.with_accent(id, curve.build()?)
                    };
                }
                if node.occupant {
                    occupants.push(id);
                }
            }
            if !occupants.is_empty() {
                let scheduler = if def.occupant_windows.is_empty() {
                    ObjectScheduler::round_robin(&occupants, &config, def.occupant_opacity)?
                } else {
                    let windows = def
                        .occupant_windows
                        .iter()
                        .map(|w| {
                            let object = occupants.get(w.occupant).copied().ok_or_else(|| {
                                CompositorError::configuration(format!(
                                    "slot {i} has no occupant #{}",
                                    w.occupant
                                ))
                            })?;
                            Ok(ObjectSchedule {
                                object,
                                phase_start: w.start,
                                phase_end: w.end,
                            })
                        })
                        .collect::<CompositorResult<Vec<_>>>()?;
                    ObjectScheduler::new(config.cycle_length(), windows, def.occupant_opacity)?
                };
                slot = slot.with_occupants(scheduler);
            }
            if def.hidden {
                slot.hide();
            }
            slots.push(slot);
        }

        let compositor =
            Compositor::new(self.params.clone(), slots, CompositorOpts::new(self.canvas))?;
        Ok(Stage {
            backend,
            compositor,
            fps: self.fps,
        })
    }
}

/// A built stage: the CPU backend doubling as scene graph, and its compositor.
#[derive(Debug)]
pub struct Stage {
    /// Renders the slot scenes and holds the last composited frame.
    pub backend: CpuBackend,
    /// Drives the slots; reload params through [`Compositor::apply_params`].
    pub compositor: Compositor,
    /// Offline frame rate.
    pub fps: Fps,
}

impl Stage {
    /// Advance by `dt` raw seconds and composite one frame.
    pub fn tick(&mut self, dt: f64) -> CompositorResult<CompositeCommand> {
        self.compositor.tick(dt, &mut self.backend)
    }

    /// Advance to raw elapsed time `elapsed` and return the composited frame.
    ///
    /// Time only moves forward; an earlier `elapsed` renders the current time again.
    pub fn render_at(&mut self, elapsed: f64) -> CompositorResult<FrameRGBA> {
        let dt = (elapsed - self.compositor.clock().elapsed_raw()).max(0.0);
        self.tick(dt)?;
        self.backend
            .take_frame()
            .ok_or_else(|| CompositorError::render("composite produced no frame"))
    }

    /// Raw elapsed time of frame `index` at the stage frame rate.
    pub fn frame_time(&self, index: u64) -> f64 {
        self.fps.frames_to_secs(index)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/stage.rs"]
mod tests;
