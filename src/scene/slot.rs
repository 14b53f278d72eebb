use crate::animation::curve::AnimationCurve;
use crate::animation::occupant::ObjectScheduler;
use crate::foundation::core::{CameraId, NodeId, SceneId, SlotId, TargetId, TextureId};
use crate::foundation::error::CompositorResult;
use crate::render::backend::RenderBackend;
use crate::scene::graph::SceneGraph;

/// Node driven by an animation curve every frame.
#[derive(Debug)]
pub struct Accent {
    /// Posed node.
    pub node: NodeId,
    /// Curve evaluated at the compositor's logical time.
    pub curve: Box<dyn AnimationCurve>,
    /// Whether `curve` is unit-amplitude and scaled by the compositor's live spread.
    pub follows_spread: bool,
}

/// Snapshot of a slot's per-frame state.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct SlotState {
    /// Slot index.
    pub id: SlotId,
    /// Render target, if allocated.
    pub target: Option<TargetId>,
    /// Scene rendered by this slot.
    pub scene: SceneId,
    /// Whether the slot contributes to the current frame.
    pub visible: bool,
    /// Blend weight for the current frame.
    pub fade_weight: f32,
}

/// One sub-scene and its offscreen target.
///
/// `enabled` is the user-facing show/hide switch; `visible` and `fade_weight` are recomputed from
/// the schedule every frame.
#[derive(Debug)]
pub struct SceneSlot {
    id: SlotId,
    scene: SceneId,
    camera: CameraId,
    target: Option<TargetId>,
    texture: Option<TextureId>,
    enabled: bool,
    visible: bool,
    fade_weight: f32,
    accents: Vec<Accent>,
    occupants: Option<ObjectScheduler>,
    alloc_failures: u32,
}

impl SceneSlot {
    /// Enabled slot without accents or occupants.
    pub fn new(id: SlotId, scene: SceneId, camera: CameraId) -> Self {
        Self {
            id,
            scene,
            camera,
            target: None,
            texture: None,
            enabled: true,
            visible: false,
            fade_weight: 0.0,
            accents: Vec::new(),
            occupants: None,
            alloc_failures: 0,
        }
    }

    /// Drive `node` with `curve` as is.
    pub fn with_accent(mut self, node: NodeId, curve: Box<dyn AnimationCurve>) -> Self {
        self.accents.push(Accent {
            node,
            curve,
            follows_spread: false,
        });
        self
    }

    /// Drive `node` with a unit-amplitude `curve` whose offset is multiplied by the spread passed
    /// to [`SceneSlot::pose`] every frame.
    pub fn with_spread_accent(mut self, node: NodeId, curve: Box<dyn AnimationCurve>) -> Self {
        self.accents.push(Accent {
            node,
            curve,
            follows_spread: true,
        });
        self
    }

    /// Toggle occupants with `scheduler`.
    pub fn with_occupants(mut self, scheduler: ObjectScheduler) -> Self {
        self.occupants = Some(scheduler);
        self
    }

    /// Slot index.
    pub fn id(&self) -> SlotId {
        self.id
    }

    /// Scene rendered by this slot.
    pub fn scene(&self) -> SceneId {
        self.scene
    }

    /// Camera used when rendering the scene.
    pub fn camera(&self) -> CameraId {
        self.camera
    }

    /// Render through `camera` from the next frame on.
    pub fn set_camera(&mut self, camera: CameraId) {
        self.camera = camera;
    }

    /// Offscreen target, once allocated.
    pub fn target(&self) -> Option<TargetId> {
        self.target
    }

    /// Texture view of [`Self::target`].
    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    /// Curve-driven nodes.
    pub fn accents(&self) -> &[Accent] {
        &self.accents
    }

    /// Occupant scheduler, if any.
    pub fn occupants(&self) -> Option<&ObjectScheduler> {
        self.occupants.as_ref()
    }

    /// Let the schedule show this slot.
    pub fn show(&mut self) {
        self.enabled = true;
    }

    /// Keep this slot out of every frame regardless of the schedule.
    pub fn hide(&mut self) {
        self.enabled = false;
    }

    /// Whether the show/hide switch is on.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the slot contributes to the current frame.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Blend weight for the current frame.
    pub fn fade_weight(&self) -> f32 {
        self.fade_weight
    }

    /// Snapshot of the per-frame state.
    pub fn state(&self) -> SlotState {
        SlotState {
            id: self.id,
            target: self.target,
            scene: self.scene,
            visible: self.visible,
            fade_weight: self.fade_weight,
        }
    }

    pub(crate) fn set_frame_weight(&mut self, weight: f32) {
        self.fade_weight = if self.enabled && weight.is_finite() {
            weight.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.visible = self.fade_weight > 0.0;
    }

    pub(crate) fn set_occupants(&mut self, scheduler: ObjectScheduler) {
        self.occupants = Some(scheduler);
    }

    pub(crate) fn attach_target(&mut self, target: TargetId, texture: TextureId) {
        self.target = Some(target);
        self.texture = Some(texture);
        self.alloc_failures = 0;
    }

    pub(crate) fn take_target(&mut self) -> Option<TargetId> {
        self.texture = None;
        self.target.take()
    }

    pub(crate) fn note_alloc_failure(&mut self) -> u32 {
        self.alloc_failures = self.alloc_failures.saturating_add(1);
        self.alloc_failures
    }

    /// Consecutive frames this slot failed to get a render target.
    pub fn alloc_failures(&self) -> u32 {
        self.alloc_failures
    }

    /// Push visibility, accent poses and occupant state for time `t` into `graph`.
    ///
    /// `spread` scales accents added with [`SceneSlot::with_spread_accent`]. Disabled slots only
    /// hide their scene.
    pub fn pose<G: SceneGraph + ?Sized>(
        &self,
        t: f64,
        spread: f64,
        graph: &mut G,
    ) -> CompositorResult<()> {
        graph.set_scene_visible(self.scene, self.enabled && self.visible)?;
        if !self.enabled {
            return Ok(());
        }
        for accent in &self.accents {
            let pose = accent.curve.pose(t);
            let pose = if accent.follows_spread {
                pose.scaled(spread)
            } else {
                pose
            };
            graph.set_node_pose(accent.node, pose)?;
        }
        if let Some(occ) = &self.occupants {
            for st in occ.evaluate(t) {
                graph.set_node_visible(st.object, st.visible)?;
                graph.set_node_opacity(st.object, st.opacity)?;
            }
        }
        Ok(())
    }

    /// Render into the slot's target if it contributes to this frame.
    ///
    /// Returns whether a render command was issued.
    pub fn render<B: RenderBackend + ?Sized>(&self, backend: &mut B) -> CompositorResult<bool> {
        let Some(target) = self.target else {
            return Ok(false);
        };
        if !self.visible || self.fade_weight <= 0.0 {
            return Ok(false);
        }
        backend.render_scene_to_target(self.scene, self.camera, target)?;
        Ok(true)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/slot.rs"]
mod tests;
