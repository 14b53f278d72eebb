use crate::animation::curve::AnimationPose;
use crate::foundation::core::{CameraId, NodeId, SceneId, ShaderId, TargetId, TargetSize, TextureId};
use crate::foundation::error::CompositorResult;
use crate::foundation::math::unpremultiply_in_place;
use crate::scene::graph::SceneGraph;

/// A composited frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**; the flag makes that explicit at API boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixels in straight alpha, as image encoders expect.
    pub fn to_straight_rgba(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            unpremultiply_in_place(&mut out);
        }
        out
    }
}

/// Program id of the additive weighted-sum composite shader every backend provides.
pub const WEIGHTED_SUM_SHADER: ShaderId = ShaderId(0);

/// Draw-call executor consumed by the compositor.
///
/// Targets are owned by the backend and addressed by handle. All slot renders for a frame are
/// issued before the composite that samples them.
pub trait RenderBackend {
    /// Allocate an offscreen target. Fails with a resource error when memory is exhausted.
    fn create_target(&mut self, size: TargetSize) -> CompositorResult<TargetId>;

    /// Resize an existing target; its contents become undefined.
    fn resize_target(&mut self, target: TargetId, size: TargetSize) -> CompositorResult<()>;

    /// Release a target. Disposing an unknown target is an error.
    fn dispose_target(&mut self, target: TargetId) -> CompositorResult<()>;

    /// Sampleable texture backing `target`.
    fn target_texture(&self, target: TargetId) -> CompositorResult<TextureId>;

    /// Render `scene` through `camera` into `target`, replacing its previous contents.
    fn render_scene_to_target(
        &mut self,
        scene: SceneId,
        camera: CameraId,
        target: TargetId,
    ) -> CompositorResult<()>;

    /// Full-screen pass computing `sum(sample_i * weight_i)` without renormalizing.
    ///
    /// `textures[i] == None` contributes nothing. Both slices have the composite width.
    fn draw_fullscreen_composite(
        &mut self,
        textures: &[Option<TextureId>],
        weights: &[f32],
        shader: ShaderId,
    ) -> CompositorResult<()>;
}

/// Pairs a separate backend and scene graph into the host a compositor ticks against.
#[derive(Debug)]
pub struct SplitHost<'a, B: ?Sized, G: ?Sized> {
    /// Draw-call executor.
    pub backend: &'a mut B,
    /// Scene-graph library.
    pub graph: &'a mut G,
}

impl<'a, B: ?Sized, G: ?Sized> SplitHost<'a, B, G> {
    /// Borrow both halves for one tick.
    pub fn new(backend: &'a mut B, graph: &'a mut G) -> Self {
        Self { backend, graph }
    }
}

impl<B: RenderBackend + ?Sized, G: ?Sized> RenderBackend for SplitHost<'_, B, G> {
    fn create_target(&mut self, size: TargetSize) -> CompositorResult<TargetId> {
        self.backend.create_target(size)
    }

    fn resize_target(&mut self, target: TargetId, size: TargetSize) -> CompositorResult<()> {
        self.backend.resize_target(target, size)
    }

    fn dispose_target(&mut self, target: TargetId) -> CompositorResult<()> {
        self.backend.dispose_target(target)
    }

    fn target_texture(&self, target: TargetId) -> CompositorResult<TextureId> {
        self.backend.target_texture(target)
    }

    fn render_scene_to_target(
        &mut self,
        scene: SceneId,
        camera: CameraId,
        target: TargetId,
    ) -> CompositorResult<()> {
        self.backend.render_scene_to_target(scene, camera, target)
    }

    fn draw_fullscreen_composite(
        &mut self,
        textures: &[Option<TextureId>],
        weights: &[f32],
        shader: ShaderId,
    ) -> CompositorResult<()> {
        self.backend.draw_fullscreen_composite(textures, weights, shader)
    }
}

impl<B: ?Sized, G: SceneGraph + ?Sized> SceneGraph for SplitHost<'_, B, G> {
    fn set_scene_visible(&mut self, scene: SceneId, visible: bool) -> CompositorResult<()> {
        self.graph.set_scene_visible(scene, visible)
    }

    fn set_node_pose(&mut self, node: NodeId, pose: AnimationPose) -> CompositorResult<()> {
        self.graph.set_node_pose(node, pose)
    }

    fn set_node_visible(&mut self, node: NodeId, visible: bool) -> CompositorResult<()> {
        self.graph.set_node_visible(node, visible)
    }

    fn set_node_opacity(&mut self, node: NodeId, opacity: f32) -> CompositorResult<()> {
        self.graph.set_node_opacity(node, opacity)
    }
}
