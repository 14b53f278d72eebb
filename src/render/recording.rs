use std::collections::BTreeMap;

use crate::animation::curve::AnimationPose;
use crate::foundation::core::{CameraId, NodeId, SceneId, ShaderId, TargetId, TargetSize, TextureId};
use crate::foundation::error::{CompositorError, CompositorResult};
use crate::render::backend::RenderBackend;
use crate::scene::graph::SceneGraph;

/// One command received by a [`RecordingBackend`].
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedCommand {
    /// `create_target` succeeded.
    CreateTarget {
        /// New target.
        target: TargetId,
        /// Requested size.
        size: TargetSize,
    },
    /// `resize_target` succeeded.
    ResizeTarget {
        /// Resized target.
        target: TargetId,
        /// New size.
        size: TargetSize,
    },
    /// `dispose_target` succeeded.
    DisposeTarget {
        /// Released target.
        target: TargetId,
    },
    /// One scene rendered into a target.
    RenderScene {
        /// Rendered scene.
        scene: SceneId,
        /// View used.
        camera: CameraId,
        /// Destination target.
        target: TargetId,
    },
    /// Full-screen composite draw.
    Composite {
        /// Bound textures in shader order.
        textures: Vec<Option<TextureId>>,
        /// Weights in shader order.
        weights: Vec<f32>,
        /// Shader program.
        shader: ShaderId,
    },
    /// Scene container shown or hidden.
    SceneVisible {
        /// Affected scene.
        scene: SceneId,
        /// New visibility.
        visible: bool,
    },
    /// Node posed.
    NodePose {
        /// Posed node.
        node: NodeId,
        /// Applied pose.
        pose: AnimationPose,
    },
    /// Node shown or hidden.
    NodeVisible {
        /// Affected node.
        node: NodeId,
        /// New visibility.
        visible: bool,
    },
    /// Node opacity set.
    NodeOpacity {
        /// Affected node.
        node: NodeId,
        /// New opacity.
        opacity: f32,
    },
}

/// In-memory backend and scene graph for tests and headless inspection.
///
/// Every call is appended to a command log. Target allocation can be made to fail on demand.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    commands: Vec<RecordedCommand>,
    targets: Vec<Option<TargetSize>>,
    fail_allocations: u32,
    scene_visible: BTreeMap<SceneId, bool>,
    node_pose: BTreeMap<NodeId, AnimationPose>,
    node_visible: BTreeMap<NodeId, bool>,
    node_opacity: BTreeMap<NodeId, f32>,
}

impl RecordingBackend {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` calls to `create_target` fail with a resource error.
    pub fn fail_next_allocations(&mut self, n: u32) {
        self.fail_allocations = n;
    }

    /// Borrow the command log.
    pub fn commands(&self) -> &[RecordedCommand] {
        &self.commands
    }

    /// Drain the command log, keeping target and graph state.
    pub fn take_commands(&mut self) -> Vec<RecordedCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Targets that are allocated and not yet disposed.
    pub fn live_targets(&self) -> usize {
        self.targets.iter().filter(|t| t.is_some()).count()
    }

    /// Size of a live target.
    pub fn target_size(&self, target: TargetId) -> Option<TargetSize> {
        self.targets.get(target.index()).copied().flatten()
    }

    /// Scenes rendered, in command order.
    pub fn rendered_scenes(&self) -> Vec<SceneId> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                RecordedCommand::RenderScene { scene, .. } => Some(*scene),
                _ => None,
            })
            .collect()
    }

    /// Textures and weights of the most recent composite.
    pub fn last_composite(&self) -> Option<(&[Option<TextureId>], &[f32])> {
        self.commands.iter().rev().find_map(|c| match c {
            RecordedCommand::Composite {
                textures, weights, ..
            } => Some((textures.as_slice(), weights.as_slice())),
            _ => None,
        })
    }

    /// Last visibility set for `scene`.
    pub fn scene_visible(&self, scene: SceneId) -> Option<bool> {
        self.scene_visible.get(&scene).copied()
    }

    /// Last pose set for `node`.
    pub fn node_pose(&self, node: NodeId) -> Option<AnimationPose> {
        self.node_pose.get(&node).copied()
    }

    /// Last visibility set for `node`.
    pub fn node_visible(&self, node: NodeId) -> Option<bool> {
        self.node_visible.get(&node).copied()
    }

    /// Last opacity set for `node`.
    pub fn node_opacity(&self, node: NodeId) -> Option<f32> {
        self.node_opacity.get(&node).copied()
    }

    fn live(&self, target: TargetId) -> CompositorResult<TargetSize> {
        self.target_size(target).ok_or_else(|| {
            CompositorError::render(format!("unknown render target {}", target.0))
        })
    }
}

impl RenderBackend for RecordingBackend {
    fn create_target(&mut self, size: TargetSize) -> CompositorResult<TargetId> {
        size.validate()?;
        if self.fail_allocations > 0 {
            self.fail_allocations -= 1;
            return Err(CompositorError::resource(format!(
                "injected allocation failure for {}x{} target",
                size.width, size.height
            )));
        }
        let target = TargetId(self.targets.len() as u32);
        self.targets.push(Some(size));
        self.commands
            .push(RecordedCommand::CreateTarget { target, size });
        Ok(target)
    }

    fn resize_target(&mut self, target: TargetId, size: TargetSize) -> CompositorResult<()> {
        size.validate()?;
        self.live(target)?;
        self.targets[target.index()] = Some(size);
        self.commands
            .push(RecordedCommand::ResizeTarget { target, size });
        Ok(())
    }

    fn dispose_target(&mut self, target: TargetId) -> CompositorResult<()> {
        self.live(target)?;
        self.targets[target.index()] = None;
        self.commands.push(RecordedCommand::DisposeTarget { target });
        Ok(())
    }

    fn target_texture(&self, target: TargetId) -> CompositorResult<TextureId> {
        self.live(target)?;
        Ok(TextureId(target.0))
    }

    fn render_scene_to_target(
        &mut self,
        scene: SceneId,
        camera: CameraId,
        target: TargetId,
    ) -> CompositorResult<()> {
        self.live(target)?;
        self.commands.push(RecordedCommand::RenderScene {
            scene,
            camera,
            target,
        });
        Ok(())
    }

    fn draw_fullscreen_composite(
        &mut self,
        textures: &[Option<TextureId>],
        weights: &[f32],
        shader: ShaderId,
    ) -> CompositorResult<()> {
        if textures.len() != weights.len() {
            return Err(CompositorError::render(format!(
                "composite expects matching inputs, got {} textures and {} weights",
                textures.len(),
                weights.len()
            )));
        }
        self.commands.push(RecordedCommand::Composite {
            textures: textures.to_vec(),
            weights: weights.to_vec(),
            shader,
        });
        Ok(())
    }
}

impl SceneGraph for RecordingBackend {
    fn set_scene_visible(&mut self, scene: SceneId, visible: bool) -> CompositorResult<()> {
        self.scene_visible.insert(scene, visible);
        self.commands
            .push(RecordedCommand::SceneVisible { scene, visible });
        Ok(())
    }

    fn set_node_pose(&mut self, node: NodeId, pose: AnimationPose) -> CompositorResult<()> {
        self.node_pose.insert(node, pose);
        self.commands.push(RecordedCommand::NodePose { node, pose });
        Ok(())
    }

    fn set_node_visible(&mut self, node: NodeId, visible: bool) -> CompositorResult<()> {
        self.node_visible.insert(node, visible);
        self.commands
            .push(RecordedCommand::NodeVisible { node, visible });
        Ok(())
    }

    fn set_node_opacity(&mut self, node: NodeId, opacity: f32) -> CompositorResult<()> {
        self.node_opacity.insert(node, opacity);
        self.commands
            .push(RecordedCommand::NodeOpacity { node, opacity });
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/recording.rs"]
mod tests;
