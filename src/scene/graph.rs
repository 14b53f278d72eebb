use crate::animation::curve::AnimationPose;
use crate::foundation::core::{NodeId, SceneId};
use crate::foundation::error::CompositorResult;

/// Scene-graph library consumed by slots to pose their content before rendering.
///
/// Scenes and nodes are opaque handles; unknown handles are reported as errors.
pub trait SceneGraph {
    /// Show or hide a whole scene container.
    fn set_scene_visible(&mut self, scene: SceneId, visible: bool) -> CompositorResult<()>;

    /// Set a node's animated pose, applied on top of its rest transform.
    fn set_node_pose(&mut self, node: NodeId, pose: AnimationPose) -> CompositorResult<()>;

    /// Show or hide a single node.
    fn set_node_visible(&mut self, node: NodeId, visible: bool) -> CompositorResult<()>;

    /// Set a node's opacity in `[0, 1]`.
    fn set_node_opacity(&mut self, node: NodeId, opacity: f32) -> CompositorResult<()>;
}
