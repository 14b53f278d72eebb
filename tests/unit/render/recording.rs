use super::*;

fn size() -> TargetSize {
    TargetSize::new(4, 3).unwrap()
}

#[test]
fn target_lifecycle_is_recorded() {
    let mut b = RecordingBackend::new();
    let t = b.create_target(size()).unwrap();
    assert_eq!(b.target_texture(t).unwrap(), TextureId(t.0));
    b.resize_target(t, TargetSize::new(8, 6).unwrap()).unwrap();
    assert_eq!(b.target_size(t), Some(TargetSize::new(8, 6).unwrap()));
    b.dispose_target(t).unwrap();
    assert_eq!(b.live_targets(), 0);
    assert!(b.dispose_target(t).is_err());
    assert!(b.target_texture(t).is_err());
    assert_eq!(b.commands().len(), 3);
}

#[test]
fn injected_failures_are_resource_errors() {
    let mut b = RecordingBackend::new();
    b.fail_next_allocations(2);
    assert!(b.create_target(size()).unwrap_err().is_resource());
    assert!(b.create_target(size()).unwrap_err().is_resource());
    assert!(b.create_target(size()).is_ok());
}

#[test]
fn composite_requires_matching_lengths() {
    let mut b = RecordingBackend::new();
    assert!(b
        .draw_fullscreen_composite(&[None, None], &[1.0], ShaderId(0))
        .is_err());
    b.draw_fullscreen_composite(&[Some(TextureId(0)), None], &[1.0, 0.0], ShaderId(0))
        .unwrap();
    let (tex, w) = b.last_composite().unwrap();
    assert_eq!(tex, &[Some(TextureId(0)), None]);
    assert_eq!(w, &[1.0, 0.0]);
}

#[test]
fn graph_state_tracks_latest_values() {
    let mut b = RecordingBackend::new();
    b.set_scene_visible(SceneId(1), true).unwrap();
    b.set_scene_visible(SceneId(1), false).unwrap();
    b.set_node_opacity(NodeId(2), 0.5).unwrap();
    assert_eq!(b.scene_visible(SceneId(1)), Some(false));
    assert_eq!(b.node_opacity(NodeId(2)), Some(0.5));
    assert_eq!(b.node_pose(NodeId(2)), None);
    assert_eq!(b.take_commands().len(), 3);
    assert!(b.commands().is_empty());
}
