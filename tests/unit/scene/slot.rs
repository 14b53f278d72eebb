use super::*;
use crate::animation::curve::TriangleBounce;
use crate::animation::opacity::OpacityCurve;
use crate::foundation::core::TargetSize;
use crate::render::recording::RecordingBackend;
use crate::schedule::config::CyclePhaseConfig;

fn slot_with_target(b: &mut RecordingBackend) -> SceneSlot {
    let mut s = SceneSlot::new(SlotId(0), SceneId(7), CameraId(0))
        .with_accent(NodeId(1), Box::new(TriangleBounce::new(20.0)));
    let t = b.create_target(TargetSize::new(2, 2).unwrap()).unwrap();
    s.attach_target(t, b.target_texture(t).unwrap());
    s
}

#[test]
fn zero_weight_slot_is_not_rendered() {
    let mut b = RecordingBackend::new();
    let mut s = slot_with_target(&mut b);
    s.set_frame_weight(0.0);
    assert!(!s.render(&mut b).unwrap());
    s.set_frame_weight(0.3);
    assert!(s.is_visible());
    assert!(s.render(&mut b).unwrap());
    assert_eq!(b.rendered_scenes(), vec![SceneId(7)]);
}

#[test]
fn hidden_slot_never_contributes() {
    let mut b = RecordingBackend::new();
    let mut s = slot_with_target(&mut b);
    s.hide();
    s.set_frame_weight(1.0);
    assert_eq!(s.fade_weight(), 0.0);
    assert!(!s.render(&mut b).unwrap());
    s.pose(1.0, 20.0, &mut b).unwrap();
    assert_eq!(b.scene_visible(SceneId(7)), Some(false));
    assert_eq!(b.node_pose(NodeId(1)), None);
    s.show();
    s.set_frame_weight(1.0);
    assert!(s.render(&mut b).unwrap());
}

#[test]
fn pose_drives_accents_and_occupants() {
    let mut b = RecordingBackend::new();
    let cfg = CyclePhaseConfig::new(6.0, 6, 0.2).unwrap();
    let occ = ObjectScheduler::round_robin(
        &[NodeId(5), NodeId(6), NodeId(7)],
        &cfg,
        OpacityCurve::default(),
    )
    .unwrap();
    let mut s = slot_with_target(&mut b).with_occupants(occ);
    s.set_frame_weight(1.0);
    s.pose(1.0, 20.0, &mut b).unwrap();
    assert_eq!(b.scene_visible(SceneId(7)), Some(true));
    let pose = b.node_pose(NodeId(1)).unwrap();
    assert!((pose.y - 20.0).abs() < 1e-4);
    s.pose(1.5, 20.0, &mut b).unwrap();
    assert_eq!(b.node_visible(NodeId(6)), Some(true));
    assert_eq!(b.node_visible(NodeId(5)), Some(false));
    assert!((b.node_opacity(NodeId(6)).unwrap() - 1.0).abs() < 1e-6);
}

#[test]
fn spread_accent_scales_with_live_spread() {
    let mut b = RecordingBackend::new();
    let mut s = slot_with_target(&mut b)
        .with_spread_accent(NodeId(2), Box::new(TriangleBounce::new(1.0)));
    s.set_frame_weight(1.0);

    s.pose(1.0, 20.0, &mut b).unwrap();
    assert!((b.node_pose(NodeId(2)).unwrap().y - 20.0).abs() < 1e-4);
    s.pose(1.0, 500.0, &mut b).unwrap();
    assert!((b.node_pose(NodeId(2)).unwrap().y - 500.0).abs() < 1e-3);
    // Fixed-amplitude accents ignore the spread.
    assert!((b.node_pose(NodeId(1)).unwrap().y - 20.0).abs() < 1e-4);
    s.pose(1.0, 0.0, &mut b).unwrap();
    assert_eq!(b.node_pose(NodeId(2)).unwrap().y, 0.0);
}

#[test]
fn slot_without_target_skips_render() {
    let mut b = RecordingBackend::new();
    let mut s = SceneSlot::new(SlotId(1), SceneId(0), CameraId(0));
    s.set_frame_weight(1.0);
    assert!(!s.render(&mut b).unwrap());
    assert!(b.commands().is_empty());
}

#[test]
fn state_snapshot_and_target_handoff() {
    let mut b = RecordingBackend::new();
    let mut s = slot_with_target(&mut b);
    s.set_frame_weight(f32::NAN);
    let st = s.state();
    assert_eq!(st.fade_weight, 0.0);
    assert!(!st.visible);
    assert!(st.target.is_some());
    assert_eq!(s.note_alloc_failure(), 1);
    let t = s.take_target();
    assert!(t.is_some() && s.texture().is_none() && s.target().is_none());
}
