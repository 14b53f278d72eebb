use super::*;

fn canvas() -> TargetSize {
    TargetSize::new(8, 8).unwrap()
}

fn backend() -> CpuBackend {
    CpuBackend::new(canvas(), CpuBackendOpts::default()).unwrap()
}

fn px(data: &[u8], x: usize, y: usize, width: usize) -> [u8; 4] {
    let i = (y * width + x) * 4;
    [data[i], data[i + 1], data[i + 2], data[i + 3]]
}

#[test]
fn renders_background_into_target() {
    let mut b = backend();
    let s = b.add_scene(Some([255, 0, 0, 255]));
    let t = b.create_target(canvas()).unwrap();
    b.render_scene_to_target(s, CameraId(0), t).unwrap();
    let data = b.target_pixels(t).unwrap();
    assert_eq!(px(data, 0, 0, 8), [255, 0, 0, 255]);
    assert_eq!(px(data, 7, 7, 8), [255, 0, 0, 255]);
}

#[test]
fn hidden_nodes_and_scenes_draw_nothing() {
    let mut b = backend();
    let s = b.add_scene(None);
    let n = b
        .add_node(
            s,
            &Shape::Rect {
                width: 8.0,
                height: 8.0,
            },
            [0, 255, 0, 255],
            Affine::translate((4.0, 4.0)),
        )
        .unwrap();
    let t = b.create_target(canvas()).unwrap();
    b.render_scene_to_target(s, CameraId(0), t).unwrap();
    assert_eq!(px(b.target_pixels(t).unwrap(), 4, 4, 8), [0, 255, 0, 255]);

    b.set_node_visible(n, false).unwrap();
    b.render_scene_to_target(s, CameraId(0), t).unwrap();
    assert_eq!(px(b.target_pixels(t).unwrap(), 4, 4, 8), [0, 0, 0, 0]);

    b.set_node_visible(n, true).unwrap();
    b.set_scene_visible(s, false).unwrap();
    b.render_scene_to_target(s, CameraId(0), t).unwrap();
    assert_eq!(px(b.target_pixels(t).unwrap(), 4, 4, 8), [0, 0, 0, 0]);
}

#[test]
fn pose_moves_node_within_rest_frame() {
    let mut b = backend();
    let s = b.add_scene(None);
    let n = b
        .add_node(
            s,
            &Shape::Rect {
                width: 2.0,
                height: 2.0,
            },
            [0, 0, 255, 255],
            Affine::translate((2.0, 2.0)),
        )
        .unwrap();
    b.set_node_pose(n, AnimationPose::new(4.0, 4.0, 0.0)).unwrap();
    let t = b.create_target(canvas()).unwrap();
    b.render_scene_to_target(s, CameraId(0), t).unwrap();
    let data = b.target_pixels(t).unwrap();
    assert_eq!(px(data, 2, 2, 8), [0, 0, 0, 0]);
    assert_eq!(px(data, 6, 6, 8), [0, 0, 255, 255]);
}

#[test]
fn composite_blends_targets_additively() {
    let mut b = backend();
    let red = b.add_scene(Some([200, 0, 0, 255]));
    let blue = b.add_scene(Some([0, 0, 200, 255]));
    let ta = b.create_target(canvas()).unwrap();
    let tb = b.create_target(canvas()).unwrap();
    b.render_scene_to_target(red, CameraId(0), ta).unwrap();
    b.render_scene_to_target(blue, CameraId(0), tb).unwrap();
    let tex = [
        Some(b.target_texture(ta).unwrap()),
        Some(b.target_texture(tb).unwrap()),
    ];
    b.draw_fullscreen_composite(&tex, &[1.0, 0.0], WEIGHTED_SUM_SHADER)
        .unwrap();
    assert_eq!(px(&b.frame().unwrap().data, 3, 3, 8), [200, 0, 0, 255]);

    b.draw_fullscreen_composite(&tex, &[0.5, 0.5], WEIGHTED_SUM_SHADER)
        .unwrap();
    let f = b.take_frame().unwrap();
    assert!(f.premultiplied);
    assert_eq!(px(&f.data, 3, 3, 8), [100, 0, 100, 255]);
    assert!(b.frame().is_none());
}

#[test]
fn composite_rejects_bad_inputs() {
    let mut b = backend();
    let small = b.create_target(TargetSize::new(4, 4).unwrap()).unwrap();
    let tex = b.target_texture(small).unwrap();
    assert!(b
        .draw_fullscreen_composite(&[Some(tex)], &[1.0], WEIGHTED_SUM_SHADER)
        .is_err());
    assert!(b
        .draw_fullscreen_composite(&[None], &[1.0], ShaderId(9))
        .is_err());
    assert!(b
        .draw_fullscreen_composite(&[None, None], &[1.0], WEIGHTED_SUM_SHADER)
        .is_err());
    b.draw_fullscreen_composite(&[None, None], &[1.0, 1.0], WEIGHTED_SUM_SHADER)
        .unwrap();
    assert!(b.frame().unwrap().data.iter().all(|v| *v == 0));
}

#[test]
fn target_budget_is_enforced() {
    let opts = CpuBackendOpts {
        threads: Some(1),
        max_target_bytes: Some(canvas().rgba8_len() * 2),
    };
    let mut b = CpuBackend::new(canvas(), opts).unwrap();
    let a = b.create_target(canvas()).unwrap();
    let _ = b.create_target(canvas()).unwrap();
    let err = b.create_target(canvas()).unwrap_err();
    assert!(err.is_resource());
    assert!(b.resize_target(a, TargetSize::new(16, 16).unwrap()).is_err());
    b.dispose_target(a).unwrap();
    let c = b.create_target(canvas()).unwrap();
    assert_eq!(c, a);
    assert_eq!(b.live_targets(), 2);
}

#[test]
fn unknown_handles_are_render_errors() {
    let mut b = backend();
    let s = b.add_scene(None);
    let t = b.create_target(canvas()).unwrap();
    assert!(b.render_scene_to_target(SceneId(5), CameraId(0), t).is_err());
    assert!(b.render_scene_to_target(s, CameraId(3), t).is_err());
    assert!(b.set_node_opacity(NodeId(0), 1.0).is_err());
    assert!(b.dispose_target(TargetId(9)).is_err());
    assert!(CpuBackend::new(TargetSize { width: 70_000, height: 1 }, CpuBackendOpts::default()).is_err());
    assert!(CpuBackend::new(canvas(), CpuBackendOpts { threads: Some(0), max_target_bytes: None }).is_err());
}
