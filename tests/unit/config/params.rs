use super::*;

#[test]
fn defaults_follow_the_panel() {
    let p = CompositorParams::default();
    assert_eq!(p.time_scale, 0.8);
    assert_eq!(p.spread, 20.0);
    assert_eq!(p.overlap, 0.2);
    assert_eq!(p.layout(), CompositeLayout::Rotating { channels: 2 });
    let (cfg, routing) = p.validate().unwrap();
    assert_eq!(cfg.phase_width(), 1.0);
    assert_eq!(routing.width(), 2);
}

#[test]
fn partial_json_keeps_defaults() {
    let p: CompositorParams = r#"{"time_scale": 2.0, "policy": "smoothstep"}"#.parse().unwrap();
    assert_eq!(p.time_scale, 2.0);
    assert_eq!(p.policy, PhasePolicy::Smoothstep);
    assert_eq!(p.phase_count, 6);

    let p = CompositorParams::from_reader(r#"{"composite":"per_slot"}"#.as_bytes()).unwrap();
    assert_eq!(p.layout(), CompositeLayout::PerSlot);
}

#[test]
fn unknown_fields_are_serde_errors() {
    let err = "{\"timeScale\": 1}".parse::<CompositorParams>().unwrap_err();
    assert!(err.to_string().starts_with("serialization error:"));
}

#[test]
fn missing_file_is_reported() {
    let err = CompositorParams::from_path("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("open params JSON"));
}

#[test]
fn validation_rejects_bad_values() {
    let bad = |f: fn(&mut CompositorParams)| {
        let mut p = CompositorParams::default();
        f(&mut p);
        p.validate().is_err()
    };
    assert!(bad(|p| p.time_scale = -1.0));
    assert!(bad(|p| p.cycle_length = 0.0));
    assert!(bad(|p| p.phase_count = 0));
    assert!(bad(|p| p.overlap = 0.5));
    assert!(bad(|p| p.overlap = 0.0));
    assert!(bad(|p| p.spread = f64::INFINITY));
    assert!(bad(|p| p.channels = 4));
    assert!(bad(|p| p.solo = Some(SlotId(3))));
    assert!(!bad(|p| {
        p.overlap = 0.0;
        p.policy = PhasePolicy::Discrete;
    }));
}
