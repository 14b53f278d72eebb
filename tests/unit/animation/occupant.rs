use super::*;

fn nodes() -> [NodeId; 3] {
    [NodeId(10), NodeId(11), NodeId(12)]
}

fn six_phase() -> CyclePhaseConfig {
    CyclePhaseConfig::new(6.0, 6, 0.2).unwrap()
}

#[test]
fn round_robin_shows_one_occupant_at_a_time() {
    let s = ObjectScheduler::round_robin(&nodes(), &six_phase(), OpacityCurve::default()).unwrap();
    assert_eq!(s.windows().len(), 6);
    for i in 0..600 {
        let t = 12.0 * f64::from(i) / 600.0;
        let lit = s.evaluate(t).iter().filter(|o| o.visible).count();
        assert_eq!(lit, 1, "t={t}");
    }
}

#[test]
fn occupant_owns_phases_modulo_count() {
    let s = ObjectScheduler::round_robin(&nodes(), &six_phase(), OpacityCurve::default()).unwrap();
    let st = s.evaluate(4.5);
    assert!(st[1].visible);
    assert!((st[1].opacity - 1.0).abs() < 1e-6);
    assert!(!st[0].visible && st[0].opacity == 0.0);
}

#[test]
fn opacity_fades_at_window_edges() {
    let s = ObjectScheduler::round_robin(&nodes(), &six_phase(), OpacityCurve::default()).unwrap();
    let st = s.evaluate(2.0);
    assert!(st[2].visible);
    assert_eq!(st[2].opacity, 0.0);
    assert!(s.evaluate(2.01)[2].opacity < 0.05);
}

#[test]
fn explicit_windows_stretch_the_envelope() {
    let w = vec![ObjectSchedule {
        object: NodeId(1),
        phase_start: 1.0,
        phase_end: 3.0,
    }];
    let s = ObjectScheduler::new(4.0, w, OpacityCurve::default()).unwrap();
    assert!((s.evaluate(2.0)[0].opacity - 1.0).abs() < 1e-6);
    assert!(!s.evaluate(3.5)[0].visible);
    assert!(s.evaluate(6.0)[0].visible);
}

#[test]
fn evaluation_is_periodic() {
    let s = ObjectScheduler::round_robin(&nodes(), &six_phase(), OpacityCurve::default()).unwrap();
    for t in [0.3, 1.7, 5.1] {
        for (a, b) in s.evaluate(t).iter().zip(s.evaluate(t + 6.0)) {
            assert_eq!(a.object, b.object);
            assert_eq!(a.visible, b.visible);
            assert!((a.opacity - b.opacity).abs() < 1e-5);
        }
    }
}

#[test]
fn rejects_invalid_windows() {
    let bad = |s: f64, e: f64| {
        ObjectScheduler::new(
            6.0,
            vec![ObjectSchedule {
                object: NodeId(0),
                phase_start: s,
                phase_end: e,
            }],
            OpacityCurve::default(),
        )
    };
    assert!(bad(2.0, 1.0).is_err());
    assert!(bad(-1.0, 1.0).is_err());
    assert!(bad(5.0, 7.0).is_err());
    assert!(bad(1.0, 2.0).is_ok());
    assert!(ObjectScheduler::round_robin(&[], &six_phase(), OpacityCurve::default()).is_err());
}

#[test]
fn retimed_follows_new_cycle() {
    let s = ObjectScheduler::round_robin(&nodes(), &six_phase(), OpacityCurve::default()).unwrap();
    let twelve = CyclePhaseConfig::new(12.0, 6, 0.2).unwrap();
    let r = s.retimed(&twelve).unwrap();
    assert_eq!(r.cycle_length(), 12.0);
    assert_eq!(r.objects(), s.objects());
    // Phase 1 now spans [2, 4).
    let st = r.evaluate(2.5);
    assert!(st[1].visible);
    assert!(!st[0].visible && !st[2].visible);

    let explicit = ObjectScheduler::new(
        6.0,
        vec![ObjectSchedule {
            object: NodeId(3),
            phase_start: 1.0,
            phase_end: 3.0,
        }],
        OpacityCurve::default(),
    )
    .unwrap();
    let r = explicit.retimed(&twelve).unwrap();
    assert_eq!(r.windows()[0].phase_start, 2.0);
    assert_eq!(r.windows()[0].phase_end, 6.0);
}
