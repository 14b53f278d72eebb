use super::*;

fn three_phase() -> RampScheduler {
    RampScheduler::new(CyclePhaseConfig::new(3.0, 3, 0.2).unwrap()).unwrap()
}

#[test]
fn interpolate_has_trapezoid_shape() {
    assert_eq!(interpolate(-1.0, 0.0, 1.0, 0.2), 0.0);
    assert_eq!(interpolate(-0.2, 0.0, 1.0, 0.2), 0.0);
    assert!((interpolate(0.0, 0.0, 1.0, 0.2) - 0.5).abs() < 1e-12);
    assert!((interpolate(0.2, 0.0, 1.0, 0.2) - 1.0).abs() < 1e-12);
    assert_eq!(interpolate(0.5, 0.0, 1.0, 0.2), 1.0);
    assert!((interpolate(1.0, 0.0, 1.0, 0.2) - 0.5).abs() < 1e-12);
    assert!(interpolate(1.2, 0.0, 1.0, 0.2).abs() < 1e-12);
    assert_eq!(interpolate(1.5, 0.0, 1.0, 0.2), 0.0);
}

#[test]
fn interpolate_stays_in_unit_range() {
    for (start, end, spread) in [(0.0, 1.0, 0.2), (2.0, 5.0, 1.4), (-1.0, 0.5, 0.1)] {
        for i in 0..=2000 {
            let t = start - 2.0 + (end - start + 4.0) * (i as f64) / 2000.0;
            let v = interpolate(t, start, end, spread);
            assert!((0.0..=1.0).contains(&v), "t={t} v={v}");
        }
    }
}

#[test]
fn mid_phase_is_fully_lit() {
    let w = three_phase().phase_weights(0.5);
    assert!((w[0] - 1.0).abs() < 1e-6);
    assert!(w[1].abs() < 1e-6);
    assert!(w[2].abs() < 1e-6);
}

#[test]
fn boundary_splits_evenly_between_neighbours() {
    let w = three_phase().phase_weights(1.0);
    assert!((w[0] - 0.5).abs() < 1e-6);
    assert!((w[1] - 0.5).abs() < 1e-6);
    assert!(w[2].abs() < 1e-6);
}

#[test]
fn adjacent_phases_sum_to_one_everywhere() {
    let s = three_phase();
    for i in 0..=3000 {
        let t = -3.0 + 9.0 * (i as f64) / 3000.0;
        let sum: f32 = s.phase_weights(t).iter().sum();
        assert!((sum - 1.0).abs() < 1e-5, "t={t} sum={sum}");
    }
}

#[test]
fn wraps_across_cycle_seam() {
    let s = three_phase();
    let w = s.phase_weights(0.1);
    assert!((w[0] - 0.75).abs() < 1e-6);
    assert!((w[2] - 0.25).abs() < 1e-6);
    let w = s.phase_weights(2.9);
    assert!((w[2] - 0.75).abs() < 1e-6);
    assert!((w[0] - 0.25).abs() < 1e-6);
}

#[test]
fn periodic_and_idempotent() {
    let s = three_phase();
    for i in 0..200 {
        let t = 0.013 * (i as f64);
        let a = s.phase_weights(t);
        assert_eq!(a, s.phase_weights(t));
        let b = s.phase_weights(t + 3.0);
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-5, "t={t}");
        }
    }
}

#[test]
fn overlapping_custom_windows_add_up() {
    let cfg = CyclePhaseConfig::new(4.0, 2, 0.2).unwrap();
    let s = RampScheduler::with_windows(
        cfg,
        vec![
            vec![RampWindow {
                start: 0.0,
                end: 2.5,
            }],
            vec![RampWindow {
                start: 2.0,
                end: 4.0,
            }],
        ],
    )
    .unwrap();
    let sum: f32 = s.phase_weights(2.25).iter().sum();
    assert!((1.0..=2.0).contains(&sum));
    assert!(sum > 1.5);
    let steady: f32 = s.phase_weights(1.0).iter().sum();
    assert!((steady - 1.0).abs() < 1e-6);
}

#[test]
fn rejects_zero_spread_and_short_windows() {
    let zero = CyclePhaseConfig::new(3.0, 3, 0.0).unwrap();
    assert!(RampScheduler::new(zero).is_err());

    let cfg = CyclePhaseConfig::new(3.0, 1, 0.2).unwrap();
    let short = RampScheduler::with_windows(
        cfg,
        vec![vec![RampWindow {
            start: 1.0,
            end: 1.3,
        }]],
    );
    assert!(short.is_err());
    let outside = RampScheduler::with_windows(
        cfg,
        vec![vec![RampWindow {
            start: 2.0,
            end: 4.0,
        }]],
    );
    assert!(outside.is_err());
    assert!(RampScheduler::with_windows(cfg, vec![]).is_err());
}
