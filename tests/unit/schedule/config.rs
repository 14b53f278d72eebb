use super::*;

#[test]
fn rejects_non_positive_cycle_and_phase_count() {
    assert!(CyclePhaseConfig::new(0.0, 3, 0.1).is_err());
    assert!(CyclePhaseConfig::new(-3.0, 3, 0.1).is_err());
    assert!(CyclePhaseConfig::new(f64::NAN, 3, 0.1).is_err());
    assert!(CyclePhaseConfig::new(3.0, 0, 0.1).is_err());
}

#[test]
fn rejects_overlap_consuming_half_a_phase() {
    assert!(CyclePhaseConfig::new(3.0, 3, 0.5).is_err());
    assert!(CyclePhaseConfig::new(3.0, 3, -0.1).is_err());
    assert!(CyclePhaseConfig::new(3.0, 3, 0.49).is_ok());
    assert!(CyclePhaseConfig::new(3.0, 3, 0.0).is_ok());
}

#[test]
fn phase_index_wraps_with_cycle() {
    let c = CyclePhaseConfig::new(3.0, 3, 0.2).unwrap();
    assert_eq!(c.phase_width(), 1.0);
    assert_eq!(c.phase_index(0.5), 0);
    assert_eq!(c.phase_index(1.0), 1);
    assert_eq!(c.phase_index(2.99), 2);
    assert_eq!(c.phase_index(3.2), 0);
    assert_eq!(c.phase_index(-0.5), 2);
    assert!((c.phase_local(4.25) - 0.25).abs() < 1e-12);
    assert!((c.cycle_time(7.5) - 1.5).abs() < 1e-12);
}
