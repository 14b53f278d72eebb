use super::*;

#[test]
fn logical_time_scales_raw_elapsed() {
    let mut c = Clock::new(0.8).unwrap();
    c.advance(1.0);
    c.advance(1.5);
    assert!((c.elapsed_raw() - 2.5).abs() < 1e-12);
    assert!((c.t() - 2.0).abs() < 1e-12);
}

#[test]
fn negative_and_nan_steps_are_ignored() {
    let mut c = Clock::new(1.0).unwrap();
    c.advance(2.0);
    assert_eq!(c.advance(-1.0), 2.0);
    assert_eq!(c.advance(f64::NAN), 2.0);
    assert_eq!(c.advance(f64::INFINITY), 2.0);
}

#[test]
fn rate_change_keeps_time_continuous() {
    let mut c = Clock::new(1.0).unwrap();
    c.advance(3.0);
    c.set_rate(2.0).unwrap();
    assert!((c.t() - 3.0).abs() < 1e-12);
    c.advance(0.5);
    assert!((c.t() - 4.0).abs() < 1e-12);
}

#[test]
fn pause_freezes_time() {
    let mut c = Clock::new(1.0).unwrap();
    c.advance(1.0);
    c.pause();
    assert!(c.is_paused());
    c.advance(5.0);
    assert_eq!(c.t(), 1.0);
    c.resume();
    c.advance(0.25);
    assert_eq!(c.t(), 1.25);
}

#[test]
fn invalid_rates_are_configuration_errors() {
    assert!(Clock::new(-1.0).is_err());
    assert!(Clock::new(f64::NAN).is_err());
    let mut c = Clock::new(1.0).unwrap();
    assert!(c.set_rate(f64::INFINITY).is_err());
    assert_eq!(c.rate(), 1.0);
}
