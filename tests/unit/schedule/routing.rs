use super::*;
use crate::schedule::PhaseScheduler;
use crate::schedule::ramp::RampScheduler;

fn six_phase() -> CyclePhaseConfig {
    CyclePhaseConfig::new(6.0, 6, 0.2).unwrap()
}

fn rotating() -> Routing {
    Routing::new(CompositeLayout::Rotating { channels: 2 }, 3, &six_phase()).unwrap()
}

fn route_at(routing: &Routing, t: f64) -> ChannelWeights {
    let cfg = six_phase();
    let weights = RampScheduler::new(cfg).unwrap().phase_weights(t);
    routing.route(&cfg, t, &weights)
}

#[test]
fn default_layout_is_two_rotating_channels() {
    assert_eq!(CompositeLayout::default(), CompositeLayout::Rotating { channels: 2 });
    assert_eq!(rotating().width(), 2);
}

#[test]
fn slot_of_phase_wraps_by_slot_count() {
    let r = rotating();
    let slots: Vec<u32> = (0..6).map(|p| r.slot_of_phase(p).0).collect();
    assert_eq!(slots, vec![0, 1, 2, 0, 1, 2]);
}

#[test]
fn rotating_mid_phase_shows_one_channel() {
    let out = route_at(&rotating(), 0.5);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].slot, SlotId(0));
    assert!((out[0].weight - 1.0).abs() < 1e-6);
    assert_eq!(out[1].slot, SlotId(1));
    assert!(out[1].weight.abs() < 1e-6);
}

#[test]
fn rotating_keeps_falling_phase_bound_during_overlap() {
    let out = route_at(&rotating(), 1.1);
    assert_eq!(out[0].slot, SlotId(0));
    assert!((out[0].weight - 0.25).abs() < 1e-5);
    assert_eq!(out[1].slot, SlotId(1));
    assert!((out[1].weight - 0.75).abs() < 1e-5);
}

#[test]
fn rotating_rebinds_idle_channel_to_upcoming_slot() {
    let out = route_at(&rotating(), 1.5);
    assert_eq!(out[0].slot, SlotId(2));
    assert!(out[0].weight.abs() < 1e-6);
    assert_eq!(out[1].slot, SlotId(1));
}

#[test]
fn rotating_wraps_across_cycle_seam() {
    let out = route_at(&rotating(), 5.9);
    assert_eq!(out[1].slot, SlotId(2));
    assert!((out[1].weight - 0.75).abs() < 1e-5);
    assert_eq!(out[0].slot, SlotId(0));
    assert!((out[0].weight - 0.25).abs() < 1e-5);
}

#[test]
fn rotating_channel_weights_sum_to_one() {
    let r = rotating();
    for i in 0..=1200 {
        let t = 12.0 * f64::from(i) / 1200.0;
        let sum: f32 = route_at(&r, t).iter().map(|c| c.weight).sum();
        assert!((sum - 1.0).abs() < 1e-5, "t={t} sum={sum}");
    }
}

#[test]
fn per_slot_folds_repeated_phases() {
    let r = Routing::new(CompositeLayout::PerSlot, 3, &six_phase()).unwrap();
    assert_eq!(r.width(), 3);
    let out = route_at(&r, 3.5);
    let slots: Vec<u32> = out.iter().map(|c| c.slot.0).collect();
    assert_eq!(slots, vec![0, 1, 2]);
    assert!((out[0].weight - 1.0).abs() < 1e-6);
    assert!(out[1].weight.abs() < 1e-6);
}

#[test]
fn rejects_invalid_widths_and_divisibility() {
    let cfg = six_phase();
    assert!(Routing::new(CompositeLayout::PerSlot, 1, &cfg).is_err());
    assert!(Routing::new(CompositeLayout::PerSlot, 6, &cfg).is_err());
    assert!(Routing::new(CompositeLayout::PerSlot, 4, &cfg).is_err());
    assert!(Routing::new(CompositeLayout::Rotating { channels: 4 }, 3, &cfg).is_err());
    assert!(Routing::new(CompositeLayout::Rotating { channels: 0 }, 3, &cfg).is_err());
    assert!(Routing::new(CompositeLayout::PerSlot, 0, &cfg).is_err());
    let odd = CyclePhaseConfig::new(5.0, 5, 0.2).unwrap();
    assert!(Routing::new(CompositeLayout::Rotating { channels: 2 }, 5, &odd).is_err());
}

#[test]
fn layout_deserializes_from_tagged_json() {
    let l: CompositeLayout = serde_json::from_str(r#"{"kind":"rotating","channels":3}"#).unwrap();
    assert_eq!(l, CompositeLayout::Rotating { channels: 3 });
    let l: CompositeLayout = serde_json::from_str(r#"{"kind":"per_slot"}"#).unwrap();
    assert_eq!(l, CompositeLayout::PerSlot);
}
