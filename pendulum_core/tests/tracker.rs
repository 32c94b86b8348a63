use pendulum_core::{AngleTracker, TrackerCfg};

fn tracker() -> AngleTracker {
    AngleTracker::new(TrackerCfg::default()).expect("default cfg is valid")
}

#[test]
fn registers_exactly_one_wrap_going_down() {
    // Raw sequence crossing the 0/16383 boundary once, downward in the raw
    // domain: only the 16383 -> 2 transition is a wrap.
    let mut t = tracker();
    t.recalibrate(16_380);
    assert_eq!(t.total_rotations(), 0);

    t.update(16_383);
    assert_eq!(t.total_rotations(), 0);
    t.update(2);
    assert_eq!(t.total_rotations(), -1);
    t.update(10);
    assert_eq!(t.total_rotations(), -1);
}

#[test]
fn registers_exactly_one_wrap_going_up() {
    let mut t = tracker();
    t.recalibrate(10);

    t.update(2);
    assert_eq!(t.total_rotations(), 0);
    t.update(16_383);
    assert_eq!(t.total_rotations(), 1);
    t.update(16_380);
    assert_eq!(t.total_rotations(), 1);
}

#[test]
fn wraps_accumulate_over_multiple_turns() {
    // Two full wraps in the same direction keep counting; the counter never
    // resets to +/-1.
    let mut t = tracker();
    t.recalibrate(100);
    for _ in 0..2 {
        t.update(12_000); // delta 11900: wrap up
        t.update(100); // delta -11900: wrap down
    }
    assert_eq!(t.total_rotations(), 0);

    let mut t = tracker();
    t.recalibrate(16_000);
    t.update(400); // down wrap
    t.update(8_400); // plain step
    t.update(16_200); // plain step
    t.update(600); // down wrap again
    assert_eq!(t.total_rotations(), -2);
}

#[test]
fn recalibrates_exactly_at_the_stability_threshold() {
    // tolerance 0.02 deg, 3 s window at 10 ms -> threshold of 300 samples.
    let mut t = tracker();
    assert_eq!(t.stable_count_threshold(), 300);
    t.recalibrate(8_000);
    let rest_before = t.rest_position();

    // One raw count is ~0.0027 deg here: inside tolerance, but a distinct
    // rest position once recalibration fires.
    for i in 1..=299u32 {
        t.update(8_001);
        assert_eq!(t.stable_count(), i, "no recalibration before the threshold");
        assert_eq!(t.rest_position(), rest_before);
    }

    let angle = t.update(8_001);
    assert_eq!(angle, 0.0, "the firing call reports exactly zero");
    assert_eq!(t.stable_count(), 0, "counter resets when recalibration fires");
    assert_ne!(t.rest_position(), rest_before, "rest position moved");

    // The counter starts over afterwards.
    t.update(8_001);
    assert_eq!(t.stable_count(), 1);
}

#[test]
fn out_of_tolerance_sample_resets_the_counter() {
    let mut t = tracker();
    t.recalibrate(8_000);
    for _ in 0..50 {
        t.update(8_001);
    }
    assert_eq!(t.stable_count(), 50);
    // ~200 counts is ~0.55 deg: well outside the 0.02 deg band.
    t.update(8_200);
    assert_eq!(t.stable_count(), 0);
}

#[test]
fn reported_angle_stays_in_domain() {
    let mut t = tracker();
    t.recalibrate(0);
    for raw in [0u16, 4_000, 8_191, 8_192, 12_000, 16_383, 3, 9_000] {
        let a = t.update(raw);
        assert!((0.0..360.0).contains(&a), "angle {a} out of [0, 360)");
    }
}
