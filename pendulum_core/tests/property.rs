use pendulum_core::{AngleTracker, PidCfg, PidState, TrackerCfg};
use proptest::prelude::*;

/// Smallest circular distance between two reported angles in `[0, 360)`.
fn circular_distance(a: f32, b: f32) -> f32 {
    let d = (a - b).abs();
    d.min(360.0 - d)
}

prop_compose! {
    /// Raw random walk: bounded steps, so no wrap is ever skipped between
    /// consecutive samples, with free crossings of the 0/16383 boundary.
    fn raw_walk()(
        start in 0u16..=16_383,
        steps in prop::collection::vec(-300i32..=300, 10..120),
    ) -> Vec<u16> {
        let mut seq = Vec::with_capacity(steps.len() + 1);
        let mut pos = i32::from(start);
        seq.push(start);
        for s in steps {
            pos = (pos + s).rem_euclid(16_384);
            seq.push(pos as u16);
        }
        seq
    }
}

proptest! {
    #[test]
    fn unwrapped_angle_never_jumps_a_half_turn(seq in raw_walk()) {
        let mut t = AngleTracker::new(TrackerCfg::default()).expect("default cfg is valid");
        t.recalibrate(seq[0]);
        let mut prev = t.update(seq[0]);
        for raw in &seq[1..] {
            let angle = t.update(*raw);
            prop_assert!((0.0..360.0).contains(&angle));
            let jump = circular_distance(angle, prev);
            prop_assert!(
                jump < 180.0,
                "step {prev} -> {angle} jumped {jump} degrees"
            );
            prev = angle;
        }
    }

    #[test]
    fn pid_command_is_always_within_the_clamp(
        kp in 0.0f32..100.0,
        ki in 0.0f32..100.0,
        kd in 0.0f32..100.0,
        damping in 0.0f32..10.0,
        max_velocity in 1.0f32..20_000.0,
        dt in 0.001f32..0.1,
        inputs in prop::collection::vec((-10_000.0f32..10_000.0, -100_000.0f32..100_000.0), 1..60),
    ) {
        let mut pid = PidState::new(PidCfg { kp, ki, kd, damping, max_velocity });
        for (error, shaft_velocity) in inputs {
            let cmd = pid.step(error, dt, shaft_velocity);
            prop_assert!(cmd <= max_velocity, "command {cmd} above clamp {max_velocity}");
            prop_assert!(cmd >= -max_velocity, "command {cmd} below clamp {}", -max_velocity);
        }
    }

    #[test]
    fn integral_of_constant_error_is_linear(
        error in -500.0f32..500.0,
        dt in 0.001f32..0.05,
        n in 1usize..400,
    ) {
        let mut pid = PidState::new(PidCfg::default());
        for _ in 0..n {
            pid.step(error, dt, 0.0);
        }
        let expected = n as f32 * error * dt;
        let tolerance = expected.abs() * 1e-3 + 1e-3;
        prop_assert!(
            (pid.integral() - expected).abs() <= tolerance,
            "integral {} vs expected {expected}",
            pid.integral()
        );
    }
}
