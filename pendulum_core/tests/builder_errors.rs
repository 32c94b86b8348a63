use pendulum_core::mocks::{ScriptedSensor, SpyMotor};
use pendulum_core::{
    BootstrapCfg, PidCfg, ScheduleCfg, Supervisor, Timeouts, TrackerCfg,
};
use rstest::rstest;

#[test]
fn missing_sensor_is_reported() {
    let (motor, _log) = SpyMotor::new();
    let err = Supervisor::builder()
        .with_motor(motor)
        .try_build()
        .expect_err("sensor is required");
    assert!(format!("{err}").contains("missing sensor"));
}

#[test]
fn missing_motor_is_reported() {
    let err = Supervisor::builder()
        .with_sensor(ScriptedSensor::new([0]))
        .try_build()
        .expect_err("motor is required");
    assert!(format!("{err}").contains("missing motor"));
}

#[rstest]
#[case(PidCfg { max_velocity: 0.0, ..PidCfg::default() }, "max_velocity")]
#[case(PidCfg { max_velocity: f32::NAN, ..PidCfg::default() }, "max_velocity")]
#[case(PidCfg { kp: f32::INFINITY, ..PidCfg::default() }, "pid gains")]
#[case(PidCfg { damping: f32::NAN, ..PidCfg::default() }, "damping")]
fn invalid_pid_config_fails_fast(#[case] pid: PidCfg, #[case] needle: &str) {
    let (motor, _log) = SpyMotor::new();
    let err = Supervisor::builder()
        .with_sensor(ScriptedSensor::new([0]))
        .with_motor(motor)
        .with_pid(pid)
        .build()
        .expect_err("should reject");
    assert!(
        format!("{err}").contains(needle),
        "error `{err}` should mention `{needle}`"
    );
}

#[rstest]
#[case(ScheduleCfg { initial_amplitude_deg: 0.0, ..ScheduleCfg::default() }, "initial_amplitude_deg")]
#[case(ScheduleCfg { amplitude_step_deg: -1.0, ..ScheduleCfg::default() }, "amplitude_step_deg")]
#[case(ScheduleCfg { max_amplitude_deg: 10.0, ..ScheduleCfg::default() }, "max_amplitude_deg")]
#[case(ScheduleCfg { capture_radius_deg: 0.0, ..ScheduleCfg::default() }, "capture_radius_deg")]
#[case(ScheduleCfg { segment_timeout_ms: 0, ..ScheduleCfg::default() }, "segment_timeout_ms")]
fn invalid_schedule_config_fails_fast(#[case] schedule: ScheduleCfg, #[case] needle: &str) {
    let (motor, _log) = SpyMotor::new();
    let err = Supervisor::builder()
        .with_sensor(ScriptedSensor::new([0]))
        .with_motor(motor)
        .with_schedule(schedule)
        .build()
        .expect_err("should reject");
    assert!(
        format!("{err}").contains(needle),
        "error `{err}` should mention `{needle}`"
    );
}

#[rstest]
#[case(BootstrapCfg { peak_velocity: -5.0, ..BootstrapCfg::default() }, "peak_velocity")]
#[case(BootstrapCfg { min_dwell_s: 0.0, ..BootstrapCfg::default() }, "min_dwell_s")]
#[case(BootstrapCfg { base_dwell_s: 0.01, ..BootstrapCfg::default() }, "base_dwell_s")]
#[case(BootstrapCfg { tuning_factor: -0.1, ..BootstrapCfg::default() }, "tuning_factor")]
#[case(BootstrapCfg { final_dwell_s: 0.0, ..BootstrapCfg::default() }, "final_dwell_s")]
fn invalid_bootstrap_config_fails_fast(#[case] bootstrap: BootstrapCfg, #[case] needle: &str) {
    let (motor, _log) = SpyMotor::new();
    let err = Supervisor::builder()
        .with_sensor(ScriptedSensor::new([0]))
        .with_motor(motor)
        .with_bootstrap(bootstrap)
        .build()
        .expect_err("should reject");
    assert!(
        format!("{err}").contains(needle),
        "error `{err}` should mention `{needle}`"
    );
}

#[rstest]
#[case(TrackerCfg { gear_ratio: 0.0, ..TrackerCfg::default() }, "gear_ratio")]
#[case(TrackerCfg { error_tolerance_deg: 0.0, ..TrackerCfg::default() }, "error_tolerance_deg")]
#[case(TrackerCfg { stable_duration_s: -3.0, ..TrackerCfg::default() }, "stable_duration_s")]
#[case(TrackerCfg { sample_interval_s: 0.0, ..TrackerCfg::default() }, "sample_interval_s")]
#[case(
    TrackerCfg { stable_duration_s: 0.001, sample_interval_s: 1.0, ..TrackerCfg::default() },
    "must be >= 1"
)]
fn invalid_tracker_config_fails_fast(#[case] tracker: TrackerCfg, #[case] needle: &str) {
    let (motor, _log) = SpyMotor::new();
    let err = Supervisor::builder()
        .with_sensor(ScriptedSensor::new([0]))
        .with_motor(motor)
        .with_tracker(tracker)
        .build()
        .expect_err("should reject");
    assert!(
        format!("{err}").contains(needle),
        "error `{err}` should mention `{needle}`"
    );
}

#[test]
fn zero_sensor_timeout_fails_fast() {
    let (motor, _log) = SpyMotor::new();
    let err = Supervisor::builder()
        .with_sensor(ScriptedSensor::new([0]))
        .with_motor(motor)
        .with_timeouts(Timeouts { sensor_ms: 0 })
        .build()
        .expect_err("should reject");
    assert!(format!("{err}").contains("sensor_ms"));
}
