use pendulum_config::Config;
use rstest::rstest;

#[test]
fn full_config_parses_and_validates() {
    let toml = r#"
[tracker]
gear_ratio = 8.0
phase_offset_deg = 90.0
error_tolerance_deg = 0.02
stable_duration_s = 3.0
sample_interval_s = 0.01

[pid]
kp = 0.1
ki = 0.02
kd = 0.05
damping = 0.1
max_velocity = 10000.0

[schedule]
initial_amplitude_deg = 45.0
amplitude_step_deg = 15.0
max_amplitude_deg = 180.0
capture_radius_deg = 2.0
segment_timeout_ms = 4000

[bootstrap]
pulse_count = 4
peak_velocity = 5000.0
base_dwell_s = 0.5
min_dwell_s = 0.1
tuning_factor = 0.0003
final_dwell_s = 0.648

[safety]
max_run_ms = 0
sensor_retry_limit = 10

[timeouts]
sensor_ms = 150

[run]
trial_id = 7
settle_delay_ms = 5000

[logging]
level = "debug"

[hardware]
i2c_bus = 1
sensor_addr = 64
"#;
    let cfg = Config::from_toml_str(toml).expect("valid config should pass");
    assert_eq!(cfg.run.trial_id, 7);
    assert_eq!(cfg.hardware.sensor_addr, 0x40);
}

#[test]
fn accepts_reading_interval_alias() {
    let toml = r#"
[tracker]
reading_interval_s = 0.02
"#;
    let cfg = Config::from_toml_str(toml).expect("alias should parse");
    assert!((cfg.tracker.sample_interval_s - 0.02).abs() < 1e-6);
}

#[rstest]
#[case("[tracker]\ngear_ratio = 0.0", "gear_ratio")]
#[case("[tracker]\nerror_tolerance_deg = -0.5", "error_tolerance_deg")]
#[case("[tracker]\nstable_duration_s = 0.0", "stable_duration_s")]
#[case("[tracker]\nsample_interval_s = 0.0", "sample_interval_s")]
#[case("[pid]\nmax_velocity = 0.0", "max_velocity")]
#[case("[pid]\nkp = inf", "pid.kp")]
#[case("[schedule]\ninitial_amplitude_deg = 0.0", "initial_amplitude_deg")]
#[case("[schedule]\namplitude_step_deg = -1.0", "amplitude_step_deg")]
#[case(
    "[schedule]\ninitial_amplitude_deg = 90.0\nmax_amplitude_deg = 45.0",
    "max_amplitude_deg"
)]
#[case("[schedule]\ncapture_radius_deg = 0.0", "capture_radius_deg")]
#[case("[schedule]\nsegment_timeout_ms = 0", "segment_timeout_ms")]
#[case("[bootstrap]\npeak_velocity = 0.0", "peak_velocity")]
#[case("[bootstrap]\nmin_dwell_s = 0.0", "min_dwell_s")]
#[case("[bootstrap]\nbase_dwell_s = 0.05\nmin_dwell_s = 0.1", "base_dwell_s")]
#[case("[bootstrap]\ntuning_factor = -1.0", "tuning_factor")]
#[case("[bootstrap]\nfinal_dwell_s = 0.0", "final_dwell_s")]
#[case("[timeouts]\nsensor_ms = 0", "sensor_ms")]
fn rejects_out_of_range_values(#[case] toml: &str, #[case] needle: &str) {
    let err = Config::from_toml_str(toml).expect_err("should reject");
    assert!(
        format!("{err}").contains(needle),
        "error `{err}` should mention `{needle}`"
    );
}

#[test]
fn load_reads_a_file_from_disk() {
    use std::io::Write;
    let mut f = tempfile::NamedTempFile::new().expect("tempfile");
    writeln!(f, "[run]\ntrial_id = 42").expect("write");
    let cfg = Config::load(f.path()).expect("load should pass");
    assert_eq!(cfg.run.trial_id, 42);
}

#[test]
fn load_reports_missing_file() {
    let err = Config::load(std::path::Path::new("/definitely/not/here.toml"))
        .expect_err("missing file should fail");
    assert!(format!("{err}").contains("read config"));
}
