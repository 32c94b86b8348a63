#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the pendulum balance controller.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Every table has defaults matching the bench rig this controller was
//!   tuned on, so a partial (or empty) TOML is a valid starting point.

use serde::Deserialize;

/// Angle tracking: raw-sample scaling and rest-position recalibration.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Tracker {
    /// Mechanical reduction between the sensor shaft and the pendulum.
    pub gear_ratio: f32,
    /// Mounting offset added after scaling, degrees.
    pub phase_offset_deg: f32,
    /// Band around zero that counts as "at rest", degrees.
    pub error_tolerance_deg: f32,
    /// How long the angle must stay in-tolerance before the rest position
    /// is recalibrated, seconds.
    pub stable_duration_s: f32,
    /// Control cycle period, seconds. Also accepts alias "reading_interval_s".
    #[serde(alias = "reading_interval_s")]
    pub sample_interval_s: f32,
}

impl Default for Tracker {
    fn default() -> Self {
        Self {
            gear_ratio: 8.0,
            phase_offset_deg: 90.0,
            error_tolerance_deg: 0.02,
            stable_duration_s: 3.0,
            sample_interval_s: 0.01,
        }
    }
}

/// Stabilizing-phase PID gains and output clamp.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Pid {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    /// Velocity-feedback damping coefficient.
    pub damping: f32,
    /// Command clamp, device-native rate units.
    pub max_velocity: f32,
}

impl Default for Pid {
    fn default() -> Self {
        Self {
            kp: 0.1,
            ki: 0.02,
            kd: 0.05,
            damping: 0.1,
            max_velocity: 10_000.0,
        }
    }
}

/// Amplitude ramp used by the stabilizing controller's target selection.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Schedule {
    pub initial_amplitude_deg: f32,
    pub amplitude_step_deg: f32,
    pub max_amplitude_deg: f32,
    /// A target segment completes once the angle is this close, degrees.
    pub capture_radius_deg: f32,
    /// A missed target stops stalling the ramp after this long, ms.
    pub segment_timeout_ms: u64,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            initial_amplitude_deg: 45.0,
            amplitude_step_deg: 15.0,
            max_amplitude_deg: 180.0,
            capture_radius_deg: 2.0,
            segment_timeout_ms: 4_000,
        }
    }
}

/// Open-loop energy-injection pulse train.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Bootstrap {
    pub pulse_count: u32,
    pub peak_velocity: f32,
    pub base_dwell_s: f32,
    pub min_dwell_s: f32,
    /// Logarithmic decay coefficient for the dwell schedule.
    pub tuning_factor: f32,
    /// Dwell for the single trailing pulse pair, tuned to the pendulum's
    /// natural half-period.
    pub final_dwell_s: f32,
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self {
            pulse_count: 4,
            peak_velocity: 5_000.0,
            base_dwell_s: 0.5,
            min_dwell_s: 0.1,
            tuning_factor: 0.0003,
            final_dwell_s: 0.648,
        }
    }
}

/// Runtime and sensor-fault policy.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Safety {
    /// Clean-shutdown cap on a trial in milliseconds. 0 disables the cap
    /// (steady-state balancing runs until interrupted).
    pub max_run_ms: u64,
    /// Consecutive failed sensor reads tolerated before the trial aborts.
    pub sensor_retry_limit: u32,
}

impl Default for Safety {
    fn default() -> Self {
        Self {
            max_run_ms: 0,
            sensor_retry_limit: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Timeouts {
    /// Max sensor wait per read (ms). Also accepts alias "sensor_read_timeout_ms".
    #[serde(alias = "sensor_read_timeout_ms")]
    pub sensor_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { sensor_ms: 150 }
    }
}

/// Per-trial run parameters.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Run {
    pub trial_id: u32,
    /// Settle period before the rest position is read, milliseconds. The
    /// pendulum is assumed stationary for the whole window.
    pub settle_delay_ms: u64,
}

impl Default for Run {
    fn default() -> Self {
        Self {
            trial_id: 1,
            settle_delay_ms: 5_000,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
}

/// Physical attachment of the angle sensor (hardware builds only).
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Hardware {
    pub i2c_bus: u8,
    pub sensor_addr: u16,
}

impl Default for Hardware {
    fn default() -> Self {
        Self {
            i2c_bus: 1,
            sensor_addr: 0x40,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub tracker: Tracker,
    pub pid: Pid,
    pub schedule: Schedule,
    pub bootstrap: Bootstrap,
    pub safety: Safety,
    pub timeouts: Timeouts,
    pub run: Run,
    pub logging: Logging,
    pub hardware: Hardware,
}

impl Config {
    /// Parse a TOML string and validate it.
    pub fn from_toml_str(s: &str) -> eyre::Result<Self> {
        let cfg: Config = toml::from_str(s).map_err(|e| eyre::eyre!("config parse: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load a config file, validate, and return it.
    pub fn load(path: &std::path::Path) -> eyre::Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| eyre::eyre!("read config {}: {e}", path.display()))?;
        Self::from_toml_str(&text).map_err(|e| eyre::eyre!("config {}: {e}", path.display()))
    }

    /// Structural validation. The core builder re-validates the values it
    /// consumes; this pass rejects configs that could never build.
    pub fn validate(&self) -> eyre::Result<()> {
        let t = &self.tracker;
        if !(t.gear_ratio.is_finite() && t.gear_ratio > 0.0) {
            eyre::bail!("tracker.gear_ratio must be finite and > 0");
        }
        if !t.phase_offset_deg.is_finite() {
            eyre::bail!("tracker.phase_offset_deg must be finite");
        }
        if !(t.error_tolerance_deg.is_finite() && t.error_tolerance_deg > 0.0) {
            eyre::bail!("tracker.error_tolerance_deg must be finite and > 0");
        }
        if !(t.stable_duration_s.is_finite() && t.stable_duration_s > 0.0) {
            eyre::bail!("tracker.stable_duration_s must be finite and > 0");
        }
        if !(t.sample_interval_s.is_finite() && t.sample_interval_s > 0.0) {
            eyre::bail!("tracker.sample_interval_s must be finite and > 0");
        }

        let p = &self.pid;
        for (name, v) in [
            ("pid.kp", p.kp),
            ("pid.ki", p.ki),
            ("pid.kd", p.kd),
            ("pid.damping", p.damping),
        ] {
            if !v.is_finite() {
                eyre::bail!("{name} must be finite");
            }
        }
        if !(p.max_velocity.is_finite() && p.max_velocity > 0.0) {
            eyre::bail!("pid.max_velocity must be finite and > 0");
        }

        let s = &self.schedule;
        if !(s.initial_amplitude_deg.is_finite() && s.initial_amplitude_deg > 0.0) {
            eyre::bail!("schedule.initial_amplitude_deg must be finite and > 0");
        }
        if !(s.amplitude_step_deg.is_finite() && s.amplitude_step_deg > 0.0) {
            eyre::bail!("schedule.amplitude_step_deg must be finite and > 0");
        }
        if !(s.max_amplitude_deg.is_finite() && s.max_amplitude_deg >= s.initial_amplitude_deg) {
            eyre::bail!("schedule.max_amplitude_deg must be >= initial_amplitude_deg");
        }
        if !(s.capture_radius_deg.is_finite() && s.capture_radius_deg > 0.0) {
            eyre::bail!("schedule.capture_radius_deg must be finite and > 0");
        }
        if s.segment_timeout_ms == 0 {
            eyre::bail!("schedule.segment_timeout_ms must be >= 1");
        }

        let b = &self.bootstrap;
        if !(b.peak_velocity.is_finite() && b.peak_velocity > 0.0) {
            eyre::bail!("bootstrap.peak_velocity must be finite and > 0");
        }
        if !(b.min_dwell_s.is_finite() && b.min_dwell_s > 0.0) {
            eyre::bail!("bootstrap.min_dwell_s must be finite and > 0");
        }
        if !(b.base_dwell_s.is_finite() && b.base_dwell_s >= b.min_dwell_s) {
            eyre::bail!("bootstrap.base_dwell_s must be >= min_dwell_s");
        }
        if !(b.tuning_factor.is_finite() && b.tuning_factor >= 0.0) {
            eyre::bail!("bootstrap.tuning_factor must be finite and >= 0");
        }
        if !(b.final_dwell_s.is_finite() && b.final_dwell_s > 0.0) {
            eyre::bail!("bootstrap.final_dwell_s must be finite and > 0");
        }

        if self.timeouts.sensor_ms == 0 {
            eyre::bail!("timeouts.sensor_ms must be >= 1");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_the_default_config() {
        let cfg = Config::from_toml_str("").expect("defaults validate");
        assert_eq!(cfg.bootstrap.pulse_count, 4);
        assert!((cfg.tracker.gear_ratio - 8.0).abs() < f32::EPSILON);
        assert_eq!(cfg.run.settle_delay_ms, 5_000);
    }
}
