//! Runtime configuration types for the balance controller.
//!
//! These are the structs consumed by `SupervisorCore`. They are separate
//! from the TOML-deserialized schema in `pendulum_config`; `conversions.rs`
//! bridges the two.

/// Angle-tracking configuration: raw scaling and recalibration policy.
#[derive(Debug, Clone, Copy)]
pub struct TrackerCfg {
    /// Mechanical reduction between sensor shaft and pendulum.
    pub gear_ratio: f32,
    /// Mounting offset added after scaling, degrees.
    pub phase_offset_deg: f32,
    /// Band around zero treated as "at rest", degrees.
    pub error_tolerance_deg: f32,
    /// In-tolerance time required before the rest position recalibrates, seconds.
    pub stable_duration_s: f32,
    /// Control cycle period, seconds. Drives the loop and the stability
    /// counter threshold (`stable_duration / sample_interval`).
    pub sample_interval_s: f32,
}

impl Default for TrackerCfg {
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

/// Stabilizing-phase PID gains, velocity damping, and output clamp.
#[derive(Debug, Clone, Copy)]
pub struct PidCfg {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    /// Velocity-feedback coefficient subtracted from the PID output; counters
    /// actuator momentum the derivative term cannot see.
    pub damping: f32,
    /// Command clamp in device-native rate units. Applied to every command.
    pub max_velocity: f32,
}

impl Default for PidCfg {
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

/// Amplitude ramp for stabilizing-phase target selection.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleCfg {
    pub initial_amplitude_deg: f32,
    pub amplitude_step_deg: f32,
    pub max_amplitude_deg: f32,
    /// A target segment completes once the angle is within this radius, degrees.
    pub capture_radius_deg: f32,
    /// A segment that never captures advances the schedule after this long, ms.
    pub segment_timeout_ms: u64,
}

impl Default for ScheduleCfg {
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
#[derive(Debug, Clone, Copy)]
pub struct BootstrapCfg {
    pub pulse_count: u32,
    pub peak_velocity: f32,
    pub base_dwell_s: f32,
    pub min_dwell_s: f32,
    /// Logarithmic decay coefficient for the dwell schedule.
    pub tuning_factor: f32,
    /// Dwell of the single trailing pulse pair, tuned to the pendulum's
    /// natural half-period so the last pulse lands in phase.
    pub final_dwell_s: f32,
}

impl Default for BootstrapCfg {
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
#[derive(Debug, Clone, Copy)]
pub struct SafetyCfg {
    /// Clean-shutdown cap on a session in milliseconds. 0 disables the cap.
    pub max_run_ms: u64,
    /// Consecutive failed sensor reads tolerated before escalating.
    pub sensor_retry_limit: u32,
}

impl Default for SafetyCfg {
    fn default() -> Self {
        Self {
            max_run_ms: 0,
            sensor_retry_limit: 10,
        }
    }
}

/// Timeouts and watchdogs.
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    /// Max sensor wait per read (ms).
    pub sensor_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { sensor_ms: 150 }
    }
}

/// Per-trial parameters.
#[derive(Debug, Clone, Copy)]
pub struct TrialCfg {
    pub trial_id: u32,
    /// Settle period before the rest position is read, milliseconds.
    pub settle_delay_ms: u64,
}

impl Default for TrialCfg {
    fn default() -> Self {
        Self {
            trial_id: 1,
            settle_delay_ms: 5_000,
        }
    }
}
