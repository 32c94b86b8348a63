//! `From` implementations bridging `pendulum_config` types to
//! `pendulum_core` types.
//!
//! These keep the CLI free of field-by-field mapping.

use crate::config::{BootstrapCfg, PidCfg, SafetyCfg, ScheduleCfg, Timeouts, TrackerCfg, TrialCfg};

// ── TrackerCfg ───────────────────────────────────────────────────────────────

impl From<&pendulum_config::Tracker> for TrackerCfg {
    fn from(c: &pendulum_config::Tracker) -> Self {
        Self {
            gear_ratio: c.gear_ratio,
            phase_offset_deg: c.phase_offset_deg,
            error_tolerance_deg: c.error_tolerance_deg,
            stable_duration_s: c.stable_duration_s,
            sample_interval_s: c.sample_interval_s,
        }
    }
}

// ── PidCfg ───────────────────────────────────────────────────────────────────

impl From<&pendulum_config::Pid> for PidCfg {
    fn from(c: &pendulum_config::Pid) -> Self {
        Self {
            kp: c.kp,
            ki: c.ki,
            kd: c.kd,
            damping: c.damping,
            max_velocity: c.max_velocity,
        }
    }
}

// ── ScheduleCfg ──────────────────────────────────────────────────────────────

impl From<&pendulum_config::Schedule> for ScheduleCfg {
    fn from(c: &pendulum_config::Schedule) -> Self {
        Self {
            initial_amplitude_deg: c.initial_amplitude_deg,
            amplitude_step_deg: c.amplitude_step_deg,
            max_amplitude_deg: c.max_amplitude_deg,
            capture_radius_deg: c.capture_radius_deg,
            segment_timeout_ms: c.segment_timeout_ms,
        }
    }
}

// ── BootstrapCfg ─────────────────────────────────────────────────────────────

impl From<&pendulum_config::Bootstrap> for BootstrapCfg {
    fn from(c: &pendulum_config::Bootstrap) -> Self {
        Self {
            pulse_count: c.pulse_count,
            peak_velocity: c.peak_velocity,
            base_dwell_s: c.base_dwell_s,
            min_dwell_s: c.min_dwell_s,
            tuning_factor: c.tuning_factor,
            final_dwell_s: c.final_dwell_s,
        }
    }
}

// ── SafetyCfg ────────────────────────────────────────────────────────────────

impl From<&pendulum_config::Safety> for SafetyCfg {
    fn from(c: &pendulum_config::Safety) -> Self {
        Self {
            max_run_ms: c.max_run_ms,
            sensor_retry_limit: c.sensor_retry_limit,
        }
    }
}

// ── Timeouts ─────────────────────────────────────────────────────────────────

impl From<&pendulum_config::Timeouts> for Timeouts {
    fn from(c: &pendulum_config::Timeouts) -> Self {
        Self {
            sensor_ms: c.sensor_ms,
        }
    }
}

// ── TrialCfg ─────────────────────────────────────────────────────────────────

impl From<&pendulum_config::Run> for TrialCfg {
    fn from(c: &pendulum_config::Run) -> Self {
        Self {
            trial_id: c.trial_id,
            settle_delay_ms: c.settle_delay_ms,
        }
    }
}
