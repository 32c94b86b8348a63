//! PID-with-damping velocity law for the stabilizing phase.
//!
//! Classic PID on angle error plus a velocity-feedback damping term: the
//! derivative term reacts to angle error only, so actuator momentum needs
//! its own counterweight. Output is clamped before it ever reaches a drive.

use crate::config::PidCfg;

#[derive(Debug, Clone)]
pub struct PidState {
    cfg: PidCfg,
    integral: f32,
    previous_error: f32,
}

impl PidState {
    pub fn new(cfg: PidCfg) -> Self {
        Self {
            cfg,
            integral: 0.0,
            previous_error: 0.0,
        }
    }

    /// Clear the accumulator and error memory. Only at controller
    /// (re)initialization, never mid-run.
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.previous_error = 0.0;
    }

    /// One control cycle. Returns the velocity command clamped to
    /// `[-max_velocity, +max_velocity]`.
    pub fn step(&mut self, error: f32, dt_s: f32, shaft_velocity: f32) -> f32 {
        self.integral += error * dt_s;
        let derivative = (error - self.previous_error) / dt_s;
        self.previous_error = error;

        let raw = self.cfg.kp * error
            + self.cfg.ki * self.integral
            + self.cfg.kd * derivative
            - self.cfg.damping * shaft_velocity;
        raw.clamp(-self.cfg.max_velocity, self.cfg.max_velocity)
    }

    pub fn integral(&self) -> f32 {
        self.integral
    }
}
