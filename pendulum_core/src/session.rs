//! Scoped acquisition of the motor command session.
//!
//! Opening a session runs the drive bring-up sequence; releasing it
//! commands zero velocity exactly once, on every exit path. Faults, panics,
//! and early returns all funnel through the same release, so the actuator
//! is never left spinning.

use eyre::WrapErr;
use pendulum_traits::{ControllerMode, InputMode, MotorPort};

use crate::error::{ControlError, Result};
use crate::hw_error::map_device_error;

pub struct MotorSession<M: MotorPort> {
    motor: M,
    released: bool,
}

impl<M: MotorPort> MotorSession<M> {
    /// Wrap a motor port. No device traffic until [`open`](Self::open).
    pub fn new(motor: M) -> Self {
        Self {
            motor,
            released: false,
        }
    }

    /// Drive bring-up in the vendor-documented order: clear faults, select
    /// velocity control with ramped input, then request closed-loop control.
    /// A refusal is a device fault.
    pub fn open(&mut self) -> Result<()> {
        self.motor
            .clear_errors()
            .map_err(|e| eyre::Report::new(map_device_error(&*e)))
            .wrap_err("clear errors")?;
        self.motor
            .set_controller_mode(ControllerMode::Velocity)
            .map_err(|e| eyre::Report::new(map_device_error(&*e)))
            .wrap_err("set controller mode")?;
        self.motor
            .set_input_mode(InputMode::VelRamp)
            .map_err(|e| eyre::Report::new(map_device_error(&*e)))
            .wrap_err("set input mode")?;
        let entered = self
            .motor
            .enter_closed_loop_control()
            .map_err(|e| eyre::Report::new(map_device_error(&*e)))
            .wrap_err("enter closed-loop control")?;
        if !entered {
            return Err(eyre::Report::new(ControlError::DeviceFault(
                "drive refused closed-loop control".into(),
            )));
        }
        Ok(())
    }

    pub fn set_velocity(&mut self, velocity: f32) -> Result<()> {
        self.motor
            .set_velocity(velocity)
            .map_err(|e| eyre::Report::new(map_device_error(&*e)))
            .wrap_err("set velocity")
    }

    pub fn get_velocity(&mut self) -> Result<f32> {
        self.motor
            .get_velocity()
            .map_err(|e| eyre::Report::new(map_device_error(&*e)))
            .wrap_err("get velocity")
    }

    /// Command zero velocity and detach. Idempotent: the zero command is
    /// issued at most once per session, even if release fails midway.
    pub fn release(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.motor
            .set_velocity(0.0)
            .map_err(|e| eyre::Report::new(map_device_error(&*e)))
            .wrap_err("zero velocity on release")?;
        if let Err(e) = self.motor.set_input_mode(InputMode::Inactive) {
            tracing::warn!(error = %e, "failed to park input mode on release");
        }
        Ok(())
    }
}

impl<M: MotorPort> Drop for MotorSession<M> {
    fn drop(&mut self) {
        if !self.released {
            self.released = true;
            if self.motor.set_velocity(0.0).is_err() {
                tracing::warn!("failed to zero velocity while dropping motor session");
            }
        }
    }
}
