//! Sensor and rig implementations for the pendulum controller.
//!
//! The simulated rig is always available and is what tests and the CLI's
//! `--sim` mode run against. A real AS5048B angle sensor lives behind the
//! `hardware` feature (Raspberry Pi, `rppal` I2C). The motor side of a real
//! rig speaks CAN through vendor tooling and is supplied by the deployment;
//! only the simulated `MotorPort` lives here.

pub mod error;

#[cfg(all(feature = "hardware", target_os = "linux"))]
pub mod as5048b;

use std::cell::Cell;
use std::rc::Rc;

use pendulum_traits::{AngleSensor, BoxedError, ControllerMode, InputMode, MotorPort};

/// Raw counts per sensor revolution (14-bit).
const COUNTS_PER_REV: f32 = 16_384.0;

/// How far the simulated shaft moves per encoder read, in counts per unit
/// of commanded velocity. Picked so bootstrap pulses sweep a few revolutions.
const COUNTS_PER_READ_PER_VEL: f32 = 0.002;

/// Build a simulated encoder/motor pair wired to the same shaft.
pub fn simulated_rig() -> (SimulatedEncoder, SimulatedMotor) {
    let velocity = Rc::new(Cell::new(0.0f32));
    let position = Rc::new(Cell::new(0.0f32));
    (
        SimulatedEncoder {
            velocity: Rc::clone(&velocity),
            position: Rc::clone(&position),
        },
        SimulatedMotor {
            velocity,
            closed_loop: Cell::new(false),
            controller_mode: Cell::new(None),
            input_mode: Cell::new(None),
        },
    )
}

/// Simulated 14-bit absolute encoder. Each read advances the shared shaft
/// position by the currently commanded velocity and wraps in the raw domain.
pub struct SimulatedEncoder {
    velocity: Rc<Cell<f32>>,
    position: Rc<Cell<f32>>,
}

impl AngleSensor for SimulatedEncoder {
    fn read_raw(&mut self, _timeout: std::time::Duration) -> Result<u16, BoxedError> {
        let pos = (self.position.get() + self.velocity.get() * COUNTS_PER_READ_PER_VEL)
            .rem_euclid(COUNTS_PER_REV);
        self.position.set(pos);
        let raw = pos as u16;
        tracing::trace!(raw, "simulated encoder sample");
        Ok(raw)
    }
}

/// Simulated velocity-mode drive sharing its shaft with [`SimulatedEncoder`].
pub struct SimulatedMotor {
    velocity: Rc<Cell<f32>>,
    closed_loop: Cell<bool>,
    controller_mode: Cell<Option<ControllerMode>>,
    input_mode: Cell<Option<InputMode>>,
}

impl SimulatedMotor {
    pub fn commanded_velocity(&self) -> f32 {
        self.velocity.get()
    }
    pub fn in_closed_loop(&self) -> bool {
        self.closed_loop.get()
    }
    pub fn controller_mode(&self) -> Option<ControllerMode> {
        self.controller_mode.get()
    }
    pub fn input_mode(&self) -> Option<InputMode> {
        self.input_mode.get()
    }
}

impl MotorPort for SimulatedMotor {
    fn set_velocity(&mut self, velocity: f32) -> Result<(), BoxedError> {
        self.velocity.set(velocity);
        Ok(())
    }
    fn get_velocity(&mut self) -> Result<f32, BoxedError> {
        Ok(self.velocity.get())
    }
    fn clear_errors(&mut self) -> Result<(), BoxedError> {
        Ok(())
    }
    fn enter_closed_loop_control(&mut self) -> Result<bool, BoxedError> {
        self.closed_loop.set(true);
        Ok(true)
    }
    fn set_controller_mode(&mut self, mode: ControllerMode) -> Result<(), BoxedError> {
        self.controller_mode.set(Some(mode));
        Ok(())
    }
    fn set_input_mode(&mut self, mode: InputMode) -> Result<(), BoxedError> {
        self.input_mode.set(Some(mode));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::time::Duration;

    #[rstest]
    #[case(1_000.0, 2)]
    #[case(-1_000.0, 16_382)]
    fn encoder_direction_follows_velocity_sign(#[case] vel: f32, #[case] expected: u16) {
        let (mut enc, mut motor) = simulated_rig();
        let first = enc.read_raw(Duration::from_millis(10)).unwrap();
        assert_eq!(first, 0);
        motor.set_velocity(vel).unwrap();
        assert_eq!(enc.read_raw(Duration::from_millis(10)).unwrap(), expected);
    }

    #[test]
    fn encoder_tracks_commanded_velocity_and_wraps() {
        let (mut enc, mut motor) = simulated_rig();
        let first = enc.read_raw(Duration::from_millis(10)).unwrap();
        assert_eq!(first, 0);

        motor.set_velocity(5_000.0).unwrap();
        let mut last = first;
        let mut wrapped = false;
        for _ in 0..3_000 {
            let raw = enc.read_raw(Duration::from_millis(10)).unwrap();
            assert!(raw <= 16_383);
            if raw < last {
                wrapped = true;
            }
            last = raw;
        }
        assert!(wrapped, "shaft should wrap through the 14-bit boundary");
    }

    #[test]
    fn motor_session_ops_are_observable() {
        let (_enc, mut motor) = simulated_rig();
        motor.clear_errors().unwrap();
        motor.set_controller_mode(ControllerMode::Velocity).unwrap();
        motor.set_input_mode(InputMode::VelRamp).unwrap();
        assert!(motor.enter_closed_loop_control().unwrap());
        assert!(motor.in_closed_loop());
        assert_eq!(motor.controller_mode(), Some(ControllerMode::Velocity));
        assert_eq!(motor.input_mode(), Some(InputMode::VelRamp));

        motor.set_velocity(-250.0).unwrap();
        assert!((motor.get_velocity().unwrap() + 250.0).abs() < f32::EPSILON);
    }
}
