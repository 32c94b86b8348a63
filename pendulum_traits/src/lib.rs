pub mod clock;

pub use clock::{Clock, MonotonicClock};

/// Boxed error type used at every capability boundary.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Control mode requested from the drive before commanding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerMode {
    Velocity,
    Position,
    Torque,
}

/// Input shaping applied by the drive to incoming setpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Inactive,
    Passthrough,
    VelRamp,
}

/// Absolute rotary sensor producing 14-bit raw samples in `[0, 16383]`.
pub trait AngleSensor {
    fn read_raw(&mut self, timeout: std::time::Duration) -> Result<u16, BoxedError>;
}

/// Velocity-controlled actuator port.
///
/// `get_velocity` is a blocking round-trip to the drive; callers treat it as
/// a suspension point. Commands must reach the device in issue order.
pub trait MotorPort {
    fn set_velocity(&mut self, velocity: f32) -> Result<(), BoxedError>;
    fn get_velocity(&mut self) -> Result<f32, BoxedError>;
    fn clear_errors(&mut self) -> Result<(), BoxedError>;
    /// Ask the drive to enter closed-loop control. `Ok(false)` means the
    /// drive refused (e.g. not calibrated); callers decide how to escalate.
    fn enter_closed_loop_control(&mut self) -> Result<bool, BoxedError>;
    fn set_controller_mode(&mut self, mode: ControllerMode) -> Result<(), BoxedError>;
    fn set_input_mode(&mut self, mode: InputMode) -> Result<(), BoxedError>;
}

/// Optional trial observer. Never required for control correctness.
pub trait Recorder {
    fn record(&mut self, trial_id: u32, timestamp_ms: u64, setpoint_deg: f32, estimate_deg: f32);
}

impl<T: AngleSensor + ?Sized> AngleSensor for Box<T> {
    fn read_raw(&mut self, timeout: std::time::Duration) -> Result<u16, BoxedError> {
        (**self).read_raw(timeout)
    }
}

impl<T: MotorPort + ?Sized> MotorPort for Box<T> {
    fn set_velocity(&mut self, velocity: f32) -> Result<(), BoxedError> {
        (**self).set_velocity(velocity)
    }
    fn get_velocity(&mut self) -> Result<f32, BoxedError> {
        (**self).get_velocity()
    }
    fn clear_errors(&mut self) -> Result<(), BoxedError> {
        (**self).clear_errors()
    }
    fn enter_closed_loop_control(&mut self) -> Result<bool, BoxedError> {
        (**self).enter_closed_loop_control()
    }
    fn set_controller_mode(&mut self, mode: ControllerMode) -> Result<(), BoxedError> {
        (**self).set_controller_mode(mode)
    }
    fn set_input_mode(&mut self, mode: InputMode) -> Result<(), BoxedError> {
        (**self).set_input_mode(mode)
    }
}

impl<T: Recorder + ?Sized> Recorder for Box<T> {
    fn record(&mut self, trial_id: u32, timestamp_ms: u64, setpoint_deg: f32, estimate_deg: f32) {
        (**self).record(trial_id, timestamp_ms, setpoint_deg, estimate_deg)
    }
}
