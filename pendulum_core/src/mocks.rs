//! Test and helper doubles for pendulum_core.
//!
//! Integration tests across the workspace share these; a simulated rig with
//! actual kinematics lives in `pendulum_hardware`.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use pendulum_traits::{AngleSensor, BoxedError, ControllerMode, InputMode, MotorPort};

/// Sensor that replays a fixed sequence of raw samples, then repeats the
/// last one. Optionally fails the first `failures` reads.
pub struct ScriptedSensor {
    seq: Vec<u16>,
    idx: usize,
    failures_left: u32,
}

impl ScriptedSensor {
    pub fn new(seq: impl Into<Vec<u16>>) -> Self {
        Self {
            seq: seq.into(),
            idx: 0,
            failures_left: 0,
        }
    }

    /// Fail the first `failures` reads before the sequence starts.
    pub fn with_leading_failures(mut self, failures: u32) -> Self {
        self.failures_left = failures;
        self
    }
}

impl AngleSensor for ScriptedSensor {
    fn read_raw(&mut self, _timeout: Duration) -> Result<u16, BoxedError> {
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err("scripted transport failure".into());
        }
        let v = if self.idx < self.seq.len() {
            let x = self.seq[self.idx];
            self.idx += 1;
            x
        } else {
            self.seq.last().copied().unwrap_or(0)
        };
        Ok(v)
    }
}

/// Sensor that always fails; for driving transport-escalation paths.
pub struct DeadSensor;

impl AngleSensor for DeadSensor {
    fn read_raw(&mut self, _timeout: Duration) -> Result<u16, BoxedError> {
        Err("sensor offline".into())
    }
}

/// Everything a [`SpyMotor`] observed, shared out via `Rc` so tests keep a
/// handle after the motor moves into the supervisor.
#[derive(Debug, Default)]
pub struct SpyLog {
    /// Every velocity command, in issue order.
    pub commands: Vec<f32>,
    pub cleared_errors: bool,
    pub controller_mode: Option<ControllerMode>,
    pub input_mode: Option<InputMode>,
    pub closed_loop_requests: u32,
}

impl SpyLog {
    /// Count of exact-zero velocity commands.
    pub fn zero_commands(&self) -> usize {
        self.commands.iter().filter(|v| **v == 0.0).count()
    }
}

/// Motor that records every interaction and can inject faults at chosen
/// points.
pub struct SpyMotor {
    log: Rc<RefCell<SpyLog>>,
    velocity: f32,
    set_velocity_attempts: usize,
    /// Error on the Nth `set_velocity` attempt (0-based), that attempt only.
    fail_set_velocity_at: Option<usize>,
    /// Error on every `get_velocity` call.
    fail_get_velocity: bool,
    /// Answer `Ok(false)` to `enter_closed_loop_control`.
    refuse_closed_loop: bool,
}

impl SpyMotor {
    pub fn new() -> (Self, Rc<RefCell<SpyLog>>) {
        let log = Rc::new(RefCell::new(SpyLog::default()));
        (
            Self {
                log: Rc::clone(&log),
                velocity: 0.0,
                set_velocity_attempts: 0,
                fail_set_velocity_at: None,
                fail_get_velocity: false,
                refuse_closed_loop: false,
            },
            log,
        )
    }

    pub fn fail_set_velocity_at(mut self, nth: usize) -> Self {
        self.fail_set_velocity_at = Some(nth);
        self
    }

    pub fn fail_get_velocity(mut self) -> Self {
        self.fail_get_velocity = true;
        self
    }

    pub fn refuse_closed_loop(mut self) -> Self {
        self.refuse_closed_loop = true;
        self
    }
}

impl MotorPort for SpyMotor {
    fn set_velocity(&mut self, velocity: f32) -> Result<(), BoxedError> {
        let attempt = self.set_velocity_attempts;
        self.set_velocity_attempts += 1;
        if self.fail_set_velocity_at == Some(attempt) {
            return Err("injected set_velocity fault".into());
        }
        self.log.borrow_mut().commands.push(velocity);
        self.velocity = velocity;
        Ok(())
    }

    fn get_velocity(&mut self) -> Result<f32, BoxedError> {
        if self.fail_get_velocity {
            return Err("injected get_velocity fault".into());
        }
        Ok(self.velocity)
    }

    fn clear_errors(&mut self) -> Result<(), BoxedError> {
        self.log.borrow_mut().cleared_errors = true;
        Ok(())
    }

    fn enter_closed_loop_control(&mut self) -> Result<bool, BoxedError> {
        self.log.borrow_mut().closed_loop_requests += 1;
        Ok(!self.refuse_closed_loop)
    }

    fn set_controller_mode(&mut self, mode: ControllerMode) -> Result<(), BoxedError> {
        self.log.borrow_mut().controller_mode = Some(mode);
        Ok(())
    }

    fn set_input_mode(&mut self, mode: InputMode) -> Result<(), BoxedError> {
        self.log.borrow_mut().input_mode = Some(mode);
        Ok(())
    }
}
