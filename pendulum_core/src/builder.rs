//! Type-state builder for `Supervisor` and generic `build_supervisor`
//! constructor.
//!
//! The builder enforces at compile time that a sensor and a motor are
//! provided before `build()` is available. `try_build()` is always available
//! for dynamic checks.

use std::marker::PhantomData;
use std::sync::Arc;

use pendulum_traits::clock::{Clock, MonotonicClock};
use pendulum_traits::{AngleSensor, MotorPort, Recorder};

use crate::bootstrap::BootstrapOscillator;
use crate::config::{BootstrapCfg, PidCfg, SafetyCfg, ScheduleCfg, Timeouts, TrackerCfg, TrialCfg};
use crate::core::SupervisorCore;
use crate::error::{BuildError, Result};
use crate::session::MotorSession;
use crate::stabilizer::StabilizingController;
use crate::status::{ControlPhase, SessionOutcome};
use crate::tracker::AngleTracker;
use crate::util::secs_f32;

// ── Public dynamic-dispatch wrapper ──────────────────────────────────────────

/// Public dynamic (boxed) supervisor that hides the sensor/motor generics.
pub struct Supervisor {
    pub(crate) inner: SupervisorCore<Box<dyn AngleSensor>, Box<dyn MotorPort>>,
}

impl core::fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Supervisor")
            .field("phase", &self.inner.phase())
            .field("last_angle_deg", &self.inner.last_angle())
            .finish()
    }
}

impl Supervisor {
    /// Start building a Supervisor.
    pub fn builder() -> SupervisorBuilder<Missing, Missing> {
        SupervisorBuilder::default()
    }

    /// Drive the session to completion (see `SupervisorCore::run`).
    pub fn run(&mut self) -> Result<SessionOutcome> {
        self.inner.run()
    }

    pub fn phase(&self) -> ControlPhase {
        self.inner.phase()
    }

    /// Last reported angle estimate, degrees.
    pub fn last_angle(&self) -> f32 {
        self.inner.last_angle()
    }
}

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `Supervisor`. All fields are validated on `build()`.
pub struct SupervisorBuilder<S, M> {
    sensor: Option<Box<dyn AngleSensor>>,
    motor: Option<Box<dyn MotorPort>>,
    tracker: Option<TrackerCfg>,
    pid: Option<PidCfg>,
    schedule: Option<ScheduleCfg>,
    bootstrap: Option<BootstrapCfg>,
    safety: Option<SafetyCfg>,
    timeouts: Option<Timeouts>,
    trial: Option<TrialCfg>,
    stop_check: Option<Box<dyn Fn() -> bool>>,
    recorder: Option<Box<dyn Recorder>>,
    clock: Option<Box<dyn Clock + Send + Sync>>,
    _s: PhantomData<S>,
    _m: PhantomData<M>,
}

impl Default for SupervisorBuilder<Missing, Missing> {
    fn default() -> Self {
        Self {
            sensor: None,
            motor: None,
            tracker: None,
            pid: None,
            schedule: None,
            bootstrap: None,
            safety: None,
            timeouts: None,
            trial: None,
            stop_check: None,
            recorder: None,
            clock: None,
            _s: PhantomData,
            _m: PhantomData,
        }
    }
}

/// Validate configuration and construct a `SupervisorCore`.
///
/// This is the single source of truth for validation and construction, used
/// by both `SupervisorBuilder::try_build()` and `build_supervisor()`.
/// Configuration problems surface here, before any device traffic.
#[allow(clippy::too_many_arguments)]
fn validate_and_build<S: AngleSensor, M: MotorPort>(
    sensor: S,
    motor: M,
    tracker: TrackerCfg,
    pid: PidCfg,
    schedule: ScheduleCfg,
    bootstrap: BootstrapCfg,
    safety: SafetyCfg,
    timeouts: Timeouts,
    trial: TrialCfg,
    stop_check: Option<Box<dyn Fn() -> bool>>,
    recorder: Option<Box<dyn Recorder>>,
    clock: Option<Box<dyn Clock + Send + Sync>>,
) -> Result<SupervisorCore<S, M>> {
    // ── Validation ───────────────────────────────────────────────────────────
    if !(pid.kp.is_finite() && pid.ki.is_finite() && pid.kd.is_finite()) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "pid gains must be finite",
        )));
    }
    if !pid.damping.is_finite() {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "damping must be finite",
        )));
    }
    if !(pid.max_velocity.is_finite() && pid.max_velocity > 0.0) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "max_velocity must be finite and > 0",
        )));
    }
    if !(schedule.initial_amplitude_deg.is_finite() && schedule.initial_amplitude_deg > 0.0) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "initial_amplitude_deg must be finite and > 0",
        )));
    }
    if !(schedule.amplitude_step_deg.is_finite() && schedule.amplitude_step_deg > 0.0) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "amplitude_step_deg must be finite and > 0",
        )));
    }
    if !(schedule.max_amplitude_deg.is_finite()
        && schedule.max_amplitude_deg >= schedule.initial_amplitude_deg)
    {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "max_amplitude_deg must be >= initial_amplitude_deg",
        )));
    }
    if !(schedule.capture_radius_deg.is_finite() && schedule.capture_radius_deg > 0.0) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "capture_radius_deg must be finite and > 0",
        )));
    }
    if schedule.segment_timeout_ms == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "segment_timeout_ms must be >= 1",
        )));
    }
    if !(bootstrap.peak_velocity.is_finite() && bootstrap.peak_velocity > 0.0) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "peak_velocity must be finite and > 0",
        )));
    }
    if !(bootstrap.min_dwell_s.is_finite() && bootstrap.min_dwell_s > 0.0) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "min_dwell_s must be finite and > 0",
        )));
    }
    if !(bootstrap.base_dwell_s.is_finite() && bootstrap.base_dwell_s >= bootstrap.min_dwell_s) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "base_dwell_s must be >= min_dwell_s",
        )));
    }
    if !(bootstrap.tuning_factor.is_finite() && bootstrap.tuning_factor >= 0.0) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "tuning_factor must be finite and >= 0",
        )));
    }
    if !(bootstrap.final_dwell_s.is_finite() && bootstrap.final_dwell_s > 0.0) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "final_dwell_s must be finite and > 0",
        )));
    }
    if timeouts.sensor_ms == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "sensor_ms must be >= 1",
        )));
    }

    // Tracker validation (gear ratio, tolerance, stability threshold) lives
    // with the tracker itself.
    let sample_interval = secs_f32(tracker.sample_interval_s);
    let angle_tracker = AngleTracker::new(tracker)?;

    // ── Assembly ─────────────────────────────────────────────────────────────
    let clock: Arc<dyn Clock + Send + Sync> = match clock {
        Some(b) => Arc::from(b),
        None => Arc::new(MonotonicClock::new()),
    };
    let epoch = clock.now();

    Ok(SupervisorCore {
        sensor,
        session: MotorSession::new(motor),
        tracker: angle_tracker,
        oscillator: BootstrapOscillator::new(bootstrap),
        stabilizer: StabilizingController::new(pid, &schedule, tracker.sample_interval_s),
        safety,
        timeouts,
        trial,
        clock,
        epoch,
        sample_interval,
        stop_check,
        recorder,
        phase: ControlPhase::Calibrating,
        sensor_failures: 0,
        last_angle_deg: 0.0,
    })
}

impl<S, M> SupervisorBuilder<S, M> {
    /// Fallible build available in any type-state; returns a detailed error
    /// for missing pieces.
    pub fn try_build(self) -> Result<Supervisor> {
        let sensor = self
            .sensor
            .ok_or_else(|| eyre::Report::new(BuildError::MissingSensor))?;
        let motor = self
            .motor
            .ok_or_else(|| eyre::Report::new(BuildError::MissingMotor))?;

        let inner = validate_and_build(
            sensor,
            motor,
            self.tracker.unwrap_or_default(),
            self.pid.unwrap_or_default(),
            self.schedule.unwrap_or_default(),
            self.bootstrap.unwrap_or_default(),
            self.safety.unwrap_or_default(),
            self.timeouts.unwrap_or_default(),
            self.trial.unwrap_or_default(),
            self.stop_check,
            self.recorder,
            self.clock,
        )?;

        Ok(Supervisor { inner })
    }
}

/// Chainable setters that do not affect type-state.
impl<S, M> SupervisorBuilder<S, M> {
    pub fn with_tracker(mut self, tracker: TrackerCfg) -> Self {
        self.tracker = Some(tracker);
        self
    }
    pub fn with_pid(mut self, pid: PidCfg) -> Self {
        self.pid = Some(pid);
        self
    }
    pub fn with_schedule(mut self, schedule: ScheduleCfg) -> Self {
        self.schedule = Some(schedule);
        self
    }
    pub fn with_bootstrap(mut self, bootstrap: BootstrapCfg) -> Self {
        self.bootstrap = Some(bootstrap);
        self
    }
    pub fn with_safety(mut self, safety: SafetyCfg) -> Self {
        self.safety = Some(safety);
        self
    }
    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = Some(timeouts);
        self
    }
    pub fn with_trial(mut self, trial: TrialCfg) -> Self {
        self.trial = Some(trial);
        self
    }
    /// External stop signal, polled at every suspension point.
    pub fn with_stop_check<F>(mut self, f: F) -> Self
    where
        F: Fn() -> bool + 'static,
    {
        self.stop_check = Some(Box::new(f));
        self
    }
    /// Observability hook; never required for correctness.
    pub fn with_recorder(mut self, recorder: impl Recorder + 'static) -> Self {
        self.recorder = Some(Box::new(recorder));
        self
    }
    /// Provide a custom clock; defaults to `MonotonicClock` when absent.
    pub fn with_clock(mut self, clock: Box<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }
}

// Setters that advance type-state
impl<M> SupervisorBuilder<Missing, M> {
    pub fn with_sensor(self, sensor: impl AngleSensor + 'static) -> SupervisorBuilder<Set, M> {
        SupervisorBuilder {
            sensor: Some(Box::new(sensor)),
            motor: self.motor,
            tracker: self.tracker,
            pid: self.pid,
            schedule: self.schedule,
            bootstrap: self.bootstrap,
            safety: self.safety,
            timeouts: self.timeouts,
            trial: self.trial,
            stop_check: self.stop_check,
            recorder: self.recorder,
            clock: self.clock,
            _s: PhantomData,
            _m: PhantomData,
        }
    }
}

impl<S> SupervisorBuilder<S, Missing> {
    pub fn with_motor(self, motor: impl MotorPort + 'static) -> SupervisorBuilder<S, Set> {
        SupervisorBuilder {
            sensor: self.sensor,
            motor: Some(Box::new(motor)),
            tracker: self.tracker,
            pid: self.pid,
            schedule: self.schedule,
            bootstrap: self.bootstrap,
            safety: self.safety,
            timeouts: self.timeouts,
            trial: self.trial,
            stop_check: self.stop_check,
            recorder: self.recorder,
            clock: self.clock,
            _s: PhantomData,
            _m: PhantomData,
        }
    }
}

impl SupervisorBuilder<Set, Set> {
    /// Validate and build. Only available once sensor and motor are set.
    pub fn build(self) -> Result<Supervisor> {
        self.try_build()
    }
}

/// Generic, statically-dispatched alias over the unified core.
pub type SupervisorG<S, M> = SupervisorCore<S, M>;

/// Build a generic, statically-dispatched `SupervisorG` from concrete sensor
/// and motor.
///
/// Delegates to the shared `validate_and_build` — no duplicated validation.
#[allow(clippy::too_many_arguments)]
pub fn build_supervisor<S, M>(
    sensor: S,
    motor: M,
    tracker: TrackerCfg,
    pid: PidCfg,
    schedule: ScheduleCfg,
    bootstrap: BootstrapCfg,
    safety: SafetyCfg,
    timeouts: Timeouts,
    trial: TrialCfg,
    stop_check: Option<Box<dyn Fn() -> bool>>,
    recorder: Option<Box<dyn Recorder>>,
    clock: Option<Box<dyn Clock + Send + Sync>>,
) -> Result<SupervisorG<S, M>>
where
    S: AngleSensor + 'static,
    M: MotorPort + 'static,
{
    validate_and_build(
        sensor, motor, tracker, pid, schedule, bootstrap, safety, timeouts, trial, stop_check,
        recorder, clock,
    )
}
