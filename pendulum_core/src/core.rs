//! The control supervisor (`SupervisorCore`).
//!
//! Sequences the session through Calibrating, Bootstrap, Stabilizing, and
//! ShuttingDown on a single cooperative thread. Every cycle runs strictly
//! read -> compute -> command; the only suspension points are the timed
//! sleeps and the blocking velocity query.

use std::sync::Arc;
use std::time::{Duration, Instant};

use pendulum_traits::clock::Clock;
use pendulum_traits::{AngleSensor, MotorPort, Recorder};

use crate::bootstrap::{BootstrapOscillator, BootstrapOutcome};
use crate::config::{SafetyCfg, Timeouts, TrialCfg};
use crate::error::{ControlError, Result};
use crate::hw_error::map_transport_error;
use crate::session::MotorSession;
use crate::stabilizer::{SegmentEvent, StabilizingController};
use crate::status::{ControlPhase, SessionOutcome};
use crate::tracker::AngleTracker;

/// Result of one bounded sensor read attempt.
enum ReadOutcome {
    Sample(u16),
    /// Tolerable transient failure; the cycle is skipped.
    Skipped,
}

/// Unified supervisor for both dynamic (boxed) and generic (static dispatch)
/// variants.
pub struct SupervisorCore<S: AngleSensor, M: MotorPort> {
    pub(crate) sensor: S,
    pub(crate) session: MotorSession<M>,
    pub(crate) tracker: AngleTracker,
    pub(crate) oscillator: BootstrapOscillator,
    pub(crate) stabilizer: StabilizingController,
    pub(crate) safety: SafetyCfg,
    pub(crate) timeouts: Timeouts,
    pub(crate) trial: TrialCfg,
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
    pub(crate) epoch: Instant,
    pub(crate) sample_interval: Duration,
    pub(crate) stop_check: Option<Box<dyn Fn() -> bool>>,
    pub(crate) recorder: Option<Box<dyn Recorder>>,
    pub(crate) phase: ControlPhase,
    pub(crate) sensor_failures: u32,
    pub(crate) last_angle_deg: f32,
}

impl<S: AngleSensor, M: MotorPort> core::fmt::Debug for SupervisorCore<S, M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SupervisorCore")
            .field("phase", &self.phase)
            .field("trial_id", &self.trial.trial_id)
            .field("last_angle_deg", &self.last_angle_deg)
            .finish()
    }
}

impl<S: AngleSensor, M: MotorPort> SupervisorCore<S, M> {
    pub fn phase(&self) -> ControlPhase {
        self.phase
    }

    /// Last reported angle estimate, degrees.
    pub fn last_angle(&self) -> f32 {
        self.last_angle_deg
    }

    /// Drive the session to completion. On every exit path, faulted or not,
    /// the motor is left at zero velocity and the session is released.
    pub fn run(&mut self) -> Result<SessionOutcome> {
        self.epoch = self.clock.now();
        let outcome = self.run_phases();
        self.enter_phase(ControlPhase::ShuttingDown);
        let released = self.session.release();
        match outcome {
            Ok(o) => {
                released?;
                tracing::info!(outcome = ?o, "session closed");
                Ok(o)
            }
            Err(e) => {
                if let Err(re) = released {
                    tracing::warn!(error = %re, "session release failed after fault");
                }
                tracing::error!(error = %e, "session aborted");
                Err(e)
            }
        }
    }

    fn run_phases(&mut self) -> Result<SessionOutcome> {
        self.session.open()?;

        // Calibrating: settle, then take the rest position from one sample.
        self.enter_phase(ControlPhase::Calibrating);
        self.clock
            .sleep(Duration::from_millis(self.trial.settle_delay_ms));
        if self.stop_requested() {
            return Ok(SessionOutcome::Stopped);
        }
        let raw = self.read_raw_blocking()?;
        self.tracker.recalibrate(raw);
        tracing::info!(
            rest_position = self.tracker.rest_position(),
            "rest position initialized"
        );

        // Bootstrap: open-loop energy injection.
        self.enter_phase(ControlPhase::Bootstrap);
        let stop = self.stop_check.take();
        let never: fn() -> bool = || false;
        let stop_fn: &dyn Fn() -> bool = match &stop {
            Some(f) => f.as_ref(),
            None => &never,
        };
        let outcome = self
            .oscillator
            .run(&mut self.session, self.clock.as_ref(), stop_fn);
        self.stop_check = stop;
        if outcome? == BootstrapOutcome::Interrupted {
            return Ok(SessionOutcome::Stopped);
        }

        // Stabilizing: the intended steady state.
        self.enter_phase(ControlPhase::Stabilizing);
        loop {
            if self.stop_requested() {
                return Ok(SessionOutcome::Stopped);
            }
            if self.safety.max_run_ms > 0
                && self.clock.ms_since(self.epoch) >= self.safety.max_run_ms
            {
                tracing::info!(max_run_ms = self.safety.max_run_ms, "runtime cap reached");
                return Ok(SessionOutcome::RuntimeCapped);
            }

            let raw = match self.read_raw_once()? {
                ReadOutcome::Sample(r) => r,
                ReadOutcome::Skipped => {
                    self.clock.sleep(self.sample_interval);
                    continue;
                }
            };

            let angle = self.tracker.update(raw);
            self.last_angle_deg = angle;

            let shaft_velocity = self.session.get_velocity()?;
            let now_ms = self.clock.ms_since(self.epoch);
            let step = self.stabilizer.step(angle, shaft_velocity, now_ms);
            self.session.set_velocity(step.command)?;

            if let Some(rec) = &mut self.recorder {
                rec.record(self.trial.trial_id, now_ms, step.target_deg, angle);
            }
            match step.event {
                SegmentEvent::Captured => {
                    tracing::debug!(target_deg = step.target_deg, "target captured");
                }
                SegmentEvent::TimedOut => {
                    tracing::debug!(target_deg = step.target_deg, "segment timed out, advancing");
                }
                SegmentEvent::InProgress => {}
            }
            tracing::trace!(
                angle,
                target_deg = step.target_deg,
                command = step.command,
                "stabilize cycle"
            );

            self.clock.sleep(self.sample_interval);
        }
    }

    fn enter_phase(&mut self, phase: ControlPhase) {
        self.phase = phase;
        tracing::info!(phase = ?phase, "phase transition");
    }

    fn stop_requested(&self) -> bool {
        self.stop_check.as_ref().is_some_and(|f| f())
    }

    /// One sensor read with consecutive-failure accounting. A transient
    /// failure inside the retry bound yields `Skipped`; exhausting the bound
    /// escalates.
    fn read_raw_once(&mut self) -> Result<ReadOutcome> {
        let timeout = Duration::from_millis(self.timeouts.sensor_ms);
        match self.sensor.read_raw(timeout) {
            Ok(raw) => {
                self.sensor_failures = 0;
                Ok(ReadOutcome::Sample(raw))
            }
            Err(e) => {
                let mapped = map_transport_error(&*e);
                self.sensor_failures += 1;
                if self.sensor_failures > self.safety.sensor_retry_limit {
                    tracing::error!(
                        error = %mapped,
                        failures = self.sensor_failures,
                        "sensor retry bound exhausted"
                    );
                    Err(eyre::Report::new(ControlError::SensorRetries(
                        self.sensor_failures,
                    )))
                } else {
                    tracing::warn!(
                        error = %mapped,
                        failures = self.sensor_failures,
                        "sensor read failed, skipping cycle"
                    );
                    Ok(ReadOutcome::Skipped)
                }
            }
        }
    }

    /// Keep reading until a sample arrives or the retry bound is exhausted.
    /// Used where the supervisor cannot proceed without a sample.
    fn read_raw_blocking(&mut self) -> Result<u16> {
        loop {
            match self.read_raw_once()? {
                ReadOutcome::Sample(raw) => return Ok(raw),
                ReadOutcome::Skipped => self.clock.sleep(self.sample_interval),
            }
        }
    }
}
