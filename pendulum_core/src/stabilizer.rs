//! Closed-loop stabilizing controller: amplitude-ramped target selection
//! feeding the PID-with-damping law.
//!
//! The per-cycle math is I/O-free; the supervisor owns sensor and motor
//! traffic around it. Each call maps (angle, shaft velocity, now) to a
//! clamped velocity command plus a segment event.

use crate::config::{PidCfg, ScheduleCfg};
use crate::pid::PidState;
use crate::schedule::AmplitudeSchedule;

/// How the current target-approach segment ended, if it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentEvent {
    InProgress,
    /// Angle entered the capture radius around the target.
    Captured,
    /// Segment exceeded its timeout; the schedule advances anyway so a
    /// missed target cannot stall the ramp indefinitely.
    TimedOut,
}

/// One cycle's worth of output.
#[derive(Debug, Clone, Copy)]
pub struct StabilizeStep {
    pub target_deg: f32,
    /// Velocity command, already clamped.
    pub command: f32,
    pub event: SegmentEvent,
}

pub struct StabilizingController {
    pid: PidState,
    schedule: AmplitudeSchedule,
    capture_radius_deg: f32,
    segment_timeout_ms: u64,
    sample_interval_s: f32,
    segment_started_ms: Option<u64>,
}

impl StabilizingController {
    pub fn new(pid: PidCfg, schedule: &ScheduleCfg, sample_interval_s: f32) -> Self {
        Self {
            pid: PidState::new(pid),
            schedule: AmplitudeSchedule::new(schedule),
            capture_radius_deg: schedule.capture_radius_deg,
            segment_timeout_ms: schedule.segment_timeout_ms,
            sample_interval_s,
            segment_started_ms: None,
        }
    }

    /// One control cycle. On capture or timeout the schedule advances and
    /// the next call starts a fresh segment.
    pub fn step(&mut self, angle_deg: f32, shaft_velocity: f32, now_ms: u64) -> StabilizeStep {
        let started_ms = *self.segment_started_ms.get_or_insert(now_ms);
        let target_deg = self.schedule.target_deg();

        let error = target_deg - angle_deg;
        let command = self.pid.step(error, self.sample_interval_s, shaft_velocity);

        let event = if (angle_deg - target_deg).abs() < self.capture_radius_deg {
            SegmentEvent::Captured
        } else if now_ms.saturating_sub(started_ms) > self.segment_timeout_ms {
            SegmentEvent::TimedOut
        } else {
            SegmentEvent::InProgress
        };

        if event != SegmentEvent::InProgress {
            self.schedule.advance();
            self.segment_started_ms = None;
        }

        StabilizeStep {
            target_deg,
            command,
            event,
        }
    }

    pub fn schedule(&self) -> &AmplitudeSchedule {
        &self.schedule
    }

    pub fn pid(&self) -> &PidState {
        &self.pid
    }
}
