//! Amplitude ramp for stabilizing-phase target selection.
//!
//! Targets alternate around the top of the circle: `amplitude` on one swing,
//! `360 - amplitude` on the other. The amplitude widens each segment until
//! it saturates at the maximum, after which the controller keeps alternating
//! between the two extreme targets as its steady state.

use crate::config::ScheduleCfg;

#[derive(Debug, Clone)]
pub struct AmplitudeSchedule {
    current_amplitude: f32,
    amplitude_step: f32,
    max_amplitude: f32,
    direction: i8,
}

impl AmplitudeSchedule {
    pub fn new(cfg: &ScheduleCfg) -> Self {
        Self {
            current_amplitude: cfg.initial_amplitude_deg,
            amplitude_step: cfg.amplitude_step_deg,
            max_amplitude: cfg.max_amplitude_deg,
            direction: 1,
        }
    }

    /// Target for the current segment, degrees in `[0, 360)`.
    pub fn target_deg(&self) -> f32 {
        if self.direction > 0 {
            self.current_amplitude
        } else {
            360.0 - self.current_amplitude
        }
    }

    /// End the current segment: flip swing direction, widen the amplitude
    /// until it saturates, then hold.
    pub fn advance(&mut self) {
        self.direction = -self.direction;
        if self.current_amplitude < self.max_amplitude {
            self.current_amplitude =
                (self.current_amplitude + self.amplitude_step).min(self.max_amplitude);
        }
    }

    pub fn saturated(&self) -> bool {
        self.current_amplitude >= self.max_amplitude
    }

    pub fn current_amplitude(&self) -> f32 {
        self.current_amplitude
    }

    pub fn direction(&self) -> i8 {
        self.direction
    }
}
