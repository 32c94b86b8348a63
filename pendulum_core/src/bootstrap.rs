//! Open-loop energy injection: alternating velocity pulses with a
//! log-decaying dwell schedule.
//!
//! A pendulum at rest cannot be driven into the stabilizing controller's
//! capture region by a linear law alone; bounded open-loop pumping injects
//! the energy first. The dwell shrinks as velocity builds, approximating
//! resonant pumping, and one trailing pulse pair at a tuned dwell lands the
//! final push in phase with the swing.

use std::time::Duration;

use pendulum_traits::{Clock, MotorPort};

use crate::config::BootstrapCfg;
use crate::error::Result;
use crate::session::MotorSession;
use crate::util::secs_f32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Completed,
    /// Stop signal observed at a suspension point; the supervisor shuts down.
    Interrupted,
}

pub struct BootstrapOscillator {
    cfg: BootstrapCfg,
}

impl BootstrapOscillator {
    pub fn new(cfg: BootstrapCfg) -> Self {
        Self { cfg }
    }

    /// Dwell for pulse `i`: `base - tuning * ln(i + 1)`, floored at the
    /// configured minimum. Non-increasing in `i`.
    pub fn dwell(&self, i: u32) -> Duration {
        let secs = (self.cfg.base_dwell_s - self.cfg.tuning_factor * ((i + 1) as f32).ln())
            .max(self.cfg.min_dwell_s);
        secs_f32(secs)
    }

    /// Run the pulse train. Suspends at every dwell; observes `stop` at each
    /// suspension point. Concludes with a zero-velocity command on normal
    /// completion (interruption leaves the final zero to session release).
    pub fn run<M: MotorPort>(
        &self,
        session: &mut MotorSession<M>,
        clock: &dyn Clock,
        stop: &dyn Fn() -> bool,
    ) -> Result<BootstrapOutcome> {
        for i in 0..self.cfg.pulse_count {
            let dwell = self.dwell(i);
            tracing::debug!(pulse = i, dwell_ms = dwell.as_millis() as u64, "bootstrap pulse");
            if self.pulse_pair(session, clock, stop, dwell)? {
                return Ok(BootstrapOutcome::Interrupted);
            }
        }

        // Trailing pulse pair at the tuned dwell.
        let final_dwell = secs_f32(self.cfg.final_dwell_s);
        tracing::debug!(
            dwell_ms = final_dwell.as_millis() as u64,
            "bootstrap final pulse"
        );
        if self.pulse_pair(session, clock, stop, final_dwell)? {
            return Ok(BootstrapOutcome::Interrupted);
        }

        session.set_velocity(0.0)?;
        Ok(BootstrapOutcome::Completed)
    }

    /// One reverse/forward pulse pair. Returns true if interrupted.
    fn pulse_pair<M: MotorPort>(
        &self,
        session: &mut MotorSession<M>,
        clock: &dyn Clock,
        stop: &dyn Fn() -> bool,
        dwell: Duration,
    ) -> Result<bool> {
        if stop() {
            return Ok(true);
        }
        session.set_velocity(-self.cfg.peak_velocity)?;
        clock.sleep(dwell);

        if stop() {
            return Ok(true);
        }
        session.set_velocity(self.cfg.peak_velocity)?;
        clock.sleep(dwell);

        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dwell_is_non_increasing_and_floored() {
        let osc = BootstrapOscillator::new(BootstrapCfg {
            base_dwell_s: 0.5,
            min_dwell_s: 0.1,
            tuning_factor: 0.12,
            ..BootstrapCfg::default()
        });
        let mut prev = osc.dwell(0);
        assert_eq!(prev, Duration::from_millis(500));
        for i in 1..200 {
            let d = osc.dwell(i);
            assert!(d <= prev, "dwell must not grow at pulse {i}");
            assert!(d >= Duration::from_millis(100), "dwell floored at pulse {i}");
            prev = d;
        }
        // With a decay this steep the floor is reached well before i = 200.
        assert_eq!(prev, secs_f32(0.1));
    }

    #[test]
    fn zero_tuning_factor_holds_the_base_dwell() {
        let osc = BootstrapOscillator::new(BootstrapCfg {
            tuning_factor: 0.0,
            ..BootstrapCfg::default()
        });
        assert_eq!(osc.dwell(0), osc.dwell(50));
    }
}
