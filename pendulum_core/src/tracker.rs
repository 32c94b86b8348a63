//! Multi-turn angle estimation from wrap-prone 14-bit raw samples.
//!
//! Owns every piece of unwrap state (last raw sample, turn counter, rest
//! position, stability counter) so nothing lives in process-wide globals.
//! Pure state machine: no I/O, no clock.

use crate::config::TrackerCfg;
use crate::error::{BuildError, Result};
use crate::util::{HALF_RANGE, RAW_FULL_SCALE, round_centi_deg, wrap_deg};

pub struct AngleTracker {
    cfg: TrackerCfg,
    stable_count_threshold: u32,
    last_raw: u16,
    total_rotations: i32,
    rest_position: f32,
    stable_count: u32,
}

impl core::fmt::Debug for AngleTracker {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AngleTracker")
            .field("total_rotations", &self.total_rotations)
            .field("rest_position", &self.rest_position)
            .field("stable_count", &self.stable_count)
            .finish()
    }
}

impl AngleTracker {
    /// Validate the configuration and start tracking from raw zero. Call
    /// [`recalibrate`](Self::recalibrate) once a trustworthy rest sample
    /// exists (the supervisor does this after the settle delay).
    pub fn new(cfg: TrackerCfg) -> Result<Self> {
        if !(cfg.gear_ratio.is_finite() && cfg.gear_ratio > 0.0) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "gear_ratio must be finite and > 0",
            )));
        }
        if !cfg.phase_offset_deg.is_finite() {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "phase_offset_deg must be finite",
            )));
        }
        if !(cfg.error_tolerance_deg.is_finite() && cfg.error_tolerance_deg > 0.0) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "error_tolerance_deg must be finite and > 0",
            )));
        }
        if !(cfg.stable_duration_s.is_finite() && cfg.stable_duration_s > 0.0) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "stable_duration_s must be finite and > 0",
            )));
        }
        if !(cfg.sample_interval_s.is_finite() && cfg.sample_interval_s > 0.0) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "sample_interval_s must be finite and > 0",
            )));
        }
        let threshold = (cfg.stable_duration_s / cfg.sample_interval_s).round();
        if !(threshold.is_finite() && threshold >= 1.0) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "stable_duration_s / sample_interval_s must be >= 1",
            )));
        }

        let mut tracker = Self {
            cfg,
            stable_count_threshold: threshold as u32,
            last_raw: 0,
            total_rotations: 0,
            rest_position: 0.0,
            stable_count: 0,
        };
        tracker.rest_position = tracker.scale_and_offset(0);
        Ok(tracker)
    }

    /// Map a raw sample to a scaled sensor angle in `[0, 360)` degrees.
    fn scale_and_offset(&self, raw: u16) -> f32 {
        let deg =
            (f32::from(raw) / f32::from(RAW_FULL_SCALE)) * 360.0 / self.cfg.gear_ratio;
        wrap_deg(deg + self.cfg.phase_offset_deg)
    }

    /// Re-zero on a fresh raw sample: the rig is assumed stationary at its
    /// physical equilibrium. Clears the turn counter and stability state.
    pub fn recalibrate(&mut self, raw: u16) {
        self.rest_position = self.scale_and_offset(raw);
        self.last_raw = raw;
        self.total_rotations = 0;
        self.stable_count = 0;
    }

    /// Fold one raw sample into the estimate; returns the unwrapped angle in
    /// `[0, 360)` degrees, rounded to two decimals for reporting.
    ///
    /// A raw delta beyond half the sensor span is a single wrap; multiple
    /// wraps between consecutive samples are undetectable and out of
    /// contract.
    pub fn update(&mut self, raw: u16) -> f32 {
        let current_angle = self.scale_and_offset(raw);
        let delta = i32::from(raw) - i32::from(self.last_raw);
        if delta > HALF_RANGE {
            self.total_rotations += 1;
        } else if delta < -HALF_RANGE {
            self.total_rotations -= 1;
        }
        self.last_raw = raw;

        let mut total_angle = round_centi_deg(wrap_deg(
            self.total_rotations as f32 * 180.0 + current_angle - self.rest_position,
        ));

        if total_angle.abs() < self.cfg.error_tolerance_deg {
            self.stable_count += 1;
            if self.stable_count >= self.stable_count_threshold {
                self.rest_position = current_angle;
                self.stable_count = 0;
                total_angle = 0.0;
                tracing::info!(
                    rest_position = self.rest_position,
                    "recalibrated rest position"
                );
            }
        } else {
            self.stable_count = 0;
        }

        total_angle
    }

    pub fn total_rotations(&self) -> i32 {
        self.total_rotations
    }

    pub fn rest_position(&self) -> f32 {
        self.rest_position
    }

    pub fn stable_count(&self) -> u32 {
        self.stable_count
    }

    pub fn stable_count_threshold(&self) -> u32 {
        self.stable_count_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> AngleTracker {
        AngleTracker::new(TrackerCfg::default()).expect("default cfg is valid")
    }

    #[test]
    fn scaling_matches_the_rig_calibration() {
        // gear 8, +90 offset: full scale maps to one 45 degree sector.
        let t = tracker();
        assert!((t.scale_and_offset(0) - 90.0).abs() < 1e-3);
        assert!((t.scale_and_offset(RAW_FULL_SCALE) - 135.0).abs() < 1e-3);
    }

    #[test]
    fn threshold_comes_from_duration_over_interval() {
        let t = tracker();
        assert_eq!(t.stable_count_threshold(), 300);
    }

    #[test]
    fn rejects_degenerate_intervals() {
        let cfg = TrackerCfg {
            sample_interval_s: 0.0,
            ..TrackerCfg::default()
        };
        assert!(AngleTracker::new(cfg).is_err());

        let cfg = TrackerCfg {
            gear_ratio: -8.0,
            ..TrackerCfg::default()
        };
        assert!(AngleTracker::new(cfg).is_err());
    }

    #[test]
    fn recalibrate_rezeros_the_estimate() {
        let mut t = tracker();
        t.update(4_000);
        t.recalibrate(4_000);
        assert_eq!(t.total_rotations(), 0);
        assert_eq!(t.stable_count(), 0);
        assert_eq!(t.update(4_000), 0.0);
    }
}
