//! Common angle/time helpers for pendulum_core.

use std::time::Duration;

/// Full-scale raw sample of the 14-bit sensor.
pub const RAW_FULL_SCALE: u16 = 16_383;
/// Half of the 14-bit span; a raw delta beyond this is a wrap.
pub const HALF_RANGE: i32 = 8_191;

/// Reduce an angle into `[0, 360)` degrees.
#[inline]
pub fn wrap_deg(x: f32) -> f32 {
    x.rem_euclid(360.0)
}

/// Round to two decimals. Reporting convenience only.
#[inline]
pub fn round_centi_deg(x: f32) -> f32 {
    (x * 100.0).round() / 100.0
}

/// Seconds (f32 config value) to a `Duration`, clamping negatives to zero.
#[inline]
pub fn secs_f32(s: f32) -> Duration {
    if s.is_finite() && s > 0.0 {
        Duration::from_secs_f32(s)
    } else {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_reduces_into_domain() {
        assert!((wrap_deg(361.5) - 1.5).abs() < 1e-4);
        assert!((wrap_deg(-90.0) - 270.0).abs() < 1e-4);
        assert_eq!(wrap_deg(0.0), 0.0);
    }

    #[test]
    fn rounding_is_two_decimals() {
        assert_eq!(round_centi_deg(12.345), 12.35);
        assert_eq!(round_centi_deg(-0.004), -0.0);
    }

    #[test]
    fn non_finite_seconds_clamp_to_zero() {
        assert_eq!(secs_f32(f32::NAN), Duration::ZERO);
        assert_eq!(secs_f32(-1.0), Duration::ZERO);
        assert_eq!(secs_f32(0.5), Duration::from_millis(500));
    }
}
