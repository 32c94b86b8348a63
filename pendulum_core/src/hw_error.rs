//! Maps `Box<dyn Error>` from trait boundaries to typed `ControlError`.
//!
//! The traits in `pendulum_traits` use `Box<dyn Error + Send + Sync>` for
//! maximum flexibility; this module converts those to the typed error enum,
//! with an optional feature-gated path for `pendulum_hardware::HwError`
//! downcasting.

use crate::error::ControlError;

/// Map a sensor-boundary error to a typed `ControlError`.
///
/// Attempts to downcast known hardware error types first, then falls back
/// to string-based heuristics.
pub fn map_transport_error(e: &(dyn std::error::Error + 'static)) -> ControlError {
    // Feature-gated: try to downcast to HwError for precise mapping
    #[cfg(feature = "hardware-errors")]
    {
        if let Some(hw) = e.downcast_ref::<pendulum_hardware::error::HwError>() {
            return match hw {
                pendulum_hardware::error::HwError::Timeout => ControlError::SensorTimeout,
                other => ControlError::Transport(other.to_string()),
            };
        }
    }

    // Fallback: string-based detection
    let s = e.to_string();
    if s.to_lowercase().contains("timeout") {
        ControlError::SensorTimeout
    } else {
        ControlError::Transport(s)
    }
}

/// Map a motor-boundary error to a typed `ControlError`. Actuator errors
/// are never transient.
pub fn map_device_error(e: &(dyn std::error::Error + 'static)) -> ControlError {
    ControlError::DeviceFault(e.to_string())
}
