//! Human-readable error descriptions and structured JSON error formatting.

use pendulum_core::error::{BuildError, ControlError};

/// Map an eyre::Report to a human-readable explanation with likely causes
/// and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingSensor => {
                "What happened: No angle sensor was provided to the supervisor.\nLikely causes: Sensor failed to initialize or was not wired into the builder.\nHow to fix: Ensure the encoder opens successfully and is passed via with_sensor(...).".to_string()
            }
            BuildError::MissingMotor => {
                "What happened: No motor port was provided to the supervisor.\nLikely causes: Drive transport failed to initialize or was not wired into the builder.\nHow to fix: Ensure the motor port is created successfully and passed via with_motor(...).".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun."
            ),
        };
    }

    if let Some(ce) = err.downcast_ref::<ControlError>() {
        return match ce {
            ControlError::SensorTimeout | ControlError::Transport(_) => format!(
                "What happened: The angle sensor stopped answering ({ce}).\nLikely causes: I2C wiring or power, or a timeout configured too low.\nHow to fix: Check the sensor bus and raise timeouts.sensor_ms if reads are slow."
            ),
            ControlError::SensorRetries(n) => format!(
                "What happened: The angle sensor failed {n} reads in a row and the trial was aborted.\nLikely causes: Loose wiring, bus contention, or a powered-down sensor.\nHow to fix: Fix the sensor connection; adjust safety.sensor_retry_limit if spurious."
            ),
            ControlError::DeviceFault(msg) => format!(
                "What happened: The drive reported a fault ({msg}); the motor was stopped.\nLikely causes: Drive error state, refused closed-loop entry, or power loss.\nHow to fix: Clear drive errors and check the motor supply before rerunning."
            ),
            ControlError::State(msg) => format!(
                "What happened: {msg}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug for more detail."
            ),
        };
    }

    // String-based heuristics for errors coming from init or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("config") {
        return format!(
            "What happened: The configuration could not be loaded ({msg}).\nLikely causes: Missing file, TOML syntax error, or out-of-range values.\nHow to fix: Check the --config path and the reported field."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Map errors to stable exit codes: 2 = configuration, 3 = sensor,
/// 4 = device fault, 1 = everything else.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<BuildError>().is_some() {
        return 2;
    }
    if let Some(ce) = err.downcast_ref::<ControlError>() {
        return match ce {
            ControlError::Transport(_)
            | ControlError::SensorTimeout
            | ControlError::SensorRetries(_) => 3,
            ControlError::DeviceFault(_) => 4,
            ControlError::State(_) => 1,
        };
    }
    if err.to_string().to_ascii_lowercase().contains("config") {
        return 2;
    }
    1
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    let reason = if let Some(be) = err.downcast_ref::<BuildError>() {
        match be {
            BuildError::MissingSensor => "MissingSensor",
            BuildError::MissingMotor => "MissingMotor",
            BuildError::InvalidConfig(_) => "InvalidConfig",
        }
    } else if let Some(ce) = err.downcast_ref::<ControlError>() {
        match ce {
            ControlError::Transport(_) => "Transport",
            ControlError::SensorTimeout => "SensorTimeout",
            ControlError::SensorRetries(_) => "SensorRetries",
            ControlError::DeviceFault(_) => "DeviceFault",
            ControlError::State(_) => "State",
        }
    } else {
        "Error"
    };

    json!({ "reason": reason, "message": humanize(err) }).to_string()
}
