//! Angle monitoring: stream tracker estimates without commanding the motor.
//!
//! Useful for checking sensor wiring and the rest-position calibration
//! before risking a powered trial.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use eyre::Result;
use pendulum_core::{AngleTracker, TrackerCfg};
use pendulum_traits::AngleSensor;
use pendulum_traits::clock::{Clock, MonotonicClock};

fn open_sensor(cfg: &pendulum_config::Config, sim: bool) -> Result<Box<dyn AngleSensor>> {
    if sim {
        // Monitoring never commands the motor, so the rig stays at rest.
        let (encoder, _motor) = pendulum_hardware::simulated_rig();
        return Ok(Box::new(encoder));
    }

    #[cfg(all(feature = "hardware", target_os = "linux"))]
    {
        use eyre::WrapErr;
        let sensor =
            pendulum_hardware::as5048b::As5048b::new(cfg.hardware.i2c_bus, cfg.hardware.sensor_addr)
                .wrap_err("open as5048b")?;
        return Ok(Box::new(sensor));
    }

    #[cfg(not(all(feature = "hardware", target_os = "linux")))]
    {
        let _ = cfg;
        eyre::bail!("this build has no I2C sensor support; rerun with --sim")
    }
}

pub fn run_monitor(
    cfg: &pendulum_config::Config,
    samples: u64,
    sim: bool,
    shutdown: Arc<AtomicBool>,
) -> Result<()> {
    let tracker_cfg = TrackerCfg::from(&cfg.tracker);
    let interval = Duration::from_secs_f32(tracker_cfg.sample_interval_s);
    let timeout = Duration::from_millis(cfg.timeouts.sensor_ms);
    let retry_limit = cfg.safety.sensor_retry_limit;

    let mut sensor = open_sensor(cfg, sim)?;
    let mut tracker = AngleTracker::new(tracker_cfg)?;
    let clock = MonotonicClock::new();

    // Same settle-then-zero sequence a trial starts with.
    tracing::info!(
        settle_delay_ms = cfg.run.settle_delay_ms,
        "settling before rest-position calibration"
    );
    clock.sleep(Duration::from_millis(cfg.run.settle_delay_ms));
    let raw = sensor
        .read_raw(timeout)
        .map_err(|e| eyre::eyre!("calibration read failed: {e}"))?;
    tracker.recalibrate(raw);
    println!("rest position: {:.2} deg", tracker.rest_position());

    let mut printed = 0u64;
    let mut failures = 0u32;
    while (samples == 0 || printed < samples) && !shutdown.load(Ordering::Relaxed) {
        match sensor.read_raw(timeout) {
            Ok(raw) => {
                failures = 0;
                let angle = tracker.update(raw);
                println!("{angle:8.2} deg");
                printed += 1;
            }
            Err(e) => {
                failures += 1;
                if failures > retry_limit {
                    return Err(eyre::eyre!("sensor failed {failures} consecutive reads: {e}"));
                }
                tracing::warn!(error = %e, failures, "sensor read failed, skipping sample");
            }
        }
        clock.sleep(interval);
    }
    Ok(())
}
