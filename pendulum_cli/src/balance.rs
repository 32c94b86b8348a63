//! Balance-trial execution: config mapping, rig assembly, supervisor run.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use eyre::Result;
use pendulum_core::{
    BootstrapCfg, PidCfg, SafetyCfg, ScheduleCfg, SessionOutcome, Supervisor, Timeouts,
    TrackerCfg, TrialCfg,
};
use pendulum_traits::Recorder;

/// Recorder that streams every stabilizing sample into the log.
pub struct TraceRecorder;

impl Recorder for TraceRecorder {
    fn record(&mut self, trial_id: u32, timestamp_ms: u64, setpoint_deg: f32, estimate_deg: f32) {
        tracing::debug!(trial_id, timestamp_ms, setpoint_deg, estimate_deg, "trial sample");
    }
}

pub fn run_balance(
    cfg: &pendulum_config::Config,
    trial_id_override: Option<u32>,
    max_run_ms_override: Option<u64>,
    sim: bool,
    shutdown: Arc<AtomicBool>,
) -> Result<SessionOutcome> {
    if !sim {
        eyre::bail!(
            "a balance trial needs a motor transport and this build only ships the \
             simulated rig; rerun with --sim"
        );
    }

    let mut trial = TrialCfg::from(&cfg.run);
    if let Some(id) = trial_id_override {
        trial.trial_id = id;
    }
    let mut safety = SafetyCfg::from(&cfg.safety);
    if let Some(ms) = max_run_ms_override {
        safety.max_run_ms = ms;
    }

    let (encoder, motor) = pendulum_hardware::simulated_rig();

    let mut supervisor = Supervisor::builder()
        .with_sensor(encoder)
        .with_motor(motor)
        .with_tracker(TrackerCfg::from(&cfg.tracker))
        .with_pid(PidCfg::from(&cfg.pid))
        .with_schedule(ScheduleCfg::from(&cfg.schedule))
        .with_bootstrap(BootstrapCfg::from(&cfg.bootstrap))
        .with_safety(safety)
        .with_timeouts(Timeouts::from(&cfg.timeouts))
        .with_trial(trial)
        .with_recorder(TraceRecorder)
        .with_stop_check(move || shutdown.load(Ordering::Relaxed))
        .build()?;

    tracing::info!(trial_id = trial.trial_id, sim, "balance trial start");
    let outcome = supervisor.run()?;
    tracing::info!(outcome = ?outcome, "balance trial finished");
    Ok(outcome)
}
