//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "pendulum", version, about = "Inverted pendulum balance CLI")]
pub struct Cli {
    /// Path to config TOML
    #[arg(long, value_name = "FILE", default_value = "etc/pendulum.toml")]
    pub config: PathBuf,

    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a balance trial: calibrate, bootstrap, then stabilize
    Balance {
        /// Trial id recorded with every sample (overrides config)
        #[arg(long)]
        trial_id: Option<u32>,
        /// Override safety: clean-shutdown runtime cap in ms (0 disables)
        #[arg(long, value_name = "MS")]
        max_run_ms: Option<u64>,
        /// Run against the simulated rig. A balance trial needs a motor
        /// transport; this build only ships the simulated one.
        #[arg(long, action = ArgAction::SetTrue)]
        sim: bool,
    },
    /// Stream angle estimates without commanding the motor
    Monitor {
        /// Number of samples to print before exiting (0 = until interrupted)
        #[arg(long, default_value_t = 0)]
        samples: u64,
        /// Read the simulated rig instead of the I2C sensor
        #[arg(long, action = ArgAction::SetTrue)]
        sim: bool,
    },
}
