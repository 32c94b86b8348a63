//! Inverted pendulum balance CLI.

mod balance;
mod cli;
mod error_fmt;
mod monitor;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::cli::{Cli, Commands, FILE_GUARD, JSON_MODE};

fn main() {
    std::process::exit(real_main());
}

fn real_main() -> i32 {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    let _ = color_eyre::install();

    match run(&cli) {
        Ok(()) => 0,
        Err(err) => {
            if JSON_MODE.get().copied().unwrap_or(false) {
                eprintln!("{}", error_fmt::format_error_json(&err));
            } else {
                eprintln!("{}", error_fmt::humanize(&err));
            }
            error_fmt::exit_code_for_error(&err)
        }
    }
}

fn run(cli: &Cli) -> eyre::Result<()> {
    let cfg = pendulum_config::Config::load(&cli.config)?;
    init_tracing(cli, &cfg.logging);

    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::Relaxed);
    })
    .map_err(|e| eyre::eyre!("install ctrl-c handler: {e}"))?;

    match &cli.cmd {
        Commands::Balance {
            trial_id,
            max_run_ms,
            sim,
        } => {
            let outcome = balance::run_balance(&cfg, *trial_id, *max_run_ms, *sim, shutdown)?;
            println!("trial ended: {outcome:?}");
            Ok(())
        }
        Commands::Monitor { samples, sim } => monitor::run_monitor(&cfg, *samples, *sim, shutdown),
    }
}

/// Console logging per `--log-level`/`RUST_LOG`; optional JSON-lines file
/// sink per `[logging]` in the config.
fn init_tracing(cli: &Cli, logging: &pendulum_config::Logging) {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone()));

    let file_layer = logging.file.as_ref().map(|path| {
        let path = std::path::Path::new(path);
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => std::path::Path::new("."),
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "pendulum.log".to_string());
        let appender = tracing_appender::rolling::never(dir, name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        let filter = EnvFilter::new(logging.level.clone().unwrap_or_else(|| "debug".to_string()));
        fmt::layer().json().with_writer(writer).with_filter(filter)
    });

    if cli.json {
        tracing_subscriber::registry()
            .with(file_layer)
            .with(fmt::layer().json().with_filter(console_filter))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(file_layer)
            .with(fmt::layer().with_filter(console_filter))
            .init();
    }
}
