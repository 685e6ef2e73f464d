// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sorting conveyor daemon (sorterd)
//!
//! Runs one conveyor session against the simulated conveyor until it is
//! signalled, its run time elapses, or a task fails.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod lifecycle;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use sorter_core::Lane;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

use crate::lifecycle::{Config, LifecycleError, Overrides};

#[derive(Parser)]
#[command(
    name = "sorterd",
    version,
    about = "Two-lane sorting conveyor controller"
)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the simulated item stream
    #[arg(long)]
    seed: Option<u64>,

    /// Use the fallback timing constants instead of calibrating
    #[arg(long)]
    skip_calibration: bool,

    /// Stop after this long, e.g. "30s" or "5m"
    #[arg(long, value_parser = humantime::parse_duration)]
    run_for: Option<Duration>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config::load(
        cli.config.as_deref(),
        Overrides {
            seed: cli.seed,
            skip_calibration: cli.skip_calibration,
            run_for: cli.run_for,
        },
    )?;

    let _log_guard = setup_logging(&config)?;
    info!(config = ?cli.config, "starting sorterd");

    let mut daemon = lifecycle::startup(&config)?;

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    // Signal ready for a supervising parent process
    println!("READY");

    let run_for = async {
        match config.daemon.run_for {
            Some(limit) => tokio::time::sleep(limit).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(run_for);

    let mut status = tokio::time::interval(config.daemon.status_interval);
    // First tick completes immediately
    status.tick().await;

    let finished = loop {
        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down...");
                break None;
            }
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down...");
                break None;
            }
            _ = &mut run_for => {
                info!("Run time elapsed, shutting down...");
                break None;
            }
            _ = status.tick() => daemon.log_status(),
            result = daemon.wait() => {
                error!("Conveyor session ended without a shutdown request");
                break Some(result);
            }
        }
    };

    let summary = match finished {
        Some(result) => result?,
        None => daemon.shutdown().await?,
    };

    for lane in Lane::ALL {
        let counters = summary.lane(lane);
        println!(
            "{}: small={} large={} collected={}",
            lane, counters.small, counters.large, counters.collected
        );
    }
    info!(gate = %summary.gate, "Daemon stopped");
    Ok(())
}

fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let (non_blocking, guard) = match &config.daemon.log_path {
        Some(log_path) => {
            let dir = log_path.parent().ok_or(LifecycleError::InvalidLogPath)?;
            let file = log_path.file_name().ok_or(LifecycleError::InvalidLogPath)?;
            std::fs::create_dir_all(dir)?;
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file))
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(guard)
}
