// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle: configuration, startup, shutdown.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use sorter_adapters::{
    SimulatedConveyor, TracedGateAdapter, TracedMotorAdapter, TracedSensorAdapter,
};
use sorter_core::{ConfigError, SorterConfig};
use sorter_engine::{Conveyor, ConveyorDeps, ConveyorHandle, EngineError, SessionSummary};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::info;

/// Conveyor with concrete adapter types (wrapped with tracing)
pub type DaemonConveyor = Conveyor<
    TracedSensorAdapter<SimulatedConveyor>,
    TracedGateAdapter<SimulatedConveyor>,
    TracedMotorAdapter<SimulatedConveyor>,
>;

/// Daemon-only settings, the `[daemon]` table of the config file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DaemonSettings {
    /// Log file; stderr when unset
    pub log_path: Option<PathBuf>,
    /// Stop after this long; run until signalled when unset
    #[serde(with = "humantime_serde")]
    pub run_for: Option<Duration>,
    /// How often counter totals are logged
    #[serde(with = "humantime_serde")]
    pub status_interval: Duration,
}

impl Default for DaemonSettings {
    fn default() -> Self {
        Self {
            log_path: None,
            run_for: None,
            status_interval: Duration::from_secs(10),
        }
    }
}

/// Command-line settings that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub seed: Option<u64>,
    pub skip_calibration: bool,
    pub run_for: Option<Duration>,
}

/// Daemon configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub sorter: SorterConfig,
    pub daemon: DaemonSettings,
}

impl Config {
    /// Load the config file (if any) and apply command-line overrides
    pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<Self, LifecycleError> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|source| {
                    ConfigError::Read {
                        path: path.to_path_buf(),
                        source,
                    }
                })?;
                Self::parse(&content)?
            }
            None => Self {
                sorter: SorterConfig::default(),
                daemon: DaemonSettings::default(),
            },
        };

        if let Some(seed) = overrides.seed {
            config.sorter.simulation.seed = seed;
        }
        if overrides.skip_calibration {
            config.sorter.calibration.enabled = false;
        }
        if overrides.run_for.is_some() {
            config.daemon.run_for = overrides.run_for;
        }
        config.validate()?;
        Ok(config)
    }

    /// Parse a config document: conveyor tables plus an optional `[daemon]`
    pub fn parse(content: &str) -> Result<Self, LifecycleError> {
        let mut table: toml::Table = toml::from_str(content).map_err(ConfigError::from)?;
        let daemon = match table.remove("daemon") {
            Some(value) => value
                .try_into::<DaemonSettings>()
                .map_err(ConfigError::from)?,
            None => DaemonSettings::default(),
        };
        let sorter: SorterConfig = toml::Value::Table(table)
            .try_into()
            .map_err(ConfigError::from)?;
        Ok(Self { sorter, daemon })
    }

    fn validate(&self) -> Result<(), LifecycleError> {
        self.sorter.validate()?;
        if self.daemon.status_interval.is_zero() {
            return Err(ConfigError::Invalid {
                field: "daemon.status_interval",
                reason: "must be non-zero".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Errors that can occur during daemon lifecycle
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("log path has no parent directory or file name")]
    InvalidLogPath,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("conveyor error: {0}")]
    Engine(#[from] EngineError),

    #[error("conveyor thread failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// A running conveyor session
pub struct Daemon {
    pub handle: ConveyorHandle,
    sim: SimulatedConveyor,
    runner: JoinHandle<Result<SessionSummary, EngineError>>,
}

/// Build the conveyor over the simulation and start its session
pub fn startup(config: &Config) -> Result<Daemon, LifecycleError> {
    let sim = SimulatedConveyor::new(config.sorter.simulation.clone());
    let conveyor: DaemonConveyor = Conveyor::new(
        ConveyorDeps {
            sensors: TracedSensorAdapter::new(sim.clone()),
            gate: TracedGateAdapter::new(sim.clone()),
            motor: TracedMotorAdapter::new(sim.clone()),
        },
        config.sorter.clone(),
    )?;
    let handle = conveyor.handle();
    info!(
        session = %handle.session_id(),
        seed = config.sorter.simulation.seed,
        calibration = config.sorter.calibration.enabled,
        "conveyor starting"
    );

    // Blocking control loop; its tasks run on their own threads
    let runner = tokio::task::spawn_blocking(move || conveyor.run());

    Ok(Daemon {
        handle,
        sim,
        runner,
    })
}

impl Daemon {
    /// Log counter totals and simulation progress
    pub fn log_status(&self) {
        let totals = self.handle.totals();
        let stats = self.sim.stats();
        info!(
            small = totals.small,
            large = totals.large,
            collected = totals.collected,
            gate = %self.handle.gate_state(),
            lost = stats.lost,
            "status"
        );
    }

    /// Wait for the session to end on its own
    pub async fn wait(&mut self) -> Result<SessionSummary, LifecycleError> {
        Ok((&mut self.runner).await??)
    }

    /// Request shutdown and wait for every task to stop
    pub async fn shutdown(mut self) -> Result<SessionSummary, LifecycleError> {
        self.handle.trigger_shutdown();
        self.wait().await
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
