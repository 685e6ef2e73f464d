// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Conveyor sorter configuration
//!
//! Loaded from TOML. Every field has a default, so an empty document is a
//! valid configuration.

use crate::lane::Lane;
use crate::timing::TimingConstants;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors from loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Top-level configuration for one sorter session
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SorterConfig {
    pub tasks: TaskConfig,
    pub calibration: CalibrationConfig,
    /// Timing used when calibration is disabled
    pub fallback: TimingConstants,
    pub motor: MotorConfig,
    pub control: ControlConfig,
    pub simulation: SimulationConfig,
}

/// Steady-state task settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaskConfig {
    /// Delay between size-sensor polls of one lane
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
    /// Longest single wait on a hand-off signal before re-checking shutdown
    #[serde(with = "humantime_serde")]
    pub signal_wait_timeout: Duration,
    /// Posts a lane signal holds before further posts are dropped
    pub signal_capacity: u32,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(20),
            signal_wait_timeout: Duration::from_millis(100),
            signal_capacity: 10,
        }
    }
}

/// Startup calibration settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalibrationConfig {
    pub enabled: bool,
    /// Lane used to measure the size-to-count propagation delay
    pub lane: Lane,
    /// Bound on each sensor wait
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Pause between sensor polls; zero yields the thread instead
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            lane: Lane::Right,
            timeout: Duration::from_secs(30),
            poll_interval: Duration::ZERO,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MotorConfig {
    /// How often the control loop re-issues motor start
    #[serde(with = "humantime_serde")]
    pub keepalive_interval: Duration,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            keepalive_interval: Duration::from_secs(250),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControlConfig {
    /// How often the control loop checks for shutdown and task faults
    #[serde(with = "humantime_serde")]
    pub shutdown_poll_interval: Duration,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            shutdown_poll_interval: Duration::from_millis(50),
        }
    }
}

/// Parameters of the simulated conveyor interface
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub seed: u64,
    /// Chance that a size poll finds an item
    pub arrival_probability: f64,
    /// Share of arrivals that are large
    pub large_ratio: f64,
    /// Size sensor to count sensor travel time
    #[serde(with = "humantime_serde")]
    pub transit_time: Duration,
    /// Share of large items the count sensor confirms
    pub collection_probability: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            arrival_probability: 0.3,
            large_ratio: 0.5,
            transit_time: Duration::from_millis(400),
            collection_probability: 1.0,
        }
    }
}

impl SorterConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SorterConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tasks.signal_capacity == 0 {
            return Err(invalid("tasks.signal_capacity", "must be at least 1"));
        }
        if self.tasks.signal_wait_timeout.is_zero() {
            return Err(invalid("tasks.signal_wait_timeout", "must be non-zero"));
        }
        if self.control.shutdown_poll_interval.is_zero() {
            return Err(invalid("control.shutdown_poll_interval", "must be non-zero"));
        }
        if self.calibration.enabled && self.calibration.timeout.is_zero() {
            return Err(invalid("calibration.timeout", "must be non-zero"));
        }
        for (field, value) in [
            ("simulation.arrival_probability", self.simulation.arrival_probability),
            ("simulation.large_ratio", self.simulation.large_ratio),
            (
                "simulation.collection_probability",
                self.simulation.collection_probability,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, format!("{} is outside [0, 1]", value)));
            }
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

#[cfg(test)]
#[path = "sorter_tests.rs"]
mod tests;
