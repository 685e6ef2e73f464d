// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the conveyor engine

use crate::tasks::TaskId;
use sorter_adapters::{GateError, MotorError, SensorError};
use sorter_core::{CalibrationStage, ConfigError};
use std::time::Duration;
use thiserror::Error;

/// Fatal conditions inside a steady-state task
///
/// An empty sensor reading is not an error; every variant here stops the
/// session.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("sensor error: {0}")]
    Sensor(#[from] SensorError),
    #[error("gate error: {0}")]
    Gate(#[from] GateError),
    #[error("{0} lock poisoned by a panicked task")]
    LockPoisoned(&'static str),
}

/// Errors from the startup calibration procedure
#[derive(Debug, Error)]
pub enum CalibrationError {
    #[error("calibration timed out after {waited:?} {stage}")]
    TimedOut {
        stage: CalibrationStage,
        waited: Duration,
    },
    #[error("calibration cancelled by shutdown")]
    Cancelled,
    #[error("calibration already completed for this session")]
    AlreadyCalibrated,
    #[error("calibration step failed: {0}")]
    Task(#[from] TaskError),
    #[error("motor error: {0}")]
    Motor(#[from] MotorError),
}

/// Errors surfaced by the control loop
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("calibration failed: {0}")]
    Calibration(#[from] CalibrationError),
    #[error("motor error: {0}")]
    Motor(#[from] MotorError),
    #[error("failed to spawn {task} task: {source}")]
    Spawn {
        task: TaskId,
        #[source]
        source: std::io::Error,
    },
    #[error("{task} task failed: {source}")]
    Task {
        task: TaskId,
        #[source]
        source: TaskError,
    },
    #[error("{task} task panicked")]
    TaskPanicked { task: TaskId },
    #[error("{0} lock poisoned by a panicked task")]
    LockPoisoned(&'static str),
}
