// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration modules

mod sorter;

pub use sorter::{
    CalibrationConfig, ConfigError, ControlConfig, MotorConfig, SimulationConfig, SorterConfig,
    TaskConfig,
};
