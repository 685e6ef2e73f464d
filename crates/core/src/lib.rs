// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sorter-core: data model for the two-lane sorting conveyor
//!
//! This crate provides:
//! - Lanes and sensor readings
//! - The pure gate state machine shared by both lanes
//! - Per-lane counters and calibration timing constants
//! - A clock abstraction and TOML configuration

pub mod clock;
pub mod config;
pub mod counters;
pub mod gate;
pub mod lane;
pub mod timing;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{
    CalibrationConfig, ConfigError, ControlConfig, MotorConfig, SimulationConfig, SorterConfig,
    TaskConfig,
};
pub use counters::{CounterKind, Counters, LaneTally};
pub use gate::{GateInput, GateState};
pub use lane::{Classification, CollectionEvent, Lane, LaneSelection};
pub use timing::{CalibrationReport, CalibrationStage, TimingConstants};
