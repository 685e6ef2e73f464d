// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Capability adapters for the conveyor's sensors, gate and motor

pub mod gate;
pub mod motor;
pub mod sensor;
pub mod sim;
pub mod traced;

pub use gate::{GateAdapter, GateError};
pub use motor::{MotorAdapter, MotorError};
pub use sensor::{SensorAdapter, SensorError};
pub use sim::{SimStats, SimulatedConveyor};
pub use traced::{TracedGateAdapter, TracedMotorAdapter, TracedSensorAdapter};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use gate::FakeGateAdapter;
#[cfg(any(test, feature = "test-support"))]
pub use motor::{FakeMotorAdapter, MotorCall};
#[cfg(any(test, feature = "test-support"))]
pub use sensor::{FakeSensorAdapter, SensorCall};
