// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Gate actuator capability

use sorter_core::GateState;
use thiserror::Error;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeGateAdapter;

/// Errors from driving the physical gate
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("gate actuator fault: {0}")]
    Actuator(String),
}

/// Adapter for the diverter gate
pub trait GateAdapter: Clone + Send + Sync + 'static {
    /// Drive the gate to `state`
    fn set_gate(&self, state: GateState) -> Result<(), GateError>;
}
