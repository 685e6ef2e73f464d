// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Belt motor capability

use thiserror::Error;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeMotorAdapter, MotorCall};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MotorError {
    #[error("motor fault: {0}")]
    Fault(String),
}

/// Adapter for the motor driving both belts
pub trait MotorAdapter: Clone + Send + Sync + 'static {
    fn start(&self) -> Result<(), MotorError>;

    fn stop(&self) -> Result<(), MotorError>;
}
