// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Size and count sensor capability

use sorter_core::{Classification, CollectionEvent, Lane};
use thiserror::Error;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeSensorAdapter, SensorCall};

/// Errors from the sensor interface itself
///
/// A reading of "nothing there" is not an error; these are faults of the
/// interface and are fatal to the session.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SensorError {
    #[error("{lane} sensor unavailable: {reason}")]
    Unavailable { lane: Lane, reason: String },
    #[error("sensor interface fault: {0}")]
    Interface(String),
}

/// Adapter for the per-lane size and count sensors
///
/// Readings latch until reset, so every read is followed by the matching
/// reset. Resets are idempotent.
pub trait SensorAdapter: Clone + Send + Sync + 'static {
    /// Classify the item in front of the lane's size sensor
    fn read_size(&self, lane: Lane) -> Result<Classification, SensorError>;

    /// Clear the size sensor's latched reading
    fn reset_size(&self, lane: Lane) -> Result<(), SensorError>;

    /// Check whether the lane's count sensor saw an item
    fn read_count(&self, lane: Lane) -> Result<CollectionEvent, SensorError>;

    /// Clear the count sensor's latched reading
    fn reset_count(&self, lane: Lane) -> Result<(), SensorError>;
}
