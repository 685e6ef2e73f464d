// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timing constants derived by startup calibration

use crate::lane::Lane;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Gate hold as a fraction of the sensor-to-sensor delay, `NUM / DEN`
pub const GATE_CLOSE_RATIO_NUM: u128 = 4;
pub const GATE_CLOSE_RATIO_DEN: u128 = 5;

/// Delays shared read-only by every count and gate task of a session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConstants {
    /// Time for a large item to travel from the size sensor to the count sensor
    #[serde(with = "humantime_serde")]
    pub count_sensor_delay: Duration,
    /// How long the gate stays closed for one diversion
    #[serde(with = "humantime_serde")]
    pub gate_close_duration: Duration,
}

impl TimingConstants {
    /// Derive constants from a measured propagation delay
    ///
    /// The gate hold is exactly 0.8 of the delay, computed in whole
    /// nanoseconds.
    pub fn from_propagation(count_sensor_delay: Duration) -> Self {
        Self {
            count_sensor_delay,
            gate_close_duration: scale(count_sensor_delay),
        }
    }
}

impl Default for TimingConstants {
    fn default() -> Self {
        Self {
            count_sensor_delay: Duration::from_secs(4),
            gate_close_duration: Duration::from_millis(1700),
        }
    }
}

fn scale(delay: Duration) -> Duration {
    let nanos = delay.as_nanos() * GATE_CLOSE_RATIO_NUM / GATE_CLOSE_RATIO_DEN;
    let secs = (nanos / 1_000_000_000) as u64;
    let subsec = (nanos % 1_000_000_000) as u32;
    Duration::new(secs, subsec)
}

/// Steps of the calibration procedure, used in diagnostics and errors
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CalibrationStage {
    SizeSample,
    CountSample,
    GateCycle,
    AwaitLarge,
    AwaitCollection,
}

impl fmt::Display for CalibrationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CalibrationStage::SizeSample => "size sample",
            CalibrationStage::CountSample => "count sample",
            CalibrationStage::GateCycle => "gate cycle",
            CalibrationStage::AwaitLarge => "waiting for large item",
            CalibrationStage::AwaitCollection => "waiting for collection",
        };
        f.write_str(name)
    }
}

/// Measurements taken by one calibration run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalibrationReport {
    /// Lane the propagation delay was measured on
    pub lane: Lane,
    /// One read-and-reset of the size sensor
    pub size_sample: Duration,
    /// One read-and-reset of the count sensor
    pub count_sample: Duration,
    /// One close/open cycle of the gate with no hold
    pub gate_cycle: Duration,
    /// Count-sensor polls between the large edge and the collection edge
    pub propagation_polls: u64,
    pub timing: TimingConstants,
}

#[cfg(test)]
#[path = "timing_tests.rs"]
mod tests;
