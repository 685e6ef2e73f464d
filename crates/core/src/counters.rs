// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-lane item tallies
//!
//! Small and large tallies are bumped by a lane's size poll and live
//! behind the interface lock. The collected tally has a single writer,
//! the lane's count task, and is kept outside the lock by the engine.

use crate::lane::Classification;
use serde::{Deserialize, Serialize};
use std::ops::Add;

/// Snapshot of one lane's tallies
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub small: u64,
    pub large: u64,
    pub collected: u64,
}

impl Add for Counters {
    type Output = Counters;

    fn add(self, rhs: Counters) -> Counters {
        Counters {
            small: self.small + rhs.small,
            large: self.large + rhs.large,
            collected: self.collected + rhs.collected,
        }
    }
}

/// Which tally an operator reset applies to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterKind {
    Small,
    Large,
    Collected,
    All,
}

impl CounterKind {
    pub fn includes(self, other: CounterKind) -> bool {
        self == CounterKind::All || self == other
    }
}

/// Size-sensor tallies for one lane, guarded by the interface lock
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LaneTally {
    pub small: u64,
    pub large: u64,
}

impl LaneTally {
    /// Count a classification; `None` leaves the tally untouched
    pub fn record(&mut self, classification: Classification) {
        match classification {
            Classification::Small => self.small += 1,
            Classification::Large => self.large += 1,
            Classification::None => {}
        }
    }

    /// Zero the tallies selected by `kind`
    pub fn reset(&mut self, kind: CounterKind) {
        if kind.includes(CounterKind::Small) {
            self.small = 0;
        }
        if kind.includes(CounterKind::Large) {
            self.large = 0;
        }
    }

    /// Combine with the lane's collected tally into a full snapshot
    pub fn with_collected(self, collected: u64) -> Counters {
        Counters {
            small: self.small,
            large: self.large,
            collected,
        }
    }
}

#[cfg(test)]
#[path = "counters_tests.rs"]
mod tests;
