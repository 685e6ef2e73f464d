// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Conveyor lanes and the sensor readings taken on them

use serde::{Deserialize, Serialize};
use std::fmt;

/// One side of the two-lane conveyor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lane {
    Left,
    Right,
}

impl Lane {
    /// Both lanes, in index order
    pub const ALL: [Lane; 2] = [Lane::Left, Lane::Right];

    /// Position of this lane in per-lane arrays
    pub fn index(self) -> usize {
        match self {
            Lane::Left => 0,
            Lane::Right => 1,
        }
    }

    /// The lane on the opposite side of the conveyor
    pub fn other(self) -> Lane {
        match self {
            Lane::Left => Lane::Right,
            Lane::Right => Lane::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Lane::Left => "left",
            Lane::Right => "right",
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator choice of one or both lanes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaneSelection {
    Left,
    Right,
    Both,
}

impl LaneSelection {
    /// Lanes covered by this selection
    pub fn lanes(self) -> &'static [Lane] {
        match self {
            LaneSelection::Left => &[Lane::Left],
            LaneSelection::Right => &[Lane::Right],
            LaneSelection::Both => &Lane::ALL,
        }
    }
}

impl From<Lane> for LaneSelection {
    fn from(lane: Lane) -> Self {
        match lane {
            Lane::Left => LaneSelection::Left,
            Lane::Right => LaneSelection::Right,
        }
    }
}

/// Size-sensor reading
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Classification {
    /// Nothing actionable in front of the sensor
    #[default]
    None,
    Small,
    Large,
}

/// Count-sensor reading
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum CollectionEvent {
    #[default]
    None,
    Confirmed,
}

#[cfg(test)]
#[path = "lane_tests.rs"]
mod tests;
