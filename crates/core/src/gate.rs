// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Gate state machine
//!
//! The diverter is one physical gate shared by both lanes. Its combined
//! state records which lanes currently have a small item being pushed off.
//! Transitions are pure; callers serialize them (see the engine's gate
//! controller) so a lane's open never clobbers the other lane's close.

use crate::lane::Lane;
use std::fmt;

/// Combined state of the shared gate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum GateState {
    #[default]
    Open,
    ClosedLeft,
    ClosedRight,
    ClosedBoth,
}

/// Requests that move the gate
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateInput {
    /// A small item on `lane` reached the gate
    Close(Lane),
    /// The item on `lane` has been diverted
    Open(Lane),
}

impl GateState {
    /// Build a state from per-lane closure flags
    pub fn from_closures(left: bool, right: bool) -> Self {
        match (left, right) {
            (false, false) => GateState::Open,
            (true, false) => GateState::ClosedLeft,
            (false, true) => GateState::ClosedRight,
            (true, true) => GateState::ClosedBoth,
        }
    }

    /// The closed-for-`lane` state with no other closure
    pub fn closed(lane: Lane) -> Self {
        match lane {
            Lane::Left => GateState::ClosedLeft,
            Lane::Right => GateState::ClosedRight,
        }
    }

    pub fn is_closed_for(self, lane: Lane) -> bool {
        matches!(
            (self, lane),
            (GateState::ClosedBoth, _)
                | (GateState::ClosedLeft, Lane::Left)
                | (GateState::ClosedRight, Lane::Right)
        )
    }

    pub fn is_open(self) -> bool {
        self == GateState::Open
    }

    /// Close transition for `lane`
    ///
    /// If the other lane is already closed the result is `ClosedBoth`.
    /// Closing a lane that is already closed leaves the state unchanged.
    pub fn close(self, lane: Lane) -> Self {
        self.with(lane, true)
    }

    /// Open transition for `lane`
    ///
    /// From `ClosedBoth` the other lane's closure is kept. Opening a lane
    /// that is not closed leaves the state unchanged, so the other lane's
    /// pending closure is never dropped.
    pub fn open(self, lane: Lane) -> Self {
        self.with(lane, false)
    }

    /// Pure state transition function
    pub fn transition(self, input: GateInput) -> Self {
        match input {
            GateInput::Close(lane) => self.close(lane),
            GateInput::Open(lane) => self.open(lane),
        }
    }

    fn with(self, lane: Lane, closed: bool) -> Self {
        let mut left = self.is_closed_for(Lane::Left);
        let mut right = self.is_closed_for(Lane::Right);
        match lane {
            Lane::Left => left = closed,
            Lane::Right => right = closed,
        }
        GateState::from_closures(left, right)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GateState::Open => "open",
            GateState::ClosedLeft => "closed-left",
            GateState::ClosedRight => "closed-right",
            GateState::ClosedBoth => "closed-both",
        }
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
