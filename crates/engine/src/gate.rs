// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Gate controller
//!
//! Serializes read-modify-write transitions of the shared [`GateState`].
//! The gate has its own lock, separate from the interface lock, so gate
//! transitions never queue behind sensor polling.

use crate::error::TaskError;
use sorter_adapters::GateError;
use sorter_core::{GateInput, GateState};
use std::sync::Mutex;

#[derive(Default)]
pub struct SharedGate {
    state: Mutex<GateState>,
}

impl SharedGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `input` atomically
    ///
    /// `apply` drives the actuator to the new state while the gate lock is
    /// held. The new state is committed only if the actuator accepted it,
    /// so the recorded state always matches the physical gate.
    pub fn transition<F>(&self, input: GateInput, apply: F) -> Result<GateState, TaskError>
    where
        F: FnOnce(GateState) -> Result<(), GateError>,
    {
        let mut state = self
            .state
            .lock()
            .map_err(|_| TaskError::LockPoisoned("gate"))?;
        let previous = *state;
        let next = previous.transition(input);
        if next != previous {
            apply(next)?;
            tracing::debug!(from = %previous, to = %next, ?input, "gate transition");
            *state = next;
        }
        Ok(next)
    }

    /// Current state; readable even after a task panicked
    pub fn current(&self) -> GateState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
