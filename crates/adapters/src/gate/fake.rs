// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake gate adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{GateAdapter, GateError};
use sorter_core::GateState;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct FakeGate {
    history: Vec<GateState>,
    fail: Option<String>,
}

/// Fake gate that records every state it is driven to
#[derive(Clone, Default)]
pub struct FakeGateAdapter {
    state: Arc<Mutex<FakeGate>>,
}

impl FakeGateAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// States applied so far, oldest first
    pub fn history(&self) -> Vec<GateState> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .history
            .clone()
    }

    /// Last applied state, `Open` if the gate was never driven
    pub fn current(&self) -> GateState {
        self.history().last().copied().unwrap_or_default()
    }

    /// Make every further `set_gate` fail
    pub fn fail_with(&self, reason: &str) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).fail = Some(reason.to_string());
    }
}

impl GateAdapter for FakeGateAdapter {
    fn set_gate(&self, state: GateState) -> Result<(), GateError> {
        let mut gate = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(reason) = &gate.fail {
            return Err(GateError::Actuator(reason.clone()));
        }
        gate.history.push(state);
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
