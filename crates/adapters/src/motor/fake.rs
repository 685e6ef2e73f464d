// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake motor adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{MotorAdapter, MotorError};
use std::sync::{Arc, Mutex};

/// Recorded motor call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorCall {
    Start,
    Stop,
}

#[derive(Default)]
struct FakeMotor {
    calls: Vec<MotorCall>,
    running: bool,
    fail_start: Option<String>,
}

/// Fake motor that tracks its running state
#[derive(Clone, Default)]
pub struct FakeMotorAdapter {
    state: Arc<Mutex<FakeMotor>>,
}

impl FakeMotorAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<MotorCall> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).running
    }

    /// Make every further `start` fail
    pub fn fail_start(&self, reason: &str) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).fail_start = Some(reason.to_string());
    }
}

impl MotorAdapter for FakeMotorAdapter {
    fn start(&self) -> Result<(), MotorError> {
        let mut motor = self.state.lock().unwrap_or_else(|e| e.into_inner());
        motor.calls.push(MotorCall::Start);
        if let Some(reason) = &motor.fail_start {
            return Err(MotorError::Fault(reason.clone()));
        }
        motor.running = true;
        Ok(())
    }

    fn stop(&self) -> Result<(), MotorError> {
        let mut motor = self.state.lock().unwrap_or_else(|e| e.into_inner());
        motor.calls.push(MotorCall::Stop);
        motor.running = false;
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
