// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Gate task: close, hold, open

use crate::error::TaskError;
use crate::session::Session;
use crate::shutdown::Suspend;
use crate::signals::WaitOutcome;
use sorter_adapters::GateAdapter;
use sorter_core::{GateInput, Lane};
use std::sync::Arc;
use std::time::Duration;

pub(crate) struct GateTask<G> {
    lane: Lane,
    session: Arc<Session>,
    actuator: G,
    hold: Duration,
    wait_timeout: Duration,
}

impl<G: GateAdapter> GateTask<G> {
    pub(crate) fn new(
        lane: Lane,
        session: Arc<Session>,
        actuator: G,
        hold: Duration,
        wait_timeout: Duration,
    ) -> Self {
        Self {
            lane,
            session,
            actuator,
            hold,
            wait_timeout,
        }
    }

    /// One full diversion cycle for this lane
    ///
    /// The open transition always runs, even when shutdown cuts the hold
    /// short, so the gate is never left closed for this lane.
    pub(crate) fn divert(&self, hold: Duration) -> Result<Suspend, TaskError> {
        let gate = &self.session.gate;
        gate.transition(GateInput::Close(self.lane), |state| {
            self.actuator.set_gate(state)
        })?;
        let held = self.session.shutdown.sleep(hold);
        if held.is_cancelled() {
            tracing::warn!(lane = %self.lane, "shutdown while gate closed, reopening");
        }
        gate.transition(GateInput::Open(self.lane), |state| {
            self.actuator.set_gate(state)
        })?;
        Ok(held)
    }

    pub(crate) fn run(&self) -> Result<(), TaskError> {
        let signal = self.session.signals.gate_ready(self.lane);
        let shutdown = &self.session.shutdown;
        loop {
            match signal.wait(self.wait_timeout) {
                WaitOutcome::Taken => {}
                WaitOutcome::TimedOut if shutdown.is_triggered() => break,
                WaitOutcome::TimedOut => continue,
                WaitOutcome::Closed => break,
            }
            if shutdown.is_triggered() {
                break;
            }
            if self.divert(self.hold)?.is_cancelled() {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
