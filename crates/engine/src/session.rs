// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session context shared by every task
//!
//! One [`Session`] is created per control-loop run and handed to each task
//! by `Arc` at spawn time. [`ConveyorHandle`] is the operator-facing view
//! of the same context.

use crate::gate::SharedGate;
use crate::shutdown::ShutdownSignal;
use crate::signals::SignalSet;
use crate::tasks::TaskId;
use sorter_core::{
    CalibrationReport, CounterKind, Counters, GateState, Lane, LaneSelection, TimingConstants,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use uuid::Uuid;

pub(crate) struct Session {
    pub(crate) id: Uuid,
    pub(crate) signals: SignalSet,
    /// Written only by the lane's own count task
    pub(crate) collected: [AtomicU64; 2],
    pub(crate) gate: SharedGate,
    pub(crate) timing: OnceLock<TimingConstants>,
    pub(crate) calibration: OnceLock<CalibrationReport>,
    pub(crate) shutdown: ShutdownSignal,
    /// First task to fail; its error is the one the session reports
    pub(crate) first_fault: OnceLock<TaskId>,
}

impl Session {
    pub(crate) fn new(signal_capacity: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            signals: SignalSet::new(signal_capacity),
            collected: [AtomicU64::new(0), AtomicU64::new(0)],
            gate: SharedGate::new(),
            timing: OnceLock::new(),
            calibration: OnceLock::new(),
            shutdown: ShutdownSignal::new(),
            first_fault: OnceLock::new(),
        }
    }

    pub(crate) fn record_collected(&self, lane: Lane) -> u64 {
        self.collected[lane.index()].fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Record a fatal task failure and stop the session
    pub(crate) fn fail(&self, task: TaskId) {
        let _ = self.first_fault.set(task);
        self.shutdown.trigger();
    }

    /// Install the session's timing constants; false if already installed
    pub(crate) fn install_timing(&self, timing: TimingConstants) -> bool {
        self.timing.set(timing).is_ok()
    }
}

/// Operator handle onto a running (or finished) conveyor session
///
/// Cheap to clone and safe to use from any thread.
#[derive(Clone)]
pub struct ConveyorHandle {
    session: Arc<Session>,
}

impl ConveyorHandle {
    pub(crate) fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    pub fn session_id(&self) -> Uuid {
        self.session.id
    }

    /// Snapshot of one lane's counters
    pub fn counters(&self, lane: Lane) -> Counters {
        let tally = self.session.signals.interface().acquire_recovering()[lane.index()];
        tally.with_collected(self.session.collected[lane.index()].load(Ordering::Relaxed))
    }

    /// Counters summed over both lanes
    pub fn totals(&self) -> Counters {
        Lane::ALL
            .into_iter()
            .map(|lane| self.counters(lane))
            .fold(Counters::default(), |acc, c| acc + c)
    }

    /// Reset the selected counters on the selected lanes
    pub fn reset_counters(&self, selection: impl Into<LaneSelection>, kind: CounterKind) {
        let selection = selection.into();
        let mut tallies = self.session.signals.interface().acquire_recovering();
        for lane in selection.lanes() {
            tallies[lane.index()].reset(kind);
            if kind.includes(CounterKind::Collected) {
                self.session.collected[lane.index()].store(0, Ordering::Relaxed);
            }
        }
        tracing::info!(?selection, ?kind, "counters reset");
    }

    pub fn gate_state(&self) -> GateState {
        self.session.gate.current()
    }

    /// Timing constants, once calibration (or the fallback) installed them
    pub fn timing(&self) -> Option<TimingConstants> {
        self.session.timing.get().copied()
    }

    /// Calibration diagnostics; `None` when calibration was skipped
    pub fn calibration(&self) -> Option<CalibrationReport> {
        self.session.calibration.get().cloned()
    }

    pub fn trigger_shutdown(&self) {
        self.session.shutdown.trigger();
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.session.shutdown.is_triggered()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
