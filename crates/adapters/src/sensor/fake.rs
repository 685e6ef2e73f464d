// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake sensor adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{SensorAdapter, SensorError};
use sorter_core::{Classification, CollectionEvent, Lane};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Recorded sensor call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensorCall {
    ReadSize { lane: Lane },
    ResetSize { lane: Lane },
    ReadCount { lane: Lane },
    ResetCount { lane: Lane },
}

#[derive(Default)]
struct LaneScript {
    sizes: VecDeque<Classification>,
    size_default: Classification,
    counts: VecDeque<CollectionEvent>,
    count_default: CollectionEvent,
    fail_size: Option<String>,
    fail_count: Option<String>,
    size_reads: u64,
    count_reads: u64,
}

#[derive(Default)]
struct FakeState {
    lanes: [LaneScript; 2],
    calls: Vec<SensorCall>,
    record_calls: bool,
}

/// Scripted sensors
///
/// Each lane replays its queued readings in order and then returns its
/// default reading (initially none) for every further read.
#[derive(Clone, Default)]
pub struct FakeSensorAdapter {
    state: Arc<Mutex<FakeState>>,
}

impl FakeSensorAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every call for later inspection via [`calls`](Self::calls)
    pub fn recording(self) -> Self {
        self.lock().record_calls = true;
        self
    }

    /// Queue size readings for `lane`
    pub fn push_sizes(&self, lane: Lane, readings: impl IntoIterator<Item = Classification>) {
        self.lock().lanes[lane.index()].sizes.extend(readings);
    }

    /// Reading returned once the lane's size queue is empty
    pub fn set_size_default(&self, lane: Lane, reading: Classification) {
        self.lock().lanes[lane.index()].size_default = reading;
    }

    /// Queue count readings for `lane`
    pub fn push_counts(&self, lane: Lane, readings: impl IntoIterator<Item = CollectionEvent>) {
        self.lock().lanes[lane.index()].counts.extend(readings);
    }

    /// Reading returned once the lane's count queue is empty
    pub fn set_count_default(&self, lane: Lane, reading: CollectionEvent) {
        self.lock().lanes[lane.index()].count_default = reading;
    }

    /// Make every size read on `lane` fail
    pub fn fail_size_reads(&self, lane: Lane, reason: &str) {
        self.lock().lanes[lane.index()].fail_size = Some(reason.to_string());
    }

    /// Make every count read on `lane` fail
    pub fn fail_count_reads(&self, lane: Lane, reason: &str) {
        self.lock().lanes[lane.index()].fail_count = Some(reason.to_string());
    }

    /// Queued size readings not yet consumed
    pub fn pending_sizes(&self, lane: Lane) -> usize {
        self.lock().lanes[lane.index()].sizes.len()
    }

    pub fn size_reads(&self, lane: Lane) -> u64 {
        self.lock().lanes[lane.index()].size_reads
    }

    pub fn count_reads(&self, lane: Lane) -> u64 {
        self.lock().lanes[lane.index()].count_reads
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<SensorCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(state: &mut FakeState, call: SensorCall) {
        if state.record_calls {
            state.calls.push(call);
        }
    }
}

impl SensorAdapter for FakeSensorAdapter {
    fn read_size(&self, lane: Lane) -> Result<Classification, SensorError> {
        let mut state = self.lock();
        Self::record(&mut state, SensorCall::ReadSize { lane });
        let script = &mut state.lanes[lane.index()];
        script.size_reads += 1;
        if let Some(reason) = &script.fail_size {
            return Err(SensorError::Unavailable {
                lane,
                reason: reason.clone(),
            });
        }
        Ok(script.sizes.pop_front().unwrap_or(script.size_default))
    }

    fn reset_size(&self, lane: Lane) -> Result<(), SensorError> {
        let mut state = self.lock();
        Self::record(&mut state, SensorCall::ResetSize { lane });
        Ok(())
    }

    fn read_count(&self, lane: Lane) -> Result<CollectionEvent, SensorError> {
        let mut state = self.lock();
        Self::record(&mut state, SensorCall::ReadCount { lane });
        let script = &mut state.lanes[lane.index()];
        script.count_reads += 1;
        if let Some(reason) = &script.fail_count {
            return Err(SensorError::Unavailable {
                lane,
                reason: reason.clone(),
            });
        }
        Ok(script.counts.pop_front().unwrap_or(script.count_default))
    }

    fn reset_count(&self, lane: Lane) -> Result<(), SensorError> {
        let mut state = self.lock();
        Self::record(&mut state, SensorCall::ResetCount { lane });
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
