// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Signal set shared by the steady-state tasks
//!
//! - **Interface lock** - mutual exclusion over the sensor interface and
//!   the per-lane small/large tallies
//! - **Count ready** - one counting signal per lane, posted for large items
//! - **Gate ready** - one counting signal per lane, posted for small items

use crate::error::TaskError;
use sorter_core::{Lane, LaneTally};
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Outcome of posting a counting signal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PostOutcome {
    Posted,
    /// The signal already held `capacity` posts; this one was dropped
    Saturated,
    /// The signal was closed for shutdown
    Closed,
}

/// Outcome of waiting on a counting signal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitOutcome {
    /// One post was consumed
    Taken,
    TimedOut,
    /// The signal was closed for shutdown; no post was consumed
    Closed,
}

#[derive(Default)]
struct SignalState {
    count: u32,
    closed: bool,
}

/// Counting signal with a bounded count
///
/// Posts never block. Posts made before a wait are kept, up to the
/// capacity, and each wait consumes exactly one.
pub struct CountingSignal {
    name: String,
    capacity: u32,
    state: Mutex<SignalState>,
    cv: Condvar,
}

impl CountingSignal {
    pub fn new(name: impl Into<String>, capacity: u32) -> Self {
        Self {
            name: name.into(),
            capacity,
            state: Mutex::new(SignalState::default()),
            cv: Condvar::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Posts not yet consumed by a wait
    pub fn pending(&self) -> u32 {
        self.lock().count
    }

    pub fn post(&self) -> PostOutcome {
        let mut state = self.lock();
        if state.closed {
            return PostOutcome::Closed;
        }
        if state.count >= self.capacity {
            tracing::warn!(signal = %self.name, capacity = self.capacity, "signal saturated, post dropped");
            return PostOutcome::Saturated;
        }
        state.count += 1;
        self.cv.notify_one();
        PostOutcome::Posted
    }

    /// Block until a post is available, the timeout passes, or the signal closes
    pub fn wait(&self, timeout: Duration) -> WaitOutcome {
        // A timeout past the end of `Instant` waits for a post or close only
        let deadline = Instant::now().checked_add(timeout);
        let mut state = self.lock();
        loop {
            if state.closed {
                return WaitOutcome::Closed;
            }
            if state.count > 0 {
                state.count -= 1;
                return WaitOutcome::Taken;
            }
            state = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return WaitOutcome::TimedOut;
                    }
                    let (guard, _) = self
                        .cv
                        .wait_timeout(state, deadline - now)
                        .unwrap_or_else(|e| e.into_inner());
                    guard
                }
                None => self.cv.wait(state).unwrap_or_else(|e| e.into_inner()),
            };
        }
    }

    /// Wake every waiter with [`WaitOutcome::Closed`] and refuse further posts
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        state.count = 0;
        self.cv.notify_all();
    }

    fn lock(&self) -> MutexGuard<'_, SignalState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Mutual exclusion over the sensor interface
///
/// The guarded data is the per-lane small/large tallies, so they can only
/// be bumped while the interface is held.
#[derive(Default)]
pub struct InterfaceLock {
    tallies: Mutex<[LaneTally; 2]>,
}

pub type InterfaceGuard<'a> = MutexGuard<'a, [LaneTally; 2]>;

impl InterfaceLock {
    /// Block until the interface is free
    ///
    /// A poisoned lock means a task panicked inside the critical section;
    /// that is fatal for the task that observes it.
    pub fn acquire(&self) -> Result<InterfaceGuard<'_>, TaskError> {
        self.tallies
            .lock()
            .map_err(|_| TaskError::LockPoisoned("interface"))
    }

    /// Acquire for operator reads and resets, which stay usable after a fault
    pub fn acquire_recovering(&self) -> InterfaceGuard<'_> {
        self.tallies.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Every signal of one session
pub struct SignalSet {
    interface: InterfaceLock,
    count_ready: [CountingSignal; 2],
    gate_ready: [CountingSignal; 2],
}

impl SignalSet {
    pub fn new(capacity: u32) -> Self {
        Self {
            interface: InterfaceLock::default(),
            count_ready: Lane::ALL
                .map(|lane| CountingSignal::new(format!("count-ready-{}", lane), capacity)),
            gate_ready: Lane::ALL
                .map(|lane| CountingSignal::new(format!("gate-ready-{}", lane), capacity)),
        }
    }

    pub fn interface(&self) -> &InterfaceLock {
        &self.interface
    }

    pub fn count_ready(&self, lane: Lane) -> &CountingSignal {
        &self.count_ready[lane.index()]
    }

    pub fn gate_ready(&self, lane: Lane) -> &CountingSignal {
        &self.gate_ready[lane.index()]
    }

    /// Close every counting signal, releasing all parked tasks
    pub fn close_all(&self) {
        for signal in self.count_ready.iter().chain(self.gate_ready.iter()) {
            signal.close();
        }
    }
}

#[cfg(test)]
#[path = "signals_tests.rs"]
mod tests;
