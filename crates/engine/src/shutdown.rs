// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cooperative shutdown flag
//!
//! Every timed suspension in the engine sleeps on this flag instead of
//! `thread::sleep`, so triggering shutdown wakes it immediately.

use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

/// Result of a cancellable sleep
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Suspend {
    /// The full duration passed
    Elapsed,
    /// Shutdown was triggered before or during the sleep
    Cancelled,
}

impl Suspend {
    pub fn is_cancelled(self) -> bool {
        self == Suspend::Cancelled
    }
}

#[derive(Default)]
struct Inner {
    triggered: Mutex<bool>,
    cv: Condvar,
}

/// Shared shutdown flag, cheap to clone
#[derive(Clone, Default)]
pub struct ShutdownSignal {
    inner: Arc<Inner>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown and wake every sleeper; idempotent
    pub fn trigger(&self) {
        let mut triggered = self.inner.triggered.lock().unwrap_or_else(|e| e.into_inner());
        if !*triggered {
            *triggered = true;
            tracing::debug!("shutdown triggered");
        }
        self.inner.cv.notify_all();
    }

    pub fn is_triggered(&self) -> bool {
        *self.inner.triggered.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Sleep for `duration` unless shutdown is triggered first
    pub fn sleep(&self, duration: Duration) -> Suspend {
        // Past the end of `Instant` only shutdown ends the sleep
        let deadline = Instant::now().checked_add(duration);
        let mut triggered = self.inner.triggered.lock().unwrap_or_else(|e| e.into_inner());
        loop {
            if *triggered {
                return Suspend::Cancelled;
            }
            triggered = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Suspend::Elapsed;
                    }
                    let (guard, _) = self
                        .inner
                        .cv
                        .wait_timeout(triggered, deadline - now)
                        .unwrap_or_else(|e| e.into_inner());
                    guard
                }
                None => self.inner.cv.wait(triggered).unwrap_or_else(|e| e.into_inner()),
            };
        }
    }
}

#[cfg(test)]
#[path = "shutdown_tests.rs"]
mod tests;
