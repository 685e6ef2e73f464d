// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Count task: collection confirmation for large items

use crate::error::TaskError;
use crate::session::Session;
use crate::signals::WaitOutcome;
use sorter_adapters::SensorAdapter;
use sorter_core::{CollectionEvent, Lane};
use std::sync::Arc;
use std::time::Duration;

pub(crate) struct CountTask<S> {
    lane: Lane,
    session: Arc<Session>,
    sensors: S,
    /// Transit time from the size sensor to the count sensor
    delay: Duration,
    wait_timeout: Duration,
}

impl<S: SensorAdapter> CountTask<S> {
    pub(crate) fn new(
        lane: Lane,
        session: Arc<Session>,
        sensors: S,
        delay: Duration,
        wait_timeout: Duration,
    ) -> Self {
        Self {
            lane,
            session,
            sensors,
            delay,
            wait_timeout,
        }
    }

    /// Query the count sensor and bump the lane's collected counter
    ///
    /// The counter is bumped outside the interface lock: this task is its
    /// only writer.
    pub(crate) fn confirm_once(&self) -> Result<CollectionEvent, TaskError> {
        let event = self.sample()?;
        if event == CollectionEvent::Confirmed {
            let collected = self.session.record_collected(self.lane);
            tracing::debug!(lane = %self.lane, collected, "large item collected");
        } else {
            tracing::debug!(lane = %self.lane, "large item not seen at count sensor");
        }
        Ok(event)
    }

    /// Read and reset the count sensor under the interface lock
    pub(crate) fn sample(&self) -> Result<CollectionEvent, TaskError> {
        let _interface = self.session.signals.interface().acquire()?;
        let event = self.sensors.read_count(self.lane)?;
        self.sensors.reset_count(self.lane)?;
        Ok(event)
    }

    pub(crate) fn run(&self) -> Result<(), TaskError> {
        let signal = self.session.signals.count_ready(self.lane);
        let shutdown = &self.session.shutdown;
        loop {
            match signal.wait(self.wait_timeout) {
                WaitOutcome::Taken => {}
                WaitOutcome::TimedOut if shutdown.is_triggered() => break,
                WaitOutcome::TimedOut => continue,
                WaitOutcome::Closed => break,
            }
            if shutdown.sleep(self.delay).is_cancelled() {
                break;
            }
            self.confirm_once()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "count_tests.rs"]
mod tests;
