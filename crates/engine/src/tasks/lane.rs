// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lane task: size polling and hand-off

use crate::error::TaskError;
use crate::session::Session;
use sorter_adapters::SensorAdapter;
use sorter_core::{Classification, Lane};
use std::sync::Arc;
use std::time::Duration;

pub(crate) struct LaneTask<S> {
    lane: Lane,
    session: Arc<Session>,
    sensors: S,
    poll_interval: Duration,
}

impl<S: SensorAdapter> LaneTask<S> {
    pub(crate) fn new(lane: Lane, session: Arc<Session>, sensors: S, poll_interval: Duration) -> Self {
        Self {
            lane,
            session,
            sensors,
            poll_interval,
        }
    }

    /// One poll: classify, tally, and wake the downstream task
    ///
    /// The whole body runs under the interface lock. The guard is dropped
    /// on every return path, including sensor faults.
    pub(crate) fn poll_once(&self) -> Result<Classification, TaskError> {
        let signals = &self.session.signals;
        let mut tallies = signals.interface().acquire()?;
        let classification = self.read_and_reset()?;
        tallies[self.lane.index()].record(classification);

        match classification {
            Classification::Small => {
                signals.gate_ready(self.lane).post();
            }
            Classification::Large => {
                signals.count_ready(self.lane).post();
            }
            Classification::None => return Ok(classification),
        }
        tracing::debug!(lane = %self.lane, ?classification, "item classified");
        Ok(classification)
    }

    /// Read and reset the size sensor without tallying or waking anyone
    pub(crate) fn sample(&self) -> Result<Classification, TaskError> {
        let _interface = self.session.signals.interface().acquire()?;
        self.read_and_reset()
    }

    pub(crate) fn run(&self) -> Result<(), TaskError> {
        let shutdown = &self.session.shutdown;
        while !shutdown.is_triggered() {
            self.poll_once()?;
            if shutdown.sleep(self.poll_interval).is_cancelled() {
                break;
            }
        }
        Ok(())
    }

    fn read_and_reset(&self) -> Result<Classification, TaskError> {
        let classification = self.sensors.read_size(self.lane)?;
        self.sensors.reset_size(self.lane)?;
        Ok(classification)
    }
}

#[cfg(test)]
#[path = "lane_tests.rs"]
mod tests;
