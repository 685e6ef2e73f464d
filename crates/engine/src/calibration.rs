// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup calibration
//!
//! Runs once per session on the control-loop thread, before any
//! steady-state task exists. It times one bare iteration of each task body
//! on the calibration lane, then measures how long a large item takes to
//! travel from the size sensor to the count sensor. Every wait is bounded
//! by the configured timeout.

use crate::error::{CalibrationError, TaskError};
use crate::session::Session;
use crate::tasks::{CountTask, GateTask, LaneTask};
use sorter_adapters::{GateAdapter, SensorAdapter};
use sorter_core::{
    CalibrationConfig, CalibrationReport, CalibrationStage, Classification, Clock,
    CollectionEvent, Lane, TimingConstants,
};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

pub(crate) struct Calibrator<C> {
    lane: Lane,
    timeout: Duration,
    poll_interval: Duration,
    clock: C,
}

impl<C: Clock> Calibrator<C> {
    pub(crate) fn new(config: &CalibrationConfig, clock: C) -> Self {
        Self {
            lane: config.lane,
            timeout: config.timeout,
            poll_interval: config.poll_interval,
            clock,
        }
    }

    /// Measure, derive and install the session's timing constants
    pub(crate) fn calibrate<S, G>(
        &self,
        session: &Arc<Session>,
        sensors: &S,
        actuator: &G,
    ) -> Result<CalibrationReport, CalibrationError>
    where
        S: SensorAdapter,
        G: GateAdapter,
    {
        if session.timing.get().is_some() {
            return Err(CalibrationError::AlreadyCalibrated);
        }
        tracing::info!(lane = %self.lane, timeout = %humantime::format_duration(self.timeout), "calibration started");

        let lane_task = LaneTask::new(self.lane, Arc::clone(session), sensors.clone(), Duration::ZERO);
        let count_task = CountTask::new(
            self.lane,
            Arc::clone(session),
            sensors.clone(),
            Duration::ZERO,
            Duration::ZERO,
        );
        let gate_task = GateTask::new(
            self.lane,
            Arc::clone(session),
            actuator.clone(),
            Duration::ZERO,
            Duration::ZERO,
        );

        let size_sample = self.time(|| lane_task.sample().map(drop))?;
        let count_sample = self.time(|| count_task.sample().map(drop))?;
        let gate_cycle = self.time(|| gate_task.divert(Duration::ZERO).map(drop))?;
        tracing::debug!(?size_sample, ?count_sample, ?gate_cycle, "task latencies measured");

        let waiting = self.clock.now();
        while lane_task.sample()? != Classification::Large {
            self.pause(session, CalibrationStage::AwaitLarge, waiting)?;
        }
        let size_edge = self.clock.now();

        let mut propagation_polls = 0u64;
        loop {
            propagation_polls += 1;
            if count_task.sample()? == CollectionEvent::Confirmed {
                break;
            }
            self.pause(session, CalibrationStage::AwaitCollection, size_edge)?;
        }
        let delay = self.clock.elapsed_since(size_edge);

        let timing = TimingConstants::from_propagation(delay);
        if !session.install_timing(timing) {
            return Err(CalibrationError::AlreadyCalibrated);
        }
        let report = CalibrationReport {
            lane: self.lane,
            size_sample,
            count_sample,
            gate_cycle,
            propagation_polls,
            timing,
        };
        let _ = session.calibration.set(report.clone());

        tracing::info!(
            lane = %self.lane,
            count_sensor_delay = %humantime::format_duration(timing.count_sensor_delay),
            gate_close_duration = %humantime::format_duration(timing.gate_close_duration),
            propagation_polls,
            "calibration finished"
        );
        Ok(report)
    }

    fn time(&self, step: impl FnOnce() -> Result<(), TaskError>) -> Result<Duration, CalibrationError> {
        let start = self.clock.now();
        step()?;
        Ok(self.clock.elapsed_since(start))
    }

    /// Back off between polls, failing once `stage` has waited too long
    fn pause(
        &self,
        session: &Session,
        stage: CalibrationStage,
        since: Instant,
    ) -> Result<(), CalibrationError> {
        if session.shutdown.is_triggered() {
            return Err(CalibrationError::Cancelled);
        }
        let waited = self.clock.elapsed_since(since);
        if waited >= self.timeout {
            tracing::error!(%stage, waited = %humantime::format_duration(waited), "calibration timed out");
            return Err(CalibrationError::TimedOut { stage, waited });
        }
        if self.poll_interval.is_zero() {
            thread::yield_now();
        } else if session.shutdown.sleep(self.poll_interval).is_cancelled() {
            return Err(CalibrationError::Cancelled);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "calibration_tests.rs"]
mod tests;
