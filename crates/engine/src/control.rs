// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Control loop
//!
//! [`Conveyor::run`] drives one session end to end: calibrate (or install
//! the fallback timing), start the motor, spawn the six steady-state
//! tasks, supervise until shutdown, then stop the motor and join every
//! task.

use crate::calibration::Calibrator;
use crate::error::{EngineError, TaskError};
use crate::session::{ConveyorHandle, Session};
use crate::tasks::{CountTask, GateTask, LaneTask, TaskId, TaskKind};
use sorter_adapters::{GateAdapter, MotorAdapter, SensorAdapter};
use sorter_core::{
    CalibrationReport, Clock, Counters, GateState, Lane, SorterConfig, SystemClock,
    TimingConstants,
};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use uuid::Uuid;

/// Capabilities the conveyor drives
pub struct ConveyorDeps<S, G, M> {
    pub sensors: S,
    pub gate: G,
    pub motor: M,
}

/// Final state of a finished session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub counters: [Counters; 2],
    pub gate: GateState,
    pub timing: TimingConstants,
    pub calibration: Option<CalibrationReport>,
}

impl SessionSummary {
    pub fn lane(&self, lane: Lane) -> Counters {
        self.counters[lane.index()]
    }

    pub fn totals(&self) -> Counters {
        self.counters[0] + self.counters[1]
    }
}

struct RunningTask {
    id: TaskId,
    handle: JoinHandle<Result<(), TaskError>>,
}

/// A two-lane sorting conveyor session
pub struct Conveyor<S, G, M, C = SystemClock> {
    deps: ConveyorDeps<S, G, M>,
    config: SorterConfig,
    clock: C,
    session: Arc<Session>,
}

impl<S, G, M> Conveyor<S, G, M, SystemClock>
where
    S: SensorAdapter,
    G: GateAdapter,
    M: MotorAdapter,
{
    pub fn new(deps: ConveyorDeps<S, G, M>, config: SorterConfig) -> Result<Self, EngineError> {
        Self::with_clock(deps, config, SystemClock)
    }
}

impl<S, G, M, C> Conveyor<S, G, M, C>
where
    S: SensorAdapter,
    G: GateAdapter,
    M: MotorAdapter,
    C: Clock,
{
    pub fn with_clock(
        deps: ConveyorDeps<S, G, M>,
        config: SorterConfig,
        clock: C,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let session = Arc::new(Session::new(config.tasks.signal_capacity));
        Ok(Self {
            deps,
            config,
            clock,
            session,
        })
    }

    /// Operator handle, usable before, during and after [`run`](Self::run)
    pub fn handle(&self) -> ConveyorHandle {
        ConveyorHandle::new(Arc::clone(&self.session))
    }

    /// Run the session until shutdown is requested or a task fails
    pub fn run(self) -> Result<SessionSummary, EngineError> {
        let span = tracing::info_span!("session", id = %self.session.id);
        let _enter = span.enter();
        tracing::info!("session starting");

        let timing = self.prepare()?;
        if let Err(e) = self.deps.motor.start() {
            tracing::error!(error = %e, "motor failed to start");
            self.stop_motor();
            return Err(e.into());
        }
        tracing::info!("motor started");

        let mut tasks = Vec::with_capacity(6);
        let mut outcome = Ok(());
        for id in TaskId::steady_state() {
            match self.spawn(id, timing) {
                Ok(task) => tasks.push(task),
                Err(e) => {
                    outcome = Err(e);
                    break;
                }
            }
        }
        if outcome.is_ok() {
            outcome = self.supervise(&tasks);
        }
        self.teardown(tasks, outcome, timing)
    }

    /// Install timing constants, calibrating if enabled
    fn prepare(&self) -> Result<TimingConstants, EngineError> {
        if !self.config.calibration.enabled {
            let timing = self.config.fallback;
            self.session.install_timing(timing);
            tracing::info!(
                count_sensor_delay = ?timing.count_sensor_delay,
                gate_close_duration = ?timing.gate_close_duration,
                "calibration skipped, using fallback timing"
            );
            return Ok(timing);
        }

        // Items only move while the belt runs
        self.deps.motor.start()?;
        let calibrated = Calibrator::new(&self.config.calibration, self.clock.clone()).calibrate(
            &self.session,
            &self.deps.sensors,
            &self.deps.gate,
        );
        match calibrated {
            Ok(report) => Ok(report.timing),
            Err(e) => {
                tracing::error!(error = %e, "calibration failed");
                self.stop_motor();
                Err(e.into())
            }
        }
    }

    fn spawn(&self, id: TaskId, timing: TimingConstants) -> Result<RunningTask, EngineError> {
        let session = Arc::clone(&self.session);
        let tasks = &self.config.tasks;
        let body: Box<dyn FnOnce() -> Result<(), TaskError> + Send> = match id.kind {
            TaskKind::Lane => {
                let task = LaneTask::new(
                    id.lane,
                    Arc::clone(&session),
                    self.deps.sensors.clone(),
                    tasks.poll_interval,
                );
                Box::new(move || task.run())
            }
            TaskKind::Count => {
                let task = CountTask::new(
                    id.lane,
                    Arc::clone(&session),
                    self.deps.sensors.clone(),
                    timing.count_sensor_delay,
                    tasks.signal_wait_timeout,
                );
                Box::new(move || task.run())
            }
            TaskKind::Gate => {
                let task = GateTask::new(
                    id.lane,
                    Arc::clone(&session),
                    self.deps.gate.clone(),
                    timing.gate_close_duration,
                    tasks.signal_wait_timeout,
                );
                Box::new(move || task.run())
            }
        };

        let span = tracing::Span::current();
        let handle = thread::Builder::new()
            .name(id.thread_name())
            .spawn(move || {
                let _entered = span.entered();
                tracing::info!(task = %id, "task started");
                let result = body();
                match &result {
                    Ok(()) => tracing::info!(task = %id, "task stopped"),
                    Err(e) => {
                        tracing::error!(task = %id, error = %e, "task failed");
                        session.fail(id);
                    }
                }
                result
            })
            .map_err(|source| EngineError::Spawn { task: id, source })?;
        Ok(RunningTask { id, handle })
    }

    /// Block until shutdown, re-issuing the motor keepalive as it falls due
    fn supervise(&self, tasks: &[RunningTask]) -> Result<(), EngineError> {
        let shutdown = &self.session.shutdown;
        let keepalive = self.config.motor.keepalive_interval;
        let mut last_start = self.clock.now();
        tracing::info!(tasks = tasks.len(), "conveyor running");

        loop {
            if shutdown
                .sleep(self.config.control.shutdown_poll_interval)
                .is_cancelled()
            {
                return Ok(());
            }
            if let Some(task) = tasks.iter().find(|t| t.handle.is_finished()) {
                tracing::warn!(task = %task.id, "task exited before shutdown");
                self.session.fail(task.id);
                return Ok(());
            }
            if !keepalive.is_zero() && self.clock.elapsed_since(last_start) >= keepalive {
                self.keepalive()?;
                last_start = self.clock.now();
            }
        }
    }

    fn keepalive(&self) -> Result<(), EngineError> {
        let _interface = self
            .session
            .signals
            .interface()
            .acquire()
            .map_err(|_| EngineError::LockPoisoned("interface"))?;
        self.deps.motor.start()?;
        tracing::debug!("motor keepalive");
        Ok(())
    }

    fn teardown(
        &self,
        tasks: Vec<RunningTask>,
        outcome: Result<(), EngineError>,
        timing: TimingConstants,
    ) -> Result<SessionSummary, EngineError> {
        tracing::info!("shutting down");
        self.stop_motor();
        self.session.shutdown.trigger();
        self.session.signals.close_all();

        let mut failures = Vec::new();
        for task in tasks {
            match task.handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(source)) => failures.push(EngineError::Task {
                    task: task.id,
                    source,
                }),
                Err(_) => {
                    tracing::error!(task = %task.id, "task panicked");
                    failures.push(EngineError::TaskPanicked { task: task.id });
                }
            }
        }

        let gate = self.session.gate.current();
        if !gate.is_open() {
            tracing::warn!(%gate, "gate left closed after shutdown");
        }

        outcome?;
        if let Some(first) = self.pick_failure(failures) {
            return Err(first);
        }

        let handle = self.handle();
        let summary = SessionSummary {
            session_id: self.session.id,
            counters: Lane::ALL.map(|lane| handle.counters(lane)),
            gate,
            timing,
            calibration: handle.calibration(),
        };
        tracing::info!(totals = ?summary.totals(), "session finished");
        Ok(summary)
    }

    /// The failure of the task that faulted first, else the first in join order
    fn pick_failure(&self, mut failures: Vec<EngineError>) -> Option<EngineError> {
        if failures.is_empty() {
            return None;
        }
        let first = self.session.first_fault.get().copied();
        let position = failures
            .iter()
            .position(|e| first.is_some() && failed_task(e) == first)
            .unwrap_or(0);
        Some(failures.swap_remove(position))
    }

    fn stop_motor(&self) {
        match self.deps.motor.stop() {
            Ok(()) => tracing::info!("motor stopped"),
            Err(e) => tracing::warn!(error = %e, "failed to stop motor"),
        }
    }
}

fn failed_task(error: &EngineError) -> Option<TaskId> {
    match error {
        EngineError::Task { task, .. } | EngineError::TaskPanicked { task } => Some(*task),
        _ => None,
    }
}

#[cfg(test)]
#[path = "control_tests.rs"]
mod tests;
