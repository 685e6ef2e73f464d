// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability
//!
//! Sensor reads happen on every poll, so empty readings log at `trace`
//! and only actionable readings or failures rise above it.

use crate::gate::{GateAdapter, GateError};
use crate::motor::{MotorAdapter, MotorError};
use crate::sensor::{SensorAdapter, SensorError};
use sorter_core::{Classification, CollectionEvent, GateState, Lane};
use std::time::Instant;

/// Wrapper that adds tracing to any SensorAdapter
#[derive(Clone)]
pub struct TracedSensorAdapter<S> {
    inner: S,
}

impl<S> TracedSensorAdapter<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: SensorAdapter> SensorAdapter for TracedSensorAdapter<S> {
    fn read_size(&self, lane: Lane) -> Result<Classification, SensorError> {
        let span = tracing::trace_span!("sensor.read_size", %lane);
        let _guard = span.enter();

        let start = Instant::now();
        let result = self.inner.read_size(lane);
        let elapsed_us = start.elapsed().as_micros() as u64;

        match &result {
            Ok(Classification::None) => tracing::trace!(elapsed_us, "size sensor empty"),
            Ok(classification) => {
                tracing::debug!(elapsed_us, ?classification, "size sensor reading")
            }
            Err(e) => tracing::error!(elapsed_us, error = %e, "size sensor read failed"),
        }
        result
    }

    fn reset_size(&self, lane: Lane) -> Result<(), SensorError> {
        let span = tracing::trace_span!("sensor.reset_size", %lane);
        let _guard = span.enter();

        let start = Instant::now();
        let result = self.inner.reset_size(lane);
        let elapsed_us = start.elapsed().as_micros() as u64;

        match &result {
            Ok(()) => tracing::trace!(elapsed_us, "size sensor reset"),
            Err(e) => tracing::error!(elapsed_us, error = %e, "size sensor reset failed"),
        }
        result
    }

    fn read_count(&self, lane: Lane) -> Result<CollectionEvent, SensorError> {
        let span = tracing::trace_span!("sensor.read_count", %lane);
        let _guard = span.enter();

        let start = Instant::now();
        let result = self.inner.read_count(lane);
        let elapsed_us = start.elapsed().as_micros() as u64;

        match &result {
            Ok(CollectionEvent::None) => tracing::trace!(elapsed_us, "count sensor empty"),
            Ok(CollectionEvent::Confirmed) => {
                tracing::debug!(elapsed_us, "count sensor confirmed item")
            }
            Err(e) => tracing::error!(elapsed_us, error = %e, "count sensor read failed"),
        }
        result
    }

    fn reset_count(&self, lane: Lane) -> Result<(), SensorError> {
        let span = tracing::trace_span!("sensor.reset_count", %lane);
        let _guard = span.enter();

        let start = Instant::now();
        let result = self.inner.reset_count(lane);
        let elapsed_us = start.elapsed().as_micros() as u64;

        match &result {
            Ok(()) => tracing::trace!(elapsed_us, "count sensor reset"),
            Err(e) => tracing::error!(elapsed_us, error = %e, "count sensor reset failed"),
        }
        result
    }
}

/// Wrapper that adds tracing to any GateAdapter
#[derive(Clone)]
pub struct TracedGateAdapter<G> {
    inner: G,
}

impl<G> TracedGateAdapter<G> {
    pub fn new(inner: G) -> Self {
        Self { inner }
    }
}

impl<G: GateAdapter> GateAdapter for TracedGateAdapter<G> {
    fn set_gate(&self, state: GateState) -> Result<(), GateError> {
        let span = tracing::debug_span!("gate.set", %state);
        let _guard = span.enter();

        let start = Instant::now();
        let result = self.inner.set_gate(state);
        let elapsed = start.elapsed();

        match &result {
            Ok(()) => tracing::debug!(elapsed_us = elapsed.as_micros() as u64, "gate applied"),
            Err(e) => tracing::error!(
                elapsed_us = elapsed.as_micros() as u64,
                error = %e,
                "gate actuation failed"
            ),
        }

        result
    }
}

/// Wrapper that adds tracing to any MotorAdapter
#[derive(Clone)]
pub struct TracedMotorAdapter<M> {
    inner: M,
}

impl<M> TracedMotorAdapter<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

impl<M: MotorAdapter> MotorAdapter for TracedMotorAdapter<M> {
    fn start(&self) -> Result<(), MotorError> {
        let span = tracing::info_span!("motor.start");
        let _guard = span.enter();

        let result = self.inner.start();
        match &result {
            Ok(()) => tracing::info!("motor started"),
            Err(e) => tracing::error!(error = %e, "motor start failed"),
        }
        result
    }

    fn stop(&self) -> Result<(), MotorError> {
        let span = tracing::info_span!("motor.stop");
        let _guard = span.enter();

        let result = self.inner.stop();
        // stop failing during shutdown is reported but not fatal to teardown
        match &result {
            Ok(()) => tracing::info!("motor stopped"),
            Err(e) => tracing::warn!(error = %e, "motor stop failed"),
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
