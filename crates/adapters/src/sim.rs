// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Simulated conveyor interface
//!
//! Stands in for the hardware sensors, gate and motor. Items arrive at the
//! size sensors at random while the motor runs; large items then travel to
//! the count sensor and are confirmed once their transit time has passed.
//! An item left unread for longer than its dwell time is counted as lost.
//! Seeded, so a given configuration replays the same item stream.

use crate::gate::{GateAdapter, GateError};
use crate::motor::{MotorAdapter, MotorError};
use crate::sensor::{SensorAdapter, SensorError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sorter_core::{
    Classification, Clock, CollectionEvent, GateState, Lane, SimulationConfig, SystemClock,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Shortest time an item stays in front of the count sensor
const MIN_DWELL: Duration = Duration::from_millis(100);

/// Items seen by the simulation so far
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimStats {
    pub small_arrivals: u64,
    pub large_arrivals: u64,
    pub confirmed: u64,
    pub lost: u64,
}

#[derive(Default)]
struct LaneSim {
    size_latch: Classification,
    count_latch: CollectionEvent,
    /// Arrival deadlines at the count sensor for large items in transit
    in_transit: VecDeque<Instant>,
}

struct SimState {
    rng: StdRng,
    motor_running: bool,
    gate: GateState,
    lanes: [LaneSim; 2],
    stats: SimStats,
}

/// Random item generator implementing every conveyor capability
#[derive(Clone)]
pub struct SimulatedConveyor<C: Clock = SystemClock> {
    config: SimulationConfig,
    clock: C,
    state: Arc<Mutex<SimState>>,
}

impl SimulatedConveyor<SystemClock> {
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> SimulatedConveyor<C> {
    pub fn with_clock(config: SimulationConfig, clock: C) -> Self {
        let state = SimState {
            rng: StdRng::seed_from_u64(config.seed),
            motor_running: false,
            gate: GateState::Open,
            lanes: Default::default(),
            stats: SimStats::default(),
        };
        Self {
            config,
            clock,
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn gate_state(&self) -> GateState {
        self.lock().gate
    }

    pub fn motor_running(&self) -> bool {
        self.lock().motor_running
    }

    pub fn stats(&self) -> SimStats {
        self.lock().stats
    }

    /// Large items still travelling towards the lane's count sensor
    pub fn in_transit(&self, lane: Lane) -> usize {
        self.lock().lanes[lane.index()].in_transit.len()
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Bernoulli draw that tolerates out-of-range probabilities
fn chance(rng: &mut StdRng, probability: f64) -> bool {
    rng.gen::<f64>() < probability
}

impl<C: Clock> SensorAdapter for SimulatedConveyor<C> {
    fn read_size(&self, lane: Lane) -> Result<Classification, SensorError> {
        let now = self.clock.now();
        let mut state = self.lock();
        let state = &mut *state;
        let sim = &mut state.lanes[lane.index()];

        if sim.size_latch != Classification::None || !state.motor_running {
            return Ok(sim.size_latch);
        }
        if !chance(&mut state.rng, self.config.arrival_probability) {
            return Ok(Classification::None);
        }

        let classification = if chance(&mut state.rng, self.config.large_ratio) {
            state.stats.large_arrivals += 1;
            // A transit time past the end of `Instant` never reaches the count sensor
            if let Some(due) = now.checked_add(self.config.transit_time) {
                sim.in_transit.push_back(due);
            }
            Classification::Large
        } else {
            state.stats.small_arrivals += 1;
            Classification::Small
        };
        sim.size_latch = classification;
        tracing::trace!(%lane, ?classification, "simulated arrival");
        Ok(classification)
    }

    fn reset_size(&self, lane: Lane) -> Result<(), SensorError> {
        self.lock().lanes[lane.index()].size_latch = Classification::None;
        Ok(())
    }

    fn read_count(&self, lane: Lane) -> Result<CollectionEvent, SensorError> {
        let now = self.clock.now();
        let mut state = self.lock();
        let state = &mut *state;
        let sim = &mut state.lanes[lane.index()];

        if sim.count_latch == CollectionEvent::Confirmed {
            return Ok(sim.count_latch);
        }
        // Items nobody read within their dwell time have passed the sensor
        let dwell = self.config.transit_time.max(MIN_DWELL);
        while sim
            .in_transit
            .front()
            .and_then(|due| due.checked_add(dwell))
            .is_some_and(|gone| gone < now)
        {
            sim.in_transit.pop_front();
            state.stats.lost += 1;
        }
        let arrived = sim.in_transit.front().is_some_and(|due| *due <= now);
        if arrived {
            sim.in_transit.pop_front();
            if chance(&mut state.rng, self.config.collection_probability) {
                state.stats.confirmed += 1;
                sim.count_latch = CollectionEvent::Confirmed;
            } else {
                state.stats.lost += 1;
            }
        }
        Ok(sim.count_latch)
    }

    fn reset_count(&self, lane: Lane) -> Result<(), SensorError> {
        self.lock().lanes[lane.index()].count_latch = CollectionEvent::None;
        Ok(())
    }
}

impl<C: Clock> GateAdapter for SimulatedConveyor<C> {
    fn set_gate(&self, state: GateState) -> Result<(), GateError> {
        self.lock().gate = state;
        Ok(())
    }
}

impl<C: Clock> MotorAdapter for SimulatedConveyor<C> {
    fn start(&self) -> Result<(), MotorError> {
        self.lock().motor_running = true;
        Ok(())
    }

    fn stop(&self) -> Result<(), MotorError> {
        self.lock().motor_running = false;
        Ok(())
    }
}

#[cfg(test)]
#[path = "sim_tests.rs"]
mod tests;
