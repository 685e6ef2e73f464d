//! Shared harness for conveyor scenarios

pub use sorter_adapters::{
    FakeGateAdapter, FakeMotorAdapter, FakeSensorAdapter, GateAdapter, GateError, MotorCall,
};
pub use sorter_core::{
    CalibrationStage, Classification, CollectionEvent, CounterKind, GateState, Lane,
    SorterConfig, TimingConstants,
};
pub use sorter_engine::{
    CalibrationError, Conveyor, ConveyorDeps, ConveyorHandle, EngineError, SessionSummary,
    TaskError, TaskId, TaskKind,
};
pub use std::time::{Duration, Instant};

use std::thread::{self, JoinHandle};

/// Upper bound for anything a scenario waits on
pub const PATIENCE: Duration = Duration::from_secs(10);

/// Fast steady-state config with calibration skipped
pub fn quick_config(gate_hold: Duration) -> SorterConfig {
    let mut config = SorterConfig::default();
    config.calibration.enabled = false;
    config.fallback = TimingConstants {
        count_sensor_delay: Duration::ZERO,
        gate_close_duration: gate_hold,
    };
    config.tasks.poll_interval = Duration::from_millis(1);
    config.tasks.signal_wait_timeout = Duration::from_millis(20);
    config.control.shutdown_poll_interval = Duration::from_millis(5);
    config
}

/// A session running on a background thread
pub struct Running {
    pub handle: ConveyorHandle,
    runner: JoinHandle<Result<SessionSummary, EngineError>>,
}

impl Running {
    /// Shut down and wait for the control loop to return
    pub fn stop(self) -> Result<SessionSummary, EngineError> {
        self.handle.trigger_shutdown();
        self.join()
    }

    /// Wait for the control loop to return on its own
    pub fn join(self) -> Result<SessionSummary, EngineError> {
        let deadline = Instant::now() + PATIENCE;
        while !self.runner.is_finished() {
            assert!(Instant::now() < deadline, "control loop did not return");
            thread::sleep(Duration::from_millis(2));
        }
        self.runner.join().unwrap()
    }
}

/// Scripted adapters plus a session started over them
pub struct Harness<G: GateAdapter = FakeGateAdapter> {
    pub sensors: FakeSensorAdapter,
    pub gate: G,
    pub motor: FakeMotorAdapter,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_gate(FakeGateAdapter::new())
    }
}

impl<G: GateAdapter> Harness<G> {
    pub fn with_gate(gate: G) -> Self {
        Self {
            sensors: FakeSensorAdapter::new(),
            gate,
            motor: FakeMotorAdapter::new(),
        }
    }

    pub fn start(&self, config: SorterConfig) -> Running {
        let conveyor = Conveyor::new(
            ConveyorDeps {
                sensors: self.sensors.clone(),
                gate: self.gate.clone(),
                motor: self.motor.clone(),
            },
            config,
        )
        .unwrap();
        let handle = conveyor.handle();
        let runner = thread::spawn(move || conveyor.run());
        Running { handle, runner }
    }
}

/// Poll `condition` until it holds, failing the test after [`PATIENCE`]
pub fn wait_until(what: &str, mut condition: impl FnMut() -> bool) {
    let deadline = Instant::now() + PATIENCE;
    while !condition() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(2));
    }
}
