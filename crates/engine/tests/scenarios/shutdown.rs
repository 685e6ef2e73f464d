//! Bounded shutdown from every reachable state

use crate::prelude::*;

const BOUND: Duration = Duration::from_secs(2);

#[test]
fn idle_session_stops_promptly() {
    let harness = Harness::new();
    let running = harness.start(quick_config(Duration::ZERO));
    std::thread::sleep(Duration::from_millis(30));

    let start = Instant::now();
    running.stop().unwrap();

    assert!(start.elapsed() < BOUND);
    assert!(!harness.motor.is_running());
}

#[test]
fn long_holds_and_transits_are_interrupted() {
    let harness = Harness::new();
    harness.sensors.push_sizes(Lane::Left, [Classification::Small]);
    harness.sensors.push_sizes(Lane::Right, [Classification::Large]);
    let mut config = quick_config(Duration::from_secs(120));
    config.fallback.count_sensor_delay = Duration::from_secs(120);
    config.tasks.signal_wait_timeout = Duration::from_secs(120);
    let running = harness.start(config);

    wait_until("gate closed", || {
        running.handle.gate_state() == GateState::ClosedLeft
    });
    let start = Instant::now();
    let summary = running.stop().unwrap();

    assert!(start.elapsed() < BOUND);
    assert_eq!(summary.gate, GateState::Open);
    assert_eq!(harness.gate.history().last(), Some(&GateState::Open));
    assert_eq!(harness.sensors.count_reads(Lane::Right), 0);
}

#[test]
fn shutdown_during_calibration_cancels_it() {
    let harness = Harness::new();
    let mut config = quick_config(Duration::ZERO);
    config.calibration.enabled = true;
    config.calibration.timeout = Duration::from_secs(120);
    config.calibration.poll_interval = Duration::from_millis(1);
    let running = harness.start(config);
    std::thread::sleep(Duration::from_millis(20));

    let err = running.stop().unwrap_err();

    assert!(matches!(
        err,
        EngineError::Calibration(CalibrationError::Cancelled)
    ));
    assert_eq!(harness.motor.calls(), vec![MotorCall::Start, MotorCall::Stop]);
}

#[test]
fn unbounded_waits_still_stop() {
    let harness = Harness::new();
    let config = SorterConfig::from_toml_str(
        "[tasks]\nsignal_wait_timeout = \"300000000000years\"\n[calibration]\nenabled = false\n",
    )
    .unwrap();
    let running = harness.start(config);
    std::thread::sleep(Duration::from_millis(30));

    let start = Instant::now();
    running.stop().unwrap();

    assert!(start.elapsed() < BOUND);
}
