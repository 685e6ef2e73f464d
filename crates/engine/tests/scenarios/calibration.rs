//! Calibration through the control loop

use crate::prelude::*;

#[test]
fn missing_large_item_fails_with_timeout() {
    let harness = Harness::new();
    let mut config = quick_config(Duration::ZERO);
    config.calibration.enabled = true;
    config.calibration.timeout = Duration::from_millis(50);
    let running = harness.start(config);

    let err = running.join().unwrap_err();

    match err {
        EngineError::Calibration(CalibrationError::TimedOut { stage, .. }) => {
            assert_eq!(stage, CalibrationStage::AwaitLarge);
        }
        other => panic!("expected calibration timeout, got {other:?}"),
    }
    assert!(running_motor_stopped(&harness));
}

#[test]
fn calibration_drives_steady_state_timing() {
    let harness = Harness::new();
    harness
        .sensors
        .push_sizes(Lane::Left, [Classification::None, Classification::Large]);
    harness.sensors.push_counts(
        Lane::Left,
        [
            CollectionEvent::None,
            CollectionEvent::None,
            CollectionEvent::Confirmed,
        ],
    );
    let mut config = quick_config(Duration::ZERO);
    config.calibration.enabled = true;
    config.calibration.lane = Lane::Left;
    config.calibration.poll_interval = Duration::from_millis(10);
    let running = harness.start(config);

    wait_until("calibration", || running.handle.calibration().is_some());
    let summary = running.stop().unwrap();

    let report = summary.calibration.clone().unwrap();
    assert_eq!(report.propagation_polls, 2);
    assert!(report.timing.count_sensor_delay >= Duration::from_millis(10));
    assert_eq!(
        report.timing.gate_close_duration.as_nanos(),
        report.timing.count_sensor_delay.as_nanos() * 4 / 5
    );
    assert_eq!(summary.timing, report.timing);
    // Calibration items are not tallied
    assert_eq!(summary.lane(Lane::Left).large, 0);
}

fn running_motor_stopped(harness: &Harness) -> bool {
    !harness.motor.is_running() && harness.motor.calls().last() == Some(&MotorCall::Stop)
}
