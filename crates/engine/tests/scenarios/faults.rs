//! Fatal faults end the session

use crate::prelude::*;

#[test]
fn sensor_fault_stops_session_with_task_error() {
    let harness = Harness::new();
    harness.sensors.fail_size_reads(Lane::Right, "cable cut");
    let running = harness.start(quick_config(Duration::ZERO));

    let err = running.join().unwrap_err();

    match err {
        EngineError::Task { task, source } => {
            assert_eq!(task, TaskId::new(TaskKind::Lane, Lane::Right));
            assert!(matches!(source, TaskError::Sensor(_)));
        }
        other => panic!("expected task error, got {other:?}"),
    }
    assert_eq!(harness.motor.calls().last(), Some(&MotorCall::Stop));
}

#[test]
fn gate_actuator_fault_is_reported() {
    let harness = Harness::new();
    harness.gate.fail_with("solenoid open circuit");
    harness.sensors.push_sizes(Lane::Left, [Classification::Small]);
    let running = harness.start(quick_config(Duration::ZERO));

    let err = running.join().unwrap_err();

    assert!(matches!(
        err,
        EngineError::Task {
            source: TaskError::Gate(_),
            ..
        }
    ));
}

/// Gate actuator that panics on first use
#[derive(Clone, Default)]
struct PanickingGate;

impl GateAdapter for PanickingGate {
    fn set_gate(&self, _state: GateState) -> Result<(), GateError> {
        panic!("actuator driver crashed");
    }
}

#[test]
fn panicking_task_is_surfaced() {
    let harness = Harness::with_gate(PanickingGate);
    harness.sensors.push_sizes(Lane::Left, [Classification::Small]);
    let running = harness.start(quick_config(Duration::ZERO));

    let err = running.join().unwrap_err();

    assert!(matches!(
        err,
        EngineError::TaskPanicked { task } if task == TaskId::new(TaskKind::Gate, Lane::Left)
    ));
}
