// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sorter_adapters::FakeGateAdapter;
use sorter_core::GateState;
use std::thread;

fn setup(lane: Lane, hold: Duration) -> (Arc<Session>, FakeGateAdapter, GateTask<FakeGateAdapter>) {
    let session = Arc::new(Session::new(4));
    let actuator = FakeGateAdapter::new();
    let task = GateTask::new(
        lane,
        Arc::clone(&session),
        actuator.clone(),
        hold,
        Duration::from_millis(5),
    );
    (session, actuator, task)
}

#[test]
fn divert_closes_then_opens() {
    let (session, actuator, task) = setup(Lane::Left, Duration::ZERO);

    assert_eq!(task.divert(Duration::ZERO).unwrap(), Suspend::Elapsed);
    assert_eq!(actuator.history(), vec![GateState::ClosedLeft, GateState::Open]);
    assert_eq!(session.gate.current(), GateState::Open);
}

#[test]
fn divert_keeps_other_lane_closure() {
    let (session, actuator, task) = setup(Lane::Right, Duration::ZERO);
    session
        .gate
        .transition(GateInput::Close(Lane::Left), |state| actuator.set_gate(state))
        .unwrap();

    task.divert(Duration::ZERO).unwrap();

    assert_eq!(
        actuator.history(),
        vec![GateState::ClosedLeft, GateState::ClosedBoth, GateState::ClosedLeft]
    );
}

#[test]
fn shutdown_during_hold_reopens_gate() {
    let (session, actuator, task) = setup(Lane::Left, Duration::from_secs(60));
    session.signals.gate_ready(Lane::Left).post();

    let worker = thread::spawn(move || task.run());
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while session.gate.current() != GateState::ClosedLeft && std::time::Instant::now() < deadline {
        thread::sleep(Duration::from_millis(2));
    }
    session.shutdown.trigger();

    assert!(worker.join().unwrap().is_ok());
    assert_eq!(session.gate.current(), GateState::Open);
    assert_eq!(actuator.current(), GateState::Open);
}

#[test]
fn idle_task_exits_after_shutdown() {
    let (session, actuator, task) = setup(Lane::Right, Duration::ZERO);
    let worker = thread::spawn(move || task.run());
    thread::sleep(Duration::from_millis(15));
    session.shutdown.trigger();

    assert!(worker.join().unwrap().is_ok());
    assert!(actuator.history().is_empty());
}

#[test]
fn actuator_fault_is_fatal() {
    let (session, actuator, task) = setup(Lane::Left, Duration::ZERO);
    actuator.fail_with("stuck");
    session.signals.gate_ready(Lane::Left).post();

    assert!(matches!(task.run(), Err(TaskError::Gate(_))));
    assert_eq!(session.gate.current(), GateState::Open);
}
