// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn replays_script_then_default() {
    let sensors = FakeSensorAdapter::new();
    sensors.push_sizes(Lane::Left, [Classification::Small, Classification::Large]);
    sensors.set_size_default(Lane::Left, Classification::None);

    assert_eq!(sensors.read_size(Lane::Left).unwrap(), Classification::Small);
    assert_eq!(sensors.read_size(Lane::Left).unwrap(), Classification::Large);
    assert_eq!(sensors.read_size(Lane::Left).unwrap(), Classification::None);
    assert_eq!(sensors.size_reads(Lane::Left), 3);
    assert_eq!(sensors.pending_sizes(Lane::Left), 0);
}

#[test]
fn lanes_are_scripted_independently() {
    let sensors = FakeSensorAdapter::new();
    sensors.push_counts(Lane::Right, [CollectionEvent::Confirmed]);

    assert_eq!(sensors.read_count(Lane::Left).unwrap(), CollectionEvent::None);
    assert_eq!(sensors.read_count(Lane::Right).unwrap(), CollectionEvent::Confirmed);
    assert_eq!(sensors.count_reads(Lane::Left), 1);
}

#[test]
fn failing_reads_return_unavailable() {
    let sensors = FakeSensorAdapter::new();
    sensors.fail_size_reads(Lane::Right, "cable unplugged");

    let err = sensors.read_size(Lane::Right).unwrap_err();
    assert_eq!(
        err,
        SensorError::Unavailable {
            lane: Lane::Right,
            reason: "cable unplugged".to_string()
        }
    );
    assert!(sensors.read_size(Lane::Left).is_ok());
}

#[test]
fn records_calls_when_enabled() {
    let sensors = FakeSensorAdapter::new().recording();
    sensors.read_size(Lane::Left).unwrap();
    sensors.reset_size(Lane::Left).unwrap();

    assert_eq!(
        sensors.calls(),
        vec![
            SensorCall::ReadSize { lane: Lane::Left },
            SensorCall::ResetSize { lane: Lane::Left },
        ]
    );
}
