//! Gate sequencing across lanes

use crate::prelude::*;

#[test]
fn repeated_small_items_on_one_lane_cycle_the_gate_twice() {
    let harness = Harness::new();
    harness.sensors.push_sizes(
        Lane::Left,
        [Classification::Small, Classification::Small],
    );
    let running = harness.start(quick_config(Duration::from_millis(40)));

    wait_until("two gate cycles", || harness.gate.history().len() >= 4);
    let summary = running.stop().unwrap();

    assert_eq!(
        harness.gate.history(),
        vec![
            GateState::ClosedLeft,
            GateState::Open,
            GateState::ClosedLeft,
            GateState::Open,
        ]
    );
    assert_eq!(summary.lane(Lane::Left).small, 2);
    assert_eq!(summary.gate, GateState::Open);
}

#[test]
fn simultaneous_small_items_pass_through_closed_both() {
    let harness = Harness::new();
    harness.sensors.push_sizes(Lane::Left, [Classification::Small]);
    harness.sensors.push_sizes(Lane::Right, [Classification::Small]);
    let running = harness.start(quick_config(Duration::from_millis(300)));

    wait_until("both lanes reopened", || {
        let history = harness.gate.history();
        history.len() >= 4 && history.last() == Some(&GateState::Open)
    });
    running.stop().unwrap();

    let history = harness.gate.history();
    let both = history
        .iter()
        .position(|s| *s == GateState::ClosedBoth)
        .expect("gate never closed for both lanes");
    let first_open = history.iter().position(|s| *s == GateState::Open).unwrap();
    assert!(both < first_open, "history: {history:?}");
    assert!(matches!(
        history[both + 1],
        GateState::ClosedLeft | GateState::ClosedRight
    ));
    assert_eq!(history.len(), 4);
}

#[test]
fn gate_never_closed_for_idle_lane() {
    let harness = Harness::new();
    harness
        .sensors
        .push_sizes(Lane::Right, std::iter::repeat(Classification::Small).take(5));
    let running = harness.start(quick_config(Duration::from_millis(2)));

    wait_until("five diversions", || harness.gate.history().len() >= 10);
    running.stop().unwrap();

    assert!(harness
        .gate
        .history()
        .iter()
        .all(|state| !state.is_closed_for(Lane::Left)));
}
