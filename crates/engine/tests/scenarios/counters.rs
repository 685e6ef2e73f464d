//! Counter integrity under concurrent lanes

use crate::prelude::*;

fn mixed(count: usize) -> Vec<Classification> {
    (0..count)
        .map(|i| match i % 3 {
            0 => Classification::Small,
            1 => Classification::Large,
            _ => Classification::None,
        })
        .collect()
}

#[test]
fn concurrent_lanes_never_lose_tally_updates() {
    let harness = Harness::new();
    harness.sensors.push_sizes(Lane::Left, mixed(600));
    harness.sensors.push_sizes(Lane::Right, mixed(900));
    let mut config = quick_config(Duration::ZERO);
    config.tasks.poll_interval = Duration::ZERO;
    let running = harness.start(config);

    wait_until("sensor scripts drained", || {
        harness.sensors.pending_sizes(Lane::Left) == 0
            && harness.sensors.pending_sizes(Lane::Right) == 0
    });
    let summary = running.stop().unwrap();

    assert_eq!(summary.lane(Lane::Left).small, 200);
    assert_eq!(summary.lane(Lane::Left).large, 200);
    assert_eq!(summary.lane(Lane::Right).small, 300);
    assert_eq!(summary.lane(Lane::Right).large, 300);
}

#[test]
fn collected_counts_stay_on_their_own_lane() {
    let harness = Harness::new();
    harness
        .sensors
        .push_sizes(Lane::Left, std::iter::repeat(Classification::Large).take(150));
    harness
        .sensors
        .push_sizes(Lane::Right, std::iter::repeat(Classification::Large).take(150));
    harness
        .sensors
        .set_count_default(Lane::Left, CollectionEvent::Confirmed);
    let mut config = quick_config(Duration::ZERO);
    config.tasks.signal_capacity = 1_000;
    let running = harness.start(config);

    wait_until("left collections", || {
        running.handle.counters(Lane::Left).collected == 150
    });
    wait_until("right count reads", || {
        harness.sensors.count_reads(Lane::Right) == 150
    });
    let summary = running.stop().unwrap();

    assert_eq!(summary.lane(Lane::Left).collected, 150);
    assert_eq!(summary.lane(Lane::Right).collected, 0);
    assert_eq!(summary.lane(Lane::Right).large, 150);
}

#[test]
fn operator_reset_clears_selected_counters_mid_session() {
    let harness = Harness::new();
    harness
        .sensors
        .push_sizes(Lane::Left, [Classification::Large, Classification::Small]);
    harness
        .sensors
        .set_count_default(Lane::Left, CollectionEvent::Confirmed);
    let running = harness.start(quick_config(Duration::ZERO));

    wait_until("first items counted", || {
        let counters = running.handle.counters(Lane::Left);
        counters.small == 1 && counters.collected == 1
    });
    running.handle.reset_counters(Lane::Left, CounterKind::Collected);
    let counters = running.handle.counters(Lane::Left);
    assert_eq!((counters.small, counters.large, counters.collected), (1, 1, 0));

    running.handle.reset_counters(sorter_core::LaneSelection::Both, CounterKind::All);
    let summary = running.stop().unwrap();
    assert_eq!(summary.totals(), Default::default());
}
