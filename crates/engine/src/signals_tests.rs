// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sorter_core::Classification;
use std::sync::Arc;
use std::thread;

const SHORT: Duration = Duration::from_millis(10);

#[test]
fn posts_before_wait_are_not_lost() {
    let signal = CountingSignal::new("test", 4);
    assert_eq!(signal.post(), PostOutcome::Posted);
    assert_eq!(signal.post(), PostOutcome::Posted);
    assert_eq!(signal.pending(), 2);

    assert_eq!(signal.wait(SHORT), WaitOutcome::Taken);
    assert_eq!(signal.wait(SHORT), WaitOutcome::Taken);
    assert_eq!(signal.wait(SHORT), WaitOutcome::TimedOut);
}

#[test]
fn post_beyond_capacity_is_saturated() {
    let signal = CountingSignal::new("test", 1);
    assert_eq!(signal.post(), PostOutcome::Posted);
    assert_eq!(signal.post(), PostOutcome::Saturated);
    assert_eq!(signal.pending(), 1);
}

#[test]
fn wait_times_out_without_post() {
    let signal = CountingSignal::new("test", 1);
    let start = Instant::now();

    assert_eq!(signal.wait(Duration::from_millis(20)), WaitOutcome::TimedOut);
    assert!(start.elapsed() >= Duration::from_millis(20));
}

#[test]
fn post_wakes_blocked_waiter() {
    let signal = Arc::new(CountingSignal::new("test", 1));
    let waiter = Arc::clone(&signal);

    let handle = thread::spawn(move || waiter.wait(Duration::from_secs(10)));
    thread::sleep(SHORT);
    signal.post();

    assert_eq!(handle.join().unwrap(), WaitOutcome::Taken);
    assert_eq!(signal.pending(), 0);
}

#[test]
fn close_releases_waiters_and_refuses_posts() {
    let signal = Arc::new(CountingSignal::new("test", 2));
    let waiter = Arc::clone(&signal);

    let handle = thread::spawn(move || waiter.wait(Duration::from_secs(60)));
    thread::sleep(SHORT);
    signal.close();

    assert_eq!(handle.join().unwrap(), WaitOutcome::Closed);
    assert_eq!(signal.post(), PostOutcome::Closed);
    assert_eq!(signal.wait(SHORT), WaitOutcome::Closed);
}

#[test]
fn unbounded_wait_is_released_by_post_or_close() {
    let signal = Arc::new(CountingSignal::new("test", 2));
    signal.post();
    assert_eq!(signal.wait(Duration::MAX), WaitOutcome::Taken);

    let waiter = Arc::clone(&signal);
    let handle = thread::spawn(move || waiter.wait(Duration::MAX));
    thread::sleep(SHORT);
    signal.close();

    assert_eq!(handle.join().unwrap(), WaitOutcome::Closed);
}

#[test]
fn signal_set_names_each_lane() {
    let signals = SignalSet::new(3);
    assert_eq!(signals.count_ready(Lane::Left).name(), "count-ready-left");
    assert_eq!(signals.gate_ready(Lane::Right).name(), "gate-ready-right");
}

#[test]
fn signal_set_lanes_are_independent() {
    let signals = SignalSet::new(3);
    signals.gate_ready(Lane::Left).post();

    assert_eq!(signals.gate_ready(Lane::Right).wait(SHORT), WaitOutcome::TimedOut);
    assert_eq!(signals.count_ready(Lane::Left).wait(SHORT), WaitOutcome::TimedOut);
    assert_eq!(signals.gate_ready(Lane::Left).wait(SHORT), WaitOutcome::Taken);
}

#[test]
fn close_all_closes_every_signal() {
    let signals = SignalSet::new(3);
    signals.close_all();

    for lane in Lane::ALL {
        assert_eq!(signals.count_ready(lane).post(), PostOutcome::Closed);
        assert_eq!(signals.gate_ready(lane).post(), PostOutcome::Closed);
    }
}

#[test]
fn interface_lock_serializes_tally_updates() {
    let lock = Arc::new(InterfaceLock::default());
    let workers: Vec<_> = (0..4)
        .map(|_| {
            let lock = Arc::clone(&lock);
            thread::spawn(move || {
                for _ in 0..1_000 {
                    let mut tallies = lock.acquire().unwrap();
                    tallies[Lane::Left.index()].record(Classification::Small);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(lock.acquire().unwrap()[Lane::Left.index()].small, 4_000);
}

#[test]
fn poisoned_interface_lock_is_fatal() {
    let lock = Arc::new(InterfaceLock::default());
    let poisoner = Arc::clone(&lock);
    let _ = thread::spawn(move || {
        let _guard = poisoner.acquire().unwrap();
        panic!("poison");
    })
    .join();

    assert!(matches!(lock.acquire(), Err(TaskError::LockPoisoned("interface"))));
    // Operator reads still work
    assert_eq!(lock.acquire_recovering()[0].small, 0);
}
