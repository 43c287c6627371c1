// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use switchyard_core::{from_fn, MulticastNotifier, Observable, ProjectionFlow};
use switchyard_test_utils::RecordingReceiver;

const THREADS: usize = 8;
const ROUNDS: usize = 200;

#[test]
fn test_concurrent_notifications_reach_every_receiver() -> anyhow::Result<()> {
    // Arrange
    let hub = Observable::<usize>::new();
    let a = RecordingReceiver::<usize>::shared("a");
    let b = RecordingReceiver::<usize>::shared("b");
    hub.attach(a.as_receiver());
    hub.attach(b.as_receiver());

    // Act
    thread::scope(|scope| {
        for t in 0..THREADS {
            let hub = hub.clone();
            scope.spawn(move || {
                for round in 0..ROUNDS {
                    hub.notify_all(t * ROUNDS + round).expect("value");
                }
            });
        }
    });

    // Assert
    assert_eq!(a.count(), THREADS * ROUNDS);
    let mut values = b.values();
    values.sort_unstable();
    assert_eq!(values, (0..THREADS * ROUNDS).collect::<Vec<_>>());
    Ok(())
}

#[test]
fn test_membership_changes_race_with_delivery() {
    // Arrange
    let hub = Observable::<usize>::new();
    let stable = RecordingReceiver::<usize>::shared("stable");
    hub.attach(stable.as_receiver());

    // Act
    thread::scope(|scope| {
        for t in 0..THREADS {
            let hub = hub.clone();
            scope.spawn(move || {
                let churn = RecordingReceiver::<usize>::shared(format!("churn-{t}")).as_receiver();
                for round in 0..ROUNDS {
                    if round % 2 == 0 {
                        hub.attach(churn.clone());
                    } else {
                        hub.detach(&churn);
                    }
                    hub.notify_all(round).expect("value");
                }
            });
        }
    });

    // Assert
    assert_eq!(hub.receiver_count(), 1);
    assert_eq!(stable.count(), THREADS * ROUNDS);
}

#[test]
fn test_no_lock_is_held_while_a_receiver_runs() -> anyhow::Result<()> {
    // Arrange
    let hub = Observable::<u8>::new();
    let (entered_tx, entered_rx) = mpsc::channel::<()>();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let release_rx = Arc::new(parking_lot::Mutex::new(release_rx));
    hub.attach(from_fn(move |_: &u8| {
        entered_tx.send(()).ok();
        release_rx.lock().recv_timeout(Duration::from_secs(5)).ok();
        Ok(())
    }));

    // Act
    let delivering = {
        let hub = hub.clone();
        thread::spawn(move || hub.notify_all(1))
    };
    entered_rx.recv_timeout(Duration::from_secs(5))?;
    let late = RecordingReceiver::<u8>::shared("late");
    let attached = hub.attach(late.as_receiver());
    let count = hub.receiver_count();
    release_tx.send(())?;
    let delivery = delivering.join().expect("delivery thread panicked")?;

    // Assert
    assert!(attached);
    assert_eq!(count, 2);
    assert_eq!(delivery.delivered, 1);
    assert!(late.values().is_empty());
    Ok(())
}

#[test]
fn test_slow_flow_handler_does_not_block_other_callers() -> anyhow::Result<()> {
    // Arrange
    let flow = Arc::new(ProjectionFlow::<u8, u8>::identity());
    let (entered_tx, entered_rx) = mpsc::channel::<u8>();
    let entered_tx = parking_lot::Mutex::new(entered_tx);
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let release_rx = parking_lot::Mutex::new(release_rx);
    flow.on(move |value| {
        entered_tx.lock().send(value).ok();
        if value == 1 {
            release_rx.lock().recv_timeout(Duration::from_secs(5)).ok();
        }
    })?;

    // Act
    let slow = {
        let flow = flow.clone();
        thread::spawn(move || flow.notify(1))
    };
    let first = entered_rx.recv_timeout(Duration::from_secs(5))?;
    flow.notify(2)?;
    let second = entered_rx.recv_timeout(Duration::from_secs(5))?;
    release_tx.send(())?;
    slow.join().expect("notifying thread panicked")?;

    // Assert
    assert_eq!((first, second), (1, 2));
    Ok(())
}

#[test]
fn test_concurrent_upstream_notifications_through_multicast() -> anyhow::Result<()> {
    // Arrange
    let upstream = Arc::new(ProjectionFlow::<usize, usize>::identity());
    let notifier = MulticastNotifier::new(|value: usize| value * 2);
    notifier.register_sending_flow(Some(upstream.as_ref()))?;
    let sink = RecordingReceiver::<usize>::shared("sink");
    notifier.attach(sink.as_receiver());

    // Act
    thread::scope(|scope| {
        for t in 0..THREADS {
            let upstream = upstream.clone();
            scope.spawn(move || {
                for round in 0..ROUNDS {
                    upstream.notify(t * ROUNDS + round).expect("handler");
                }
            });
        }
    });

    // Assert
    let mut values = sink.values();
    values.sort_unstable();
    let expected: Vec<_> = (0..THREADS * ROUNDS).map(|v| v * 2).collect();
    assert_eq!(values, expected);
    Ok(())
}
