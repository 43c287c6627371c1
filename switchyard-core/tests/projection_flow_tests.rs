// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use switchyard_core::{Adapter, HandlerRegistration, Observable, ProjectionFlow, SwitchyardError};
use switchyard_test_utils::{person_alice, person_bob, Person};

#[test]
fn test_notify_applies_adaptation_before_handler() -> anyhow::Result<()> {
    // Arrange
    let flow = ProjectionFlow::new(|person: Person| person.greeting());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    flow.on(move |greeting| sink.lock().push(greeting))?;

    // Act
    flow.notify(person_alice())?;
    flow.notify(person_bob())?;

    // Assert
    assert_eq!(
        *seen.lock(),
        vec![
            "Hello, Alice (25)".to_string(),
            "Hello, Bob (30)".to_string(),
        ]
    );
    Ok(())
}

#[test]
fn test_notify_before_registration_fails() {
    let flow = ProjectionFlow::<i32, i32>::identity();

    let err = flow.notify(1).unwrap_err();

    assert!(matches!(err, SwitchyardError::NoHandlerRegistered { .. }));
}

#[test]
fn test_notify_with_absent_source_fails() -> anyhow::Result<()> {
    let flow = ProjectionFlow::<i32, i32>::identity();
    flow.on(|_| {})?;

    let err = flow.notify(None).unwrap_err();

    assert!(matches!(err, SwitchyardError::NullSource));
    Ok(())
}

#[test]
fn test_absent_source_is_reported_before_missing_handler() {
    let flow = ProjectionFlow::<i32, i32>::identity();

    let err = flow.notify(None).unwrap_err();

    assert!(matches!(err, SwitchyardError::NullSource));
}

#[test]
fn test_construction_without_adapter_fails() {
    let err = ProjectionFlow::<i32, String>::from_adapter(None).unwrap_err();
    assert!(matches!(err, SwitchyardError::NullAdapter));
}

#[test]
fn test_construction_from_shared_adapter() -> anyhow::Result<()> {
    // Arrange
    let adapter: Adapter<i32, String> = Arc::new(|n| format!("n={n}"));
    let first = ProjectionFlow::from_adapter(Some(adapter.clone()))?;
    let second = ProjectionFlow::from_adapter(Some(adapter))?;
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = seen.clone();
    first.on(move |s| sink.lock().push(s))?;
    let sink = seen.clone();
    second.on(move |s| sink.lock().push(s))?;

    // Act
    first.notify(1)?;
    second.notify(2)?;

    // Assert
    assert_eq!(*seen.lock(), vec!["n=1".to_string(), "n=2".to_string()]);
    Ok(())
}

#[test]
fn test_double_registration_fails_and_keeps_first_handler() -> anyhow::Result<()> {
    // Arrange
    let flow = ProjectionFlow::<i32, i32>::identity();
    let first = Arc::new(AtomicUsize::new(0));
    let counter = first.clone();
    flow.on(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    })?;

    // Act
    let err = flow.on(|_| panic!("never runs")).unwrap_err();
    flow.notify(5)?;

    // Assert
    assert!(matches!(err, SwitchyardError::AlreadyAssigned { .. }));
    assert_eq!(first.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn test_register_handler_with_absent_handler_fails() {
    let flow = ProjectionFlow::<i32, i32>::identity();

    let err = flow.register_handler(None).unwrap_err();

    assert!(matches!(err, SwitchyardError::NullHandler));
    assert!(!flow.has_handler());
}

#[test]
fn test_slow_handler_does_not_block_other_notifiers() -> anyhow::Result<()> {
    // Arrange
    let flow = Arc::new(ProjectionFlow::<u32, u32>::identity());
    let (entered_tx, entered_rx) = std::sync::mpsc::channel();
    let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
    let release_rx = Mutex::new(release_rx);
    let delivered = Arc::new(AtomicUsize::new(0));

    let counter = delivered.clone();
    flow.on(move |value| {
        if value == 0 {
            entered_tx.send(()).expect("test receiver dropped");
            release_rx.lock().recv().expect("release never sent");
        }
        counter.fetch_add(1, Ordering::SeqCst);
    })?;

    // Act
    let blocked = {
        let flow = flow.clone();
        thread::spawn(move || flow.notify(0))
    };
    entered_rx.recv()?;
    flow.notify(1)?;
    let fast_done = delivered.load(Ordering::SeqCst);
    release_tx.send(())?;
    blocked.join().expect("notifier thread panicked")?;

    // Assert
    assert_eq!(fast_done, 1);
    assert_eq!(delivered.load(Ordering::SeqCst), 2);
    Ok(())
}

#[test]
fn test_flow_as_hub_receiver() -> anyhow::Result<()> {
    // Arrange
    let hub = Observable::<Person>::new();
    let flow = Arc::new(ProjectionFlow::new(|person: Person| person.age));
    let ages = Arc::new(Mutex::new(Vec::new()));
    let sink = ages.clone();
    flow.on(move |age| sink.lock().push(age))?;
    hub.attach(flow.clone());

    // Act
    hub.notify_all(person_alice())?;
    hub.notify_all(person_bob())?;

    // Assert
    assert_eq!(*ages.lock(), vec![25, 30]);
    Ok(())
}

#[test]
fn test_unwired_flow_fails_as_hub_receiver() -> anyhow::Result<()> {
    let hub = Observable::<i32>::new();
    hub.attach(Arc::new(ProjectionFlow::<i32, i32>::identity()));

    let delivery = hub.notify_all(1)?;

    assert_eq!(delivery.failed, 1);
    assert_eq!(delivery.delivered, 0);
    Ok(())
}
