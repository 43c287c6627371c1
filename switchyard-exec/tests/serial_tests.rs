// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::Arc;
use switchyard_core::{MulticastNotifier, ProjectionFlow, Runner};
use switchyard_exec::SerialRunner;
use switchyard_test_utils::{person_alice, person_bob, person_charlie, Person, RecordingReceiver};
use tokio::spawn;

#[tokio::test]
async fn test_driver_runs_work_in_submission_order() -> anyhow::Result<()> {
    // Arrange
    let (runner, driver) = SerialRunner::new();
    let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
    for i in 0..5 {
        let order = order.clone();
        runner.run(Box::new(move || order.lock().push(i)));
    }
    drop(runner);

    // Act
    let ran = driver.run().await;

    // Assert
    assert_eq!(ran, 5);
    assert_eq!(*order.lock(), vec![0, 1, 2, 3, 4]);
    Ok(())
}

#[tokio::test]
async fn test_driver_completes_when_every_runner_clone_is_dropped() -> anyhow::Result<()> {
    // Arrange
    let (runner, driver) = SerialRunner::new();
    let clone = runner.clone();
    let handle = spawn(driver.run());

    // Act
    runner.run(Box::new(|| {}));
    drop(runner);
    clone.run(Box::new(|| {}));
    drop(clone);

    // Assert
    assert_eq!(handle.await?, 2);
    Ok(())
}

#[tokio::test]
async fn test_runner_reports_closed_after_driver_drop() {
    let (runner, driver) = SerialRunner::new();
    assert!(!runner.is_closed());

    drop(driver);
    runner.run(Box::new(|| panic!("must not run")));

    assert!(runner.is_closed());
}

#[tokio::test]
async fn test_multicast_through_serial_driver() -> anyhow::Result<()> {
    // Arrange
    let (runner, driver) = SerialRunner::new();
    let upstream = ProjectionFlow::<Person, Person>::identity();
    let notifier = MulticastNotifier::new(|person: Person| person.greeting());
    notifier.register_sending_flow_with_runner(Some(&upstream), Arc::new(runner))?;
    let a = RecordingReceiver::<String>::shared("a");
    let b = RecordingReceiver::<String>::shared("b");
    notifier.attach(a.as_receiver());
    notifier.attach(b.as_receiver());
    let handle = spawn(driver.run());

    // Act
    upstream.notify(person_alice())?;
    upstream.notify(person_bob())?;
    upstream.notify(person_charlie())?;
    drop(upstream);
    drop(notifier);
    let ran = handle.await?;

    // Assert
    let expected = vec![
        "Hello, Alice (25)".to_string(),
        "Hello, Bob (30)".to_string(),
        "Hello, Charlie (35)".to_string(),
    ];
    assert_eq!(ran, 3);
    assert_eq!(a.values(), expected);
    assert_eq!(b.values(), expected);
    Ok(())
}
