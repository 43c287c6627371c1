// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Receivers with scripted behaviour for delivery tests.

use parking_lot::Mutex;
use std::borrow::Cow;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use switchyard_core::{IntoSwitchyardError, Receiver, ReceiverRef, Result};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Test error: {0}")]
pub struct TestError(pub String);

impl TestError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Records a clone of every value it is notified with.
#[derive(Debug)]
pub struct RecordingReceiver<T> {
    name: String,
    values: Mutex<Vec<T>>,
}

impl<T: Clone + Send + Sync + 'static> RecordingReceiver<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Mutex::new(Vec::new()),
        }
    }

    pub fn shared(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::new(name))
    }

    /// Type-erased handle to this receiver, sharing its identity.
    pub fn as_receiver(self: &Arc<Self>) -> ReceiverRef<T> {
        self.clone()
    }

    /// Values received so far, in arrival order.
    pub fn values(&self) -> Vec<T> {
        self.values.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.values.lock().len()
    }
}

impl<T: Clone + Send + Sync> Receiver<T> for RecordingReceiver<T> {
    fn notify(&self, value: &T) -> Result<()> {
        self.values.lock().push(value.clone());
        Ok(())
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Owned(self.name.clone())
    }
}

/// Fails every notification with a [`TestError`].
#[derive(Debug)]
pub struct FailingReceiver {
    name: String,
    calls: AtomicUsize,
}

impl FailingReceiver {
    pub fn shared(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn as_receiver<T: ?Sized + 'static>(self: &Arc<Self>) -> ReceiverRef<T> {
        self.clone()
    }

    /// Number of notifications attempted on this receiver.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<T: ?Sized> Receiver<T> for FailingReceiver {
    fn notify(&self, _value: &T) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let error = TestError::new(format!("{} refused the value", self.name));
        Err(error.into_switchyard())
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Owned(self.name.clone())
    }
}

/// Panics on every notification.
#[derive(Debug)]
pub struct PanickingReceiver {
    name: String,
    calls: AtomicUsize,
}

impl PanickingReceiver {
    pub fn shared(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn as_receiver<T: ?Sized + 'static>(self: &Arc<Self>) -> ReceiverRef<T> {
        self.clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<T: ?Sized> Receiver<T> for PanickingReceiver {
    fn notify(&self, _value: &T) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        panic!("{} panicked", self.name);
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Owned(self.name.clone())
    }
}
