// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use switchyard_core::{DeliveryPolicy, Receiver, SwitchyardError};

type Filter<T> = Arc<dyn Fn(&str, &T) -> bool + Send + Sync>;

/// One `on_exception` call captured by a [`RecordingPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedException<T> {
    pub receiver: String,
    pub value: T,
    pub error: String,
    pub panicked: bool,
}

/// Delivery policy recording every failure it is told about.
///
/// Clones share the same record, so a test can keep one clone and hand the
/// other to a hub.
pub struct RecordingPolicy<T> {
    exceptions: Arc<Mutex<Vec<RecordedException<T>>>>,
    filter: Option<Filter<T>>,
}

impl<T: Clone + Send + Sync + 'static> RecordingPolicy<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            exceptions: Arc::new(Mutex::new(Vec::new())),
            filter: None,
        }
    }

    /// Only receivers for which `filter(name, value)` holds are notified.
    #[must_use]
    pub fn with_filter(
        mut self,
        filter: impl Fn(&str, &T) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.filter = Some(Arc::new(filter));
        self
    }

    pub fn exceptions(&self) -> Vec<RecordedException<T>> {
        self.exceptions.lock().clone()
    }

    pub fn exception_count(&self) -> usize {
        self.exceptions.lock().len()
    }
}

impl<T: Clone + Send + Sync + 'static> Default for RecordingPolicy<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for RecordingPolicy<T> {
    fn clone(&self) -> Self {
        Self {
            exceptions: self.exceptions.clone(),
            filter: self.filter.clone(),
        }
    }
}

impl<T> fmt::Debug for RecordingPolicy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingPolicy")
            .field("exceptions", &self.exceptions.lock().len())
            .field("filtered", &self.filter.is_some())
            .finish()
    }
}

impl<T: Clone + Send + Sync> DeliveryPolicy<T> for RecordingPolicy<T> {
    fn is_notifiable(&self, receiver: &dyn Receiver<T>, value: &T) -> bool {
        self.filter
            .as_ref()
            .map_or(true, |filter| filter(receiver.name().as_ref(), value))
    }

    fn on_exception(&self, receiver: &dyn Receiver<T>, value: &T, error: &SwitchyardError) {
        self.exceptions.lock().push(RecordedException {
            receiver: receiver.name().into_owned(),
            value: value.clone(),
            error: error.to_string(),
            panicked: matches!(error, SwitchyardError::CallbackPanic { .. }),
        });
    }
}
