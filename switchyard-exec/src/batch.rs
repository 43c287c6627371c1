// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Runner that defers work until it is flushed.

use parking_lot::Mutex;
use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use switchyard_core::{Runner, Work};

/// Runner that parks work until the owner flushes it.
///
/// Useful when fan-out must happen at a well-defined point, e.g. once per
/// frame or at the end of a transaction. Clones share the same queue.
///
/// ```
/// use std::sync::Arc;
/// use switchyard_core::{from_fn, MulticastNotifier, ProjectionFlow};
/// use switchyard_exec::BatchRunner;
///
/// let batch = BatchRunner::new();
/// let upstream = ProjectionFlow::<u8, u8>::identity();
/// let notifier = MulticastNotifier::<u8, u8>::identity();
/// notifier
///     .register_sending_flow_with_runner(Some(&upstream), Arc::new(batch.clone()))
///     .unwrap();
/// notifier.attach(from_fn(|_: &u8| Ok(())));
///
/// upstream.notify(1).unwrap();
/// upstream.notify(2).unwrap();
/// assert_eq!(batch.pending(), 2);
/// assert_eq!(batch.flush(), 2);
/// ```
#[derive(Clone, Default)]
pub struct BatchRunner {
    queue: Arc<Mutex<VecDeque<Work>>>,
}

impl BatchRunner {
    /// Creates a runner with an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every unit queued before the call, oldest first, on the calling thread.
    ///
    /// Units queued while the flush is running wait for the next flush. A
    /// unit that panics is logged and the rest of the batch still runs.
    /// Returns the number of units executed, panicked ones included.
    pub fn flush(&self) -> usize {
        let batch = std::mem::take(&mut *self.queue.lock());
        let ran = batch.len();
        for work in batch {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(work)) {
                warn!(
                    "batch runner unit panicked: {}",
                    panic_message(payload.as_ref())
                );
            }
        }
        if ran > 0 {
            debug!("batch runner flushed {} unit(s)", ran);
        }
        ran
    }

    /// Number of queued units.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    /// Drops every queued unit without running it. Returns how many were dropped.
    pub fn discard(&self) -> usize {
        let batch = std::mem::take(&mut *self.queue.lock());
        batch.len()
    }
}

impl Runner for BatchRunner {
    fn run(&self, work: Work) {
        self.queue.lock().push_back(work);
    }
}

impl fmt::Debug for BatchRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchRunner")
            .field("pending", &self.pending())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
