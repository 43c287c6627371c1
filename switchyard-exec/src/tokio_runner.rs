// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Runner backed by a tokio runtime.

use std::fmt;
use switchyard_core::{Runner, Work};
use tokio::runtime::Handle;

/// Runs each unit of work on the blocking pool of a tokio runtime.
///
/// Receivers are synchronous code, so work goes to `spawn_blocking` rather
/// than to the async worker threads. Units may run concurrently and in any
/// order.
#[derive(Clone)]
pub struct TokioRunner {
    handle: Handle,
}

impl TokioRunner {
    /// Runs work on the runtime behind `handle`.
    #[must_use]
    pub const fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Captures the runtime the caller is running in.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime, like [`Handle::current`].
    #[must_use]
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    /// Captures the current runtime, if any.
    #[must_use]
    pub fn try_current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }

    /// Handle of the runtime work is spawned on.
    #[must_use]
    pub const fn handle(&self) -> &Handle {
        &self.handle
    }
}

impl Runner for TokioRunner {
    fn run(&self, work: Work) {
        drop(self.handle.spawn_blocking(work));
    }
}

impl fmt::Debug for TokioRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokioRunner")
            .field("flavor", &self.handle.runtime_flavor())
            .finish()
    }
}
