// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Single-consumer execution over an async channel.
//!
//! [`SerialRunner`] forwards every unit of work to a [`SerialDriver`], which
//! executes them one at a time in submission order from whatever task polls
//! it. The driver is runtime-agnostic: spawn it on tokio, block on it with
//! `futures::executor`, or drive it from any other executor.

use futures::StreamExt;
use futures_channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use std::fmt;
use switchyard_core::{Runner, Work};

/// Sending half: hands work to the paired [`SerialDriver`].
#[derive(Clone)]
pub struct SerialRunner {
    tx: UnboundedSender<Work>,
}

/// Receiving half: executes work sent through any clone of its [`SerialRunner`].
pub struct SerialDriver {
    rx: UnboundedReceiver<Work>,
}

impl SerialRunner {
    /// Creates a connected runner/driver pair.
    #[allow(clippy::new_ret_no_self)]
    #[must_use]
    pub fn new() -> (Self, SerialDriver) {
        let (tx, rx) = mpsc::unbounded();
        (Self { tx }, SerialDriver { rx })
    }

    /// Returns `true` once the driver has been dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl Runner for SerialRunner {
    fn run(&self, work: Work) {
        if self.tx.unbounded_send(work).is_err() {
            warn!("serial driver is gone, dropping delivery work");
        }
    }
}

impl SerialDriver {
    /// Executes work until every [`SerialRunner`] clone has been dropped and
    /// the queue is drained. Returns the number of units executed.
    pub async fn run(mut self) -> usize {
        let mut ran = 0;
        while let Some(work) = self.rx.next().await {
            work();
            ran += 1;
        }
        debug!("serial driver finished after {} unit(s)", ran);
        ran
    }
}

impl fmt::Debug for SerialRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialRunner")
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl fmt::Debug for SerialDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialDriver").finish_non_exhaustive()
    }
}
