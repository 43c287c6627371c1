// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Execution-context seam for fan-out delivery.
//!
//! A [`MulticastNotifier`](crate::MulticastNotifier) never spawns threads or
//! tasks. Each fan-out pass is packaged as a [`Work`] unit and handed to a
//! [`Runner`], which decides where and when it runs. [`ImmediateRunner`] runs
//! it inline and is the default.
//!
//! Any `Fn(Work)` closure is a runner:
//!
//! ```
//! use std::sync::Arc;
//! use switchyard_core::runner::{Runner, Work};
//!
//! let runner: Arc<dyn Runner> = Arc::new(|work: Work| work());
//! runner.run(Box::new(|| println!("delivered")));
//! ```

use std::fmt;

/// A zero-argument unit of delivery work.
pub type Work = Box<dyn FnOnce() + Send + 'static>;

/// Executes units of delivery work.
pub trait Runner: Send + Sync {
    /// Run `work` now, later, or elsewhere. The unit must eventually run
    /// exactly once unless the runner itself is torn down.
    fn run(&self, work: Work);
}

impl<F> Runner for F
where
    F: Fn(Work) + Send + Sync,
{
    fn run(&self, work: Work) {
        self(work);
    }
}

/// Runs every unit of work synchronously on the calling thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImmediateRunner;

impl Runner for ImmediateRunner {
    fn run(&self, work: Work) {
        work();
    }
}

impl fmt::Display for ImmediateRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("immediate")
    }
}
