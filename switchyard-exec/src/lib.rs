// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![warn(missing_docs)]
#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Execution contexts for [`MulticastNotifier`](switchyard_core::MulticastNotifier) fan-out.
//!
//! Hubs never pick an execution context themselves; a caller passes one of
//! these to `register_sending_flow_with_runner`:
//!
//! - [`BatchRunner`]: queue work and run it on demand.
//! - [`SerialRunner`]: run work one unit at a time on a driver future.
//! - [`TokioRunner`] (feature `runtime-tokio`): run work on the tokio blocking pool.

#[macro_use]
mod logging;

pub mod batch;
pub mod serial;
#[cfg(feature = "runtime-tokio")]
pub mod tokio_runner;

pub use batch::BatchRunner;
pub use serial::{SerialDriver, SerialRunner};
#[cfg(feature = "runtime-tokio")]
pub use tokio_runner::TokioRunner;
