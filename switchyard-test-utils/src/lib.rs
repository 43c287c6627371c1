// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the Switchyard notification library.
//!
//! This crate provides receivers that record or misbehave on purpose, a
//! delivery policy that records every reported failure, and small fixture
//! types. It is designed for use in development and testing only, not for
//! production code.
//!
//! # Key Types
//!
//! - [`RecordingReceiver`]: stores every value it is notified with.
//! - [`FailingReceiver`]: returns a [`TestError`] from every notification.
//! - [`PanickingReceiver`]: panics on every notification.
//! - [`RecordingPolicy`]: records `on_exception` calls and can filter deliveries.
//!
//! # Examples
//!
//! ```rust
//! use switchyard_core::Observable;
//! use switchyard_test_utils::{entries, RecordingReceiver};
//!
//! let hub = Observable::<u8>::new();
//! let a = RecordingReceiver::shared("a");
//! hub.enable(Some(entries(&[&a.as_receiver()]).as_slice())).unwrap();
//!
//! hub.notify_all(1).unwrap();
//! assert_eq!(a.values(), vec![1]);
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod helpers;
pub mod person;
pub mod policy;
pub mod receivers;

pub use helpers::entries;
pub use person::{person_alice, person_bob, person_charlie, Person};
pub use policy::{RecordedException, RecordingPolicy};
pub use receivers::{FailingReceiver, PanickingReceiver, RecordingReceiver, TestError};
