// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! In-process fan-out primitives.
//!
//! Switchyard moves a value from one producer, through an adaptation step,
//! to a dynamic set of consumers:
//!
//! - [`HandlerSlot`]: a handler binding that can be set exactly once.
//! - [`ProjectionFlow`]: unicast flow; adapts each source value and hands it
//!   to its single handler.
//! - [`Observable`]: a hub broadcasting values to every attached receiver.
//! - [`MulticastNotifier`]: a hub fed by exactly one upstream flow, adapting
//!   each upstream value once before fanning it out.
//! - [`SelfPruningWeakConsumer`]: a weakly held receiver that asks to be
//!   evicted once its consumer is gone.
//!
//! Hubs never spawn threads. Delivery runs on the caller's thread unless a
//! [`Runner`] is supplied, and no lock is held while receiver code runs.

#[macro_use]
mod logging;

pub mod handler_slot;
pub mod multicast;
pub mod mutex;
pub mod observable;
pub mod policy;
pub mod projection_flow;
pub mod receiver;
pub mod receiver_set;
pub mod runner;
pub mod subscription;
pub mod weak_consumer;

pub use self::handler_slot::{Handler, HandlerRegistration, HandlerSlot};
pub use self::multicast::MulticastNotifier;
pub use self::observable::Observable;
pub use self::policy::{DeliveryPolicy, LogAndContinue};
pub use self::projection_flow::{Adapter, ProjectionFlow};
pub use self::receiver::{from_fn, Receiver, ReceiverRef, Removable};
pub use self::receiver_set::{Delivery, ReceiverSet, Snapshot};
pub use self::runner::{ImmediateRunner, Runner, Work};
pub use self::subscription::Subscription;
pub use self::weak_consumer::{weak_receiver, SelfPruningWeakConsumer};
pub use switchyard_error::{IntoSwitchyardError, Result, SwitchyardError};
