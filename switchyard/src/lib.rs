// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # Switchyard
//!
//! In-process notification fan-out: one producer, one adaptation step, any
//! number of consumers.
//!
//! ## Overview
//!
//! - [`ProjectionFlow`]: unicast. Adapts each source value and hands it to a
//!   handler that can be bound exactly once.
//! - [`Observable`]: a hub broadcasting to a concurrently mutable set of
//!   receivers, isolating their failures.
//! - [`MulticastNotifier`]: a hub fed by exactly one upstream flow. Each
//!   upstream value is adapted once and fanned out on a caller-chosen
//!   [`Runner`].
//! - [`SelfPruningWeakConsumer`]: a receiver that does not keep its consumer
//!   alive and is evicted once the consumer is dropped.
//!
//! Execution contexts for the runner seam live in [`exec`].
//!
//! ## Quick Start
//!
//! ```rust
//! use switchyard::prelude::*;
//!
//! let temperatures = ProjectionFlow::<f64, f64>::identity();
//! let alerts = MulticastNotifier::new(|celsius: f64| celsius > 30.0);
//! alerts.register_sending_flow(Some(&temperatures)).unwrap();
//!
//! alerts.attach(from_fn(|hot: &bool| {
//!     if *hot {
//!         println!("too hot");
//!     }
//!     Ok(())
//! }));
//!
//! temperatures.notify(32.5).unwrap();
//! ```

pub use switchyard_core::{
    from_fn, weak_receiver, Adapter, Delivery, DeliveryPolicy, Handler, HandlerRegistration,
    HandlerSlot, ImmediateRunner, LogAndContinue, MulticastNotifier, Observable, ProjectionFlow,
    Receiver, ReceiverRef, Removable, Runner, SelfPruningWeakConsumer, Subscription, Work,
};
pub use switchyard_error::{IntoSwitchyardError, Result, SwitchyardError};

/// Execution contexts for [`MulticastNotifier::register_sending_flow_with_runner`].
pub mod exec {
    pub use switchyard_exec::{BatchRunner, SerialDriver, SerialRunner};

    #[cfg(feature = "runtime-tokio")]
    pub use switchyard_exec::TokioRunner;
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        from_fn, weak_receiver, DeliveryPolicy, HandlerRegistration, MulticastNotifier, Observable,
        ProjectionFlow, Receiver, ReceiverRef, Removable, Runner, SwitchyardError,
    };
}
