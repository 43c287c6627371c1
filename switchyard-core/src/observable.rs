// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Multi-receiver hub with best-effort broadcast.
//!
//! An [`Observable<T>`] owns a concurrently mutable set of receivers and
//! delivers every value passed to [`notify_all`](Observable::notify_all) to
//! each of them.
//!
//! ## Characteristics
//!
//! - **Snapshot-then-iterate**: the receiver set is copied under its lock and
//!   delivery runs on the copy with no lock held, so receivers may attach,
//!   detach or notify re-entrantly.
//! - **Isolated failures**: a receiver that errors or panics is reported to the
//!   [`DeliveryPolicy`] and the remaining receivers are still served.
//! - **Self-pruning**: receivers exposing [`Removable`](crate::Removable) are
//!   evicted at the start of the first pass after they report removable.
//! - **Shared**: cheap to clone; all clones share the same receivers.
//!
//! ## Example
//!
//! ```
//! use switchyard_core::{receiver::from_fn, Observable};
//!
//! let hub = Observable::<String>::new();
//! let printer = from_fn(|value: &String| {
//!     println!("{value}");
//!     Ok(())
//! });
//!
//! hub.enable(Some(&[Some(printer)][..])).unwrap();
//! let delivery = hub.notify_all("x".to_string()).unwrap();
//! assert_eq!(delivery.delivered, 1);
//! ```

use crate::policy::{DeliveryPolicy, LogAndContinue};
use crate::receiver::ReceiverRef;
use crate::receiver_set::{Delivery, ReceiverSet};
use crate::subscription::Subscription;
use std::fmt;
use std::sync::Arc;
use switchyard_error::{Result, SwitchyardError};

/// A hub broadcasting values to every attached receiver.
pub struct Observable<T: 'static> {
    receivers: Arc<ReceiverSet<T>>,
    policy: Arc<dyn DeliveryPolicy<T>>,
}

impl<T: 'static> Observable<T> {
    /// Creates a hub with no receivers and the [`LogAndContinue`] policy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            receivers: Arc::new(ReceiverSet::new()),
            policy: Arc::new(LogAndContinue),
        }
    }

    /// Replaces the delivery policy.
    #[must_use]
    pub fn with_policy(mut self, policy: impl DeliveryPolicy<T> + 'static) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// Attaches every listed receiver. Attaching a receiver twice is a no-op.
    ///
    /// Returns the number of receivers newly attached.
    ///
    /// # Errors
    ///
    /// - [`SwitchyardError::NullHandlerList`] if `receivers` is absent.
    /// - [`SwitchyardError::NullHandlerEntry`] if any entry is absent; nothing
    ///   is attached in that case.
    pub fn enable(&self, receivers: Option<&[Option<ReceiverRef<T>>]>) -> Result<usize> {
        self.receivers.attach_all(receivers)
    }

    /// Detaches every listed receiver that is attached.
    ///
    /// Unlike [`enable`](Self::enable), an absent list or absent entries are
    /// silently ignored. Returns the number of receivers detached.
    pub fn disable(&self, receivers: Option<&[Option<ReceiverRef<T>>]>) -> usize {
        self.receivers.detach_all(receivers)
    }

    /// Attaches one receiver. Returns `false` if it was already attached.
    pub fn attach(&self, receiver: ReceiverRef<T>) -> bool {
        self.receivers.attach(receiver)
    }

    /// Detaches one receiver. Returns `false` if it was not attached.
    pub fn detach(&self, receiver: &ReceiverRef<T>) -> bool {
        self.receivers.detach(receiver)
    }

    /// Attaches `receiver` for as long as the returned guard lives.
    pub fn subscribe(&self, receiver: ReceiverRef<T>) -> Subscription<T> {
        Subscription::attach(&self.receivers, receiver)
    }

    /// Delivers `value` to every receiver attached when the call starts.
    ///
    /// Receiver failures never surface here; they go to the delivery policy
    /// and are counted in the returned [`Delivery`].
    ///
    /// # Errors
    ///
    /// Returns [`SwitchyardError::NullValue`] if `value` is absent.
    pub fn notify_all(&self, value: impl Into<Option<T>>) -> Result<Delivery> {
        let value = value.into().ok_or(SwitchyardError::NullValue)?;
        let snapshot = self.receivers.snapshot();
        Ok(snapshot.deliver(&value, self.policy.as_ref()))
    }

    /// Number of attached receivers.
    ///
    /// Removable receivers are counted until the next `notify_all` evicts them.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.receivers.len()
    }
}

impl<T: 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            receivers: self.receivers.clone(),
            policy: self.policy.clone(),
        }
    }
}

impl<T: 'static> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("receivers", &self.receivers)
            .finish_non_exhaustive()
    }
}
