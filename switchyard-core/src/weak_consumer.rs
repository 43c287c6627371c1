// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Receiver decorator that does not keep its consumer alive.
//!
//! A [`SelfPruningWeakConsumer`] holds its consumer through a [`Weak`]. Once
//! every strong reference to the consumer is gone the wrapper reports itself
//! [`Removable`], and the hub evicts it on its next delivery pass.
//!
//! Removal is advisory. A fan-out handed to an asynchronous runner may reach
//! the wrapper after it reported removable, or after it was evicted; such a
//! delivery is a silent no-op.
//!
//! ```
//! use std::sync::Arc;
//! use switchyard_core::{receiver::FnReceiver, weak_receiver, Observable};
//!
//! let hub = Observable::<i32>::new();
//! let consumer = Arc::new(FnReceiver::named("logger", |_: &i32| -> switchyard_core::Result<()> {
//!     Ok(())
//! }));
//! hub.attach(weak_receiver(&consumer));
//!
//! drop(consumer);
//! let delivery = hub.notify_all(1).unwrap();
//! assert_eq!(delivery.pruned, 1);
//! assert_eq!(hub.receiver_count(), 0);
//! ```

use crate::receiver::{Receiver, ReceiverRef, Removable};
use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, Weak};
use switchyard_error::{Result, SwitchyardError};

/// Weakly held receiver that prunes itself once its consumer is dropped.
pub struct SelfPruningWeakConsumer<C: ?Sized> {
    target: Weak<C>,
}

impl<C: ?Sized> SelfPruningWeakConsumer<C> {
    /// Wraps `target` without taking a strong reference to it.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchyardError::NullTarget`] if `target` is absent.
    pub fn new(target: Option<&Arc<C>>) -> Result<Self> {
        let target = target.ok_or(SwitchyardError::NullTarget)?;
        Ok(Self::downgrade(target))
    }

    /// Wraps `target` without taking a strong reference to it.
    #[must_use]
    pub fn downgrade(target: &Arc<C>) -> Self {
        Self {
            target: Arc::downgrade(target),
        }
    }

    /// Resolves the consumer, if it is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Arc<C>> {
        self.target.upgrade()
    }
}

impl<C: ?Sized> Removable for SelfPruningWeakConsumer<C> {
    fn can_remove(&self) -> bool {
        self.target.strong_count() == 0
    }
}

impl<T, C> Receiver<T> for SelfPruningWeakConsumer<C>
where
    T: ?Sized,
    C: Receiver<T> + ?Sized,
{
    fn notify(&self, value: &T) -> Result<()> {
        match self.target.upgrade() {
            Some(target) => target.notify(value),
            None => Ok(()),
        }
    }

    fn name(&self) -> Cow<'static, str> {
        match self.target.upgrade() {
            Some(target) => Cow::Owned(format!("weak {}", target.name())),
            None => Cow::Borrowed("weak consumer (dropped)"),
        }
    }

    fn as_removable(&self) -> Option<&dyn Removable> {
        Some(self)
    }
}

impl<C: ?Sized> fmt::Debug for SelfPruningWeakConsumer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelfPruningWeakConsumer")
            .field("alive", &(self.target.strong_count() > 0))
            .finish()
    }
}

/// Wraps `target` in a [`SelfPruningWeakConsumer`] ready to be attached to a hub.
pub fn weak_receiver<T, C>(target: &Arc<C>) -> ReceiverRef<T>
where
    T: ?Sized + 'static,
    C: Receiver<T> + ?Sized + 'static,
{
    Arc::new(SelfPruningWeakConsumer::downgrade(target))
}
