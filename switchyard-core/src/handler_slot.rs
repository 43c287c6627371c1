// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Single-assignment handler binding.
//!
//! A [`HandlerSlot`] holds at most one [`Handler`] and refuses every
//! assignment after the first. Wiring code sees it through the
//! [`HandlerRegistration`] contract, which is also how a
//! [`MulticastNotifier`](crate::MulticastNotifier) plugs itself behind an
//! upstream flow.

use crate::mutex::Mutex;
use std::fmt;
use std::sync::Arc;
use switchyard_error::{Result, SwitchyardError};

/// A consumer of values of type `T`.
pub type Handler<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Contract for wiring the single consumer of a flow.
pub trait HandlerRegistration<T>: Send + Sync {
    /// Bind `handler` as the one and only consumer.
    ///
    /// # Errors
    ///
    /// - [`SwitchyardError::AlreadyAssigned`] if a handler is already bound,
    ///   whatever `handler` is.
    /// - [`SwitchyardError::NullHandler`] if `handler` is absent. The slot is
    ///   left untouched, so a later valid registration still succeeds.
    fn register_handler(&self, handler: Option<Handler<T>>) -> Result<()>;
}

/// Holds the handler of a flow; set exactly once, read many times, never cleared.
pub struct HandlerSlot<T> {
    handler: Mutex<Option<Handler<T>>>,
}

impl<T> HandlerSlot<T> {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handler: Mutex::new(None),
        }
    }

    /// Returns the bound handler, if any.
    ///
    /// The handler is cloned out so callers invoke it after the slot lock is
    /// released.
    #[must_use]
    pub fn handler(&self) -> Option<Handler<T>> {
        self.handler.lock().clone()
    }

    /// Returns `true` once a handler has been bound.
    #[must_use]
    pub fn is_assigned(&self) -> bool {
        self.handler.lock().is_some()
    }
}

impl<T> HandlerRegistration<T> for HandlerSlot<T> {
    fn register_handler(&self, handler: Option<Handler<T>>) -> Result<()> {
        let mut slot = self.handler.lock();
        if slot.is_some() {
            return Err(SwitchyardError::already_assigned::<T>());
        }

        let handler = handler.ok_or(SwitchyardError::NullHandler)?;
        *slot = Some(handler);
        trace!("handler assigned for {}", std::any::type_name::<T>());
        Ok(())
    }
}

impl<T> Default for HandlerSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for HandlerSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerSlot")
            .field("message_type", &std::any::type_name::<T>())
            .field("assigned", &self.is_assigned())
            .finish()
    }
}
