// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Unicast flow: one producer, one adaptation step, one consumer.
//!
//! A [`ProjectionFlow<S, T>`] couples a notify-in side that accepts source
//! values of type `S` with a receiving side (a [`HandlerSlot<T>`]) that binds
//! exactly one consumer of the adapted values.
//!
//! ## Example
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use switchyard_core::ProjectionFlow;
//!
//! let flow = ProjectionFlow::new(|n: u32| format!("#{n}"));
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let sink = seen.clone();
//! flow.on(move |label: String| sink.lock().unwrap().push(label)).unwrap();
//!
//! flow.notify(7).unwrap();
//! assert_eq!(*seen.lock().unwrap(), vec!["#7".to_string()]);
//! ```

use crate::handler_slot::{Handler, HandlerRegistration, HandlerSlot};
use crate::receiver::Receiver;
use std::fmt;
use std::sync::Arc;
use switchyard_error::{Result, SwitchyardError};

/// A pure adaptation function from `S` to `T`.
pub type Adapter<S, T> = Arc<dyn Fn(S) -> T + Send + Sync>;

/// Unicast flow applying an adaptation before invoking its single handler.
pub struct ProjectionFlow<S, T> {
    adapt: Adapter<S, T>,
    slot: HandlerSlot<T>,
}

impl<S, T> ProjectionFlow<S, T> {
    /// Creates a flow adapting every source value with `adapt`.
    pub fn new(adapt: impl Fn(S) -> T + Send + Sync + 'static) -> Self {
        Self {
            adapt: Arc::new(adapt),
            slot: HandlerSlot::new(),
        }
    }

    /// Creates a flow from an already shared adaptation function.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchyardError::NullAdapter`] if `adapt` is absent.
    pub fn from_adapter(adapt: Option<Adapter<S, T>>) -> Result<Self> {
        let adapt = adapt.ok_or(SwitchyardError::NullAdapter)?;
        Ok(Self {
            adapt,
            slot: HandlerSlot::new(),
        })
    }

    /// Pushes a source value through the flow.
    ///
    /// The handler is read once under the slot lock and invoked after the
    /// lock is released, so a slow handler never blocks other callers.
    ///
    /// # Errors
    ///
    /// - [`SwitchyardError::NullSource`] if `source` is absent.
    /// - [`SwitchyardError::NoHandlerRegistered`] if no handler is bound yet.
    pub fn notify(&self, source: impl Into<Option<S>>) -> Result<()> {
        let source = source.into().ok_or(SwitchyardError::NullSource)?;
        let handler = self
            .slot
            .handler()
            .ok_or_else(SwitchyardError::no_handler_registered::<T>)?;

        handler((self.adapt)(source));
        Ok(())
    }

    /// Binds a closure as the flow's handler.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchyardError::AlreadyAssigned`] if a handler is already bound.
    pub fn on(&self, handler: impl Fn(T) + Send + Sync + 'static) -> Result<()> {
        self.register_handler(Some(Arc::new(handler)))
    }

    /// Returns `true` once the receiving side is wired.
    #[must_use]
    pub fn has_handler(&self) -> bool {
        self.slot.is_assigned()
    }
}

impl<T: 'static> ProjectionFlow<T, T> {
    /// Creates a flow forwarding source values unchanged.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(|value| value)
    }
}

impl<S, T> HandlerRegistration<T> for ProjectionFlow<S, T> {
    fn register_handler(&self, handler: Option<Handler<T>>) -> Result<()> {
        self.slot.register_handler(handler)
    }
}

// Lets a unicast flow sit behind a hub as one of its receivers.
impl<S, T> Receiver<S> for ProjectionFlow<S, T>
where
    S: Clone,
{
    fn notify(&self, value: &S) -> Result<()> {
        ProjectionFlow::notify(self, value.clone())
    }
}

impl<S, T> fmt::Debug for ProjectionFlow<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectionFlow")
            .field("source_type", &std::any::type_name::<S>())
            .field("slot", &self.slot)
            .finish()
    }
}
