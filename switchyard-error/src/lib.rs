// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Error types for the Switchyard notification library
//!
//! This crate defines the root [`SwitchyardError`] type shared by every
//! Switchyard crate. Errors fall into two categories:
//!
//! - **Usage errors** are raised synchronously to the caller that wired or
//!   drove a flow incorrectly (double assignment, absent arguments, notifying
//!   before wiring). They are never swallowed and never retried.
//! - **Delivery errors** are produced by an individual receiver while a value
//!   is fanned out. The hub catches them, routes them to its delivery policy
//!   and carries on with the remaining receivers.
//!
//! # Examples
//!
//! ```
//! use switchyard_error::{Result, SwitchyardError};
//!
//! fn wire(already_wired: bool) -> Result<()> {
//!     if already_wired {
//!         return Err(SwitchyardError::already_assigned::<String>());
//!     }
//!     Ok(())
//! }
//!
//! let err = wire(true).unwrap_err();
//! assert!(err.is_usage_error());
//! ```

/// Root error type for all Switchyard operations
#[derive(Debug, thiserror::Error)]
pub enum SwitchyardError {
    /// A single-assignment handler slot already holds a handler
    #[error("Handler already assigned for messages of type {message_type}")]
    AlreadyAssigned {
        /// Type name of the message the slot carries
        message_type: &'static str,
    },

    /// An absent handler was offered to a handler slot
    #[error("Handler must not be absent")]
    NullHandler,

    /// A projection flow was constructed without an adaptation function
    #[error("Adaptation function must not be absent")]
    NullAdapter,

    /// A flow was notified with an absent source value
    #[error("Source value must not be absent")]
    NullSource,

    /// A hub was asked to broadcast an absent value
    #[error("Notification value must not be absent")]
    NullValue,

    /// An absent upstream flow was offered as a sending flow
    #[error("Sending flow must not be absent")]
    NullFlow,

    /// A weak consumer was constructed without a target
    #[error("Weak consumer target must not be absent")]
    NullTarget,

    /// The receiver list passed to an attach operation was absent
    #[error("Receiver list must not be absent")]
    NullHandlerList,

    /// One entry of the receiver list passed to an attach operation was absent
    #[error("Receiver list entry {index} must not be absent")]
    NullHandlerEntry {
        /// Position of the absent entry in the list
        index: usize,
    },

    /// A flow was notified before any handler was registered on it
    #[error("No handler registered for messages of type {message_type}")]
    NoHandlerRegistered {
        /// Type name of the message the slot carries
        message_type: &'static str,
    },

    /// Custom error returned by a receiver
    ///
    /// This wraps errors produced by receiver implementations during delivery.
    #[error("Receiver error: {0}")]
    ReceiverError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A receiver panicked during delivery
    ///
    /// The panic is caught by the hub and converted to this variant before it
    /// reaches the delivery policy.
    #[error("Receiver callback panicked: {context}")]
    CallbackPanic {
        /// Panic payload, when it was a string
        context: String,
    },
}

impl SwitchyardError {
    /// Create an `AlreadyAssigned` error for a slot carrying messages of type `T`
    #[must_use]
    pub fn already_assigned<T: ?Sized>() -> Self {
        Self::AlreadyAssigned {
            message_type: std::any::type_name::<T>(),
        }
    }

    /// Create a `NoHandlerRegistered` error for a slot carrying messages of type `T`
    #[must_use]
    pub fn no_handler_registered<T: ?Sized>() -> Self {
        Self::NoHandlerRegistered {
            message_type: std::any::type_name::<T>(),
        }
    }

    /// Wrap a receiver error
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::ReceiverError(Box::new(error))
    }

    /// Create a callback panic error with the given context
    pub fn callback_panic(context: impl Into<String>) -> Self {
        Self::CallbackPanic {
            context: context.into(),
        }
    }

    /// Check if this error was raised by incorrect wiring or driving of a flow
    #[must_use]
    pub const fn is_usage_error(&self) -> bool {
        !self.is_delivery_error()
    }

    /// Check if this error was produced by a single receiver during delivery
    #[must_use]
    pub const fn is_delivery_error(&self) -> bool {
        matches!(self, Self::ReceiverError(_) | Self::CallbackPanic { .. })
    }

    /// Check if this is a recoverable error
    ///
    /// Nothing in Switchyard retries; retrying is left to receivers and runners.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        false
    }
}

/// Specialized Result type for Switchyard operations
///
/// # Examples
///
/// ```
/// use switchyard_error::Result;
///
/// fn wire() -> Result<&'static str> {
///     Ok("wired")
/// }
/// ```
pub type Result<T> = std::result::Result<T, SwitchyardError>;

/// Extension trait for converting errors into `SwitchyardError`
///
/// Implemented for every `std::error::Error + Send + Sync + 'static`, so a
/// receiver can write `work().map_err(IntoSwitchyardError::into_switchyard)`.
pub trait IntoSwitchyardError {
    /// Convert this error into a `SwitchyardError::ReceiverError`
    fn into_switchyard(self) -> SwitchyardError;
}

impl<E: std::error::Error + Send + Sync + 'static> IntoSwitchyardError for E {
    fn into_switchyard(self) -> SwitchyardError {
        SwitchyardError::user_error(self)
    }
}
