// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Overridable delivery hooks.
//!
//! Every hub consults a [`DeliveryPolicy`] for each receiver of a delivery
//! pass: once before delivering (`is_notifiable`) and once more if the
//! receiver fails (`on_exception`). Failures are either an error returned by
//! [`Receiver::notify`] or a panic caught around it.

use crate::receiver::Receiver;
use switchyard_error::SwitchyardError;

/// Hooks consulted by hubs during fan-out.
///
/// Both hooks run outside every hub lock, on whichever thread performs the
/// delivery.
///
/// ```
/// use switchyard_core::{DeliveryPolicy, Receiver};
///
/// /// Only delivers even numbers.
/// struct EvenOnly;
///
/// impl DeliveryPolicy<u64> for EvenOnly {
///     fn is_notifiable(&self, _receiver: &dyn Receiver<u64>, value: &u64) -> bool {
///         value % 2 == 0
///     }
/// }
/// ```
pub trait DeliveryPolicy<T: ?Sized>: Send + Sync {
    /// Decides whether `receiver` gets `value`. Defaults to always.
    fn is_notifiable(&self, receiver: &dyn Receiver<T>, value: &T) -> bool {
        let _ = (receiver, value);
        true
    }

    /// Called once per failed receiver. Defaults to a warning log.
    fn on_exception(&self, receiver: &dyn Receiver<T>, value: &T, error: &SwitchyardError) {
        let _ = value;
        warn!(
            "receiver {} failed during delivery: {}",
            receiver.name(),
            error
        );
    }
}

/// The default policy: deliver to everyone, log failures, keep going.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogAndContinue;

impl<T: ?Sized> DeliveryPolicy<T> for LogAndContinue {}
