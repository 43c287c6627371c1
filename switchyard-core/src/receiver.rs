// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Receiver-side contracts shared by every hub.
//!
//! A [`Receiver`] consumes values fanned out by an
//! [`Observable`](crate::Observable) or a
//! [`MulticastNotifier`](crate::MulticastNotifier). A receiver that can
//! outlive its purpose additionally exposes the [`Removable`] capability
//! through [`Receiver::as_removable`]; hubs poll it before each delivery pass
//! and evict receivers that report themselves removable.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use switchyard_error::Result;

/// Shared handle to a type-erased receiver.
///
/// Two handles denote the same receiver when they point at the same
/// allocation; see [`same_receiver`].
pub type ReceiverRef<T> = Arc<dyn Receiver<T>>;

/// Consumes values delivered by a hub.
///
/// `notify` may be called concurrently from several threads and must not
/// assume any ordering relative to other receivers. Returning an error, or
/// panicking, only affects this receiver: the hub reports the failure to its
/// [`DeliveryPolicy`](crate::DeliveryPolicy) and keeps delivering.
pub trait Receiver<T: ?Sized>: Send + Sync {
    /// Handle one delivered value.
    ///
    /// # Errors
    ///
    /// Any error is routed to the hub's delivery policy; it never reaches the
    /// producer.
    fn notify(&self, value: &T) -> Result<()>;

    /// Name used in diagnostics.
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed(std::any::type_name::<Self>())
    }

    /// Query the optional [`Removable`] capability.
    fn as_removable(&self) -> Option<&dyn Removable> {
        None
    }
}

/// Capability of a receiver that may become useless on its own.
pub trait Removable {
    /// `true` once the receiver can be dropped from its hub.
    ///
    /// The answer is advisory: it holds at the time of the call only, and a
    /// delivery already in flight may still reach the receiver afterwards.
    fn can_remove(&self) -> bool;
}

/// Identity comparison between receiver handles.
#[must_use]
pub fn same_receiver<T: ?Sized>(a: &ReceiverRef<T>, b: &ReceiverRef<T>) -> bool {
    std::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
}

/// A receiver backed by a closure.
///
/// Built with [`from_fn`] or [`FnReceiver::named`].
pub struct FnReceiver<F> {
    f: F,
    name: Cow<'static, str>,
}

impl<F> FnReceiver<F> {
    /// Wrap `f` under an explicit diagnostic name.
    pub fn named(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            f,
            name: name.into(),
        }
    }
}

impl<T, F> Receiver<T> for FnReceiver<F>
where
    T: ?Sized,
    F: Fn(&T) -> Result<()> + Send + Sync,
{
    fn notify(&self, value: &T) -> Result<()> {
        (self.f)(value)
    }

    fn name(&self) -> Cow<'static, str> {
        self.name.clone()
    }
}

impl<F> fmt::Debug for FnReceiver<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnReceiver")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Build a shared receiver from a closure.
///
/// ```
/// use switchyard_core::receiver::from_fn;
///
/// let receiver = from_fn(|value: &i32| {
///     println!("got {value}");
///     Ok(())
/// });
/// assert!(receiver.as_removable().is_none());
/// ```
pub fn from_fn<T, F>(f: F) -> ReceiverRef<T>
where
    T: ?Sized + 'static,
    F: Fn(&T) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(FnReceiver::named("fn receiver", f))
}
