// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::receiver::ReceiverRef;
use crate::receiver_set::ReceiverSet;
use std::fmt;
use std::sync::{Arc, Weak};

/// Guard keeping its receiver attached to a hub for as long as it lives.
///
/// Returned by [`Observable::subscribe`](crate::Observable::subscribe) and
/// [`MulticastNotifier::subscribe`](crate::MulticastNotifier::subscribe).
///
/// Each guard holds a lease on the receiver's membership. The receiver is
/// detached when the last lease is returned, unless it was also attached
/// explicitly; an explicit detach removes it regardless of live guards.
/// The guard only holds a weak reference to the hub's membership, so it
/// never keeps a hub alive.
#[must_use = "dropping a Subscription releases its receiver immediately"]
pub struct Subscription<T: ?Sized + 'static> {
    set: Weak<ReceiverSet<T>>,
    receiver: Option<ReceiverRef<T>>,
    lease: u64,
}

impl<T: ?Sized + 'static> Subscription<T> {
    pub(crate) fn attach(set: &Arc<ReceiverSet<T>>, receiver: ReceiverRef<T>) -> Self {
        let lease = set.lease(&receiver);
        Self {
            set: Arc::downgrade(set),
            receiver: Some(receiver),
            lease,
        }
    }

    /// Returns `true` while the membership this guard holds is still attached to a live hub.
    #[must_use]
    pub fn is_active(&self) -> bool {
        match (&self.receiver, self.set.upgrade()) {
            (Some(receiver), Some(set)) => set.holds(receiver, self.lease),
            _ => false,
        }
    }

    /// Returns the lease now.
    ///
    /// Returns `true` if the membership was still attached when the lease
    /// was returned; the receiver itself stays attached while other guards
    /// or an explicit attach still hold it.
    pub fn unsubscribe(mut self) -> bool {
        self.release()
    }

    /// Releases the guard without returning its lease; the receiver stays
    /// attached until it is detached explicitly or evicted.
    pub fn forget(mut self) {
        self.receiver = None;
    }

    fn release(&mut self) -> bool {
        let Some(receiver) = self.receiver.take() else {
            return false;
        };
        self.set
            .upgrade()
            .is_some_and(|set| set.release(&receiver, self.lease))
    }
}

impl<T: ?Sized + 'static> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T: ?Sized + 'static> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
