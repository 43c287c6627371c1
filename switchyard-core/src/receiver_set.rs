// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Concurrently mutable receiver membership with snapshot-then-iterate delivery.
//!
//! [`ReceiverSet`] is the membership primitive behind both
//! [`Observable`](crate::Observable) and
//! [`MulticastNotifier`](crate::MulticastNotifier):
//!
//! - Membership is keyed by receiver identity, so attaching the same handle
//!   twice keeps a single entry.
//! - Every mutation happens under one short-lived lock.
//! - A delivery pass works on a [`Snapshot`] taken before any receiver runs;
//!   receivers attached or detached while the pass is in progress do not
//!   change what that pass delivers to.
//! - Removable receivers are evicted when a snapshot is taken.
//!
//! An entry stays attached while it is pinned by an explicit attach or held
//! by at least one [`Subscription`](crate::Subscription). An explicit detach
//! removes it regardless of outstanding subscriptions.
//!
//! No lock is held while user code runs, including `can_remove` queries and
//! the destructors of evicted receivers.

use crate::mutex::Mutex;
use crate::policy::DeliveryPolicy;
use crate::receiver::{same_receiver, ReceiverRef};
use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use switchyard_error::{Result, SwitchyardError};

/// Outcome of one delivery pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Receivers whose `notify` returned `Ok`.
    pub delivered: usize,
    /// Receivers the policy declared not notifiable.
    pub skipped: usize,
    /// Receivers that returned an error or panicked.
    pub failed: usize,
    /// Removable receivers evicted before the pass.
    pub pruned: usize,
}

impl Delivery {
    /// Number of receivers in the snapshot the pass worked on.
    #[must_use]
    pub const fn attempted(&self) -> usize {
        self.delivered + self.skipped + self.failed
    }

    /// `true` if no receiver failed.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

struct Entry<T: ?Sized> {
    receiver: ReceiverRef<T>,
    id: u64,
    pinned: bool,
    leases: usize,
}

struct Members<T: ?Sized> {
    entries: Vec<Entry<T>>,
    next_id: u64,
}

impl<T: ?Sized> Members<T> {
    fn position(&self, receiver: &ReceiverRef<T>) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| same_receiver(&entry.receiver, receiver))
    }

    fn insert(&mut self, receiver: ReceiverRef<T>, pinned: bool, leases: usize) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Entry {
            receiver,
            id,
            pinned,
            leases,
        });
        id
    }

    /// Pins `receiver`, adding it if absent. Returns `true` if it was added.
    fn pin(&mut self, receiver: &ReceiverRef<T>) -> bool {
        match self.position(receiver) {
            Some(pos) => {
                self.entries[pos].pinned = true;
                false
            }
            None => {
                self.insert(receiver.clone(), true, 0);
                true
            }
        }
    }
}

/// Set of receivers, unique by identity.
pub struct ReceiverSet<T: ?Sized> {
    members: Mutex<Members<T>>,
}

impl<T: ?Sized> ReceiverSet<T> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            members: Mutex::new(Members {
                entries: Vec::new(),
                next_id: 0,
            }),
        }
    }

    /// Adds every listed receiver not already present.
    ///
    /// The whole list is validated before the set is touched, so a rejected
    /// call attaches nothing. Returns the number of receivers newly added.
    ///
    /// # Errors
    ///
    /// - [`SwitchyardError::NullHandlerList`] if `receivers` is absent.
    /// - [`SwitchyardError::NullHandlerEntry`] if any entry is absent.
    pub fn attach_all(&self, receivers: Option<&[Option<ReceiverRef<T>>]>) -> Result<usize> {
        let receivers = receivers.ok_or(SwitchyardError::NullHandlerList)?;
        if let Some(index) = receivers.iter().position(Option::is_none) {
            return Err(SwitchyardError::NullHandlerEntry { index });
        }

        let mut members = self.members.lock();
        let mut added = 0;
        for receiver in receivers.iter().flatten() {
            if members.pin(receiver) {
                added += 1;
            }
        }

        trace!(
            "attached {} receiver(s), {} live",
            added,
            members.entries.len()
        );
        Ok(added)
    }

    /// Removes every listed receiver that is present.
    ///
    /// An absent list, or absent entries, are ignored. Returns the number of
    /// receivers removed.
    pub fn detach_all(&self, receivers: Option<&[Option<ReceiverRef<T>>]>) -> usize {
        let Some(receivers) = receivers else {
            return 0;
        };

        let mut removed = Vec::new();
        {
            let mut members = self.members.lock();
            for receiver in receivers.iter().flatten() {
                if let Some(pos) = members.position(receiver) {
                    removed.push(members.entries.remove(pos));
                }
            }
            trace!(
                "detached {} receiver(s), {} live",
                removed.len(),
                members.entries.len()
            );
        }

        removed.len()
    }

    /// Adds one receiver. Returns `false` if it was already present.
    pub fn attach(&self, receiver: ReceiverRef<T>) -> bool {
        self.members.lock().pin(&receiver)
    }

    /// Removes one receiver. Returns `false` if it was not present.
    pub fn detach(&self, receiver: &ReceiverRef<T>) -> bool {
        let mut members = self.members.lock();
        let Some(pos) = members.position(receiver) else {
            return false;
        };
        let removed = members.entries.remove(pos);
        drop(members);
        drop(removed);
        true
    }

    /// Takes a subscription lease on `receiver`, adding it if absent.
    ///
    /// Returns the id of the entry the lease belongs to.
    pub(crate) fn lease(&self, receiver: &ReceiverRef<T>) -> u64 {
        let mut members = self.members.lock();
        match members.position(receiver) {
            Some(pos) => {
                let entry = &mut members.entries[pos];
                entry.leases += 1;
                entry.id
            }
            None => members.insert(receiver.clone(), false, 1),
        }
    }

    /// Returns a lease taken by [`lease`](Self::lease).
    ///
    /// The entry is removed once it is neither pinned nor leased. Returns
    /// `false` if the entry the lease belonged to is already gone.
    pub(crate) fn release(&self, receiver: &ReceiverRef<T>, id: u64) -> bool {
        let mut members = self.members.lock();
        let Some(pos) = members.position(receiver) else {
            return false;
        };

        let entry = &mut members.entries[pos];
        if entry.id != id {
            return false;
        }
        entry.leases = entry.leases.saturating_sub(1);
        if entry.leases > 0 || entry.pinned {
            return true;
        }

        let removed = members.entries.remove(pos);
        drop(members);
        drop(removed);
        true
    }

    /// Returns `true` while the entry a lease belongs to is attached.
    pub(crate) fn holds(&self, receiver: &ReceiverRef<T>, id: u64) -> bool {
        let members = self.members.lock();
        members
            .position(receiver)
            .is_some_and(|pos| members.entries[pos].id == id)
    }

    /// Returns `true` if `receiver` is currently attached.
    #[must_use]
    pub fn contains(&self, receiver: &ReceiverRef<T>) -> bool {
        self.members.lock().position(receiver).is_some()
    }

    /// Number of attached receivers, removable ones included until the next snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.lock().entries.len()
    }

    /// Returns `true` if no receiver is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.lock().entries.is_empty()
    }

    /// Captures the receivers a delivery pass will work on.
    ///
    /// Receivers reporting [`Removable::can_remove`](crate::Removable::can_remove)
    /// are left out of the snapshot and evicted from the live set.
    pub fn snapshot(&self) -> Snapshot<T> {
        let candidates: Vec<ReceiverRef<T>> = self
            .members
            .lock()
            .entries
            .iter()
            .map(|entry| entry.receiver.clone())
            .collect();

        let (evicted, receivers): (Vec<_>, Vec<_>) =
            candidates.into_iter().partition(ready_to_remove);

        if !evicted.is_empty() {
            let mut members = self.members.lock();
            members.entries.retain(|entry| {
                !evicted
                    .iter()
                    .any(|gone| same_receiver(gone, &entry.receiver))
            });
            drop(members);
            debug!("evicted {} removable receiver(s)", evicted.len());
        }

        Snapshot {
            receivers,
            pruned: evicted.len(),
        }
    }
}

impl<T: ?Sized> Default for ReceiverSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for ReceiverSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReceiverSet")
            .field("len", &self.len())
            .finish()
    }
}

/// Immutable list of receivers captured at the start of a delivery pass.
pub struct Snapshot<T: ?Sized> {
    receivers: Vec<ReceiverRef<T>>,
    pruned: usize,
}

impl<T: ?Sized> Snapshot<T> {
    /// Number of receivers captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.receivers.len()
    }

    /// Returns `true` if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.receivers.is_empty()
    }

    /// Number of removable receivers evicted while capturing.
    #[must_use]
    pub const fn pruned(&self) -> usize {
        self.pruned
    }

    /// Captured receivers.
    pub fn iter(&self) -> impl Iterator<Item = &ReceiverRef<T>> {
        self.receivers.iter()
    }

    /// Delivers `value` to every captured receiver the policy accepts.
    ///
    /// Each receiver is isolated: an error or a panic is handed to
    /// [`DeliveryPolicy::on_exception`] and delivery moves on to the next
    /// receiver.
    pub fn deliver(&self, value: &T, policy: &dyn DeliveryPolicy<T>) -> Delivery {
        let mut delivery = Delivery {
            pruned: self.pruned,
            ..Delivery::default()
        };

        for receiver in &self.receivers {
            let receiver = &**receiver;
            if !policy.is_notifiable(receiver, value) {
                delivery.skipped += 1;
                continue;
            }

            let error = match catch_unwind(AssertUnwindSafe(|| receiver.notify(value))) {
                Ok(Ok(())) => {
                    delivery.delivered += 1;
                    continue;
                }
                Ok(Err(error)) => error,
                Err(payload) => SwitchyardError::callback_panic(panic_message(payload.as_ref())),
            };

            delivery.failed += 1;
            policy.on_exception(receiver, value, &error);
        }

        delivery
    }
}

impl<T: ?Sized> fmt::Debug for Snapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("len", &self.receivers.len())
            .field("pruned", &self.pruned)
            .finish()
    }
}

fn ready_to_remove<T: ?Sized>(receiver: &ReceiverRef<T>) -> bool {
    receiver
        .as_removable()
        .is_some_and(|removable| removable.can_remove())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
