// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Projection switchboard: one upstream flow, one adaptation, many receivers.
//!
//! A [`MulticastNotifier<T, S>`] plugs itself behind exactly one upstream
//! flow through the upstream's [`HandlerRegistration<S>`] contract. Every
//! source value the upstream emits is adapted once into a `T`, the receiver
//! set is snapshotted, and the fan-out over that snapshot is handed to the
//! [`Runner`] chosen at registration time.
//!
//! ## Example
//!
//! ```
//! use switchyard_core::{receiver::from_fn, MulticastNotifier, ProjectionFlow};
//!
//! let upstream = ProjectionFlow::<u32, u32>::identity();
//! let notifier = MulticastNotifier::new(|celsius: u32| celsius * 9 / 5 + 32);
//! notifier.register_sending_flow(Some(&upstream)).unwrap();
//!
//! notifier.attach(from_fn(|fahrenheit: &u32| {
//!     assert_eq!(*fahrenheit, 212);
//!     Ok(())
//! }));
//!
//! upstream.notify(100).unwrap();
//! ```

use crate::handler_slot::{Handler, HandlerRegistration};
use crate::policy::{DeliveryPolicy, LogAndContinue};
use crate::projection_flow::Adapter;
use crate::receiver::ReceiverRef;
use crate::receiver_set::ReceiverSet;
use crate::runner::{ImmediateRunner, Runner};
use crate::subscription::Subscription;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use switchyard_error::{Result, SwitchyardError};

/// Fans values from a single upstream flow out to a dynamic set of receivers.
pub struct MulticastNotifier<T: 'static, S: 'static> {
    receivers: Arc<ReceiverSet<T>>,
    adapt: Adapter<S, T>,
    policy: Arc<dyn DeliveryPolicy<T>>,
    wired: Arc<AtomicBool>,
}

impl<T, S> MulticastNotifier<T, S>
where
    T: Send + 'static,
    S: 'static,
{
    /// Creates an unwired notifier adapting source values with `adapt`.
    pub fn new(adapt: impl Fn(S) -> T + Send + Sync + 'static) -> Self {
        Self {
            receivers: Arc::new(ReceiverSet::new()),
            adapt: Arc::new(adapt),
            policy: Arc::new(LogAndContinue),
            wired: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replaces the delivery policy.
    ///
    /// Only affects sending flows registered afterwards.
    #[must_use]
    pub fn with_policy(mut self, policy: impl DeliveryPolicy<T> + 'static) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// Plugs this notifier behind `upstream`, delivering synchronously.
    ///
    /// # Errors
    ///
    /// See [`register_sending_flow_with_runner`](Self::register_sending_flow_with_runner).
    pub fn register_sending_flow(
        &self,
        upstream: Option<&dyn HandlerRegistration<S>>,
    ) -> Result<()> {
        self.register_sending_flow_with_runner(upstream, Arc::new(ImmediateRunner))
    }

    /// Plugs this notifier behind `upstream`; each fan-out pass is executed by `runner`.
    ///
    /// The source value is adapted and the receiver set is snapshotted on the
    /// upstream's calling thread; only the delivery loop itself is handed to
    /// the runner.
    ///
    /// # Errors
    ///
    /// - [`SwitchyardError::NullFlow`] if `upstream` is absent.
    /// - [`SwitchyardError::AlreadyAssigned`] if this notifier already has a
    ///   sending flow, or if `upstream` already has a handler.
    pub fn register_sending_flow_with_runner(
        &self,
        upstream: Option<&dyn HandlerRegistration<S>>,
        runner: Arc<dyn Runner>,
    ) -> Result<()> {
        let upstream = upstream.ok_or(SwitchyardError::NullFlow)?;

        if self
            .wired
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SwitchyardError::already_assigned::<S>());
        }

        if let Err(error) = upstream.register_handler(Some(self.fan_out(runner))) {
            self.wired.store(false, Ordering::Release);
            return Err(error);
        }

        debug!(
            "sending flow of {} wired to multicast notifier",
            std::any::type_name::<S>()
        );
        Ok(())
    }

    /// Attaches every listed receiver.
    ///
    /// Same contract as [`Observable::enable`](crate::Observable::enable).
    ///
    /// # Errors
    ///
    /// - [`SwitchyardError::NullHandlerList`] if `receivers` is absent.
    /// - [`SwitchyardError::NullHandlerEntry`] if any entry is absent.
    pub fn attach_receiving_flow(
        &self,
        receivers: Option<&[Option<ReceiverRef<T>>]>,
    ) -> Result<usize> {
        self.receivers.attach_all(receivers)
    }

    /// Detaches every listed receiver.
    ///
    /// Same contract as [`Observable::disable`](crate::Observable::disable).
    pub fn detach_receiving_flow(&self, receivers: Option<&[Option<ReceiverRef<T>>]>) -> usize {
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

    /// Returns `true` once a sending flow has been registered.
    #[must_use]
    pub fn is_wired(&self) -> bool {
        self.wired.load(Ordering::Acquire)
    }

    /// Number of attached receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.receivers.len()
    }

    fn fan_out(&self, runner: Arc<dyn Runner>) -> Handler<S> {
        let receivers = self.receivers.clone();
        let adapt = self.adapt.clone();
        let policy = self.policy.clone();

        Arc::new(move |source: S| {
            let target = adapt(source);
            let snapshot = receivers.snapshot();
            let policy = policy.clone();
            runner.run(Box::new(move || {
                let delivery = snapshot.deliver(&target, policy.as_ref());
                trace!(
                    "fan-out delivered {} skipped {} failed {}",
                    delivery.delivered,
                    delivery.skipped,
                    delivery.failed
                );
            }));
        })
    }
}

impl<T: Send + 'static> MulticastNotifier<T, T> {
    /// Creates a notifier forwarding upstream values unchanged.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(|value| value)
    }
}

impl<T: 'static, S: 'static> Clone for MulticastNotifier<T, S> {
    fn clone(&self) -> Self {
        Self {
            receivers: self.receivers.clone(),
            adapt: self.adapt.clone(),
            policy: self.policy.clone(),
            wired: self.wired.clone(),
        }
    }
}

impl<T: 'static, S: 'static> fmt::Debug for MulticastNotifier<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MulticastNotifier")
            .field("source_type", &std::any::type_name::<S>())
            .field("target_type", &std::any::type_name::<T>())
            .field("wired", &self.wired.load(Ordering::Acquire))
            .field("receivers", &self.receivers)
            .finish_non_exhaustive()
    }
}
