//! Typed in-process publish/subscribe.
//!
//! # Responsibility
//! - Register handlers per notification type, optionally per kind.
//! - Deliver published notifications synchronously on the caller thread.
//!
//! # Invariants
//! - Each `Notifier<N>` is its own namespace; there are no string keys.
//! - Delivery follows registration order.
//! - Unsubscribing an unknown id is a no-op.

pub mod event;

use std::fmt::{Debug, Formatter};

/// Notification payload with a cheap, comparable kind discriminant.
pub trait Notification {
    type Kind: Copy + Eq + Debug;

    fn kind(&self) -> Self::Kind;
}

/// Handle returned by subscribe calls, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Handler<N> = Box<dyn FnMut(&N) + Send>;

struct Subscription<N: Notification> {
    id: SubscriptionId,
    kind: Option<N::Kind>,
    handler: Handler<N>,
}

/// Registry of handlers for one notification type.
pub struct Notifier<N: Notification> {
    subscriptions: Vec<Subscription<N>>,
    next_id: u64,
}

impl<N: Notification> Default for Notifier<N> {
    fn default() -> Self {
        Self {
            subscriptions: Vec::new(),
            next_id: 0,
        }
    }
}

impl<N: Notification> Debug for Notifier<N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.subscriptions.len())
            .finish()
    }
}

impl<N: Notification> Notifier<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for every notification kind.
    pub fn subscribe(&mut self, handler: impl FnMut(&N) + Send + 'static) -> SubscriptionId {
        self.register(None, Box::new(handler))
    }

    /// Registers a handler invoked only for notifications of `kind`.
    pub fn subscribe_kind(
        &mut self,
        kind: N::Kind,
        handler: impl FnMut(&N) + Send + 'static,
    ) -> SubscriptionId {
        self.register(Some(kind), Box::new(handler))
    }

    /// Removes one registration. Returns whether it existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|subscription| subscription.id != id);
        self.subscriptions.len() != before
    }

    /// Calls every matching handler in registration order.
    ///
    /// Returns the number of handlers invoked.
    pub fn publish(&mut self, notification: &N) -> usize {
        let kind = notification.kind();
        let mut delivered = 0;
        for subscription in &mut self.subscriptions {
            if subscription.kind.map_or(true, |wanted| wanted == kind) {
                (subscription.handler)(notification);
                delivered += 1;
            }
        }
        delivered
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    fn register(&mut self, kind: Option<N::Kind>, handler: Handler<N>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription { id, kind, handler });
        id
    }
}
