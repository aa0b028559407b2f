//! Synchronous publish/subscribe channel for graph events
//!
//! The bus is owned by a single [`DocumentGraph`](crate::services::DocumentGraph);
//! there is no process-wide registry. Publishing runs every matching handler
//! in subscription order on the caller's thread. A handler that returns an
//! error (or panics) is logged and skipped; the remaining handlers still run
//! and the graph's own state is never affected by handler outcomes.

use super::{EventKind, GraphEvent};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// Observer callback invoked for each published event it subscribed to
pub type EventHandler = Box<dyn FnMut(&GraphEvent) -> anyhow::Result<()> + Send>;

/// Handle returned by `subscribe`, used to unsubscribe later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: SubscriptionId,
    /// `None` subscribes to every kind
    kind: Option<EventKind>,
    handler: EventHandler,
}

/// In-process observer registry for one document graph
#[derive(Default)]
pub struct NotificationBus {
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events of `kind`
    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&GraphEvent) -> anyhow::Result<()> + Send + 'static,
    {
        self.register(Some(kind), Box::new(handler))
    }

    /// Register `handler` for every event kind
    pub fn subscribe_all<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&GraphEvent) -> anyhow::Result<()> + Send + 'static,
    {
        self.register(None, Box::new(handler))
    }

    fn register(&mut self, kind: Option<EventKind>, handler: EventHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription { id, kind, handler });
        tracing::debug!("Registered subscription {:?} for {:?}", id, kind);
        id
    }

    /// Remove a subscription. Returns false if the handle was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        before != self.subscriptions.len()
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Deliver `event` to every handler subscribed to its kind.
    ///
    /// Returns the number of handlers that completed successfully.
    pub fn publish(&mut self, event: &GraphEvent) -> usize {
        let kind = event.kind();
        let mut delivered = 0;

        for subscription in self
            .subscriptions
            .iter_mut()
            .filter(|s| s.kind.map_or(true, |k| k == kind))
        {
            let handler = &mut subscription.handler;
            match panic::catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(e)) => {
                    tracing::warn!(
                        "Handler {:?} failed on {}: {}",
                        subscription.id,
                        event.event_type(),
                        e
                    );
                }
                Err(_) => {
                    tracing::warn!(
                        "Handler {:?} panicked on {}",
                        subscription.id,
                        event.event_type()
                    );
                }
            }
        }

        delivered
    }
}

impl fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationBus")
            .field("subscriptions", &self.subscriptions.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NodeId;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn created(raw: u64) -> GraphEvent {
        GraphEvent::NodeCreated {
            id: NodeId::new(raw),
        }
    }

    #[test]
    fn test_publish_respects_kind_filter() {
        let mut bus = NotificationBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        bus.subscribe(EventKind::EdgeCreated, move |e| {
            sink.lock().push(e.clone());
            Ok(())
        });

        assert_eq!(bus.publish(&created(0)), 0);
        let edge = GraphEvent::EdgeCreated {
            head: NodeId::new(0),
            tail: NodeId::new(1),
        };
        assert_eq!(bus.publish(&edge), 1);
        assert_eq!(*seen.lock(), vec![edge]);
    }

    #[test]
    fn test_handlers_run_in_subscription_order() {
        let mut bus = NotificationBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let sink = order.clone();
            bus.subscribe_all(move |_| {
                sink.lock().push(tag);
                Ok(())
            });
        }

        bus.publish(&created(1));
        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_failing_handler_does_not_stop_dispatch() {
        let mut bus = NotificationBus::new();
        let count = Arc::new(Mutex::new(0));

        bus.subscribe_all(|_| anyhow::bail!("observer broke"));
        bus.subscribe_all(|_| panic!("observer panicked"));
        let sink = count.clone();
        bus.subscribe_all(move |_| {
            *sink.lock() += 1;
            Ok(())
        });

        assert_eq!(bus.publish(&created(2)), 1);
        assert_eq!(*count.lock(), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let mut bus = NotificationBus::new();
        let a = bus.subscribe_all(|_| Ok(()));
        let b = bus.subscribe(EventKind::NodeSplit, |_| Ok(()));
        assert_ne!(a, b);
        assert_eq!(bus.subscriber_count(), 2);

        assert!(bus.unsubscribe(a));
        assert!(!bus.unsubscribe(a));
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(bus.publish(&created(3)), 0);
    }
}
