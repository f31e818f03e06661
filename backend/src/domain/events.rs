//! In-process publish/subscribe event bus.
//!
//! The bus fans application events (new message, new notification) out to
//! long-lived per-user streams. It is constructed once at startup and
//! injected wherever publishing or subscribing happens, so tests can stand
//! up isolated buses instead of sharing ambient global state.
//!
//! Delivery contract:
//! - best effort to subscriptions registered at publish time; no replay,
//!   no durability;
//! - per-producer publish order is preserved per subscription;
//! - a dead or failing subscriber never affects delivery to the others and
//!   never blocks the publisher (each subscription drains its own
//!   unbounded channel).

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::{Message, Notification};

/// Named channel on the bus. Topics are independent; ordering holds within
/// a topic per producer, never across topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Direct message traffic.
    Message,
    /// Notification traffic.
    Notification,
}

/// Event payload carried over the bus.
///
/// Payloads are `Arc`-backed so fan-out to many subscribers clones a
/// pointer, not the row. The bus itself never stores events.
#[derive(Debug, Clone)]
pub enum BusEvent {
    /// A message was persisted.
    Message(Arc<Message>),
    /// A notification was persisted.
    Notification(Arc<Notification>),
}

/// Filter attached to a subscription at subscribe time.
///
/// Keeping the predicate declarative here keeps the bus topic-agnostic
/// about payload shape; the gateway supplies per-user addressing checks.
pub type Predicate = Box<dyn Fn(&BusEvent) -> bool + Send + Sync>;

/// Opaque handle identifying one subscription on one topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
    topic: Topic,
    seq: u64,
}

struct Subscriber {
    predicate: Predicate,
    sender: mpsc::UnboundedSender<BusEvent>,
}

/// Process-wide publish/subscribe hub.
#[derive(Default)]
pub struct EventBus {
    // The only in-process shared mutable state in the core. The lock is
    // never held across an await point; publish does its sends under the
    // read guard because unbounded sends cannot block.
    registry: RwLock<HashMap<Topic, HashMap<u64, Subscriber>>>,
    next_seq: AtomicU64,
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscription on `topic`.
    ///
    /// Returns the handle used for [`EventBus::unsubscribe`] and the
    /// receiving end of the subscription's delivery channel. Events
    /// published before this call are never delivered.
    pub fn subscribe(
        &self,
        topic: Topic,
        predicate: Predicate,
    ) -> (SubscriptionId, mpsc::UnboundedReceiver<BusEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let id = SubscriptionId { topic, seq };
        match self.registry.write() {
            Ok(mut registry) => {
                registry
                    .entry(topic)
                    .or_default()
                    .insert(seq, Subscriber { predicate, sender });
            }
            Err(poisoned) => {
                // A panic while holding the lock leaves the set intact;
                // recover the guard rather than refusing new sessions.
                poisoned
                    .into_inner()
                    .entry(topic)
                    .or_default()
                    .insert(seq, Subscriber { predicate, sender });
            }
        }
        debug!(?topic, seq, "bus subscription registered");
        (id, receiver)
    }

    /// Remove a subscription. Idempotent.
    ///
    /// Once this returns, no further events are delivered to the handle,
    /// even when a publish races the removal: delivery happens under the
    /// registry lock, and removal takes the write side of that lock.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut registry = match self.registry.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(topic_registry) = registry.get_mut(&id.topic) {
            if topic_registry.remove(&id.seq).is_some() {
                debug!(topic = ?id.topic, seq = id.seq, "bus subscription removed");
            }
        }
    }

    /// Publish an event to every matching subscription on `topic`.
    ///
    /// Fire-and-forget: never blocks, never fails for the caller.
    /// Subscriptions whose receiver has gone away are pruned after the
    /// delivery pass.
    pub fn publish(&self, topic: Topic, event: &BusEvent) {
        let mut dead = Vec::new();
        {
            let registry = match self.registry.read() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            let Some(topic_registry) = registry.get(&topic) else {
                return;
            };
            for (seq, subscriber) in topic_registry {
                if !(subscriber.predicate)(event) {
                    continue;
                }
                if subscriber.sender.send(event.clone()).is_err() {
                    // Receiver dropped without unsubscribing; remember it
                    // and keep delivering to the rest.
                    dead.push(*seq);
                }
            }
        }
        if dead.is_empty() {
            return;
        }
        let mut registry = match self.registry.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(topic_registry) = registry.get_mut(&topic) {
            for seq in dead {
                if topic_registry.remove(&seq).is_some() {
                    warn!(?topic, seq, "pruned bus subscription with dropped receiver");
                }
            }
        }
    }

    /// Number of live subscriptions on `topic`. Test and introspection aid.
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        let registry = match self.registry.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        registry.get(&topic).map_or(0, HashMap::len)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("message_subscribers", &self.subscriber_count(Topic::Message))
            .field(
                "notification_subscribers",
                &self.subscriber_count(Topic::Notification),
            )
            .finish()
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
