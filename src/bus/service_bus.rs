//! In-process service bus: segment-prefix subscriptions and fan-out.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crossbeam_channel::{bounded, Sender};

use crate::config::BusConfig;
use crate::error::BusError;

use super::message::{Message, Payload};
use super::publisher::Publisher;
use super::subscriber::{Subscriber, Subscription};
use super::topic::Topic;

struct Entry {
    id: u64,
    prefix: Topic,
    sender: Sender<Arc<Message>>,
}

/// Subscription table shared between the bus and its subscriptions.
pub(crate) struct Registry {
    entries: RwLock<Vec<Entry>>,
    next_id: AtomicU64,
    capacity: usize,
}

impl Registry {
    pub(crate) fn remove(&self, id: u64) {
        if let Ok(mut entries) = self.entries.write() {
            entries.retain(|entry| entry.id != id);
        }
    }

    fn remove_all(&self, ids: &[u64]) -> Result<(), BusError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| BusError::LockPoisoned("prune"))?;
        entries.retain(|entry| !ids.contains(&entry.id));
        Ok(())
    }
}

/// The pub/sub core.
///
/// Cloning a `ServiceBus` yields another handle to the same subscription
/// table. Publishing fans out synchronously from the caller's thread into
/// each matching subscription's bounded buffer, blocking while a buffer is
/// full. Every subscriber in this crate is paired with a running receive
/// loop, so a full buffer only ever means a burst.
///
/// ## Example
///
/// ```
/// use servicebus::bus::{Publisher, ServiceBus, Subscriber};
///
/// let bus = ServiceBus::new();
/// let dialogs = bus.subscribe("dialog:select").unwrap();
///
/// bus.publish("dialog:select:file:resp1", "reply-topic".into()).unwrap();
/// bus.publish("dialog", "ignored".into()).unwrap();
///
/// let message = dialogs.recv().unwrap();
/// assert_eq!(message.topic().as_str(), "dialog:select:file:resp1");
/// assert!(dialogs.try_recv().unwrap().is_none());
/// ```
#[derive(Clone)]
pub struct ServiceBus {
    registry: Arc<Registry>,
}

impl Default for ServiceBus {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceBus {
    /// Create a bus with the default subscription capacity.
    pub fn new() -> Self {
        Self::with_config(&BusConfig::default())
    }

    pub fn with_config(config: &BusConfig) -> Self {
        Self::with_capacity(config.subscription_capacity)
    }

    /// Create a bus whose subscriptions buffer up to `capacity` messages.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            registry: Arc::new(Registry {
                entries: RwLock::new(Vec::new()),
                next_id: AtomicU64::new(1),
                capacity: capacity.max(1),
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.registry.capacity
    }

    /// Subscribe using an already-validated topic prefix.
    pub fn subscribe_topic(&self, prefix: Topic) -> Result<Subscription, BusError> {
        let (sender, receiver) = bounded(self.registry.capacity);
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);

        self.registry
            .entries
            .write()
            .map_err(|_| BusError::LockPoisoned("subscribe"))?
            .push(Entry {
                id,
                prefix: prefix.clone(),
                sender,
            });

        tracing::debug!(target: "servicebus::bus", prefix = %prefix, id, "subscribed");
        Ok(Subscription::new(
            id,
            prefix,
            receiver,
            Arc::downgrade(&self.registry),
        ))
    }

    /// Deliver an already-built message to every matching subscription.
    pub fn publish_message(&self, message: Message) -> Result<usize, BusError> {
        let message = Arc::new(message);

        // Senders are cloned out so no lock is held while a send blocks.
        let targets: Vec<(u64, Sender<Arc<Message>>)> = self
            .registry
            .entries
            .read()
            .map_err(|_| BusError::LockPoisoned("publish"))?
            .iter()
            .filter(|entry| message.topic().starts_with(&entry.prefix))
            .map(|entry| (entry.id, entry.sender.clone()))
            .collect();

        let mut delivered = 0;
        let mut dead = Vec::new();
        for (id, sender) in targets {
            match sender.send(Arc::clone(&message)) {
                Ok(()) => delivered += 1,
                Err(_) => dead.push(id),
            }
        }

        if !dead.is_empty() {
            self.registry.remove_all(&dead)?;
        }

        tracing::trace!(
            target: "servicebus::bus",
            topic = %message.topic(),
            payload = message.data().kind(),
            delivered,
            "published"
        );
        Ok(delivered)
    }

    /// One-shot request/reply over a caller-chosen response topic.
    ///
    /// The reply subscription exists before the request is published and
    /// is dropped after the first reply. `None` waits indefinitely.
    pub fn request(
        &self,
        topic: &str,
        data: Payload,
        response_topic: &str,
        timeout: Option<Duration>,
    ) -> Result<Arc<Message>, BusError> {
        let reply = self.subscribe(response_topic)?;
        self.publish(topic, data)?;

        match timeout {
            Some(waited) => reply.recv_timeout(waited)?.ok_or(BusError::Timeout {
                topic: response_topic.to_owned(),
                waited,
            }),
            None => reply.recv(),
        }
    }

    /// Number of live subscriptions.
    pub fn subscription_count(&self) -> Result<usize, BusError> {
        Ok(self
            .registry
            .entries
            .read()
            .map_err(|_| BusError::LockPoisoned("subscription_count"))?
            .len())
    }
}

impl Publisher for ServiceBus {
    fn publish(&self, topic: &str, data: Payload) -> Result<usize, BusError> {
        let topic = Topic::new(topic)?;
        self.publish_message(Message::new(topic, data))
    }
}

impl Subscriber for ServiceBus {
    fn subscribe(&self, prefix: &str) -> Result<Subscription, BusError> {
        self.subscribe_topic(Topic::new(prefix)?)
    }
}
