//! Subscriptions and the subscriber trait.

use std::sync::{Arc, Weak};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};

use crate::error::BusError;

use super::message::Message;
use super::service_bus::Registry;
use super::topic::Topic;

/// Trait for creating topic-prefix subscriptions.
pub trait Subscriber: Send + Sync {
    /// Register a delivery endpoint for every topic starting with `prefix`.
    fn subscribe(&self, prefix: &str) -> Result<Subscription, BusError>;
}

/// A standing registration for all messages under a topic prefix.
///
/// Messages arrive in publish order. Dropping the subscription removes it
/// from the bus.
pub struct Subscription {
    id: u64,
    prefix: Topic,
    receiver: Receiver<Arc<Message>>,
    registry: Weak<Registry>,
}

impl Subscription {
    pub(crate) fn new(
        id: u64,
        prefix: Topic,
        receiver: Receiver<Arc<Message>>,
        registry: Weak<Registry>,
    ) -> Self {
        Self {
            id,
            prefix,
            receiver,
            registry,
        }
    }

    pub fn prefix(&self) -> &Topic {
        &self.prefix
    }

    /// Block until the next message arrives.
    pub fn recv(&self) -> Result<Arc<Message>, BusError> {
        self.receiver
            .recv()
            .map_err(|_| BusError::Disconnected(self.prefix.to_string()))
    }

    /// Block for at most `timeout`; `Ok(None)` if nothing arrived.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<Arc<Message>>, BusError> {
        match self.receiver.recv_timeout(timeout) {
            Ok(message) => Ok(Some(message)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => {
                Err(BusError::Disconnected(self.prefix.to_string()))
            }
        }
    }

    pub fn try_recv(&self) -> Result<Option<Arc<Message>>, BusError> {
        match self.receiver.try_recv() {
            Ok(message) => Ok(Some(message)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => {
                Err(BusError::Disconnected(self.prefix.to_string()))
            }
        }
    }

    /// Number of messages buffered and not yet received.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// The raw receiver, for waiting on several subscriptions at once with
    /// `crossbeam_channel::select!`.
    pub fn receiver(&self) -> &Receiver<Arc<Message>> {
        &self.receiver
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("prefix", &self.prefix)
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}
