//! Core publisher trait for the service bus.

use crate::error::BusError;

use super::message::Payload;

/// Trait for publishing onto a topic bus.
///
/// Implemented by `ServiceBus`, which validates `topic` before fanning out.
pub trait Publisher: Send + Sync {
    /// Publish `data` under `topic`, returning how many subscriptions
    /// received it.
    fn publish(&self, topic: &str, data: Payload) -> Result<usize, BusError>;
}
