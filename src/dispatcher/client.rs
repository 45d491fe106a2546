//! Handles given to registrants.

use std::sync::Arc;

use crate::bus::{topics, Payload, Publisher, ServiceBus};
use crate::error::BusError;
use crate::parser;

use super::error::DispatchError;
use super::frontend::Frontend;
use super::registry::{ClientId, ClientRegistry};

/// A registered frontend's way back onto the bus.
///
/// Carries the client's ID so calls it originates can be answered on
/// `call:result:<id>`.
#[derive(Clone)]
pub struct DispatchClient {
    id: ClientId,
    bus: ServiceBus,
}

impl DispatchClient {
    pub(crate) fn new(id: ClientId, bus: ServiceBus) -> Self {
        Self { id, bus }
    }

    pub fn id(&self) -> &ClientId {
        &self.id
    }

    /// Topic on which results for this client's calls arrive.
    pub fn result_topic(&self) -> String {
        format!("{}:{}", topics::CALL_RESULT, self.id)
    }

    pub fn publish(&self, topic: &str, data: Payload) -> Result<usize, BusError> {
        self.bus.publish(topic, data)
    }

    /// Decode a raw frontend message and publish it.
    ///
    /// Calls are re-addressed to `call:invoke:<id>` so the eventual result
    /// can be routed back to this client.
    pub fn dispatch_message(&self, raw: &str) -> Result<usize, DispatchError> {
        let parsed = parser::parse(raw)?;
        let topic = if parsed.topic == topics::CALL_INVOKE {
            format!("{}:{}", parsed.topic, self.id)
        } else {
            parsed.topic
        };

        tracing::trace!(
            target: "servicebus::dispatcher",
            client = %self.id,
            topic = %topic,
            "dispatching frontend message"
        );
        Ok(self.bus.publish(&topic, parsed.data)?)
    }
}

impl std::fmt::Debug for DispatchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchClient").field("id", &self.id).finish()
    }
}

/// Cloneable handle for registering and removing clients, usable before
/// and after the dispatcher loop starts.
#[derive(Clone)]
pub struct Clients {
    registry: Arc<ClientRegistry>,
    bus: ServiceBus,
}

impl Clients {
    pub(crate) fn new(registry: Arc<ClientRegistry>, bus: ServiceBus) -> Self {
        Self { registry, bus }
    }

    pub fn register(&self, frontend: Arc<dyn Frontend>) -> Result<DispatchClient, BusError> {
        let id = self.registry.register(frontend)?;
        tracing::debug!(target: "servicebus::dispatcher", client = %id, "client registered");
        Ok(DispatchClient::new(id, self.bus.clone()))
    }

    /// Remove a client; removing twice is a no-op.
    pub fn remove(&self, client: &DispatchClient) -> Result<(), BusError> {
        if self.registry.remove(client.id())? {
            tracing::debug!(target: "servicebus::dispatcher", client = %client.id(), "client removed");
        }
        Ok(())
    }

    pub fn registry(&self) -> &Arc<ClientRegistry> {
        &self.registry
    }
}
