//! Registered frontend clients, keyed by a random unique ID.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::error::BusError;
use crate::ids::random_id;

use super::frontend::Frontend;
use super::selector::ClientSelector;

/// Identifier of a registered client; also the last segment of its
/// `call:result:<id>` topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(String);

impl ClientId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ClientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for ClientId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// What a `ClientSelector` gets to see about a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    pub id: ClientId,
    /// Registration order; lower registered earlier.
    pub sequence: u64,
}

struct Registered {
    sequence: u64,
    frontend: Arc<dyn Frontend>,
}

#[derive(Default)]
struct Clients {
    by_id: HashMap<ClientId, Registered>,
    next_sequence: u64,
}

/// Thread-safe registry of frontend clients.
///
/// Registration and removal take the write lock; lookups and broadcasts
/// take the read lock. An ID is never handed out while another client
/// holding it is still registered.
#[derive(Default)]
pub struct ClientRegistry {
    clients: RwLock<Clients>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a frontend under a freshly generated ID.
    pub fn register(&self, frontend: Arc<dyn Frontend>) -> Result<ClientId, BusError> {
        self.register_with(frontend, random_id)
    }

    /// Register using a caller-supplied ID generator; regenerates until the
    /// ID is unused.
    pub fn register_with<G>(
        &self,
        frontend: Arc<dyn Frontend>,
        mut generate: G,
    ) -> Result<ClientId, BusError>
    where
        G: FnMut() -> String,
    {
        let mut clients = self
            .clients
            .write()
            .map_err(|_| BusError::LockPoisoned("register client"))?;

        let id = loop {
            let candidate = ClientId::new(generate());
            if !candidate.as_str().is_empty() && !clients.by_id.contains_key(&candidate) {
                break candidate;
            }
        };

        let sequence = clients.next_sequence;
        clients.next_sequence += 1;
        clients.by_id.insert(id.clone(), Registered { sequence, frontend });
        Ok(id)
    }

    /// Remove a client. Returns `false` if it was not registered.
    pub fn remove(&self, id: &ClientId) -> Result<bool, BusError> {
        let mut clients = self
            .clients
            .write()
            .map_err(|_| BusError::LockPoisoned("remove client"))?;
        Ok(clients.by_id.remove(id).is_some())
    }

    pub fn get(&self, id: &str) -> Result<Option<Arc<dyn Frontend>>, BusError> {
        let clients = self
            .clients
            .read()
            .map_err(|_| BusError::LockPoisoned("lookup client"))?;
        Ok(clients.by_id.get(id).map(|c| Arc::clone(&c.frontend)))
    }

    pub fn contains(&self, id: &str) -> Result<bool, BusError> {
        let clients = self
            .clients
            .read()
            .map_err(|_| BusError::LockPoisoned("lookup client"))?;
        Ok(clients.by_id.contains_key(id))
    }

    /// Call `f` on every registered client while holding the read lock.
    /// Returns how many clients were visited.
    pub fn for_each<F>(&self, mut f: F) -> Result<usize, BusError>
    where
        F: FnMut(&ClientId, &dyn Frontend),
    {
        let clients = self
            .clients
            .read()
            .map_err(|_| BusError::LockPoisoned("broadcast"))?;
        for (id, client) in &clients.by_id {
            f(id, client.frontend.as_ref());
        }
        Ok(clients.by_id.len())
    }

    /// Registered clients, oldest first.
    pub fn clients(&self) -> Result<Vec<ClientInfo>, BusError> {
        let clients = self
            .clients
            .read()
            .map_err(|_| BusError::LockPoisoned("list clients"))?;
        let mut infos: Vec<ClientInfo> = clients
            .by_id
            .iter()
            .map(|(id, c)| ClientInfo {
                id: id.clone(),
                sequence: c.sequence,
            })
            .collect();
        infos.sort_by_key(|info| info.sequence);
        Ok(infos)
    }

    pub fn ids(&self) -> Result<Vec<ClientId>, BusError> {
        Ok(self.clients()?.into_iter().map(|info| info.id).collect())
    }

    /// Resolve one client through `selector`.
    ///
    /// The returned frontend is detached from the lock, so long-running
    /// calls on it do not block registration.
    pub fn select(
        &self,
        selector: &dyn ClientSelector,
    ) -> Result<Option<(ClientId, Arc<dyn Frontend>)>, BusError> {
        let clients = self
            .clients
            .read()
            .map_err(|_| BusError::LockPoisoned("select client"))?;

        let mut infos: Vec<ClientInfo> = clients
            .by_id
            .iter()
            .map(|(id, c)| ClientInfo {
                id: id.clone(),
                sequence: c.sequence,
            })
            .collect();
        infos.sort_by_key(|info| info.sequence);

        Ok(selector.select(&infos).and_then(|id| {
            clients
                .by_id
                .get(&id)
                .map(|c| (id.clone(), Arc::clone(&c.frontend)))
        }))
    }

    pub fn len(&self) -> Result<usize, BusError> {
        let clients = self
            .clients
            .read()
            .map_err(|_| BusError::LockPoisoned("count clients"))?;
        Ok(clients.by_id.len())
    }

    pub fn is_empty(&self) -> Result<bool, BusError> {
        Ok(self.len()? == 0)
    }
}
