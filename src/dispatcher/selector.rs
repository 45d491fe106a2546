//! Choosing which client answers a dialog request.

use super::registry::{ClientId, ClientInfo};

/// Picks one client out of the registered set.
///
/// `clients` is ordered by registration, oldest first.
pub trait ClientSelector: Send + Sync {
    fn select(&self, clients: &[ClientInfo]) -> Option<ClientId>;
}

/// Default: the earliest-registered client still alive.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstRegistered;

impl ClientSelector for FirstRegistered {
    fn select(&self, clients: &[ClientInfo]) -> Option<ClientId> {
        clients.first().map(|info| info.id.clone())
    }
}

/// The most recently registered client.
#[derive(Debug, Default, Clone, Copy)]
pub struct LastRegistered;

impl ClientSelector for LastRegistered {
    fn select(&self, clients: &[ClientInfo]) -> Option<ClientId> {
        clients.last().map(|info| info.id.clone())
    }
}

impl<F> ClientSelector for F
where
    F: Fn(&[ClientInfo]) -> Option<ClientId> + Send + Sync,
{
    fn select(&self, clients: &[ClientInfo]) -> Option<ClientId> {
        self(clients)
    }
}
