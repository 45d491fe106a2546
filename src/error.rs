use std::time::Duration;

/// Errors raised by the service bus and the client registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BusError {
    /// A topic was built from an empty string.
    #[error("topic is empty")]
    EmptyTopic,
    /// A shared lock was poisoned by a panicking holder.
    #[error("service bus lock poisoned during {0}")]
    LockPoisoned(&'static str),
    /// The other side of a subscription went away.
    #[error("subscription for '{0}' is disconnected")]
    Disconnected(String),
    /// No reply arrived on a response topic in time.
    #[error("timed out after {waited:?} waiting on '{topic}'")]
    Timeout { topic: String, waited: Duration },
}
