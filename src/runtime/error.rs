use crate::error::BusError;

/// Errors from backend-side runtime primitives and the runtime API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// The system browser could not be launched.
    #[error("failed to open '{url}' in browser: {reason}")]
    Browser { url: String, reason: String },
    /// A dialog reply arrived without a text payload.
    #[error("unexpected reply to {kind} dialog: {actual} payload")]
    UnexpectedReply { kind: &'static str, actual: &'static str },
    #[error("bus error: {0}")]
    Bus(#[from] BusError),
}
