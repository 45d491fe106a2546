//! Error types for the dispatcher and runtime receive loops.

use std::any::Any;

use crate::error::BusError;
use crate::parser::ParseError;

/// Why a bus message could not be dispatched.
///
/// Inside the receive loops these are logged and counted; the message is
/// dropped and the loop carries on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// Too few topic segments, or a segment in the wrong place.
    #[error("malformed message on '{topic}': {reason}")]
    Malformed { topic: String, reason: String },
    /// A command, category or method the handler does not know.
    #[error("unknown command '{command}' on '{topic}'")]
    UnknownCommand { topic: String, command: String },
    /// The payload variant does not match what the topic requires.
    #[error("invalid payload for '{topic}': expected {expected}, got {actual}")]
    InvalidPayload {
        topic: String,
        expected: &'static str,
        actual: &'static str,
    },
    /// A call result whose addressee is missing or not registered.
    #[error("cannot route call result on '{topic}' (target: {target:?})")]
    UnroutableResult {
        topic: String,
        target: Option<String>,
    },
    #[error("failed to serialize payload: {0}")]
    Serialize(String),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("bus error: {0}")]
    Bus(#[from] BusError),
    #[error("failed to spawn receive loop: {0}")]
    Spawn(String),
    /// The receive loop thread panicked, usually inside a frontend or
    /// browser callback.
    #[error("receive loop panicked: {0}")]
    Panicked(String),
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_owned())
}
