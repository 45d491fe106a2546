//! Decoders for the small wire formats the frontend sends.
//!
//! Every frontend message starts with a one-byte type code; the rest is
//! specific to that type. Parsing yields the topic and payload to publish.

mod call;
mod error;
mod event;
mod log;
mod runtime;

use crate::bus::Payload;

pub use call::parse_call;
pub use error::ParseError;
pub use event::parse_event;
pub use log::parse_log;
pub use runtime::parse_runtime;

/// A decoded frontend message, ready to publish.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMessage {
    pub topic: String,
    pub data: Payload,
}

impl ParsedMessage {
    pub fn new(topic: impl Into<String>, data: Payload) -> Self {
        Self {
            topic: topic.into(),
            data,
        }
    }
}

/// Route a raw message to the parser for its type code.
pub fn parse(message: &str) -> Result<ParsedMessage, ParseError> {
    let code = *message.as_bytes().first().ok_or(ParseError::EmptyMessage)?;
    match code {
        b'L' => parse_log(message),
        b'E' => parse_event(message),
        b'C' => parse_call(message),
        b'R' => parse_runtime(message),
        other => Err(ParseError::UnknownMessageType(char::from(other))),
    }
}
