//! Frontend event messages: `E<json>`.

use crate::bus::{topics, EventMessage, Payload};

use super::error::ParseError;
use super::ParsedMessage;

pub fn parse_event(message: &str) -> Result<ParsedMessage, ParseError> {
    let body = message.get(1..).unwrap_or_default();
    if body.is_empty() {
        return Err(ParseError::InvalidLength {
            expected: 2,
            actual: message.len(),
        });
    }

    let event: EventMessage =
        serde_json::from_str(body).map_err(|e| ParseError::InvalidPayload(e.to_string()))?;

    Ok(ParsedMessage::new(topics::FRONTEND_EVENT, Payload::Event(event)))
}
