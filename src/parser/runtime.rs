//! Runtime requests from the frontend: `R<category><argument>`.

use crate::bus::{topics, Payload};

use super::error::ParseError;
use super::ParsedMessage;

pub fn parse_runtime(message: &str) -> Result<ParsedMessage, ParseError> {
    let bytes = message.as_bytes();
    if bytes.len() < 2 {
        return Err(ParseError::InvalidLength {
            expected: 2,
            actual: bytes.len(),
        });
    }

    match bytes[1] {
        b'B' => {
            let url = message.get(2..).unwrap_or_default();
            if url.is_empty() {
                return Err(ParseError::InvalidPayload("missing URL".to_owned()));
            }
            Ok(ParsedMessage::new(
                topics::BROWSER_OPEN_URL,
                Payload::Text(url.to_owned()),
            ))
        }
        other => Err(ParseError::UnknownMessageType(char::from(other))),
    }
}
