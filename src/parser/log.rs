//! Log messages: `L<level><text>`.

use crate::bus::Payload;

use super::error::ParseError;
use super::ParsedMessage;

const HEADER_LEN: usize = 2;

fn level_topic(code: u8) -> Option<&'static str> {
    match code {
        b'D' => Some("log:debug"),
        b'I' => Some("log:info"),
        b'W' => Some("log:warning"),
        b'E' => Some("log:error"),
        b'F' => Some("log:fatal"),
        _ => None,
    }
}

/// Decode a log message.
///
/// The second byte is the level code; everything after the two-byte header
/// is the log text.
pub fn parse_log(message: &str) -> Result<ParsedMessage, ParseError> {
    let bytes = message.as_bytes();
    if bytes.len() < HEADER_LEN {
        return Err(ParseError::InvalidLength {
            expected: HEADER_LEN,
            actual: bytes.len(),
        });
    }

    let code = bytes[1];
    let topic = level_topic(code).ok_or(ParseError::InvalidLogType(char::from(code)))?;

    // A valid level code is ASCII, so the header ends on a char boundary.
    let text = message.get(HEADER_LEN..).ok_or(ParseError::InvalidLength {
        expected: HEADER_LEN,
        actual: bytes.len(),
    })?;

    Ok(ParsedMessage::new(topic, Payload::Text(text.to_owned())))
}
