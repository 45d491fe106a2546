//! Bound-method calls from the frontend: `C<json object>`.

use serde_json::Value;

use crate::bus::{topics, Payload};

use super::error::ParseError;
use super::ParsedMessage;

pub fn parse_call(message: &str) -> Result<ParsedMessage, ParseError> {
    let body = message.get(1..).unwrap_or_default();
    let call: Value =
        serde_json::from_str(body).map_err(|e| ParseError::InvalidPayload(e.to_string()))?;

    if !call.is_object() {
        return Err(ParseError::InvalidPayload(
            "call payload must be a JSON object".to_owned(),
        ));
    }

    Ok(ParsedMessage::new(topics::CALL_INVOKE, Payload::Json(call)))
}
