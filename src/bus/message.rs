//! The immutable envelope carried by the bus.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::topic::{topics, Topic};

/// An application event, as emitted by the backend or the frontend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventMessage {
    pub name: String,
    #[serde(default)]
    pub data: Vec<Value>,
}

impl EventMessage {
    pub fn new(name: impl Into<String>, data: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Payload carried by a message.
///
/// The concrete variant is a contract between the publisher and the
/// handler owning the topic; handlers match on it instead of guessing.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Payload {
    #[default]
    Empty,
    /// Titles, colours, URLs, response topics, call results.
    Text(String),
    /// Structured event for `event:emit:*`.
    Event(EventMessage),
    /// Anything else, kept as JSON.
    Json(Value),
}

impl Payload {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_event(&self) -> Option<&EventMessage> {
        match self {
            Payload::Event(event) => Some(event),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Payload::Empty)
    }

    /// Short variant name, for log output.
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Empty => "empty",
            Payload::Text(_) => "text",
            Payload::Event(_) => "event",
            Payload::Json(_) => "json",
        }
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Payload::Text(value)
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Payload::Text(value.to_owned())
    }
}

impl From<EventMessage> for Payload {
    fn from(value: EventMessage) -> Self {
        Payload::Event(value)
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}

impl From<()> for Payload {
    fn from(_: ()) -> Self {
        Payload::Empty
    }
}

/// A published message: topic, payload and derived target.
///
/// Messages are immutable; fan-out shares one `Arc<Message>` between all
/// matching subscriptions.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    topic: Topic,
    data: Payload,
    target: Option<String>,
}

impl Message {
    pub fn new(topic: Topic, data: Payload) -> Self {
        let target = derive_target(&topic);
        Self {
            topic,
            data,
            target,
        }
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn data(&self) -> &Payload {
        &self.data
    }

    /// Client ID addressed by a `call:result:<id>` message.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }
}

fn derive_target(topic: &Topic) -> Option<String> {
    let prefix_len = topics::CALL_RESULT.split(':').count();
    if topic.len() > prefix_len
        && topic
            .segments()
            .iter()
            .zip(topics::CALL_RESULT.split(':'))
            .all(|(a, b)| a == b)
    {
        Some(topic.last().to_owned())
    } else {
        None
    }
}
