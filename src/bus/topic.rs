//! Colon-segmented topics and segment-boundary prefix matching.

use std::fmt;
use std::str::FromStr;

use crate::error::BusError;

/// Separator between topic segments.
pub const SEPARATOR: char = ':';

/// Well-known topic prefixes of the bus grammar.
pub mod topics {
    pub const QUIT: &str = "quit";
    pub const CALL_RESULT: &str = "call:result";
    pub const CALL_INVOKE: &str = "call:invoke";
    pub const EVENT_EMIT: &str = "event:emit";
    /// Events emitted by the backend; rebroadcast to every frontend.
    pub const BACKEND_EVENT: &str = "event:emit:from:g";
    /// Events emitted by a frontend; never echoed back.
    pub const FRONTEND_EVENT: &str = "event:emit:from:j";
    pub const WINDOW: &str = "window";
    pub const DIALOG_SELECT: &str = "dialog:select";
    pub const DIALOG_SELECTED: &str = "dialog:fileselected";
    pub const RUNTIME: &str = "runtime";
    pub const BROWSER_OPEN_URL: &str = "runtime:browser:openurl";
}

/// An immutable topic such as `dialog:select:file:Open`.
///
/// Segments are split once at construction. A topic is never the empty
/// string; individual segments may be empty (`dialog:select:file:` carries
/// an empty title).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Topic {
    raw: String,
    segments: Vec<String>,
}

impl Topic {
    /// Parse a topic string.
    pub fn new(raw: impl Into<String>) -> Result<Self, BusError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(BusError::EmptyTopic);
        }
        let segments = raw.split(SEPARATOR).map(str::to_owned).collect();
        Ok(Self { raw, segments })
    }

    /// Build a topic from individual segments.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, BusError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = segments
            .into_iter()
            .map(|s| s.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join(":");
        Self::new(joined)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn segment(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; a topic has at least one segment.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The first segment (`window`, `dialog`, `event`, ...).
    pub fn domain(&self) -> &str {
        &self.segments[0]
    }

    pub fn last(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    /// True when `prefix`'s segments are a list-prefix of this topic's.
    ///
    /// `dialog` matches `dialog:select:file` but never `dialogX`, and
    /// `dialog:select` does not match `dialog`.
    pub fn starts_with(&self, prefix: &Topic) -> bool {
        prefix.segments.len() <= self.segments.len()
            && prefix
                .segments
                .iter()
                .zip(&self.segments)
                .all(|(p, s)| p == s)
    }

    /// Append a segment, producing a new topic.
    pub fn join(&self, segment: &str) -> Result<Self, BusError> {
        Self::new(format!("{}{}{}", self.raw, SEPARATOR, segment))
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl fmt::Debug for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Topic({})", self.raw)
    }
}

impl FromStr for Topic {
    type Err = BusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Topic {
    type Error = BusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for Topic {
    type Error = BusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&String> for Topic {
    type Error = BusError;

    fn try_from(value: &String) -> Result<Self, Self::Error> {
        Self::new(value.as_str())
    }
}

impl TryFrom<&Topic> for Topic {
    type Error = BusError;

    fn try_from(value: &Topic) -> Result<Self, Self::Error> {
        Ok(value.clone())
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}
