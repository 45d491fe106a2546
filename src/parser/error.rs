/// Errors raised while decoding a frontend wire message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("message is empty")]
    EmptyMessage,
    /// The message is shorter than its header.
    #[error("message was an invalid length: expected at least {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("log message type '{0}' invalid")]
    InvalidLogType(char),
    #[error("unknown message type '{0}'")]
    UnknownMessageType(char),
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}
