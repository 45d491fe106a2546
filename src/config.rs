//! Bus configuration.

use std::time::Duration;

use serde::Deserialize;

/// What the dispatcher does with a `call:result` it cannot route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallResultPolicy {
    /// Log and terminate the process. Calls are strictly one request,
    /// one result, so a lost addressee is a programming error.
    #[default]
    Fatal,
    /// Log the violation and drop the result.
    LogAndDrop,
}

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Configuration shared by the bus, the dispatcher and the runtime.
///
/// ```
/// use servicebus::{BusConfig, CallResultPolicy};
///
/// let config = BusConfig::from_json(r#"{ "subscription_capacity": 16 }"#).unwrap();
/// assert_eq!(config.subscription_capacity, 16);
/// assert_eq!(config.call_result_policy, CallResultPolicy::Fatal);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Messages buffered per subscription before publish blocks.
    pub subscription_capacity: usize,
    pub call_result_policy: CallResultPolicy,
    /// How long runtime dialog requests wait for a reply; `None` waits forever.
    pub dialog_timeout_ms: Option<u64>,
    /// `EnvFilter` directive, e.g. `info` or `servicebus::dispatcher=trace`.
    pub log_filter: String,
    pub log_format: LogFormat,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            subscription_capacity: 128,
            call_result_policy: CallResultPolicy::Fatal,
            dialog_timeout_ms: None,
            log_filter: "info".to_owned(),
            log_format: LogFormat::Compact,
        }
    }
}

impl BusConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_subscription_capacity(mut self, capacity: usize) -> Self {
        self.subscription_capacity = capacity.max(1);
        self
    }

    pub fn with_call_result_policy(mut self, policy: CallResultPolicy) -> Self {
        self.call_result_policy = policy;
        self
    }

    pub fn with_dialog_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.dialog_timeout_ms = timeout
            .map(|t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    pub fn dialog_timeout(&self) -> Option<Duration> {
        self.dialog_timeout_ms.map(Duration::from_millis)
    }
}
