//! Structured logging for the bus and its receive loops.
//!
//! Every event carries a `servicebus::{bus,dispatcher,runtime}` target, and
//! the loops run on named threads (`servicebus-dispatcher`,
//! `servicebus-runtime`), so both are kept in the output.

use std::env;
use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::{subscriber::SetGlobalDefaultError, Subscriber};
use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

use crate::config::{BusConfig, LogFormat};

/// Overrides `BusConfig::log_filter` when set.
pub const LOG_ENV: &str = "SERVICEBUS_LOG";

static INSTALLED: OnceCell<()> = OnceCell::new();

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log filter '{directive}': {reason}")]
    Filter { directive: String, reason: String },
    /// Something other than this crate installed a global subscriber first.
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Install the global subscriber described by `config`.
///
/// Only the first successful call installs anything; later calls return
/// `Ok(())`, whatever configuration they pass.
///
/// ```
/// use servicebus::{telemetry, BusConfig};
///
/// let config = BusConfig::default().with_log_filter("servicebus=debug");
/// telemetry::initialise(&config).unwrap();
/// telemetry::initialise(&BusConfig::default()).unwrap();
/// ```
pub fn initialise(config: &BusConfig) -> Result<(), TelemetryError> {
    INSTALLED
        .get_or_try_init(|| {
            let directive = filter_directive(config, env::var(LOG_ENV).ok().as_deref());
            install(&directive, config.log_format)
        })
        .map(|_| ())
}

/// The environment wins over configuration, unless it is blank.
fn filter_directive(config: &BusConfig, from_env: Option<&str>) -> String {
    match from_env.map(str::trim) {
        Some(directive) if !directive.is_empty() => directive.to_owned(),
        _ => config.log_filter.clone(),
    }
}

fn parse_filter(directive: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(directive).map_err(|error| TelemetryError::Filter {
        directive: directive.to_owned(),
        reason: error.to_string(),
    })
}

fn install(directive: &str, format: LogFormat) -> Result<(), TelemetryError> {
    let builder = fmt::Subscriber::builder()
        .with_env_filter(parse_filter(directive)?)
        .with_target(true)
        .with_thread_names(true)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_timer(fmt::time::UtcTime::rfc_3339());

    let subscriber: Box<dyn Subscriber + Send + Sync> = match format {
        LogFormat::Json => Box::new(builder.json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(builder.compact().finish()),
    };

    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)
}
