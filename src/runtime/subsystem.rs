//! Runtime subsystem: handles `runtime:<category>:<method>` messages.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::select;

use crate::bus::{topics, Message, ServiceBus, Subscriber, Subscription};
use crate::config::BusConfig;
use crate::dispatcher::{panic_message, DispatchError};
use crate::error::BusError;

use super::api::Runtime;
use super::browser::Browser;

const TARGET: &str = "servicebus::runtime";

/// Counts from a finished runtime loop.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RuntimeStats {
    /// Browser launches handed off; a launch that later fails is only
    /// logged.
    pub urls_requested: usize,
    pub rejected: usize,
}

/// Subscribes to `quit` and `runtime` and routes runtime requests to
/// backend primitives.
pub struct RuntimeSubsystem {
    quit: Subscription,
    requests: Subscription,
    browser: Arc<dyn Browser>,
    runtime: Runtime,
}

impl RuntimeSubsystem {
    pub fn new(
        bus: &ServiceBus,
        config: &BusConfig,
        browser: Arc<dyn Browser>,
    ) -> Result<Self, BusError> {
        Ok(Self {
            quit: bus.subscribe(topics::QUIT)?,
            requests: bus.subscribe(topics::RUNTIME)?,
            browser,
            runtime: Runtime::new(bus, config),
        })
    }

    /// The backend-facing runtime API over the same bus.
    pub fn runtime(&self) -> Runtime {
        self.runtime.clone()
    }

    pub fn start(self) -> Result<RuntimeThread, DispatchError> {
        let handle = thread::Builder::new()
            .name("servicebus-runtime".into())
            .spawn(move || self.run())
            .map_err(|e| DispatchError::Spawn(e.to_string()))?;
        Ok(RuntimeThread {
            handle: Some(handle),
        })
    }

    fn run(self) -> RuntimeStats {
        let mut stats = RuntimeStats::default();
        tracing::trace!(target: TARGET, "starting");

        loop {
            let running = select! {
                recv(self.quit.receiver()) -> _ => false,
                recv(self.requests.receiver()) -> message => match message {
                    Ok(message) => {
                        tracing::trace!(target: TARGET, topic = %message.topic(), "received message");
                        match self.process(&message) {
                            Ok(()) => stats.urls_requested += 1,
                            Err(error) => {
                                stats.rejected += 1;
                                tracing::error!(target: TARGET, error = %error, "runtime request failed");
                            }
                        }
                        true
                    }
                    Err(_) => false,
                },
            };
            if !running {
                break;
            }
        }

        tracing::trace!(target: TARGET, "shutdown");
        stats
    }

    fn process(&self, message: &Message) -> Result<(), DispatchError> {
        let topic = message.topic();
        // runtime:<category>:<method>
        if topic.len() != 3 {
            return Err(DispatchError::Malformed {
                topic: topic.to_string(),
                reason: "expected runtime:<category>:<method>".to_owned(),
            });
        }

        match &*topic.segments()[1] {
            "browser" => self.process_browser(message),
            other => Err(DispatchError::UnknownCommand {
                topic: topic.to_string(),
                command: other.to_owned(),
            }),
        }
    }

    fn process_browser(&self, message: &Message) -> Result<(), DispatchError> {
        let topic = message.topic();
        match &*topic.segments()[2] {
            "openurl" => {
                let url = message
                    .data()
                    .as_text()
                    .ok_or_else(|| DispatchError::InvalidPayload {
                        topic: topic.to_string(),
                        expected: "text",
                        actual: message.data().kind(),
                    })?
                    .to_owned();

                let browser = Arc::clone(&self.browser);
                thread::spawn(move || {
                    if let Err(error) = browser.open(&url) {
                        tracing::error!(target: TARGET, error = %error, "open url failed");
                    }
                });
                Ok(())
            }
            other => Err(DispatchError::UnknownCommand {
                topic: topic.to_string(),
                command: other.to_owned(),
            }),
        }
    }
}

/// A running runtime loop.
pub struct RuntimeThread {
    handle: Option<JoinHandle<RuntimeStats>>,
}

impl RuntimeThread {
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the loop to end (publish `quit` first).
    pub fn try_join(mut self) -> Result<RuntimeStats, DispatchError> {
        let Some(handle) = self.handle.take() else {
            return Ok(RuntimeStats::default());
        };
        handle
            .join()
            .map_err(|payload| DispatchError::Panicked(panic_message(payload.as_ref())))
    }

    /// Like `try_join`, but a panicked loop is logged and yields empty
    /// statistics.
    pub fn join(self) -> RuntimeStats {
        self.try_join().unwrap_or_else(|error| {
            tracing::error!(target: TARGET, error = %error, "runtime loop ended abnormally");
            RuntimeStats::default()
        })
    }
}
