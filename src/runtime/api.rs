//! Backend-facing runtime API.
//!
//! Every call turns into a bus publish; nothing here touches a frontend
//! directly. Dialog calls are the only ones that wait for an answer.

use std::time::Duration;

use serde_json::Value;

use crate::bus::{topics, EventMessage, Payload, Publisher, ServiceBus};
use crate::config::BusConfig;
use crate::ids::random_id;

use super::error::RuntimeError;

/// Cloneable entry point for backend code.
#[derive(Clone)]
pub struct Runtime {
    bus: ServiceBus,
    dialog_timeout: Option<Duration>,
}

impl Runtime {
    pub fn new(bus: &ServiceBus, config: &BusConfig) -> Self {
        Self {
            bus: bus.clone(),
            dialog_timeout: config.dialog_timeout(),
        }
    }

    /// Ask every frontend and subsystem to shut down.
    pub fn quit(&self) -> Result<(), RuntimeError> {
        self.bus.publish(topics::QUIT, Payload::Empty)?;
        Ok(())
    }

    pub fn events(&self) -> EventsApi<'_> {
        EventsApi { bus: &self.bus }
    }

    pub fn window(&self) -> WindowApi<'_> {
        WindowApi { bus: &self.bus }
    }

    pub fn dialog(&self) -> DialogApi<'_> {
        DialogApi {
            bus: &self.bus,
            timeout: self.dialog_timeout,
        }
    }

    pub fn browser(&self) -> BrowserApi<'_> {
        BrowserApi { bus: &self.bus }
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("dialog_timeout", &self.dialog_timeout)
            .finish()
    }
}

pub struct EventsApi<'a> {
    bus: &'a ServiceBus,
}

impl EventsApi<'_> {
    /// Emit a backend event; the dispatcher forwards it to every client.
    pub fn emit(&self, name: &str, data: Vec<Value>) -> Result<(), RuntimeError> {
        self.bus
            .publish(topics::BACKEND_EVENT, EventMessage::new(name, data).into())?;
        Ok(())
    }
}

pub struct WindowApi<'a> {
    bus: &'a ServiceBus,
}

impl WindowApi<'_> {
    pub fn set_title(&self, title: &str) -> Result<(), RuntimeError> {
        self.send("settitle", title.into())
    }

    pub fn fullscreen(&self) -> Result<(), RuntimeError> {
        self.send("fullscreen", Payload::Empty)
    }

    pub fn unfullscreen(&self) -> Result<(), RuntimeError> {
        self.send("unfullscreen", Payload::Empty)
    }

    /// `colour` is passed through unparsed.
    pub fn set_colour(&self, colour: &str) -> Result<(), RuntimeError> {
        self.send("setcolour", colour.into())
    }

    fn send(&self, command: &str, data: Payload) -> Result<(), RuntimeError> {
        let topic = format!("{}:{}", topics::WINDOW, command);
        self.bus.publish(&topic, data)?;
        Ok(())
    }
}

pub struct DialogApi<'a> {
    bus: &'a ServiceBus,
    timeout: Option<Duration>,
}

impl DialogApi<'_> {
    /// Ask the selected client for a file to open. An empty string means
    /// nothing was chosen.
    pub fn select_file(&self, title: &str) -> Result<String, RuntimeError> {
        self.select("file", title)
    }

    pub fn select_save_file(&self, title: &str) -> Result<String, RuntimeError> {
        self.select("filesave", title)
    }

    pub fn select_directory(&self, title: &str) -> Result<String, RuntimeError> {
        self.select("directory", title)
    }

    fn select(&self, kind: &'static str, title: &str) -> Result<String, RuntimeError> {
        let response_topic = format!("{}:{}", topics::DIALOG_SELECTED, random_id());
        let topic = format!("{}:{}:{}", topics::DIALOG_SELECT, kind, title);

        tracing::debug!(
            target: "servicebus::runtime",
            kind,
            response_topic = %response_topic,
            "awaiting dialog selection"
        );
        let reply = self.bus.request(
            &topic,
            response_topic.as_str().into(),
            &response_topic,
            self.timeout,
        )?;

        reply
            .data()
            .as_text()
            .map(str::to_owned)
            .ok_or_else(|| RuntimeError::UnexpectedReply {
                kind,
                actual: reply.data().kind(),
            })
    }
}

pub struct BrowserApi<'a> {
    bus: &'a ServiceBus,
}

impl BrowserApi<'_> {
    /// Request that `url` be opened by the runtime subsystem.
    pub fn open(&self, url: &str) -> Result<(), RuntimeError> {
        self.bus.publish(topics::BROWSER_OPEN_URL, url.into())?;
        Ok(())
    }
}
