//! The message dispatcher: bus traffic in, frontend capability calls out.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{select, RecvError};

use crate::bus::{topics, Message, Payload, Publisher, ServiceBus, Subscriber, Subscription};
use crate::config::{BusConfig, CallResultPolicy};
use crate::error::BusError;

use super::client::{Clients, DispatchClient};
use super::error::{panic_message, DispatchError};
use super::frontend::Frontend;
use super::registry::ClientRegistry;
use super::selector::{ClientSelector, FirstRegistered};

const TARGET: &str = "servicebus::dispatcher";

/// Origin segment of events emitted by the backend.
pub const BACKEND_ORIGIN: &str = "g";
/// Origin segment of events emitted by a frontend.
pub const FRONTEND_ORIGIN: &str = "j";

/// Invoked when a protocol invariant is violated under
/// `CallResultPolicy::Fatal`.
pub type FatalHook = Arc<dyn Fn(&str) + Send + Sync>;

fn exit_process() -> FatalHook {
    Arc::new(|reason: &str| {
        tracing::error!(target: TARGET, reason, "fatal protocol violation, terminating");
        std::process::exit(1);
    })
}

/// Counts from a finished dispatcher loop.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DispatcherStats {
    pub quits: usize,
    pub call_results: usize,
    pub events_broadcast: usize,
    /// Frontend-originated events, which are not echoed back.
    pub events_ignored: usize,
    pub window_commands: usize,
    pub dialogs: usize,
    /// Messages dropped because they could not be dispatched.
    pub rejected: usize,
}

#[derive(Debug)]
enum Handled {
    Done,
    EventIgnored,
}

struct Subscriptions {
    quit: Subscription,
    result: Subscription,
    event: Subscription,
    window: Subscription,
    dialog: Subscription,
}

/// Subscribes to `quit`, `call:result`, `event:emit`, `window` and
/// `dialog:select` and turns each message into calls on registered
/// frontends.
///
/// ## Example
///
/// ```ignore
/// let bus = ServiceBus::new();
/// let dispatcher = Dispatcher::new(&bus, &BusConfig::default())?;
/// let client = dispatcher.register_client(Arc::new(MyWindow::new()))?;
///
/// let running = dispatcher.start()?;
/// bus.publish("window:settitle", "Hello".into())?;
///
/// bus.publish("quit", Payload::Empty)?;
/// let stats = running.join();
/// ```
pub struct Dispatcher {
    bus: ServiceBus,
    clients: Arc<ClientRegistry>,
    subscriptions: Subscriptions,
    policy: CallResultPolicy,
    selector: Box<dyn ClientSelector>,
    fatal: FatalHook,
}

impl Dispatcher {
    /// Create a dispatcher with its own client registry.
    pub fn new(bus: &ServiceBus, config: &BusConfig) -> Result<Self, BusError> {
        Self::with_registry(bus, Arc::new(ClientRegistry::new()), config)
    }

    /// Create a dispatcher over an existing client registry.
    pub fn with_registry(
        bus: &ServiceBus,
        clients: Arc<ClientRegistry>,
        config: &BusConfig,
    ) -> Result<Self, BusError> {
        let subscriptions = Subscriptions {
            result: bus.subscribe(topics::CALL_RESULT)?,
            event: bus.subscribe(topics::EVENT_EMIT)?,
            quit: bus.subscribe(topics::QUIT)?,
            window: bus.subscribe(topics::WINDOW)?,
            dialog: bus.subscribe(topics::DIALOG_SELECT)?,
        };

        Ok(Self {
            bus: bus.clone(),
            clients,
            subscriptions,
            policy: config.call_result_policy,
            selector: Box::new(FirstRegistered),
            fatal: exit_process(),
        })
    }

    /// Replace the dialog target selection strategy.
    pub fn with_selector(mut self, selector: impl ClientSelector + 'static) -> Self {
        self.selector = Box::new(selector);
        self
    }

    /// Replace what happens on a fatal protocol violation. The default
    /// logs and exits the process.
    pub fn with_fatal_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.fatal = Arc::new(hook);
        self
    }

    pub fn clients(&self) -> Clients {
        Clients::new(Arc::clone(&self.clients), self.bus.clone())
    }

    pub fn register_client(&self, frontend: Arc<dyn Frontend>) -> Result<DispatchClient, BusError> {
        self.clients().register(frontend)
    }

    pub fn remove_client(&self, client: &DispatchClient) -> Result<(), BusError> {
        self.clients().remove(client)
    }

    /// Spawn the receive loop. It runs until a `quit` message arrives.
    pub fn start(self) -> Result<DispatcherThread, DispatchError> {
        let clients = self.clients();
        tracing::trace!(target: TARGET, "starting");

        let handle = thread::Builder::new()
            .name("servicebus-dispatcher".into())
            .spawn(move || self.run())
            .map_err(|e| DispatchError::Spawn(e.to_string()))?;

        Ok(DispatcherThread {
            handle: Some(handle),
            clients,
        })
    }

    fn run(self) -> DispatcherStats {
        let mut stats = DispatcherStats::default();
        let subs = &self.subscriptions;

        loop {
            let running = select! {
                recv(subs.quit.receiver()) -> message => {
                    if message.is_ok() {
                        self.process_quit(&mut stats);
                    }
                    false
                }
                recv(subs.result.receiver()) -> message => self.step(
                    &mut stats,
                    message,
                    Self::process_call_result,
                    |s| s.call_results += 1,
                ),
                recv(subs.event.receiver()) -> message => self.step(
                    &mut stats,
                    message,
                    Self::process_event,
                    |s| s.events_broadcast += 1,
                ),
                recv(subs.window.receiver()) -> message => self.step(
                    &mut stats,
                    message,
                    Self::process_window,
                    |s| s.window_commands += 1,
                ),
                recv(subs.dialog.receiver()) -> message => self.step(
                    &mut stats,
                    message,
                    Self::process_dialog,
                    |s| s.dialogs += 1,
                ),
            };
            if !running {
                break;
            }
        }

        self.shutdown();
        stats
    }

    /// Handle one received message; false once the channel is gone.
    fn step(
        &self,
        stats: &mut DispatcherStats,
        received: Result<Arc<Message>, RecvError>,
        handler: fn(&Self, &Message) -> Result<Handled, DispatchError>,
        handled: fn(&mut DispatcherStats),
    ) -> bool {
        let Ok(message) = received else {
            return false;
        };

        match handler(self, &message) {
            Ok(Handled::Done) => handled(stats),
            Ok(Handled::EventIgnored) => stats.events_ignored += 1,
            Err(error) => {
                stats.rejected += 1;
                tracing::error!(
                    target: TARGET,
                    topic = %message.topic(),
                    payload = message.data().kind(),
                    error = %error,
                    "dropping message"
                );
            }
        }
        true
    }

    fn process_quit(&self, stats: &mut DispatcherStats) {
        match self.clients.for_each(|_, frontend| frontend.quit()) {
            Ok(count) => {
                stats.quits += 1;
                tracing::debug!(target: TARGET, clients = count, "quit broadcast");
            }
            Err(error) => {
                stats.rejected += 1;
                tracing::error!(target: TARGET, error = %error, "quit broadcast failed");
            }
        }
    }

    fn shutdown(&self) {
        tracing::trace!(target: TARGET, "shutdown");
    }

    fn process_call_result(&self, message: &Message) -> Result<Handled, DispatchError> {
        let Some(target) = message.target() else {
            return Err(self.unroutable(message));
        };
        let Some(frontend) = self.clients.get(target)? else {
            return Err(self.unroutable(message));
        };

        let result = expect_text(message)?;
        tracing::trace!(target: TARGET, client = target, result, "sending call result");
        frontend.call_result(result);
        Ok(Handled::Done)
    }

    /// Calls are one request, one result: losing the addressee is a
    /// programming error in the caller.
    fn unroutable(&self, message: &Message) -> DispatchError {
        let error = DispatchError::UnroutableResult {
            topic: message.topic().to_string(),
            target: message.target().map(str::to_owned),
        };
        if self.policy == CallResultPolicy::Fatal {
            (self.fatal)(&error.to_string());
        }
        error
    }

    fn process_event(&self, message: &Message) -> Result<Handled, DispatchError> {
        let topic = message.topic();
        // event:emit:<scope>:<origin>
        let origin = topic
            .segment(3)
            .ok_or_else(|| malformed(message, "expected event:emit:<scope>:<origin>"))?;

        match origin {
            BACKEND_ORIGIN => {
                let event =
                    message
                        .data()
                        .as_event()
                        .ok_or_else(|| DispatchError::InvalidPayload {
                            topic: topic.to_string(),
                            expected: "event",
                            actual: message.data().kind(),
                        })?;
                let payload = serde_json::to_string(event)
                    .map_err(|e| DispatchError::Serialize(e.to_string()))?;
                self.clients
                    .for_each(|_, frontend| frontend.notify_event(&payload))?;
                Ok(Handled::Done)
            }
            FRONTEND_ORIGIN => {
                tracing::trace!(target: TARGET, topic = %topic, "frontend event not echoed");
                Ok(Handled::EventIgnored)
            }
            other => Err(DispatchError::UnknownCommand {
                topic: topic.to_string(),
                command: other.to_owned(),
            }),
        }
    }

    fn process_window(&self, message: &Message) -> Result<Handled, DispatchError> {
        let command = message
            .topic()
            .segment(1)
            .ok_or_else(|| malformed(message, "expected window:<command>"))?;

        match command {
            "settitle" => {
                let title = expect_text(message)?;
                self.clients
                    .for_each(|_, frontend| frontend.window_set_title(title))?;
            }
            "fullscreen" => {
                self.clients.for_each(|_, frontend| frontend.window_fullscreen())?;
            }
            "unfullscreen" => {
                self.clients.for_each(|_, frontend| frontend.window_unfullscreen())?;
            }
            "setcolour" => {
                let colour = expect_text(message)?;
                self.clients
                    .for_each(|_, frontend| frontend.window_set_colour(colour))?;
            }
            other => {
                return Err(DispatchError::UnknownCommand {
                    topic: message.topic().to_string(),
                    command: other.to_owned(),
                })
            }
        }

        tracing::trace!(target: TARGET, topic = %message.topic(), "window command dispatched");
        Ok(Handled::Done)
    }

    fn process_dialog(&self, message: &Message) -> Result<Handled, DispatchError> {
        let topic = message.topic();
        // dialog:select:<kind>:<title>; a title may itself contain ':'
        if topic.len() < 4 {
            return Err(malformed(message, "expected dialog:select:<kind>:<title>"));
        }
        let kind = &topic.segments()[2];
        let title = topic.segments()[3..].join(":");

        if !matches!(kind.as_str(), "file" | "filesave" | "directory") {
            return Err(DispatchError::UnknownCommand {
                topic: topic.to_string(),
                command: kind.clone(),
            });
        }
        let response_topic = expect_text(message)?;

        tracing::info!(
            target: TARGET,
            kind = %kind,
            title = %title,
            response_topic,
            "opening dialog"
        );

        let result = match self.clients.select(self.selector.as_ref())? {
            Some((client, frontend)) => {
                tracing::debug!(target: TARGET, client = %client, "dialog target selected");
                match kind.as_str() {
                    "file" => frontend.open_file_dialog(&title),
                    "filesave" => frontend.save_file_dialog(&title),
                    _ => frontend.open_directory_dialog(&title),
                }
            }
            None => {
                tracing::warn!(target: TARGET, topic = %topic, "no client to show dialog, replying empty");
                String::new()
            }
        };

        self.bus.publish(response_topic, Payload::Text(result))?;
        Ok(Handled::Done)
    }
}

fn malformed(message: &Message, reason: &str) -> DispatchError {
    DispatchError::Malformed {
        topic: message.topic().to_string(),
        reason: reason.to_owned(),
    }
}

fn expect_text(message: &Message) -> Result<&str, DispatchError> {
    message
        .data()
        .as_text()
        .ok_or_else(|| DispatchError::InvalidPayload {
            topic: message.topic().to_string(),
            expected: "text",
            actual: message.data().kind(),
        })
}

/// A running dispatcher loop.
pub struct DispatcherThread {
    handle: Option<JoinHandle<DispatcherStats>>,
    clients: Clients,
}

impl DispatcherThread {
    pub fn clients(&self) -> &Clients {
        &self.clients
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the loop to end (publish `quit` first) and return its
    /// statistics, or the panic that ended it.
    pub fn try_join(mut self) -> Result<DispatcherStats, DispatchError> {
        let Some(handle) = self.handle.take() else {
            return Ok(DispatcherStats::default());
        };
        handle
            .join()
            .map_err(|payload| DispatchError::Panicked(panic_message(payload.as_ref())))
    }

    /// Like `try_join`, but a panicked loop is logged and yields empty
    /// statistics.
    pub fn join(self) -> DispatcherStats {
        self.try_join().unwrap_or_else(|error| {
            tracing::error!(target: TARGET, error = %error, "dispatcher loop ended abnormally");
            DispatcherStats::default()
        })
    }
}
