//! In-process service bus connecting a backend to its frontends.
//!
//! - [`bus`]: topic pub/sub with segment-prefix matching
//! - [`parser`]: decodes raw frontend messages into bus messages
//! - [`dispatcher`]: routes bus traffic to registered frontends
//! - [`runtime`]: backend API and backend-side request handling

pub mod bus;
mod config;
pub mod dispatcher;
mod error;
pub mod ids;
pub mod parser;
pub mod runtime;
pub mod telemetry;

pub use bus::{
    topics, EventMessage, Message, Payload, Publisher, ServiceBus, Subscriber, Subscription, Topic,
};
pub use config::{BusConfig, CallResultPolicy, LogFormat};
pub use dispatcher::{
    ClientId, ClientInfo, ClientRegistry, ClientSelector, Clients, DispatchClient, DispatchError,
    Dispatcher, DispatcherStats, DispatcherThread, FirstRegistered, Frontend, LastRegistered,
};
pub use error::BusError;
pub use parser::{ParseError, ParsedMessage};
pub use runtime::{Browser, Runtime, RuntimeError, RuntimeStats, RuntimeSubsystem, RuntimeThread};
