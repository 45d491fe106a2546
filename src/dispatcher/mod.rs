//! Message Dispatcher: bus traffic to frontend capability calls.
//!
//! The dispatcher owns five subscriptions and one receive loop:
//!
//! | Topic                          | Action                                        |
//! |--------------------------------|-----------------------------------------------|
//! | `quit`                         | `Frontend::quit` on every client, loop ends   |
//! | `call:result:<client>`         | `Frontend::call_result` on that client        |
//! | `event:emit:<scope>:g`         | JSON-encode, `Frontend::notify_event` on all  |
//! | `window:<command>`             | window capability on every client             |
//! | `dialog:select:<kind>:<title>` | dialog on one client, reply on response topic |
//!
//! Malformed traffic is logged and dropped. A call result that cannot be
//! routed is fatal unless `CallResultPolicy::LogAndDrop` is configured.

mod client;
#[allow(clippy::module_inception)]
mod dispatcher;
mod error;
mod frontend;
mod registry;
mod selector;

pub use client::{Clients, DispatchClient};
pub use dispatcher::{
    Dispatcher, DispatcherStats, DispatcherThread, FatalHook, BACKEND_ORIGIN, FRONTEND_ORIGIN,
};
pub use error::DispatchError;
pub(crate) use error::panic_message;
pub use frontend::Frontend;
pub use registry::{ClientId, ClientInfo, ClientRegistry};
pub use selector::{ClientSelector, FirstRegistered, LastRegistered};
