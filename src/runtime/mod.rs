//! Runtime: the backend's side of the bus.
//!
//! [`Runtime`] is what backend code calls to reach the frontends (events,
//! window, dialogs, browser). [`RuntimeSubsystem`] listens on `runtime`
//! and performs the requests frontends send back, such as opening a URL
//! in the system browser.

mod api;
mod browser;
mod error;
mod subsystem;

pub use api::{BrowserApi, DialogApi, EventsApi, Runtime, WindowApi};
#[cfg(feature = "system-browser")]
pub use browser::SystemBrowser;
pub use browser::Browser;
pub use error::RuntimeError;
pub use subsystem::{RuntimeStats, RuntimeSubsystem, RuntimeThread};
