//! Service Bus - in-process topic pub/sub.
//!
//! Publishers tag every message with a colon-segmented topic; subscribers
//! register a topic prefix and receive every message whose leading
//! segments equal that prefix.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     ServiceBus (Clone)                        │
//! │  subscribe(prefix) -> Subscription                            │
//! │  publish(topic, payload) -> fan-out to matching prefixes      │
//! └──────────────────────────────────────────────────────────────┘
//!          │                   │                    │
//!          ▼                   ▼                    ▼
//! ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────────┐
//! │  "quit"         │ │  "window"       │ │  "dialog:select"    │
//! │  bounded buffer │ │  bounded buffer │ │  bounded buffer     │
//! └─────────────────┘ └─────────────────┘ └─────────────────────┘
//!          │                   │                    │
//!          └─────────── select! in a receive loop ──┘
//! ```
//!
//! ## Request / reply
//!
//! ```ignore
//! // The reply subscription is in place before the request goes out.
//! let reply = bus.request(
//!     "dialog:select:file:Open",
//!     Payload::Text("dialog:fileselected:abc".into()),
//!     "dialog:fileselected:abc",
//!     None,
//! )?;
//! ```

mod message;
mod publisher;
mod service_bus;
mod subscriber;
mod topic;

pub use message::{EventMessage, Message, Payload};
pub use publisher::Publisher;
pub use service_bus::ServiceBus;
pub use subscriber::{Subscriber, Subscription};
pub use topic::{topics, Topic, SEPARATOR};
