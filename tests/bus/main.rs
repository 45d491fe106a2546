//! Service bus integration tests.
//!
//! - Segment-prefix matching
//! - Per-subscription ordering under concurrent publishers
//! - Request/reply over a response topic

mod request;
