//! Random identifiers for clients and response topics.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

/// A random, topic-safe identifier.
///
/// 16 random bytes, URL-safe base64 without padding: never contains the
/// `:` segment separator.
pub fn random_id() -> String {
    let bytes: [u8; 16] = rand::random();
    URL_SAFE_NO_PAD.encode(bytes)
}
