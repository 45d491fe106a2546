//! The backend's browser primitive.

use super::error::RuntimeError;

/// Opens URLs outside the application.
pub trait Browser: Send + Sync {
    fn open(&self, url: &str) -> Result<(), RuntimeError>;
}

/// Opens URLs with the platform's default handler.
#[cfg(feature = "system-browser")]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

#[cfg(feature = "system-browser")]
impl Browser for SystemBrowser {
    fn open(&self, url: &str) -> Result<(), RuntimeError> {
        open::that(url).map_err(|e| RuntimeError::Browser {
            url: url.to_owned(),
            reason: e.to_string(),
        })
    }
}
