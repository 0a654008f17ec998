//! Content error types.

use relaybox_shared::AppError;
use thiserror::Error;

use crate::relay::RelayError;

/// Publishing and listing errors.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Rejected input; nothing was written.
    #[error("{0}")]
    Validation(String),

    /// Relay mode is active but no relay client is available.
    #[error("Telegram relay is not configured")]
    RelayNotConfigured,

    /// The relay call failed.
    #[error(transparent)]
    Relay(#[from] RelayError),

    /// Record store operation failed.
    #[error("{0}")]
    Repository(String),
}

impl ContentError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}

impl From<ContentError> for AppError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::Validation(msg) => Self::Validation(msg),
            ContentError::RelayNotConfigured => Self::Internal(err.to_string()),
            ContentError::Relay(relay) => relay.into(),
            ContentError::Repository(msg) => Self::Database(msg),
        }
    }
}
