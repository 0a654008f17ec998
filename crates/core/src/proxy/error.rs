//! Proxy error types.

use relaybox_shared::AppError;
use thiserror::Error;

use crate::relay::RelayError;

/// Proxy fetch errors.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Neither `path` nor `file_id` was supplied.
    #[error("Missing file path")]
    MissingPath,

    /// No relay client is available to fetch from.
    #[error("Telegram relay is not configured")]
    RelayNotConfigured,

    /// Lookup or download failed.
    #[error(transparent)]
    Relay(#[from] RelayError),
}

impl From<ProxyError> for AppError {
    fn from(err: ProxyError) -> Self {
        match err {
            ProxyError::MissingPath => Self::Validation(err.to_string()),
            ProxyError::RelayNotConfigured => Self::Internal(err.to_string()),
            ProxyError::Relay(e) => e.into(),
        }
    }
}
