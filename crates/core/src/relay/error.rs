//! Relay error types.

use relaybox_shared::AppError;
use thiserror::Error;

/// Telegram relay errors.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The Bot API answered `ok: false` or a non-success status.
    #[error("Telegram API error: {description}")]
    Api {
        /// Description reported by Telegram.
        description: String,
    },

    /// The upload succeeded but the message carries no file.
    #[error("Telegram response did not contain a file id")]
    MissingFileId,

    /// The retrieval URL for an uploaded file could not be derived.
    #[error("failed to resolve file URL: {0}")]
    FileResolution(String),

    /// The response body could not be understood.
    #[error("unexpected Telegram response: {0}")]
    InvalidResponse(String),

    /// Transport failure. The request URL is stripped because it embeds the
    /// bot token.
    #[error("Telegram request failed: {0}")]
    Http(reqwest::Error),
}

impl RelayError {
    /// Create an API error.
    #[must_use]
    pub fn api(description: impl Into<String>) -> Self {
        Self::Api {
            description: description.into(),
        }
    }

    /// Create a file resolution error.
    #[must_use]
    pub fn file_resolution(msg: impl Into<String>) -> Self {
        Self::FileResolution(msg.into())
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }
}

impl From<RelayError> for AppError {
    fn from(err: RelayError) -> Self {
        Self::ExternalService(err.to_string())
    }
}
