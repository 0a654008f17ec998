//! Upload error types.

use relaybox_shared::AppError;
use thiserror::Error;

use crate::relay::RelayError;
use crate::storage::StorageError;

/// Upload errors.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Relay mode is active but no relay client is available.
    #[error("Telegram relay is not configured")]
    RelayNotConfigured,

    /// Blob store failure, including the size limit.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Relay upload failure.
    #[error(transparent)]
    Relay(#[from] RelayError),
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::RelayNotConfigured => Self::Internal(err.to_string()),
            UploadError::Storage(e) => e.into(),
            UploadError::Relay(e) => e.into(),
        }
    }
}
