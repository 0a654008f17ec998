//! Upload service implementation.

use std::sync::Arc;

use relaybox_shared::config::StorageMode;
use tracing::info;

use super::error::UploadError;
use super::types::{UploadInput, UploadResult};
use crate::relay::{TelegramClient, mime_for_path};
use crate::storage::{BlobMetadata, BlobNamespace, BlobStore};

/// Sends uploads to the configured backend and reports their URL.
pub struct UploadService {
    mode: StorageMode,
    blobs: Arc<BlobStore>,
    relay: Option<Arc<TelegramClient>>,
}

impl UploadService {
    /// Create a new upload service.
    #[must_use]
    pub fn new(mode: StorageMode, blobs: Arc<BlobStore>) -> Self {
        Self {
            mode,
            blobs,
            relay: None,
        }
    }

    /// Attach a relay client.
    #[must_use]
    pub fn with_relay(mut self, relay: Option<Arc<TelegramClient>>) -> Self {
        self.relay = relay;
        self
    }

    /// Store one upload and return where it can be fetched.
    ///
    /// The size limit is checked before anything is written or sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is too large or the backend rejects it.
    pub async fn upload(
        &self,
        namespace: BlobNamespace,
        input: UploadInput,
        origin: &str,
    ) -> Result<UploadResult, UploadError> {
        let size = u64::try_from(input.data.len()).unwrap_or(u64::MAX);
        self.blobs.validate_upload(size)?;

        let content_type = input
            .content_type
            .filter(|ct| !ct.is_empty())
            .or_else(|| mime_for_path(&input.filename).map(String::from))
            .unwrap_or_else(|| namespace.fallback_content_type().to_string());

        let url = match self.mode {
            StorageMode::Kv => {
                let metadata = BlobMetadata {
                    content_type: content_type.clone(),
                    filename: input.filename.clone(),
                    size,
                };
                let name = self.blobs.put(namespace, input.data, &metadata).await?;
                format!(
                    "{}/{}/{name}",
                    origin.trim_end_matches('/'),
                    namespace.as_str()
                )
            }
            StorageMode::Telegram => {
                let relay = self.relay.as_ref().ok_or(UploadError::RelayNotConfigured)?;
                relay
                    .send_binary(input.data, &input.filename, origin)
                    .await?
                    .url
            }
        };

        info!(
            namespace = namespace.as_str(),
            mode = self.mode.as_str(),
            size,
            "Upload stored"
        );

        Ok(UploadResult {
            url,
            filename: input.filename,
            size,
            content_type,
        })
    }
}
