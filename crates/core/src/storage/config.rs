//! Storage configuration types.

use relaybox_shared::config::{BlobProvider, StorageConfig};

/// Key-value namespace a blob lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlobNamespace {
    /// Generic uploads served from `/files/{name}`.
    Files,
    /// Images served from `/images/{name}`.
    Images,
}

impl BlobNamespace {
    /// Key prefix and public route segment.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Files => "files",
            Self::Images => "images",
        }
    }

    /// Content type assumed when a blob carries none.
    #[must_use]
    pub const fn fallback_content_type(self) -> &'static str {
        match self {
            Self::Files => "application/octet-stream",
            Self::Images => "image/jpeg",
        }
    }
}

/// Blob store configuration.
#[derive(Debug, Clone)]
pub struct BlobStoreConfig {
    /// Storage provider configuration.
    pub provider: BlobProvider,
    /// Maximum file size in bytes.
    pub max_file_size: u64,
}

impl BlobStoreConfig {
    /// Default max file size: 20MB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = StorageConfig::DEFAULT_MAX_FILE_SIZE;

    /// Create a new blob store config with default settings.
    #[must_use]
    pub fn new(provider: BlobProvider) -> Self {
        Self {
            provider,
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Set maximum file size.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Get the provider name for logs.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        match self.provider {
            BlobProvider::Memory => "memory",
            BlobProvider::Fs { .. } => "fs",
            BlobProvider::S3 { .. } => "s3",
        }
    }
}

impl From<&StorageConfig> for BlobStoreConfig {
    fn from(config: &StorageConfig) -> Self {
        Self::new(config.provider.clone()).with_max_file_size(config.max_file_size)
    }
}
