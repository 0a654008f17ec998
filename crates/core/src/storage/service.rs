//! Blob store implementation using Apache OpenDAL.

use bytes::Bytes;
use chrono::Utc;
use opendal::{ErrorKind, Operator, services};
use rand::Rng;
use relaybox_shared::config::BlobProvider;
use serde::{Deserialize, Serialize};

use super::config::{BlobNamespace, BlobStoreConfig};
use super::error::StorageError;

/// Suffix of the JSON sidecar holding a blob's metadata.
const META_SUFFIX: &str = ".meta.json";

/// Alphabet of the random token in generated names.
const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random token in generated names.
const TOKEN_LEN: usize = 12;

/// Metadata stored next to every blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobMetadata {
    /// MIME type reported at upload.
    pub content_type: String,
    /// Original filename.
    pub filename: String,
    /// Payload size in bytes.
    pub size: u64,
}

/// A blob read back from the store.
#[derive(Debug, Clone)]
pub struct StoredBlob {
    /// Raw payload.
    pub data: Bytes,
    /// Metadata recorded at upload.
    pub metadata: BlobMetadata,
}

/// Key-value blob store for uploaded files and images.
pub struct BlobStore {
    operator: Operator,
    config: BlobStoreConfig,
}

impl BlobStore {
    /// Create a new blob store from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: BlobStoreConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &BlobProvider) -> Result<Operator, StorageError> {
        match provider {
            BlobProvider::Memory => Operator::new(services::Memory::default())
                .map_err(|e| StorageError::configuration(e.to_string()))?
                .finish()
                .pipe(Ok),
            BlobProvider::Fs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
            BlobProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
        }
    }

    /// Validate an upload against the size limit.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is larger than the configured maximum.
    pub fn validate_upload(&self, size: u64) -> Result<(), StorageError> {
        if size > self.config.max_file_size {
            return Err(StorageError::file_too_large(
                size,
                self.config.max_file_size,
            ));
        }
        Ok(())
    }

    /// Store `data` under a freshly generated name and return that name.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is too large or a write fails.
    pub async fn put(
        &self,
        namespace: BlobNamespace,
        data: Bytes,
        metadata: &BlobMetadata,
    ) -> Result<String, StorageError> {
        self.validate_upload(byte_len(&data))?;

        let name = generate_blob_name(&metadata.filename);
        let key = blob_key(namespace, &name);
        let sidecar =
            serde_json::to_vec(metadata).map_err(|e| StorageError::Metadata(e.to_string()))?;

        self.operator
            .write(&key, data)
            .await
            .map_err(|e| StorageError::from_opendal(&key, &e))?;

        let meta_key = format!("{key}{META_SUFFIX}");
        self.operator
            .write(&meta_key, sidecar)
            .await
            .map_err(|e| StorageError::from_opendal(&meta_key, &e))?;

        Ok(name)
    }

    /// Read a blob and its metadata.
    ///
    /// A missing sidecar is tolerated; the namespace fallback content type
    /// is used instead.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the blob does not exist and `InvalidKey` for
    /// names that could escape the namespace.
    pub async fn get(
        &self,
        namespace: BlobNamespace,
        name: &str,
    ) -> Result<StoredBlob, StorageError> {
        validate_name(name)?;
        let key = blob_key(namespace, name);

        let data = self
            .operator
            .read(&key)
            .await
            .map_err(|e| StorageError::from_opendal(&key, &e))?
            .to_bytes();

        let meta_key = format!("{key}{META_SUFFIX}");
        let metadata = match self.operator.read(&meta_key).await {
            Ok(buffer) => serde_json::from_slice(&buffer.to_bytes())
                .map_err(|e| StorageError::Metadata(e.to_string()))?,
            Err(e) if e.kind() == ErrorKind::NotFound => BlobMetadata {
                content_type: namespace.fallback_content_type().to_string(),
                filename: name.to_string(),
                size: byte_len(&data),
            },
            Err(e) => return Err(StorageError::from_opendal(&meta_key, &e)),
        };

        Ok(StoredBlob { data, metadata })
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider_name()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &BlobStoreConfig {
        &self.config
    }
}

/// Generate a blob name as `{unix_millis}-{token}.{extension}`.
#[must_use]
pub fn generate_blob_name(original_filename: &str) -> String {
    format!(
        "{}-{}.{}",
        Utc::now().timestamp_millis(),
        random_token(TOKEN_LEN),
        file_extension(original_filename)
    )
}

/// Lowercased extension of `filename`, or `bin` when it has none usable.
///
/// Only ASCII alphanumeric extensions are kept so generated names stay safe
/// as storage keys.
#[must_use]
pub fn file_extension(filename: &str) -> String {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map_or_else(|| "bin".to_string(), str::to_ascii_lowercase)
}

fn random_token(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| char::from(TOKEN_ALPHABET[rng.random_range(0..TOKEN_ALPHABET.len())]))
        .collect()
}

fn blob_key(namespace: BlobNamespace, name: &str) -> String {
    format!("{}/{name}", namespace.as_str())
}

/// Reject names that are empty, traverse directories or address a sidecar.
fn validate_name(name: &str) -> Result<(), StorageError> {
    if name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
        || name.ends_with(META_SUFFIX)
    {
        return Err(StorageError::InvalidKey(name.to_string()));
    }
    Ok(())
}

fn byte_len(data: &Bytes) -> u64 {
    u64::try_from(data.len()).unwrap_or(u64::MAX)
}

/// Extension trait for pipe operator.
trait Pipe: Sized {
    fn pipe<F, R>(self, f: F) -> R
    where
        F: FnOnce(Self) -> R,
    {
        f(self)
    }
}

impl<T> Pipe for T {}
