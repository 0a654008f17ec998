//! Cached file proxy in front of the Telegram file endpoint.

use std::sync::Arc;

use tracing::debug;

use super::cache::{CachedFile, ProxyCache};
use super::error::ProxyError;
use crate::relay::{TelegramClient, infer_content_type};

/// What the client asked the proxy for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyKey {
    /// A file path on the Telegram file endpoint.
    Path(String),
    /// A file id, resolved to a path with `getFile` on a miss.
    FileId(String),
}

impl ProxyKey {
    /// Build a key from the `path` / `file_id` query parameters.
    ///
    /// `path` wins when both are present; empty values count as absent.
    ///
    /// # Errors
    ///
    /// Returns `MissingPath` when neither parameter carries a value.
    pub fn from_query(path: Option<String>, file_id: Option<String>) -> Result<Self, ProxyError> {
        match (
            path.filter(|p| !p.is_empty()),
            file_id.filter(|id| !id.is_empty()),
        ) {
            (Some(path), _) => Ok(Self::Path(path)),
            (None, Some(file_id)) => Ok(Self::FileId(file_id)),
            (None, None) => Err(ProxyError::MissingPath),
        }
    }

    /// Normalized cache key.
    #[must_use]
    pub fn cache_key(&self) -> String {
        match self {
            Self::Path(path) => format!("path:{path}"),
            Self::FileId(id) => format!("file_id:{id}"),
        }
    }
}

/// Fetches relayed files, serving repeats from the cache when enabled.
pub struct FileProxy {
    relay: Option<Arc<TelegramClient>>,
    cache: Option<ProxyCache>,
}

impl FileProxy {
    /// Create a proxy. `cache: None` disables caching.
    #[must_use]
    pub fn new(relay: Option<Arc<TelegramClient>>, cache: Option<ProxyCache>) -> Self {
        Self { relay, cache }
    }

    /// Fetch a file; the flag is `true` on a cache hit.
    ///
    /// Two concurrent misses for the same key both go upstream; the later
    /// insert wins.
    ///
    /// # Errors
    ///
    /// Returns an error if no relay is configured or the lookup or download
    /// fails. Failures are never cached.
    pub async fn fetch(&self, key: &ProxyKey) -> Result<(CachedFile, bool), ProxyError> {
        let cache_key = key.cache_key();

        if let Some(cache) = &self.cache
            && let Some(hit) = cache.get(&cache_key).await
        {
            debug!(key = %cache_key, "proxy cache hit");
            return Ok((hit, true));
        }

        let relay = self.relay.as_ref().ok_or(ProxyError::RelayNotConfigured)?;
        let path = match key {
            ProxyKey::Path(path) => path.clone(),
            ProxyKey::FileId(id) => relay.get_file_path(id).await?,
        };

        let downloaded = relay.download(&path).await?;
        let file = CachedFile {
            content_type: infer_content_type(&path, downloaded.content_type.as_deref()),
            data: downloaded.data,
        };
        debug!(key = %cache_key, size = file.data.len(), "proxy cache miss");

        if let Some(cache) = &self.cache {
            cache.insert(cache_key, file.clone()).await;
        }

        Ok((file, false))
    }
}
