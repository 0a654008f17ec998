//! Response cache for proxied files.

use bytes::Bytes;
use moka::future::Cache;

/// A fetched file as served to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedFile {
    /// Payload.
    pub data: Bytes,
    /// Inferred MIME type.
    pub content_type: String,
}

/// In-memory cache of proxied files, bounded by total payload bytes.
///
/// Entries never expire; eviction only happens under capacity pressure.
#[derive(Clone)]
pub struct ProxyCache {
    cache: Cache<String, CachedFile>,
}

impl ProxyCache {
    /// Creates a cache holding at most `max_capacity_bytes` of payload.
    #[must_use]
    pub fn new(max_capacity_bytes: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity_bytes)
            .weigher(|_key: &String, file: &CachedFile| {
                u32::try_from(file.data.len()).unwrap_or(u32::MAX)
            })
            .build();

        Self { cache }
    }

    /// Look up a cached file.
    pub async fn get(&self, key: &str) -> Option<CachedFile> {
        self.cache.get(key).await
    }

    /// Store a file, replacing any previous entry.
    pub async fn insert(&self, key: String, file: CachedFile) {
        self.cache.insert(key, file).await;
    }

    /// Returns the number of entries currently in the cache.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs cache maintenance tasks.
    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(data: &'static [u8]) -> CachedFile {
        CachedFile {
            data: Bytes::from_static(data),
            content_type: "image/png".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let cache = ProxyCache::new(1024);
        assert!(cache.get("path:a.png").await.is_none());

        cache.insert("path:a.png".to_string(), file(b"png")).await;
        assert_eq!(cache.get("path:a.png").await, Some(file(b"png")));
    }

    #[tokio::test]
    async fn test_capacity_is_measured_in_bytes() {
        let cache = ProxyCache::new(4);
        cache.insert("path:big".to_string(), file(b"0123456789")).await;
        cache.run_pending_tasks().await;

        assert!(cache.get("path:big").await.is_none());
        assert_eq!(cache.entry_count(), 0);
    }
}
