//! Publish service implementation.

use std::sync::Arc;

use relaybox_shared::config::{StorageMode, TextStorage};
use tracing::{debug, info};

use super::error::ContentError;
use super::format::{relay_message, rewrite_file_link};
use super::types::{ContentBlock, ContentType, NewContentBlock, PublishInput, PublishedContent};
use crate::relay::TelegramClient;

/// Repository trait for content block persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait ContentRepository: Send + Sync {
    /// All blocks, highest id first.
    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<ContentBlock>, ContentError>> + Send;

    /// Insert one block and return it with its id.
    fn insert(
        &self,
        block: NewContentBlock,
    ) -> impl std::future::Future<Output = Result<ContentBlock, ContentError>> + Send;
}

/// Publishes content blocks, relaying text through Telegram in relay mode.
///
/// Relay and insert are not transactional: if the insert fails after a
/// successful relay, the Telegram message stays behind.
pub struct PublishService<R: ContentRepository> {
    repo: Arc<R>,
    relay: Option<Arc<TelegramClient>>,
    mode: StorageMode,
    text_storage: TextStorage,
}

impl<R: ContentRepository> PublishService<R> {
    /// Create a new publish service.
    #[must_use]
    pub fn new(repo: Arc<R>, mode: StorageMode) -> Self {
        Self {
            repo,
            relay: None,
            mode,
            text_storage: TextStorage::default(),
        }
    }

    /// Attach a relay client.
    #[must_use]
    pub fn with_relay(mut self, relay: Option<Arc<TelegramClient>>) -> Self {
        self.relay = relay;
        self
    }

    /// Choose what is stored for relayed text.
    #[must_use]
    pub fn with_text_storage(mut self, text_storage: TextStorage) -> Self {
        self.text_storage = text_storage;
        self
    }

    /// List every block, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the record store query fails.
    pub async fn list(&self) -> Result<Vec<ContentBlock>, ContentError> {
        self.repo.list().await
    }

    /// Validate, optionally relay, then insert one block.
    ///
    /// `origin` is the public origin of this service, used to rewrite raw
    /// Telegram file links into proxy URLs.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `Validation` if a field is missing or empty, or the type is unknown
    /// - `RelayNotConfigured` / `Relay` if the relay step fails
    /// - `Repository` if the insert fails
    pub async fn publish(
        &self,
        input: PublishInput,
        origin: &str,
    ) -> Result<PublishedContent, ContentError> {
        let mut block = validate(input)?;

        if self.mode == StorageMode::Telegram {
            block.content = self.prepare_for_relay(&block, origin).await?;
        }

        let stored = self.repo.insert(block).await?;
        info!(
            id = stored.id,
            content_type = stored.content_type.as_str(),
            mode = self.mode.as_str(),
            "Content published"
        );

        Ok(stored.into())
    }

    /// Relay text-like content and rewrite binary links; returns the content
    /// to store.
    async fn prepare_for_relay(
        &self,
        block: &NewContentBlock,
        origin: &str,
    ) -> Result<String, ContentError> {
        if let Some(message) = relay_message(block) {
            let relay = self
                .relay
                .as_ref()
                .ok_or(ContentError::RelayNotConfigured)?;
            let sent = relay.send_text(&message).await?;
            debug!(message_id = sent.message_id, "Content relayed");

            return Ok(match self.text_storage {
                TextStorage::Content => block.content.clone(),
                TextStorage::Reference => sent.reference_url,
            });
        }

        Ok(rewrite_file_link(&block.content, origin)?.unwrap_or_else(|| block.content.clone()))
    }
}

/// Check that all fields are present and non-empty and the type is known.
///
/// # Errors
///
/// Returns `Validation` describing the first problem found.
pub fn validate(input: PublishInput) -> Result<NewContentBlock, ContentError> {
    let (Some(content_type), Some(title), Some(content)) = (
        input.content_type.filter(|s| !s.is_empty()),
        input.title.filter(|s| !s.is_empty()),
        input.content.filter(|s| !s.is_empty()),
    ) else {
        return Err(ContentError::validation("missing required fields"));
    };

    let content_type = ContentType::parse(&content_type)
        .ok_or_else(|| ContentError::validation(format!("unknown content type: {content_type}")))?;

    Ok(NewContentBlock {
        content_type,
        title,
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// In-memory repository; `fail_inserts` simulates a write failure.
    #[derive(Default)]
    struct MemoryRepo {
        rows: Mutex<Vec<ContentBlock>>,
        fail_inserts: bool,
    }

    impl ContentRepository for MemoryRepo {
        async fn list(&self) -> Result<Vec<ContentBlock>, ContentError> {
            let mut rows = self.rows.lock().expect("lock").clone();
            rows.sort_by(|a, b| b.id.cmp(&a.id));
            Ok(rows)
        }

        async fn insert(&self, block: NewContentBlock) -> Result<ContentBlock, ContentError> {
            if self.fail_inserts {
                return Err(ContentError::repository("database is locked"));
            }
            let mut rows = self.rows.lock().expect("lock");
            let stored = ContentBlock {
                id: i32::try_from(rows.len()).expect("small") + 1,
                content_type: block.content_type,
                title: block.title,
                content: block.content,
            };
            rows.push(stored.clone());
            Ok(stored)
        }
    }

    fn input(ty: &str, title: &str, content: &str) -> PublishInput {
        PublishInput {
            content_type: Some(ty.to_string()),
            title: Some(title.to_string()),
            content: Some(content.to_string()),
        }
    }

    #[test]
    fn test_validate_rejects_missing_and_empty_fields() {
        let cases = [
            PublishInput::default(),
            PublishInput {
                title: None,
                ..input("text", "t", "c")
            },
            input("", "t", "c"),
            input("text", "", "c"),
            input("text", "t", ""),
        ];
        for case in cases {
            let err = validate(case).unwrap_err();
            assert!(matches!(
                err,
                ContentError::Validation(ref m) if m == "missing required fields"
            ));
        }
    }

    #[test]
    fn test_validate_rejects_unknown_type() {
        let err = validate(input("video", "t", "c")).unwrap_err();
        assert!(matches!(err, ContentError::Validation(_)));
    }

    #[tokio::test]
    async fn test_publish_in_kv_mode_stores_as_is() {
        let repo = Arc::new(MemoryRepo::default());
        let service = PublishService::new(repo.clone(), StorageMode::Kv);

        let published = service
            .publish(input("code", "t", "print(1)"), "http://localhost")
            .await
            .expect("publish should succeed");

        assert_eq!(published.content_type, ContentType::Code);
        assert_eq!(published.content, "print(1)");
        assert_eq!(repo.list().await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn test_publish_validation_failure_writes_nothing() {
        let repo = Arc::new(MemoryRepo::default());
        let service = PublishService::new(repo.clone(), StorageMode::Kv);

        let err = service
            .publish(input("text", "", "body"), "http://localhost")
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Validation(_)));
        assert!(repo.list().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn test_relay_mode_rewrites_telegram_links_without_relay_call() {
        let repo = Arc::new(MemoryRepo::default());
        let service = PublishService::new(repo, StorageMode::Telegram);

        let published = service
            .publish(
                input(
                    "image",
                    "cat",
                    "https://api.telegram.org/file/bot123:abc/photos/file_9.jpg",
                ),
                "https://pad.example.com",
            )
            .await
            .expect("publish should succeed");

        assert_eq!(
            published.content,
            "https://pad.example.com/images/proxy?path=photos%2Ffile_9.jpg"
        );
    }

    #[tokio::test]
    async fn test_relay_mode_text_without_client_fails() {
        let repo = Arc::new(MemoryRepo::default());
        let service = PublishService::new(repo.clone(), StorageMode::Telegram);

        let err = service
            .publish(input("text", "t", "c"), "http://localhost")
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::RelayNotConfigured));
        assert!(repo.list().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn test_repository_failure_is_reported() {
        let repo = Arc::new(MemoryRepo {
            fail_inserts: true,
            ..MemoryRepo::default()
        });
        let service = PublishService::new(repo, StorageMode::Kv);

        let err = service
            .publish(input("text", "t", "c"), "http://localhost")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "database is locked");
    }
}
