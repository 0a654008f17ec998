//! Integration tests for the content block repository against in-memory SQLite.

use relaybox_core::content::{
    ContentError, ContentRepository, ContentType, NewContentBlock, PublishInput, PublishService,
};
use relaybox_db::ContentBlockRepository;
use relaybox_db::migration::{Migrator, MigratorTrait};
use relaybox_shared::config::{DatabaseConfig, StorageMode};
use sea_orm::{ConnectionTrait, DatabaseConnection};
use std::sync::Arc;

/// A fresh migrated database. One connection, since every SQLite memory
/// connection is its own database.
async fn setup_db() -> DatabaseConnection {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    };
    let db = relaybox_db::connect(&config)
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None).await.expect("Failed to migrate");
    db
}

fn block(content_type: ContentType, title: &str, content: &str) -> NewContentBlock {
    NewContentBlock {
        content_type,
        title: title.to_string(),
        content: content.to_string(),
    }
}

#[tokio::test]
async fn test_empty_store_lists_nothing() {
    let repo = ContentBlockRepository::new(setup_db().await);
    assert!(repo.list().await.expect("list").is_empty());
}

#[tokio::test]
async fn test_insert_assigns_increasing_ids() {
    let repo = ContentBlockRepository::new(setup_db().await);

    let first = repo
        .insert(block(ContentType::Text, "one", "first"))
        .await
        .expect("insert");
    let second = repo
        .insert(block(ContentType::Code, "two", "fn main() {}"))
        .await
        .expect("insert");

    assert!(second.id > first.id);
    assert_eq!(second.content_type, ContentType::Code);
    assert_eq!(second.content, "fn main() {}");
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let repo = ContentBlockRepository::new(setup_db().await);
    for (i, ty) in [ContentType::Text, ContentType::Poetry, ContentType::Image]
        .into_iter()
        .enumerate()
    {
        repo.insert(block(ty, &format!("t{i}"), &format!("c{i}")))
            .await
            .expect("insert");
    }

    let listed = repo.list().await.expect("list");
    let titles: Vec<_> = listed.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, ["t2", "t1", "t0"]);
    assert!(listed.windows(2).all(|w| w[0].id > w[1].id));
}

#[tokio::test]
async fn test_unknown_stored_type_is_reported() {
    let db = setup_db().await;
    db.execute_unprepared(
        "INSERT INTO content_blocks (type, title, content) VALUES ('video', 't', 'c')",
    )
    .await
    .expect("raw insert");

    let err = ContentBlockRepository::new(db).list().await.unwrap_err();
    assert!(matches!(err, ContentError::Repository(_)));
}

#[tokio::test]
async fn test_publish_service_round_trip() {
    let repo = Arc::new(ContentBlockRepository::new(setup_db().await));
    let service = PublishService::new(repo, StorageMode::Kv);

    let published = service
        .publish(
            PublishInput {
                content_type: Some("poetry".to_string()),
                title: Some("Haiku".to_string()),
                content: Some("old pond\nfrog leaps in".to_string()),
            },
            "http://localhost:8080",
        )
        .await
        .expect("publish");
    assert_eq!(published.content_type, ContentType::Poetry);

    let listed = service.list().await.expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Haiku");
    assert_eq!(listed[0].content, "old pond\nfrog leaps in");
}

#[tokio::test]
async fn test_migration_down_drops_table() {
    let db = setup_db().await;
    Migrator::down(&db, None).await.expect("rollback");

    let err = ContentBlockRepository::new(db).list().await.unwrap_err();
    assert!(matches!(err, ContentError::Repository(_)));
}
