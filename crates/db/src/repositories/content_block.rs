//! Content block repository for database operations.
//!
//! Implements the publishing record store using SeaORM.

use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::entities::content_blocks;
use relaybox_core::content::{
    ContentBlock, ContentError, ContentRepository as ContentRepoTrait, ContentType,
    NewContentBlock,
};

/// Content block repository implementation.
#[derive(Debug, Clone)]
pub struct ContentBlockRepository {
    db: DatabaseConnection,
}

impl ContentBlockRepository {
    /// Create a new content block repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ContentRepoTrait for ContentBlockRepository {
    async fn list(&self) -> Result<Vec<ContentBlock>, ContentError> {
        let models = content_blocks::Entity::find()
            .order_by_desc(content_blocks::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ContentError::repository(e.to_string()))?;

        models.into_iter().map(to_domain).collect()
    }

    async fn insert(&self, block: NewContentBlock) -> Result<ContentBlock, ContentError> {
        let active_model = content_blocks::ActiveModel {
            content_type: Set(block.content_type.as_str().to_string()),
            title: Set(block.title),
            content: Set(block.content),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| ContentError::repository(e.to_string()))?;

        to_domain(model)
    }
}

/// Rows with a type outside the known set are reported, not skipped.
fn to_domain(model: content_blocks::Model) -> Result<ContentBlock, ContentError> {
    let content_type = ContentType::parse(&model.content_type).ok_or_else(|| {
        ContentError::repository(format!(
            "content block {} has unknown type {:?}",
            model.id, model.content_type
        ))
    })?;

    Ok(ContentBlock {
        id: model.id,
        content_type,
        title: model.title,
        content: model.content,
    })
}
