//! Content block routes.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
    routing::get,
};
use relaybox_core::content::{ContentBlock, PublishInput, PublishService, PublishedContent};
use relaybox_db::ContentBlockRepository;
use relaybox_shared::AppError;

use crate::{ApiError, AppState, extractors::RequestOrigin};

/// Creates the content routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/contents", get(list_contents).post(publish_content))
}

fn publish_service(state: &AppState) -> PublishService<ContentBlockRepository> {
    let repo = ContentBlockRepository::new((*state.db).clone());
    PublishService::new(Arc::new(repo), state.config.storage.mode)
        .with_relay(state.relay.clone())
        .with_text_storage(state.config.telegram.text_storage)
}

/// GET `/contents`
/// Every block, newest first.
async fn list_contents(State(state): State<AppState>) -> Result<Json<Vec<ContentBlock>>, ApiError> {
    let blocks = publish_service(&state).list().await?;
    Ok(Json(blocks))
}

/// POST `/contents`
/// Publish one block and echo what was stored.
async fn publish_content(
    State(state): State<AppState>,
    origin: RequestOrigin,
    payload: Result<Json<PublishInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload.map_err(|e| ApiError(AppError::Validation(e.body_text())))?;

    let published: PublishedContent = publish_service(&state)
        .publish(input, origin.as_str())
        .await?;

    Ok(Json(published))
}
