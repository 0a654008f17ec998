//! API route definitions.

use axum::Router;
use axum::extract::Multipart;
use relaybox_core::upload::UploadInput;
use relaybox_shared::AppError;

use crate::{AppState, ApiError};

pub mod contents;
pub mod files;
pub mod health;
pub mod images;
pub mod vars;

/// Creates the router with every route.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(contents::routes())
        .merge(files::routes())
        .merge(images::routes())
        .merge(vars::routes())
}

/// Read the multipart part named `field` as an upload.
///
/// Other parts are skipped.
pub(crate) async fn read_upload(
    multipart: &mut Multipart,
    field: &str,
) -> Result<UploadInput, ApiError> {
    let invalid = |e: axum::extract::multipart::MultipartError| {
        ApiError(AppError::Validation(e.body_text()))
    };

    while let Some(part) = multipart.next_field().await.map_err(invalid)? {
        if part.name() != Some(field) {
            continue;
        }

        let filename = part
            .file_name()
            .filter(|name| !name.is_empty())
            .unwrap_or("upload")
            .to_string();
        let content_type = part.content_type().map(String::from);
        let data = part.bytes().await.map_err(invalid)?;

        return Ok(UploadInput {
            data,
            filename,
            content_type,
        });
    }

    Err(ApiError(AppError::Validation(format!("No {field} provided"))))
}
