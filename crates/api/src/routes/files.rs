//! File upload and retrieval routes.

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use relaybox_core::storage::BlobNamespace;
use relaybox_core::upload::UploadResult;

use crate::{ApiError, AppState, extractors::RequestOrigin, routes::images::upload_service};

/// Creates the file routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/files/upload", post(upload_file))
        .route("/files/{filename}", get(download_file))
}

/// POST `/files/upload`
/// Multipart field `file`.
async fn upload_file(
    State(state): State<AppState>,
    origin: RequestOrigin,
    mut multipart: Multipart,
) -> Result<Json<UploadResult>, ApiError> {
    let input = super::read_upload(&mut multipart, "file").await?;
    let result = upload_service(&state)
        .upload(BlobNamespace::Files, input, origin.as_str())
        .await?;
    Ok(Json(result))
}

/// GET `/files/{filename}`
/// Serves an uploaded file as an attachment under its original name.
async fn download_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let blob = state.blobs.get(BlobNamespace::Files, &filename).await?;

    let content_type = HeaderValue::from_str(&blob.metadata.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        sanitize_filename(&blob.metadata.filename)
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        blob.data,
    )
        .into_response())
}

/// Keep the name safe inside a quoted header parameter.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("report.pdf"), "report.pdf");
        assert_eq!(sanitize_filename("a\"b\\c\r\n.txt"), "abc.txt");
    }
}
