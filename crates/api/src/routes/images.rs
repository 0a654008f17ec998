//! Image upload, retrieval and relay proxy routes.

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use relaybox_core::proxy::{ProxyError, ProxyKey};
use relaybox_core::relay::PROXY_ROUTE;
use relaybox_core::storage::BlobNamespace;
use relaybox_core::upload::{UploadResult, UploadService};
use serde::Deserialize;
use tracing::error;

use crate::{ApiError, AppState, extractors::RequestOrigin};

/// One year.
const IMMUTABLE_CACHE_CONTROL: &str = "public, max-age=31536000";

/// Creates the image routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/images", post(upload_image))
        .route(PROXY_ROUTE, get(proxy_image))
        .route("/images/{filename}", get(get_image))
}

pub(crate) fn upload_service(state: &AppState) -> UploadService {
    UploadService::new(state.config.storage.mode, state.blobs.clone())
        .with_relay(state.relay.clone())
}

/// POST `/images`
/// Multipart field `image`.
async fn upload_image(
    State(state): State<AppState>,
    origin: RequestOrigin,
    mut multipart: Multipart,
) -> Result<Json<UploadResult>, ApiError> {
    let input = super::read_upload(&mut multipart, "image").await?;
    let result = upload_service(&state)
        .upload(BlobNamespace::Images, input, origin.as_str())
        .await?;
    Ok(Json(result))
}

/// GET `/images/{filename}`
async fn get_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let blob = state.blobs.get(BlobNamespace::Images, &filename).await?;

    let content_type = HeaderValue::from_str(&blob.metadata.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("image/jpeg"));

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, HeaderValue::from_static(IMMUTABLE_CACHE_CONTROL)),
        ],
        blob.data,
    )
        .into_response())
}

/// Query of the proxy route.
#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    /// File path on the Telegram file endpoint.
    pub path: Option<String>,
    /// Telegram file id.
    pub file_id: Option<String>,
}

/// GET `/images/proxy?path=...|file_id=...`
///
/// Errors are answered in plain text.
async fn proxy_image(State(state): State<AppState>, Query(query): Query<ProxyQuery>) -> Response {
    let key = match ProxyKey::from_query(query.path, query.file_id) {
        Ok(key) => key,
        Err(e) => return plain(StatusCode::BAD_REQUEST, e.to_string()),
    };

    match state.proxy.fetch(&key).await {
        Ok((file, hit)) => {
            let content_type = HeaderValue::from_str(&file.content_type)
                .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, content_type),
                    (header::CACHE_CONTROL, HeaderValue::from_static(IMMUTABLE_CACHE_CONTROL)),
                    (
                        header::HeaderName::from_static("x-cache"),
                        HeaderValue::from_static(if hit { "HIT" } else { "MISS" }),
                    ),
                ],
                file.data,
            )
                .into_response()
        }
        Err(ProxyError::MissingPath) => plain(StatusCode::BAD_REQUEST, "Missing file path"),
        Err(e) => {
            error!(key = %key.cache_key(), error = %e, "Proxy fetch failed");
            plain(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error fetching image: {e}"),
            )
        }
    }
}

fn plain(status: StatusCode, body: impl Into<String>) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body.into(),
    )
        .into_response()
}
