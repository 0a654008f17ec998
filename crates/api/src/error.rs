//! Error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use relaybox_shared::AppError;
use serde_json::json;
use tracing::{error, warn};

/// An [`AppError`] rendered as `{"error": "<message>"}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl<E> From<E> for ApiError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(code = self.0.error_code(), error = %self.0, "Request failed");
        } else {
            warn!(code = self.0.error_code(), error = %self.0, "Request rejected");
        }

        (status, Json(json!({ "error": self.0.message() }))).into_response()
    }
}
