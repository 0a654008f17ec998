//! Read-only access to allow-listed configuration values.
//!
//! Answers are plain text, so clients can read a value without parsing.

use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::debug;

use crate::AppState;

/// Creates the variable routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/_vars/{name}", get(get_var))
        .route("/vars/{name}", get(get_var))
}

/// GET `/_vars/{name}`
async fn get_var(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    match state.config.exposed.lookup(&name) {
        Ok(value) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
                (header::CACHE_CONTROL, "no-cache"),
            ],
            value.to_string(),
        )
            .into_response(),
        Err(err) => {
            debug!(name = %name, error = %err, "Variable not exposed");
            let status = StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (
                status,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                err.message().to_string(),
            )
                .into_response()
        }
    }
}
