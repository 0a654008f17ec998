//! Request extractors.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::HOST;
use axum::http::request::Parts;

use crate::AppState;

/// Public origin (`scheme://host[:port]`) of this service, used to build
/// retrieval URLs.
///
/// `server.public_url` wins; otherwise the origin is derived from the
/// `Host` and `X-Forwarded-Proto` headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin(pub String);

impl RequestOrigin {
    /// The origin as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromRequestParts<AppState> for RequestOrigin {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(public_url) = state.config.server.public_url.as_deref()
            && !public_url.is_empty()
        {
            return Ok(Self(public_url.trim_end_matches('/').to_string()));
        }

        Ok(Self(origin_from_parts(parts)))
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn origin_from_parts(parts: &Parts) -> String {
    let host = header(parts, HOST.as_str())
        .map(String::from)
        .or_else(|| parts.uri.authority().map(ToString::to_string))
        .unwrap_or_else(|| "localhost".to_string());
    let scheme = header(parts, "x-forwarded-proto")
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .or_else(|| parts.uri.scheme_str())
        .unwrap_or("http");

    format!("{scheme}://{host}")
}
