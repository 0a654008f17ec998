//! Upload input and result types.

use bytes::Bytes;
use serde::Serialize;

/// A file received from a client.
#[derive(Debug, Clone)]
pub struct UploadInput {
    /// Raw payload.
    pub data: Bytes,
    /// Original filename.
    pub filename: String,
    /// MIME type reported by the client, if any.
    pub content_type: Option<String>,
}

/// Where an uploaded file can be fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadResult {
    /// Retrieval URL.
    pub url: String,
    /// Original filename.
    pub filename: String,
    /// Payload size in bytes.
    pub size: u64,
    /// MIME type recorded for the file.
    #[serde(rename = "type")]
    pub content_type: String,
}
