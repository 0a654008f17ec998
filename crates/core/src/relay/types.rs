//! Bot API payloads and relay result types.

use serde::{Deserialize, Serialize};

/// Upload route chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Sent with `sendPhoto`.
    Image,
    /// Sent with `sendVideo`.
    Video,
    /// Sent with `sendDocument`.
    Document,
}

impl FileKind {
    const IMAGE_EXTENSIONS: [&'static str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];
    const VIDEO_EXTENSIONS: [&'static str; 5] = ["mp4", "avi", "mov", "mkv", "webm"];

    /// Classify a filename by its (case-insensitive) extension.
    #[must_use]
    pub fn from_filename(filename: &str) -> Self {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        if Self::IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Self::Image
        } else if Self::VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Self::Video
        } else {
            Self::Document
        }
    }

    /// Bot API method used for the upload.
    #[must_use]
    pub const fn method(self) -> &'static str {
        match self {
            Self::Image => "sendPhoto",
            Self::Video => "sendVideo",
            Self::Document => "sendDocument",
        }
    }

    /// Multipart field carrying the file.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::Image => "photo",
            Self::Video => "video",
            Self::Document => "document",
        }
    }
}

/// A text message posted to the destination chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayedMessage {
    /// Telegram message id.
    pub message_id: i64,
    /// `t.me` link to the message.
    pub reference_url: String,
}

/// A binary payload stored in the destination chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayedFile {
    /// Telegram message id.
    pub message_id: i64,
    /// Durable Telegram file id.
    pub file_id: String,
    /// Retrieval URL, per the configured strategy.
    pub url: String,
}

/// Bytes fetched from the Bot API file endpoint.
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    /// Raw payload.
    pub data: bytes::Bytes,
    /// `Content-Type` reported upstream, if any.
    pub content_type: Option<String>,
}

/// Envelope returned by every Bot API method.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    pub ok: bool,
    pub description: Option<String>,
    pub result: Option<T>,
}

/// Request body for `sendMessage`.
#[derive(Debug, Serialize)]
pub(crate) struct SendMessageRequest<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
    pub parse_mode: &'static str,
}

/// The subset of a Bot API `Message` the relay reads.
#[derive(Debug, Deserialize)]
pub(crate) struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub photo: Vec<PhotoSize>,
    pub video: Option<FileRef>,
    pub animation: Option<FileRef>,
    pub document: Option<FileRef>,
    pub audio: Option<FileRef>,
}

impl Message {
    /// File id of the stored payload; the largest variant for photos.
    pub fn file_id(&self) -> Option<&str> {
        if let Some(photo) = self
            .photo
            .iter()
            .max_by_key(|p| (u64::from(p.width) * u64::from(p.height), p.file_size))
        {
            return Some(&photo.file_id);
        }

        [&self.video, &self.animation, &self.document, &self.audio]
            .into_iter()
            .flatten()
            .map(|f| f.file_id.as_str())
            .next()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PhotoSize {
    pub file_id: String,
    pub width: u32,
    pub height: u32,
    pub file_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileRef {
    pub file_id: String,
}

/// Result of `getFile`.
#[derive(Debug, Deserialize)]
pub(crate) struct TelegramFile {
    pub file_path: Option<String>,
}
