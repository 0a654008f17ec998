//! Content block types.

use serde::{Deserialize, Serialize};

/// Kind of published content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Plain text.
    Text,
    /// Poem; rendered line by line.
    Poetry,
    /// Source code.
    Code,
    /// Image reference (URL).
    Image,
    /// File reference (URL).
    File,
}

impl ContentType {
    /// Convert to database string value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Poetry => "poetry",
            Self::Code => "code",
            Self::Image => "image",
            Self::File => "file",
        }
    }

    /// Parse from database string value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(Self::Text),
            "poetry" => Some(Self::Poetry),
            "code" => Some(Self::Code),
            "image" => Some(Self::Image),
            "file" => Some(Self::File),
            _ => None,
        }
    }
}

/// A stored content block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Auto-increment id.
    pub id: i32,
    /// Content kind.
    #[serde(rename = "type")]
    pub content_type: ContentType,
    /// Title.
    pub title: String,
    /// Raw text or a resolved URL.
    pub content: String,
}

/// Input for inserting a content block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContentBlock {
    /// Content kind.
    pub content_type: ContentType,
    /// Title.
    pub title: String,
    /// Raw text or a resolved URL.
    pub content: String,
}

/// Unvalidated publish request, as received from a client.
///
/// Every field is optional so that absent and empty values are rejected the
/// same way.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublishInput {
    /// Content kind name.
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    /// Title.
    pub title: Option<String>,
    /// Content body.
    pub content: Option<String>,
}

/// Echo of a published block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedContent {
    /// Content kind.
    #[serde(rename = "type")]
    pub content_type: ContentType,
    /// Title.
    pub title: String,
    /// Content as stored.
    pub content: String,
}

impl From<ContentBlock> for PublishedContent {
    fn from(block: ContentBlock) -> Self {
        Self {
            content_type: block.content_type,
            title: block.title,
            content: block.content,
        }
    }
}
