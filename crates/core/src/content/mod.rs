//! Content blocks: validation, relay formatting and publishing.
//!
//! This module provides business logic for published content including:
//! - Input validation
//! - Telegram HTML rendering of text, poetry and code
//! - Rewriting raw Telegram file links into proxy URLs
//! - The repository seam implemented by the db crate

mod error;
mod format;
mod service;
mod types;

pub use error::ContentError;
pub use format::{escape_html, relay_message, rewrite_file_link};
pub use service::{ContentRepository, PublishService, validate};
pub use types::{ContentBlock, ContentType, NewContentBlock, PublishInput, PublishedContent};
