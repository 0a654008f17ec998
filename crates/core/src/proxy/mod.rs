//! Read-through proxy for files relayed to Telegram.
//!
//! Clients never see the bot token: relayed files are served from
//! `/images/proxy?path=...` or `/images/proxy?file_id=...`, backed by an
//! optional byte-weighted cache.

mod cache;
mod error;
mod service;

pub use cache::{CachedFile, ProxyCache};
pub use error::ProxyError;
pub use service::{FileProxy, ProxyKey};
