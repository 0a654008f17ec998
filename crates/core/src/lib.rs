//! Core logic for Relaybox.
//!
//! This crate contains the publishing rules, the Telegram relay client and
//! the blob store, with ZERO web or database dependencies.
//!
//! # Modules
//!
//! - `content` - Content block validation and publishing
//! - `relay` - Telegram Bot API client
//! - `proxy` - Cached proxy for relayed files
//! - `storage` - Key-value blob store (OpenDAL)
//! - `upload` - Upload dispatch between blob store and relay

pub mod content;
pub mod proxy;
pub mod relay;
pub mod storage;
pub mod upload;
