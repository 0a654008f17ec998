//! Binary uploads, dispatched to the blob store or the Telegram relay.

mod error;
mod service;
mod types;

pub use error::UploadError;
pub use service::UploadService;
pub use types::{UploadInput, UploadResult};
