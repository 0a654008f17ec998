//! Telegram relay: a chat used as durable message and object storage.
//!
//! Text is posted with `sendMessage`; binaries go through `sendPhoto`,
//! `sendVideo` or `sendDocument` depending on the file extension. The
//! resulting file id is turned into a retrieval URL with one of three
//! deploy-time strategies:
//!
//! | strategy        | extra call | stored URL                                   |
//! |-----------------|------------|----------------------------------------------|
//! | `direct`        | `getFile`  | `{api}/file/bot{token}/{file_path}`          |
//! | `proxy_path`    | `getFile`  | `{origin}/images/proxy?path={file_path}`     |
//! | `proxy_file_id` | none       | `{origin}/images/proxy?file_id={file_id}`    |

mod client;
mod error;
mod mime;
mod types;

pub use client::{PROXY_ROUTE, RelayConfig, TelegramClient, message_link, proxy_url};
pub use error::RelayError;
pub use mime::{OCTET_STREAM, infer_content_type, mime_for_path};
pub use types::{DownloadedFile, FileKind, RelayedFile, RelayedMessage};
