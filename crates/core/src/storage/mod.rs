//! Key-value blob store for uploaded files and images, using Apache OpenDAL.
//!
//! Every blob lives under a namespace prefix (`files/` or `images/`) with a
//! JSON metadata sidecar next to it:
//!
//! ```text
//! images/1718000000000-k3j9x0a1b2c3.png            <- raw bytes
//! images/1718000000000-k3j9x0a1b2c3.png.meta.json  <- {contentType, filename, size}
//! ```
//!
//! Supported backends: in-process memory, local filesystem, and
//! S3-compatible object storage.

mod config;
mod error;
mod service;

pub use config::{BlobNamespace, BlobStoreConfig};
pub use error::StorageError;
pub use service::{BlobMetadata, BlobStore, StoredBlob, file_extension, generate_blob_name};
