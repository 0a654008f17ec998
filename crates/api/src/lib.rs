//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST routes for contents, files, images and exposed variables
//! - The shared application state
//! - Request extractors
//! - Error responses

pub mod error;
pub mod extractors;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use relaybox_core::proxy::{FileProxy, ProxyCache};
use relaybox_core::relay::{RelayConfig, TelegramClient};
use relaybox_core::storage::{BlobStore, BlobStoreConfig};
use relaybox_shared::config::StorageMode;
use relaybox_shared::{AppConfig, AppError, AppResult};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use error::ApiError;

/// Room for multipart framing on top of the largest accepted file.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// CORS preflight cache lifetime.
const CORS_MAX_AGE: Duration = Duration::from_secs(86_400);

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Key-value blob store for uploads.
    pub blobs: Arc<BlobStore>,
    /// Telegram relay, present when credentials are configured.
    pub relay: Option<Arc<TelegramClient>>,
    /// Cached proxy for relayed files.
    pub proxy: Arc<FileProxy>,
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire the services described by `config` around an open pool.
    ///
    /// # Errors
    ///
    /// Returns an error if relay mode is selected without credentials, or a
    /// backend cannot be initialized.
    pub fn from_config(db: DatabaseConnection, config: AppConfig) -> AppResult<Self> {
        let blobs = BlobStore::from_config(BlobStoreConfig::from(&config.storage))?;
        info!(provider = blobs.provider_name(), "Blob store ready");

        let relay = match RelayConfig::from_settings(&config.telegram) {
            Some(relay_config) => Some(Arc::new(TelegramClient::new(relay_config)?)),
            None if config.storage.mode == StorageMode::Telegram => {
                return Err(AppError::Internal(
                    "STORAGE_TYPE is TELEGRAM but TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID is missing"
                        .to_string(),
                ));
            }
            None => {
                warn!("Telegram credentials not set; relay and proxy are disabled");
                None
            }
        };

        let cache = config
            .cache
            .enabled
            .then(|| ProxyCache::new(config.cache.max_capacity_bytes));
        let proxy = FileProxy::new(relay.clone(), cache);

        Ok(Self {
            db: Arc::new(db),
            blobs: Arc::new(blobs),
            relay,
            proxy: Arc::new(proxy),
            config: Arc::new(config),
        })
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let body_limit = usize::try_from(state.config.storage.max_file_size)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .merge(routes::routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .max_age(CORS_MAX_AGE),
        )
        .with_state(state)
}
