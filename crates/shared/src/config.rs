//! Application configuration management.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Blob storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Telegram relay configuration.
    #[serde(default)]
    pub telegram: TelegramConfig,
    /// Proxy response cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Allow-list for the `/_vars` endpoint.
    #[serde(default)]
    pub vars: VarsConfig,
    /// Snapshot of the allow-listed environment values, taken at load time.
    #[serde(skip)]
    pub exposed: ExposedVars,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Public origin used when building URLs (e.g. `https://pad.example.com`).
    ///
    /// When unset the origin is derived from the request's `Host` header.
    pub public_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            public_url: None,
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://relaybox.db?mode=rwc".to_string(),
            max_connections: 10,
            min_connections: 1,
        }
    }
}

/// Where newly uploaded binary content goes.
///
/// Parsed leniently: `TELEGRAM` (any case) selects the relay, anything else
/// falls back to the key-value store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum StorageMode {
    /// Key-value blob store.
    #[default]
    Kv,
    /// Telegram chat used as object storage.
    Telegram,
}

impl StorageMode {
    /// Returns the canonical name (`KV` or `TELEGRAM`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kv => "KV",
            Self::Telegram => "TELEGRAM",
        }
    }
}

impl From<String> for StorageMode {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<&str> for StorageMode {
    fn from(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("telegram") {
            Self::Telegram
        } else {
            Self::Kv
        }
    }
}

/// Blob store backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlobProvider {
    /// In-process memory (tests, throwaway deployments).
    Memory,
    /// Local filesystem.
    Fs {
        /// Root directory path.
        root: PathBuf,
    },
    /// S3-compatible storage: Cloudflare R2, Supabase, AWS S3, DigitalOcean Spaces
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// S3 bucket name.
        bucket: String,
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Region.
        region: String,
    },
}

impl Default for BlobProvider {
    fn default() -> Self {
        Self::Fs {
            root: PathBuf::from("./data/blobs"),
        }
    }
}

/// Blob storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage mode (`KV` or `TELEGRAM`); also settable through `STORAGE_TYPE`.
    pub mode: StorageMode,
    /// Key-value backend.
    pub provider: BlobProvider,
    /// Maximum upload size in bytes.
    pub max_file_size: u64,
}

impl StorageConfig {
    /// Default max upload size: 20MB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 20 * 1024 * 1024;
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            mode: StorageMode::Kv,
            provider: BlobProvider::default(),
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// How the retrieval URL of a relayed file is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlStrategy {
    /// Direct Telegram file link (embeds the bot token).
    Direct,
    /// Local proxy URL carrying the resolved file path.
    ProxyPath,
    /// Local proxy URL carrying only the file id; the path is resolved on
    /// every cache miss.
    #[default]
    ProxyFileId,
}

/// What gets stored for text-like content published through the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextStorage {
    /// The original text.
    #[default]
    Content,
    /// The `t.me` link of the relayed message.
    Reference,
}

/// Telegram relay configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot token; also settable through `TELEGRAM_BOT_TOKEN`.
    pub bot_token: Option<String>,
    /// Destination chat id; also settable through `TELEGRAM_CHAT_ID`.
    pub chat_id: Option<String>,
    /// Bot API base URL.
    pub api_base_url: String,
    /// Retrieval URL strategy for relayed files.
    pub url_strategy: UrlStrategy,
    /// Stored form of relayed text content.
    pub text_storage: TextStorage,
    /// Per-request timeout for Bot API calls.
    pub timeout_secs: u64,
}

impl TelegramConfig {
    /// Default Bot API endpoint.
    pub const DEFAULT_API_BASE_URL: &'static str = "https://api.telegram.org";

    /// Returns the bot credentials when both are present and non-empty.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let token = self.bot_token.as_deref().filter(|t| !t.is_empty())?;
        let chat = self.chat_id.as_deref().filter(|c| !c.is_empty())?;
        Some((token, chat))
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            chat_id: None,
            api_base_url: Self::DEFAULT_API_BASE_URL.to_string(),
            url_strategy: UrlStrategy::default(),
            text_storage: TextStorage::default(),
            timeout_secs: 30,
        }
    }
}

/// Proxy response cache configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether proxied files are cached in memory.
    pub enabled: bool,
    /// Total cached payload size in bytes.
    pub max_capacity_bytes: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_capacity_bytes: 256 * 1024 * 1024,
        }
    }
}

/// Allow-list for the `/_vars` endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VarsConfig {
    /// Environment variable names that may be read over HTTP.
    pub allowed: Vec<String>,
}

impl Default for VarsConfig {
    fn default() -> Self {
        Self {
            allowed: vec![
                "SYNC_INTERVAL".to_string(),
                "STORAGE_TYPE".to_string(),
                "TELEGRAM_CHAT_ID".to_string(),
            ],
        }
    }
}

/// Allow-listed environment values captured once at startup.
#[derive(Debug, Clone, Default)]
pub struct ExposedVars {
    allowed: Vec<String>,
    values: HashMap<String, String>,
}

impl ExposedVars {
    /// Captures the allow-listed names through `lookup`.
    pub fn capture<F>(allowed: &[String], lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let values = allowed
            .iter()
            .filter_map(|name| lookup(name).map(|value| (name.clone(), value)))
            .collect();

        Self {
            allowed: allowed.to_vec(),
            values,
        }
    }

    /// Captures the allow-listed names from the process environment.
    #[must_use]
    pub fn from_env(allowed: &[String]) -> Self {
        Self::capture(allowed, |name| std::env::var(name).ok())
    }

    /// Looks up an exposed value.
    ///
    /// # Errors
    ///
    /// `Forbidden` when `name` is not allow-listed, `NotFound` when it is
    /// allow-listed but unset.
    pub fn lookup(&self, name: &str) -> AppResult<&str> {
        if !self.allowed.iter().any(|allowed| allowed == name) {
            return Err(AppError::Forbidden("Forbidden".to_string()));
        }

        self.values
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| AppError::NotFound("Not Found".to_string()))
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, lowest precedence first: `config/default`, `config/{RUN_MODE}`,
    /// `RELAYBOX__*` variables, then the bare `DATABASE_URL`, `STORAGE_TYPE`,
    /// `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID` variables.
    /// `DATABASE_URL` is shared with the migrator.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("RELAYBOX")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("vars.allowed"),
            )
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("storage.mode", std::env::var("STORAGE_TYPE").ok())?
            .set_override_option("telegram.bot_token", std::env::var("TELEGRAM_BOT_TOKEN").ok())?
            .set_override_option("telegram.chat_id", std::env::var("TELEGRAM_CHAT_ID").ok())?
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;
        app_config.exposed = ExposedVars::from_env(&app_config.vars.allowed);
        Ok(app_config)
    }
}
