//! Telegram Bot API client used as a message and object store.

use std::time::Duration;

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use relaybox_shared::config::{TelegramConfig, UrlStrategy};
use tracing::{debug, instrument};

use super::error::RelayError;
use super::types::{
    ApiResponse, DownloadedFile, FileKind, Message, RelayedFile, RelayedMessage,
    SendMessageRequest, TelegramFile,
};

/// Path of the local proxy route that serves relayed files.
pub const PROXY_ROUTE: &str = "/images/proxy";

/// Connection settings for [`TelegramClient`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Bot token.
    pub bot_token: String,
    /// Destination chat id (`-100…`, `@channel`, or a user id).
    pub chat_id: String,
    /// Bot API base URL. Override this for testing against a mock server.
    pub api_base_url: String,
    /// Retrieval URL strategy for uploaded files.
    pub url_strategy: UrlStrategy,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl RelayConfig {
    /// Create a configuration with default endpoint and strategy.
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            api_base_url: TelegramConfig::DEFAULT_API_BASE_URL.to_string(),
            url_strategy: UrlStrategy::default(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Build from application settings; `None` without credentials.
    #[must_use]
    pub fn from_settings(settings: &TelegramConfig) -> Option<Self> {
        let (token, chat) = settings.credentials()?;
        Some(
            Self::new(token, chat)
                .with_api_base_url(settings.api_base_url.clone())
                .with_url_strategy(settings.url_strategy)
                .with_timeout(Duration::from_secs(settings.timeout_secs)),
        )
    }

    /// Override the API base URL.
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the retrieval URL strategy.
    #[must_use]
    pub fn with_url_strategy(mut self, strategy: UrlStrategy) -> Self {
        self.url_strategy = strategy;
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for the handful of Bot API methods the relay needs.
pub struct TelegramClient {
    config: RelayConfig,
    client: Client,
}

impl TelegramClient {
    /// Create a client with its own connection pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: RelayConfig) -> Result<Self, RelayError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn with_client(config: RelayConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{method}",
            self.config.api_base_url, self.config.bot_token
        )
    }

    /// Direct download URL for a file path. Embeds the bot token.
    #[must_use]
    pub fn file_url(&self, file_path: &str) -> String {
        format!(
            "{}/file/bot{}/{file_path}",
            self.config.api_base_url, self.config.bot_token
        )
    }

    /// Post an HTML-formatted message to the destination chat.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Telegram rejects it.
    #[instrument(skip_all, fields(chat_id = %self.config.chat_id))]
    pub async fn send_text(&self, text: &str) -> Result<RelayedMessage, RelayError> {
        debug!(len = text.len(), "sending message to Telegram");

        let request = SendMessageRequest {
            chat_id: &self.config.chat_id,
            text,
            parse_mode: "HTML",
        };

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&request)
            .send()
            .await?;

        let message: Message = read_result(response).await?;

        Ok(RelayedMessage {
            message_id: message.message_id,
            reference_url: message_link(&self.config.chat_id, message.message_id),
        })
    }

    /// Upload a binary payload and derive its retrieval URL.
    ///
    /// `origin` is the public origin of this service, used by the proxy
    /// strategies.
    ///
    /// # Errors
    ///
    /// Returns an error if Telegram rejects the upload, the response carries
    /// no file id, or the URL cannot be resolved.
    #[instrument(skip(self, data), fields(size = data.len()))]
    pub async fn send_binary(
        &self,
        data: Bytes,
        filename: &str,
        origin: &str,
    ) -> Result<RelayedFile, RelayError> {
        let kind = FileKind::from_filename(filename);
        debug!(method = kind.method(), "uploading file to Telegram");

        let part = Part::bytes(data.to_vec()).file_name(filename.to_string());
        let form = Form::new()
            .text("chat_id", self.config.chat_id.clone())
            .text("caption", filename.to_string())
            .part(kind.field(), part);

        let response = self
            .client
            .post(self.method_url(kind.method()))
            .multipart(form)
            .send()
            .await?;

        let message: Message = read_result(response).await?;
        let file_id = message
            .file_id()
            .ok_or(RelayError::MissingFileId)?
            .to_string();
        let url = self.resolve_url(&file_id, origin).await?;

        Ok(RelayedFile {
            message_id: message.message_id,
            file_id,
            url,
        })
    }

    /// Resolve the retrieval URL of `file_id` with the configured strategy.
    ///
    /// # Errors
    ///
    /// Returns `FileResolution` if the file path lookup fails or `origin` is
    /// not a valid URL.
    pub async fn resolve_url(&self, file_id: &str, origin: &str) -> Result<String, RelayError> {
        match self.config.url_strategy {
            UrlStrategy::Direct => {
                let path = self.resolve_path(file_id).await?;
                Ok(self.file_url(&path))
            }
            UrlStrategy::ProxyPath => {
                let path = self.resolve_path(file_id).await?;
                proxy_url(origin, "path", &path)
            }
            UrlStrategy::ProxyFileId => proxy_url(origin, "file_id", file_id),
        }
    }

    async fn resolve_path(&self, file_id: &str) -> Result<String, RelayError> {
        self.get_file_path(file_id)
            .await
            .map_err(|e| RelayError::file_resolution(e.to_string()))
    }

    /// Look up the downloadable path of a file id.
    ///
    /// # Errors
    ///
    /// Returns an error if Telegram rejects the lookup or reports no path.
    pub async fn get_file_path(&self, file_id: &str) -> Result<String, RelayError> {
        debug!(file_id, "resolving Telegram file path");

        let response = self
            .client
            .get(self.method_url("getFile"))
            .query(&[("file_id", file_id)])
            .send()
            .await?;

        let file: TelegramFile = read_result(response).await?;
        file.file_path
            .filter(|p| !p.is_empty())
            .ok_or_else(|| RelayError::file_resolution(format!("no file path for {file_id}")))
    }

    /// Fetch the bytes of a file path from the file endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn download(&self, file_path: &str) -> Result<DownloadedFile, RelayError> {
        debug!(file_path, "downloading Telegram file");

        let response = self.client.get(self.file_url(file_path)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::api(format!("HTTP {status} fetching {file_path}")));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let data = response.bytes().await?;

        Ok(DownloadedFile { data, content_type })
    }
}

/// Decode a Bot API envelope, turning `ok: false` into [`RelayError::Api`].
async fn read_result<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, RelayError> {
    let status = response.status();
    let body = response.bytes().await?;

    let envelope: ApiResponse<T> = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(e) if status.is_success() => {
            return Err(RelayError::InvalidResponse(e.to_string()));
        }
        Err(_) => return Err(RelayError::api(format!("HTTP {status}"))),
    };

    if !envelope.ok {
        return Err(RelayError::api(
            envelope
                .description
                .unwrap_or_else(|| format!("HTTP {status}")),
        ));
    }

    envelope
        .result
        .ok_or_else(|| RelayError::InvalidResponse("missing result".to_string()))
}

/// `t.me` link for a message in `chat_id`.
#[must_use]
pub fn message_link(chat_id: &str, message_id: i64) -> String {
    if let Some(username) = chat_id.strip_prefix('@') {
        format!("https://t.me/{username}/{message_id}")
    } else if let Some(internal) = chat_id.strip_prefix("-100") {
        format!("https://t.me/c/{internal}/{message_id}")
    } else {
        format!("https://t.me/{chat_id}/{message_id}")
    }
}

/// Local proxy URL for a path or file id, rooted at `origin`.
///
/// A path prefix on `origin` is kept, so `https://host/app` maps to
/// `https://host/app/images/proxy`.
///
/// # Errors
///
/// Returns `FileResolution` if `origin` is not an absolute URL.
pub fn proxy_url(origin: &str, key: &str, value: &str) -> Result<String, RelayError> {
    let mut url = Url::parse(origin)
        .map_err(|e| RelayError::file_resolution(format!("invalid origin {origin}: {e}")))?;
    let path = format!("{}{PROXY_ROUTE}", url.path().trim_end_matches('/'));
    url.set_path(&path);
    url.query_pairs_mut().clear().append_pair(key, value);
    Ok(url.into())
}
