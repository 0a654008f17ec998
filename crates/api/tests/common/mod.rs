//! Shared fixtures: in-memory record store and blob store, a mock Bot API,
//! and request helpers.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{Request, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use http_body_util::BodyExt;
use relaybox_api::{AppState, create_router};
use relaybox_db::migration::{Migrator, MigratorTrait};
use relaybox_shared::AppConfig;
use relaybox_shared::config::{
    BlobProvider, DatabaseConfig, ExposedVars, StorageConfig, StorageMode, TelegramConfig,
    VarsConfig,
};
use serde_json::{Value, json};
use tower::ServiceExt;

pub const ORIGIN: &str = "http://relaybox.test";
pub const TOKEN: &str = "123:TEST";
pub const CHAT: &str = "@relaybox";
pub const MAX_FILE_SIZE: u64 = 1024;

/// Bytes served by the mock file endpoint for `photos/file_1.jpg`.
pub const PHOTO_BYTES: &[u8] = b"\xff\xd8\xff\xe0 jpeg bytes";

/// Requests seen by the mock Bot API.
#[derive(Default)]
pub struct MockTelegram {
    pub messages: Mutex<Vec<Value>>,
    pub uploads: Mutex<Vec<String>>,
    pub downloads: AtomicUsize,
}

impl MockTelegram {
    pub fn download_count(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

type Shared = Arc<MockTelegram>;

fn authorized(bot: &str) -> bool {
    bot.strip_prefix("bot") == Some(TOKEN)
}

async fn send_message(
    State(mock): State<Shared>,
    Path(bot): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&bot) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let mut messages = mock.messages.lock().expect("lock");
    messages.push(body);
    Json(json!({"ok": true, "result": {"message_id": messages.len()}})).into_response()
}

async fn send_media(
    State(mock): State<Shared>,
    Path((bot, method)): Path<(String, String)>,
    mut multipart: Multipart,
) -> Response {
    if !authorized(&bot) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    while let Some(field) = multipart.next_field().await.expect("multipart") {
        let _ = field.bytes().await.expect("bytes");
    }
    mock.uploads.lock().expect("lock").push(method.clone());

    let result = if method == "sendPhoto" {
        json!({
            "message_id": 7,
            "photo": [
                {"file_id": "photo-small", "width": 90, "height": 90},
                {"file_id": "photo-large", "width": 800, "height": 600}
            ]
        })
    } else {
        json!({"message_id": 8, "document": {"file_id": "doc-1"}})
    };
    Json(json!({"ok": true, "result": result})).into_response()
}

#[derive(serde::Deserialize)]
struct GetFileQuery {
    file_id: String,
}

async fn get_file(Path(bot): Path<String>, Query(query): Query<GetFileQuery>) -> Response {
    if !authorized(&bot) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let path = match query.file_id.as_str() {
        "photo-large" => "photos/file_1.jpg",
        "doc-1" => "documents/file_2.pdf",
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"ok": false, "description": "Bad Request: invalid file_id"})),
            )
                .into_response();
        }
    };
    Json(json!({"ok": true, "result": {"file_path": path}})).into_response()
}

async fn download(
    State(mock): State<Shared>,
    Path((bot, path)): Path<(String, String)>,
) -> Response {
    if !authorized(&bot) || path != "photos/file_1.jpg" {
        return StatusCode::NOT_FOUND.into_response();
    }
    mock.downloads.fetch_add(1, Ordering::SeqCst);
    ([(header::CONTENT_TYPE, "application/octet-stream")], PHOTO_BYTES).into_response()
}

/// Starts a mock Bot API on a random port and returns its base URL.
pub async fn start_mock_telegram() -> (Shared, String) {
    let mock = Shared::default();
    let app = Router::new()
        .route("/{bot}/sendMessage", post(send_message))
        .route("/{bot}/getFile", get(get_file))
        .route("/{bot}/{method}", post(send_media))
        .route("/file/{bot}/{*path}", get(download))
        .with_state(mock.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind mock server");
    let base_url = format!("http://{}", listener.local_addr().expect("addr"));
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock server");
    });

    (mock, base_url)
}

/// Configuration for a test app. `telegram_base` enables the relay.
pub fn test_config(mode: StorageMode, telegram_base: Option<&str>) -> AppConfig {
    let mut config = AppConfig::default();
    config.server.public_url = Some(ORIGIN.to_string());
    config.database = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    };
    config.storage = StorageConfig {
        mode,
        provider: BlobProvider::Memory,
        max_file_size: MAX_FILE_SIZE,
    };
    if let Some(base) = telegram_base {
        config.telegram = TelegramConfig {
            bot_token: Some(TOKEN.to_string()),
            chat_id: Some(CHAT.to_string()),
            api_base_url: base.to_string(),
            ..TelegramConfig::default()
        };
    }
    config.vars = VarsConfig::default();
    config
}

/// Builds the router over a freshly migrated in-memory database.
pub async fn build_app(config: AppConfig) -> Router {
    let db = relaybox_db::connect(&config.database)
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None).await.expect("Failed to migrate");

    let state = AppState::from_config(db, config).expect("state");
    create_router(state)
}

/// A KV-mode app.
pub async fn kv_app() -> Router {
    build_app(test_config(StorageMode::Kv, None)).await
}

/// A relay-mode app wired to a fresh mock Bot API.
pub async fn telegram_app() -> (Router, Shared) {
    let (mock, base) = start_mock_telegram().await;
    let app = build_app(test_config(StorageMode::Telegram, Some(&base))).await;
    (app, mock)
}

/// Exposed variables with the given values.
pub fn with_vars(mut config: AppConfig, values: &[(&str, &str)]) -> AppConfig {
    let values: Vec<(String, String)> = values
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    config.exposed = ExposedVars::capture(&config.vars.allowed, |name| {
        values
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    });
    config
}

/// Sends `request` and returns the response.
pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.expect("request")
}

pub async fn fetch(app: &Router, uri: &str) -> Response {
    send(
        app,
        Request::builder().uri(uri).body(Body::empty()).expect("request"),
    )
    .await
}

pub async fn post_json(app: &Router, uri: &str, body: &Value) -> Response {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
    )
    .await
}

const BOUNDARY: &str = "relayboxtestboundary";

/// Posts a single-part multipart form.
pub async fn post_multipart(
    app: &Router,
    uri: &str,
    field: &str,
    filename: &str,
    content_type: &str,
    data: &[u8],
) -> Response {
    let mut body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
         Content-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    send(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("request"),
    )
    .await
}

pub async fn body_bytes(response: Response) -> bytes::Bytes {
    response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("json body")
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await.to_vec()).expect("utf-8 body")
}

/// Path and query of a URL rooted at [`ORIGIN`].
pub fn local_path(url: &str) -> &str {
    url.strip_prefix(ORIGIN).expect("URL rooted at the test origin")
}

pub fn header_value<'a>(response: &'a Response, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}
