//! Relaybox API Server
//!
//! Main entry point for the Relaybox publishing service.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use relaybox_api::{AppState, create_router};
use relaybox_db::connect;
use relaybox_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relaybox=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Connect to database
    let db = connect(&config.database).await?;
    info!("Connected to database");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(
        mode = config.storage.mode.as_str(),
        url_strategy = ?config.telegram.url_strategy,
        cache = config.cache.enabled,
        "Storage configured"
    );

    // Create application state
    let state = AppState::from_config(db, config).context("Failed to initialize services")?;

    // Create router
    let app = create_router(state);

    // Start server
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
