//! Specdock Access Control Service - Main Server

use anyhow::{Context, Result};
use axum::Router;
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;

use crate::config::Settings;
use specdock_api::AppState;
use specdock_share::ShareTokenService;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    // Load configuration; a missing share secret aborts startup
    let settings = Settings::load().context("Failed to load configuration")?;

    info!(
        "Starting Specdock Access Control Service v{}",
        env!("CARGO_PKG_VERSION")
    );

    let share_tokens = ShareTokenService::new(settings.share.secret.as_bytes().to_vec())
        .context("Failed to initialize share token service")?;

    let state = AppState::new(share_tokens, settings.share.public_base_url.clone());
    let app = create_app(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);
    info!("API docs: http://{}/api/v1", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,specdock=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .init();
}

fn create_app(state: AppState) -> Router {
    let app = specdock_api::create_router(state);

    app.layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
