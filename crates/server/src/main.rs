// ABOUTME: Binary entry point for gleaner-server.
// ABOUTME: Initializes logging, loads configuration and serves the axum router.

use anyhow::{Context, Result};
use gleaner_server::{build_app, AppState, Config};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,gleaner_core=debug,gleaner_podcast=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    let state = AppState::from_config(&config)?;
    let app = build_app(state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(addr = %addr, "gleaner-server listening");

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
