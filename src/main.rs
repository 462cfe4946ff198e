//! thinknotes - Markdown notes with AI summaries and tag suggestions.
//!
//! This is the main entry point for the web server. Everything except
//! process setup lives in the library crate:
//!
//! - `store`: sled-backed users and notes
//! - `auth`: password hashing and signed session cookies
//! - `ai`: client for the external summarization service
//! - `thinkable`: splitting AI output into text and reasoning sections
//! - `templates`: HTML/CSS templates and rendering
//! - `handlers`: HTTP route handlers

use std::sync::Arc;

use thinknotes::{config::Config, router, AppState};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("thinknotes=info,tower_http=info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    let addr = config.bind_addr();
    let db_path = config.db_path.clone();
    let ai_enabled = config.ai.enabled;
    let ai_url = config.ai.base_url.clone();

    let state = Arc::new(AppState::open(config)?);
    let app = router(state.clone());

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("thinknotes running at http://{}", addr);
    tracing::info!("database: {}", db_path.display());
    if ai_enabled {
        tracing::info!("AI service: {}", ai_url);
    } else {
        tracing::info!("AI service: DISABLED (set THINKNOTES_AI_ENABLED=true to enable)");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.store.flush().await?;
    tracing::info!("store flushed, shutting down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
