use std::sync::Arc;

use anyhow::Context;
use game_server::app;
use game_server::config;
use game_server::engine::EngineSession;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    let config = config::Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_filter().into()),
        )
        .init();

    // Engine is optional: without it the service still answers, minus bestMove
    let engine = match config.engine.clone() {
        Some(options) => {
            let session = EngineSession::new(options);
            match session.start().await {
                Ok(()) => Some(Arc::new(session)),
                Err(e) => {
                    tracing::warn!("Engine failed to start, running without it: {e}");
                    None
                }
            }
        }
        None => {
            tracing::info!("No engine configured - move suggestions disabled");
            None
        }
    };

    let app = app::router(config.clone(), engine.clone());

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if let Some(engine) = engine {
        engine.shutdown().await;
    }
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
