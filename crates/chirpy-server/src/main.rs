//! Chirpy HTTP server binary.

use anyhow::{Context, Result};
use chirpy_server::cli::Cli;
use chirpy_server::{AppState, build_router};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Can be controlled via RUST_LOG, e.g. RUST_LOG=chirpy=debug,tower_http=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("chirpy=info,chirpy_server=info,chirpy_json=info")
            }),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse_args();
    let config = cli
        .resolve_config()
        .await
        .context("Failed to load configuration")?;
    let secrets = cli.secrets().context("Missing secrets")?;

    let state = AppState::new(config, &secrets)
        .await
        .context("Failed to open datastore")?;
    tracing::info!(
        database = %state.store.path().display(),
        static_dir = %state.config.static_dir.display(),
        "Datastore ready"
    );

    let addr = state.config.listen_addr.clone();
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!(%addr, "Chirpy server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Chirpy server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
