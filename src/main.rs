use std::{sync::Arc, time::Duration};

use moviemate::{
    config::Config,
    create_router,
    services::providers::{HttpMediaBackend, TmdbProvider},
    AppState,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("moviemate=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    let timeout = Duration::from_secs(config.request_timeout_secs);

    let backend = HttpMediaBackend::new(config.backend_url.clone(), timeout)?;
    let metadata = TmdbProvider::new(
        config.tmdb_access_token.clone(),
        config.tmdb_api_url.clone(),
        config.tmdb_image_url.clone(),
        timeout,
    )?;

    let state = Arc::new(AppState::new(
        Arc::new(backend),
        Arc::new(metadata),
        config.primary_region.clone(),
        config.fallback_region.clone(),
    ));

    // Page-load fetch; an unreachable backend only leaves the view empty
    if let Err(e) = state.collection.refresh().await {
        tracing::warn!(error = %e, backend = %config.backend_url, "Initial collection fetch failed");
    }

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "MovieMate gateway listening");

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
    tracing::info!("Shutdown signal received");
}
