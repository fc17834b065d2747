use std::net::SocketAddr;

use axum::{Router, routing::get, routing::post};
use tokio::net::TcpListener;
use tower_http::decompression::RequestDecompressionLayer;
use tracing::info;

use super::{
    services::{
        addon_catalog, addon_item, addon_resolve, addon_source, addon_streams,
        get_manifest, health, list_addons,
    },
    state::AppState,
};
use crate::addon::demo_addon;
use crate::config::Config;
use crate::context::build_http_client;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Build the router over an already-assembled state.
///
/// Shared by [`run`] and the integration tests so both drive the same
/// routes and middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/addons", get(list_addons))
        .route("/addons/{addon_id}/manifest", get(get_manifest))
        .route("/addons/{addon_id}/catalog", post(addon_catalog))
        .route("/addons/{addon_id}/item", post(addon_item))
        .route("/addons/{addon_id}/source", post(addon_source))
        .route("/addons/{addon_id}/resolve", post(addon_resolve))
        .route("/addons/{addon_id}/streams", post(addon_streams))
        .with_state(state)
        // Transparently decompress gzip/deflate request bodies.
        .layer(RequestDecompressionLayer::new())
}

pub async fn run(address: SocketAddr) -> Result<(), AnyError> {
    info!("Loading configuration");
    let config = Config::load().map_err(|e| format!("Failed to load config: {}", e))?;

    let http = build_http_client(&config.http)
        .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

    let demo = demo_addon().map_err(|e| format!("Failed to build demo addon: {}", e))?;
    let state = AppState::new(config, http, vec![demo]);
    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "mediaflow API listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = signal(SignalKind::terminate())
            .expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
