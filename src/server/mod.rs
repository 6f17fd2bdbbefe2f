//! HTTP surface of the service.
//!
//! Routes:
//! - `/proxy?url=<target>` - relays any method to `target`
//! - `GET /config` - settings with credentials masked
//! - `POST /config/reload` - drops the settings cache and reloads
//! - `GET|POST /update-types` - configured categories and the default one
//! - `GET /update?type=<category>` - runs every endpoint of a category
//! - `POST /notify/check` - staleness check for one record

mod handlers;
mod state;
mod types;

use anyhow::Context;
use axum::routing::{any, get, post};
use axum::Router;
use log::info;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

use handlers::{
    config_handler, notify_check_handler, proxy_handler, reload_handler, update_handler,
    update_types_handler,
};
pub use state::AppState;
pub use types::{ErrorBody, NotifyCheckRequest, NotifyCheckResponse, UpdateTypesResponse};

/// Builds the router with every route and a permissive CORS layer.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/proxy", any(proxy_handler))
        .route("/config", get(config_handler))
        .route("/config/reload", post(reload_handler))
        .route(
            "/update-types",
            get(update_types_handler).post(update_types_handler),
        )
        .route("/update", get(update_handler))
        .route("/notify/check", post(notify_check_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `bind:port` and serves until `shutdown` is cancelled.
pub async fn start_server(
    bind: &str,
    port: u16,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<(), anyhow::Error> {
    let listener = TcpListener::bind((bind, port))
        .await
        .with_context(|| format!("Failed to bind HTTP server to {bind}:{port}"))?;
    serve(listener, state, shutdown).await
}

/// Serves on an already bound listener until `shutdown` is cancelled.
///
/// In-flight requests are allowed to finish before this returns.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<(), anyhow::Error> {
    let addr = listener
        .local_addr()
        .context("Failed to read listener address")?;

    info!("Listening on http://{addr}/");
    info!("  - Relay: http://{addr}/proxy?url=<target>");
    info!("  - Updates: http://{addr}/update?type=<category>");
    info!("  - Settings: http://{addr}/config");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("HTTP server error")?;

    info!("HTTP server stopped");
    Ok(())
}
