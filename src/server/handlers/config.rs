//! Settings handlers.

use axum::extract::State;
use axum::Json;
use log::info;

use crate::server::state::AppState;
use crate::server::types::ReloadResponse;
use crate::settings::RedactedSettings;

/// Current settings with credentials masked.
pub async fn config_handler(State(state): State<AppState>) -> Json<RedactedSettings> {
    Json(state.settings.redacted().await)
}

/// Drops the cached settings and loads them again.
pub async fn reload_handler(State(state): State<AppState>) -> Json<ReloadResponse> {
    state.settings.invalidate().await;
    let loaded = state.settings.load().await;
    info!("Settings reloaded from {:?} source", loaded.source);
    Json(ReloadResponse {
        reloaded: true,
        source: loaded.source,
    })
}
