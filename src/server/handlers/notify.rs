//! Staleness check handler.

use axum::extract::State;
use axum::Json;

use crate::server::state::AppState;
use crate::server::types::{NotifyCheckRequest, NotifyCheckResponse};

/// Checks one record and sends a reminder when it is stale.
pub async fn notify_check_handler(
    State(state): State<AppState>,
    Json(request): Json<NotifyCheckRequest>,
) -> Json<NotifyCheckResponse> {
    let outcome = state
        .notifier
        .check_and_notify(&request.record_id, &request.timestamps)
        .await;
    Json(NotifyCheckResponse::new(request.record_id, &outcome))
}
