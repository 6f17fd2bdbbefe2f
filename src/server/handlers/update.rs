//! Update dispatch handlers.

use axum::extract::{Query, State};
use axum::Json;

use crate::dispatch::AggregateReport;
use crate::error_handling::DispatchError;
use crate::server::state::AppState;
use crate::server::types::{UpdateQuery, UpdateTypesResponse};

/// Categories with at least one endpoint, plus the default one.
pub async fn update_types_handler(State(state): State<AppState>) -> Json<UpdateTypesResponse> {
    let resolved = state.settings.resolve_endpoints().await;
    Json(UpdateTypesResponse {
        types: state.settings.list_categories().await,
        default_type: resolved.default_category,
    })
}

/// Runs every endpoint of `?type=<category>`.
///
/// Answers 200 whenever the category was dispatched, even if every endpoint
/// failed; `success` in the body tells the two apart.
pub async fn update_handler(
    State(state): State<AppState>,
    Query(query): Query<UpdateQuery>,
) -> Result<Json<AggregateReport>, DispatchError> {
    let category = query.category.unwrap_or_default();
    state.dispatcher.dispatch(&category).await.map(Json)
}
