//! `/proxy` relay handler.

use axum::body::{Body, Bytes};
use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, Method};
use axum::response::{IntoResponse, Response};

use crate::error_handling::ProxyError;
use crate::proxy::{Forward, ProxiedResponse, ProxyRequest};
use crate::server::state::AppState;

/// Relays any method to the `url` query parameter.
pub async fn proxy_handler(
    State(state): State<AppState>,
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Result<ProxiedResponse, ProxyError> {
    let request = ProxyRequest::from_query(query.as_deref(), method, &headers, body.to_vec())?;
    state.proxy.forward(request).await
}

impl IntoResponse for ProxiedResponse {
    fn into_response(self) -> Response {
        let body = self.normalized_body();
        let mut response = Response::new(Body::from(body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
