//! Request and response bodies of the HTTP surface.

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error_handling::{DispatchError, ProxyError};
use crate::notify::{NoticeOutcome, RecordTimestamps};
use crate::settings::SettingsSource;

/// Body of every relay error response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Short error title
    pub error: String,
    /// Full error message
    pub details: String,
    /// Target the relay was asked for, when known
    pub target_url: Option<String>,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.title().to_string(),
            details: self.to_string(),
            target_url: self.target().map(str::to_string),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self.into_report())).into_response()
    }
}

/// `/update-types` response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTypesResponse {
    /// Categories with at least one endpoint
    pub types: Vec<String>,
    /// Category used when none is chosen
    pub default_type: Option<String>,
}

/// `/config/reload` response.
#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    /// Always true once the reload finished
    pub reloaded: bool,
    /// Source the new settings came from
    pub source: SettingsSource,
}

/// `/update` query string.
#[derive(Debug, Deserialize)]
pub struct UpdateQuery {
    /// Category to dispatch
    #[serde(rename = "type", default)]
    pub category: Option<String>,
}

/// `/notify/check` request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyCheckRequest {
    /// Record to check
    pub record_id: String,
    /// `createdAt` and `updatedAt` of the record
    #[serde(flatten)]
    pub timestamps: RecordTimestamps,
}

/// `/notify/check` response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyCheckResponse {
    /// Record that was checked
    pub record_id: String,
    /// `disabled`, `fresh`, `suppressed`, `sent` or `failed`
    pub outcome: &'static str,
    /// Calendar days since the last update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_since_update: Option<u32>,
    /// Threshold, reported for fresh records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice_days: Option<u32>,
    /// Why a due notice was not delivered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NotifyCheckResponse {
    /// Flattens an outcome into the response body.
    pub fn new(record_id: String, outcome: &NoticeOutcome) -> Self {
        let notice_days = match outcome {
            NoticeOutcome::Fresh { notice_days, .. } => Some(*notice_days),
            _ => None,
        };
        let error = match outcome {
            NoticeOutcome::Failed { error, .. } => Some(error.to_string()),
            _ => None,
        };
        Self {
            record_id,
            outcome: outcome.as_str(),
            days_since_update: outcome.days(),
            notice_days,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::NotificationError;
    use axum::http::StatusCode;

    #[test]
    fn test_proxy_error_response_status() {
        let response = ProxyError::MissingParameter("url").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ProxyError::Timeout {
            target: "http://slow.example.com".into(),
            elapsed_secs: 30.0,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorBody {
            error: "Proxy request failed".into(),
            details: "connection refused".into(),
            target_url: Some("http://down.example.com".into()),
        };
        let value = serde_json::to_value(&body).expect("serializes");
        assert_eq!(value["targetUrl"], "http://down.example.com");
        assert_eq!(value["error"], "Proxy request failed");
    }

    #[test]
    fn test_notify_request_parses_flattened_timestamps() {
        let req: NotifyCheckRequest = serde_json::from_str(
            r#"{"recordId": "rec-1", "createdAt": "2024-01-01T00:00:00Z", "updatedAt": null}"#,
        )
        .expect("valid request");
        assert_eq!(req.record_id, "rec-1");
        assert!(req.timestamps.updated_at.is_none());
    }

    #[test]
    fn test_notify_response_from_outcomes() {
        let fresh = NotifyCheckResponse::new(
            "rec".into(),
            &NoticeOutcome::Fresh {
                days: 3,
                notice_days: 14,
            },
        );
        assert_eq!(fresh.outcome, "fresh");
        assert_eq!(fresh.notice_days, Some(14));

        let failed = NotifyCheckResponse::new(
            "rec".into(),
            &NoticeOutcome::Failed {
                days: 20,
                error: NotificationError::MissingCredentials,
            },
        );
        let value = serde_json::to_value(&failed).expect("serializes");
        assert_eq!(value["outcome"], "failed");
        assert_eq!(value["daysSinceUpdate"], 20);
        assert!(value["error"].as_str().expect("error").contains("credentials"));

        let disabled = NotifyCheckResponse::new("rec".into(), &NoticeOutcome::Disabled);
        let value = serde_json::to_value(&disabled).expect("serializes");
        assert!(value.get("daysSinceUpdate").is_none());
    }
}
