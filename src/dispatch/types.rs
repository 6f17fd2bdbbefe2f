//! Dispatch result types.

use serde::Serialize;

/// Outcome of calling one endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DispatchStatus {
    /// The endpoint answered 2xx
    Success,
    /// The endpoint answered with a non-2xx status
    Failed,
    /// The relay could not complete the exchange
    Error,
}

/// Result for one endpoint of a category.
///
/// Exactly one of `data` and `error_detail` is set, matching `status`; the
/// constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResult {
    /// Endpoint URL as configured
    pub original_url: String,
    /// Relay path the endpoint is reachable through
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxied_url: Option<String>,
    /// How the call ended
    pub status: DispatchStatus,
    /// Response body of a successful call, JSON or text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Status and body snippet, or the relay error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl DispatchResult {
    /// A 2xx answer with its body.
    pub fn success(original_url: &str, proxied_url: Option<String>, data: serde_json::Value) -> Self {
        Self {
            original_url: original_url.to_string(),
            proxied_url,
            status: DispatchStatus::Success,
            data: Some(data),
            error_detail: None,
        }
    }

    /// A non-2xx answer.
    pub fn failed(original_url: &str, proxied_url: Option<String>, detail: String) -> Self {
        Self {
            original_url: original_url.to_string(),
            proxied_url,
            status: DispatchStatus::Failed,
            data: None,
            error_detail: Some(detail),
        }
    }

    /// An exchange the relay could not complete.
    pub fn error(original_url: &str, proxied_url: Option<String>, detail: String) -> Self {
        Self {
            original_url: original_url.to_string(),
            proxied_url,
            status: DispatchStatus::Error,
            data: None,
            error_detail: Some(detail),
        }
    }

    /// Whether the endpoint answered 2xx.
    pub fn is_success(&self) -> bool {
        self.status == DispatchStatus::Success
    }
}

/// Combined outcome of dispatching one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateReport {
    /// Category that was dispatched
    pub category: String,
    /// True iff at least one endpoint succeeded
    pub success: bool,
    /// One entry per endpoint, in configured order
    pub results: Vec<DispatchResult>,
    /// Human-readable summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AggregateReport {
    /// Builds a report from per-endpoint results.
    pub fn from_results(category: &str, results: Vec<DispatchResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.is_success()).count();
        let success = succeeded > 0;
        let message = Some(format!(
            "{succeeded} of {} update endpoints succeeded",
            results.len()
        ));
        Self {
            category: category.to_string(),
            success,
            results,
            message,
        }
    }

    /// Number of successful endpoints.
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_constructors_populate_exactly_one_payload() {
        let ok = DispatchResult::success("http://a", None, json!({"n": 1}));
        assert!(ok.data.is_some() && ok.error_detail.is_none());

        let failed = DispatchResult::failed("http://a", None, "HTTP 500".into());
        assert!(failed.data.is_none() && failed.error_detail.is_some());

        let error = DispatchResult::error("http://a", None, "timed out".into());
        assert!(error.data.is_none() && error.error_detail.is_some());
    }

    #[test]
    fn test_partial_success_is_success() {
        let report = AggregateReport::from_results(
            "max",
            vec![
                DispatchResult::error("http://a", None, "refused".into()),
                DispatchResult::success("http://b", None, json!("ok")),
            ],
        );
        assert!(report.success);
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.message.as_deref(), Some("1 of 2 update endpoints succeeded"));
    }

    #[test]
    fn test_all_failed_is_not_success() {
        let report = AggregateReport::from_results(
            "max",
            vec![
                DispatchResult::failed("http://a", None, "HTTP 404".into()),
                DispatchResult::error("http://b", None, "refused".into()),
            ],
        );
        assert!(!report.success);
    }

    #[test]
    fn test_serialized_shape() {
        let result = DispatchResult::success(
            "http://a.example.com/api",
            Some("/proxy?url=http%3A%2F%2Fa.example.com%2Fapi".into()),
            json!({"updated": true}),
        );
        let value = serde_json::to_value(&result).expect("serializes");
        assert_eq!(value["originalUrl"], "http://a.example.com/api");
        assert_eq!(value["proxiedUrl"], "/proxy?url=http%3A%2F%2Fa.example.com%2Fapi");
        assert_eq!(value["status"], "success");
        assert!(value.get("errorDetail").is_none());
        assert_eq!(DispatchStatus::Failed.to_string(), "failed");
    }
}
