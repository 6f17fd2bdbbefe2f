//! Update dispatcher.
//!
//! Resolves the endpoints configured for a category, calls each of them
//! through the relay concurrently and aggregates the outcomes. One endpoint
//! failing never stops the others.

mod types;

use std::sync::{Arc, LazyLock};

use futures::future::join_all;
use log::{info, warn};
use regex::Regex;
use reqwest::header::{HeaderValue, ACCEPT};

use crate::config::RELAY_PATH;
use crate::error_handling::DispatchError;
use crate::proxy::{Forward, ProxyRequest, TARGET_PARAM};
use crate::settings::SettingsResolver;
use crate::utils::sanitize_and_truncate_detail;

pub use types::{AggregateReport, DispatchResult, DispatchStatus};

static CATEGORY_NAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]{1,64}$").ok());

/// Whether `name` is a well-formed category name.
pub fn is_valid_category(name: &str) -> bool {
    CATEGORY_NAME
        .as_ref()
        .map(|re| re.is_match(name))
        .unwrap_or(false)
}

/// Relay path an endpoint is reachable through, e.g. `/proxy?url=http%3A%2F%2F...`.
pub fn proxied_url(endpoint: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(endpoint.as_bytes()).collect();
    format!("{RELAY_PATH}?{TARGET_PARAM}={encoded}")
}

impl DispatchError {
    /// The `success = false` report sent as the body of a rejected dispatch.
    pub fn into_report(self) -> AggregateReport {
        let category = match &self {
            DispatchError::MissingCategory => String::new(),
            DispatchError::NotFound(category) | DispatchError::EmptyCategory(category) => {
                category.clone()
            }
        };
        AggregateReport {
            category,
            success: false,
            results: Vec::new(),
            message: Some(self.to_string()),
        }
    }
}

/// Fans a category update out to its endpoints.
pub struct Dispatcher<F: Forward> {
    settings: Arc<SettingsResolver>,
    forwarder: F,
}

impl<F: Forward> Dispatcher<F> {
    /// Creates a dispatcher reading categories from `settings`.
    pub fn new(settings: Arc<SettingsResolver>, forwarder: F) -> Self {
        Self {
            settings,
            forwarder,
        }
    }

    /// Calls every endpoint of `category` and aggregates the results.
    ///
    /// Results keep the configured endpoint order. The report is successful
    /// when at least one endpoint answered 2xx.
    pub async fn dispatch(&self, category: &str) -> Result<AggregateReport, DispatchError> {
        let category = category.trim();
        if category.is_empty() {
            return Err(DispatchError::MissingCategory);
        }
        if !is_valid_category(category) {
            warn!("Rejected malformed update type '{category}'");
            return Err(DispatchError::NotFound(category.to_string()));
        }

        let resolved = self.settings.resolve_endpoints().await;
        let endpoints = resolved
            .endpoints
            .get(category)
            .ok_or_else(|| DispatchError::NotFound(category.to_string()))?;
        if endpoints.is_empty() {
            return Err(DispatchError::EmptyCategory(category.to_string()));
        }

        info!(
            "Dispatching update '{}' to {} endpoint(s)",
            category,
            endpoints.len()
        );

        let results = join_all(endpoints.iter().map(|url| self.call_endpoint(url))).await;
        let report = AggregateReport::from_results(category, results);

        if report.success {
            info!(
                "Update '{}': {}/{} endpoint(s) succeeded",
                category,
                report.succeeded(),
                report.results.len()
            );
        } else {
            warn!("Update '{}': every endpoint failed", category);
        }

        Ok(report)
    }

    async fn call_endpoint(&self, endpoint: &str) -> DispatchResult {
        let proxied = Some(proxied_url(endpoint));
        let request = match ProxyRequest::get(endpoint) {
            Ok(request) => request.with_header(ACCEPT, HeaderValue::from_static("application/json")),
            Err(e) => return DispatchResult::error(endpoint, None, e.to_string()),
        };

        match self.forwarder.forward(request).await {
            Ok(response) if response.status.is_success() => {
                let data = response
                    .json()
                    .unwrap_or_else(|| serde_json::Value::String(response.text()));
                DispatchResult::success(endpoint, proxied, data)
            }
            Ok(response) => {
                let detail = format!(
                    "HTTP {}: {}",
                    response.status,
                    sanitize_and_truncate_detail(&response.text())
                );
                DispatchResult::failed(endpoint, proxied, detail)
            }
            Err(e) => DispatchResult::error(endpoint, proxied, e.to_string()),
        }
    }
}
