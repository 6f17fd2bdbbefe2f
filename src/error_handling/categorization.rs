//! Error categorization.
//!
//! This module turns `reqwest::Error` values into relay errors.

use super::types::{ProxyError, UpstreamErrorKind};

/// Categorizes a `reqwest::Error` into an `UpstreamErrorKind`.
///
/// The predicates are checked in the order reqwest documents them; an error
/// that matches none is `Other`.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> UpstreamErrorKind {
    if error.is_builder() {
        UpstreamErrorKind::Builder
    } else if error.is_redirect() {
        UpstreamErrorKind::Redirect
    } else if error.is_timeout() {
        UpstreamErrorKind::Timeout
    } else if error.is_connect() {
        UpstreamErrorKind::Connect
    } else if error.is_request() {
        UpstreamErrorKind::Request
    } else if error.is_body() {
        UpstreamErrorKind::Body
    } else if error.is_decode() {
        UpstreamErrorKind::Decode
    } else {
        UpstreamErrorKind::Other
    }
}

/// Converts a failed upstream exchange into a `ProxyError::Upstream`.
///
/// The detail walks the error's source chain, because reqwest's own message
/// ("error sending request") rarely says what went wrong.
pub fn upstream_error(target: &str, error: &reqwest::Error) -> ProxyError {
    let mut detail = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }

    ProxyError::Upstream {
        target: target.to_string(),
        kind: categorize_reqwest_error(error),
        detail,
    }
}
