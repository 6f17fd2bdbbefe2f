//! Relay request construction.
//!
//! Turns the query string of a `/proxy` call into a validated upstream target
//! and strips the headers that must not travel upstream.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use url::Url;

use crate::config::{STRIPPED_REQUEST_HEADERS, STRIPPED_REQUEST_HEADER_PREFIXES};
use crate::error_handling::ProxyError;

/// Name of the query parameter carrying the upstream URL.
pub const TARGET_PARAM: &str = "url";

/// A request ready to be forwarded upstream.
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    /// HTTP method, forwarded unchanged
    pub method: Method,
    /// Absolute http(s) target
    pub target: Url,
    /// Headers to forward (already stripped)
    pub headers: HeaderMap,
    /// Request body; always empty for GET and HEAD
    pub body: Vec<u8>,
}

impl ProxyRequest {
    /// Builds a relay request from an incoming `/proxy` call.
    ///
    /// `url` is required. Every other query pair is appended to the target, so
    /// `/proxy?url=https://a.example/api&page=2` reaches
    /// `https://a.example/api?page=2`.
    pub fn from_query(
        raw_query: Option<&str>,
        method: Method,
        headers: &HeaderMap,
        body: Vec<u8>,
    ) -> Result<Self, ProxyError> {
        let mut target_param = None;
        let mut extra = Vec::new();
        for (key, value) in url::form_urlencoded::parse(raw_query.unwrap_or("").as_bytes()) {
            if key == TARGET_PARAM && target_param.is_none() {
                target_param = Some(value.into_owned());
            } else {
                extra.push((key.into_owned(), value.into_owned()));
            }
        }

        let raw_target = target_param
            .filter(|t| !t.trim().is_empty())
            .ok_or(ProxyError::MissingParameter(TARGET_PARAM))?;
        let mut target = parse_target(raw_target.trim())?;
        if !extra.is_empty() {
            target.query_pairs_mut().extend_pairs(extra);
        }

        let body = if carries_body(&method) { body } else { Vec::new() };

        Ok(Self {
            method,
            target,
            headers: strip_request_headers(headers),
            body,
        })
    }

    /// A bodiless GET to `target`.
    pub fn get(target: &str) -> Result<Self, ProxyError> {
        Ok(Self {
            method: Method::GET,
            target: parse_target(target)?,
            headers: HeaderMap::new(),
            body: Vec::new(),
        })
    }

    /// Adds or replaces one header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Whether the body is sent upstream.
    pub fn carries_body(&self) -> bool {
        carries_body(&self.method)
    }
}

/// Parses and checks an upstream target.
///
/// Only absolute `http` and `https` URLs with a host are accepted.
pub fn parse_target(raw: &str) -> Result<Url, ProxyError> {
    let target = Url::parse(raw).map_err(|e| ProxyError::InvalidTarget {
        target: raw.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(target.scheme(), "http" | "https") {
        return Err(ProxyError::InvalidTarget {
            target: raw.to_string(),
            reason: format!("unsupported scheme '{}'", target.scheme()),
        });
    }
    if !target.has_host() {
        return Err(ProxyError::InvalidTarget {
            target: raw.to_string(),
            reason: "URL has no host".to_string(),
        });
    }

    Ok(target)
}

/// Copies `headers`, leaving out everything that must not reach the upstream.
pub fn strip_request_headers(headers: &HeaderMap) -> HeaderMap {
    let mut forwarded = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let lower = name.as_str();
        if STRIPPED_REQUEST_HEADERS.contains(&lower)
            || STRIPPED_REQUEST_HEADER_PREFIXES
                .iter()
                .any(|prefix| lower.starts_with(prefix))
        {
            continue;
        }
        forwarded.append(name.clone(), value.clone());
    }
    forwarded
}

fn carries_body(method: &Method) -> bool {
    !matches!(*method, Method::GET | Method::HEAD)
}
