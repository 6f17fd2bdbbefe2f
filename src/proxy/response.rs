//! Relayed upstream responses.

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::StatusCode;

use crate::config::STRIPPED_RESPONSE_HEADERS;

/// An upstream response, fully buffered.
#[derive(Debug, Clone)]
pub struct ProxiedResponse {
    /// Upstream status, relayed verbatim
    pub status: StatusCode,
    /// Upstream headers minus hop-by-hop and framing headers
    pub headers: HeaderMap,
    /// Raw upstream body
    pub body: Vec<u8>,
}

impl ProxiedResponse {
    /// The `content-type` header, when present and readable.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    /// Whether the upstream declared a JSON body.
    pub fn is_json(&self) -> bool {
        self.content_type()
            .map(|ct| ct.to_ascii_lowercase().contains("json"))
            .unwrap_or(false)
    }

    /// The body parsed as JSON, when declared as JSON and well-formed.
    pub fn json(&self) -> Option<serde_json::Value> {
        if !self.is_json() {
            return None;
        }
        serde_json::from_slice(&self.body).ok()
    }

    /// The body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body to relay to the caller.
    ///
    /// Well-formed JSON is re-serialized compactly; anything else is relayed
    /// byte for byte.
    pub fn normalized_body(&self) -> Vec<u8> {
        match self.json() {
            Some(value) => serde_json::to_vec(&value).unwrap_or_else(|_| self.body.clone()),
            None => self.body.clone(),
        }
    }
}

/// Copies upstream headers, dropping hop-by-hop and framing headers.
pub fn strip_response_headers(headers: &HeaderMap) -> HeaderMap {
    let mut relayed = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if STRIPPED_RESPONSE_HEADERS.contains(&name.as_str()) {
            continue;
        }
        relayed.append(name.clone(), value.clone());
    }
    relayed
}
