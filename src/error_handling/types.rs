//! Error type definitions.
//!
//! This module defines the error types used throughout the service, one enum
//! per concern, plus the categories used to classify upstream failures.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use reqwest::StatusCode;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::utils::strip_query;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Failure to read one settings source.
///
/// Never surfaced to callers: the resolver logs it and falls through to the
/// next source, ending at the built-in defaults.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Io {
        /// File that was read
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The settings document is not valid JSON of the expected shape.
    #[error("malformed settings from {origin}: {source}")]
    Parse {
        /// File path or URL of the document
        origin: String,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// The remote settings document could not be fetched.
    #[error("failed to fetch settings from {url}: {detail}")]
    Fetch {
        /// URL of the remote document
        url: String,
        /// Status or transport error
        detail: String,
    },

    /// The source is not configured.
    #[error("settings source not configured")]
    NotConfigured,
}

/// Categories of network-level failures talking to an upstream.
///
/// Mirrors the predicates `reqwest::Error` exposes so logs and error bodies can
/// name the phase that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum UpstreamErrorKind {
    /// The request could not be built
    Builder,
    /// Redirect policy failure
    Redirect,
    /// Connect or read timeout inside the client
    Timeout,
    /// The connection could not be established
    Connect,
    /// Sending the request failed
    Request,
    /// Reading or writing a body failed
    Body,
    /// The response body could not be decoded
    Decode,
    /// Anything reqwest does not classify
    Other,
}

impl UpstreamErrorKind {
    /// Short description used in messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamErrorKind::Builder => "request builder error",
            UpstreamErrorKind::Redirect => "redirect error",
            UpstreamErrorKind::Timeout => "timeout",
            UpstreamErrorKind::Connect => "connection error",
            UpstreamErrorKind::Request => "request error",
            UpstreamErrorKind::Body => "body error",
            UpstreamErrorKind::Decode => "decode error",
            UpstreamErrorKind::Other => "upstream error",
        }
    }
}

impl std::fmt::Display for UpstreamErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced by the relay itself (as opposed to upstream statuses,
/// which are relayed verbatim).
#[derive(Error, Debug)]
pub enum ProxyError {
    /// A required query parameter is absent or empty.
    #[error("missing required parameter '{0}'")]
    MissingParameter(&'static str),

    /// The target is not an absolute http(s) URL.
    #[error("invalid target URL '{target}': {reason}")]
    InvalidTarget {
        /// Target as supplied
        target: String,
        /// Why it was refused
        reason: String,
    },

    /// The upstream exchange did not complete within the relay timeout.
    #[error("upstream request to {target} timed out after {elapsed_secs:.1}s")]
    Timeout {
        /// Target that did not answer in time
        target: String,
        /// Seconds waited before giving up
        elapsed_secs: f64,
    },

    /// The upstream could not be reached or the exchange broke off.
    #[error("upstream request to {target} failed ({kind}): {detail}")]
    Upstream {
        /// Target of the failed exchange
        target: String,
        /// Phase that failed
        kind: UpstreamErrorKind,
        /// Error message including its source chain
        detail: String,
    },
}

impl ProxyError {
    /// HTTP status the relay answers with for this error.
    ///
    /// Every timeout-class error is a 504, including a connect timeout the
    /// client hit before the relay's own deadline.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MissingParameter(_) | ProxyError::InvalidTarget { .. } => {
                StatusCode::BAD_REQUEST
            }
            _ if self.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::BAD_GATEWAY,
        }
    }

    /// Short error title used in the `error` field of error bodies.
    pub fn title(&self) -> &'static str {
        match self {
            ProxyError::MissingParameter(_) => "Missing parameter",
            ProxyError::InvalidTarget { .. } => "Invalid target URL",
            _ if self.is_timeout() => "Proxy request timed out",
            _ => "Proxy request failed",
        }
    }

    /// Target URL the error refers to, when one was known.
    pub fn target(&self) -> Option<&str> {
        match self {
            ProxyError::MissingParameter(_) => None,
            ProxyError::InvalidTarget { target, .. }
            | ProxyError::Timeout { target, .. }
            | ProxyError::Upstream { target, .. } => Some(target),
        }
    }

    /// Copy of the error with the target's query string removed everywhere
    /// it appears, including the detail text.
    pub fn redacted(&self) -> ProxyError {
        let scrub = |text: &str, target: &str| text.replace(target, &strip_query(target));
        match self {
            ProxyError::MissingParameter(name) => ProxyError::MissingParameter(*name),
            ProxyError::InvalidTarget { target, reason } => ProxyError::InvalidTarget {
                target: strip_query(target),
                reason: scrub(reason, target),
            },
            ProxyError::Timeout {
                target,
                elapsed_secs,
            } => ProxyError::Timeout {
                target: strip_query(target),
                elapsed_secs: *elapsed_secs,
            },
            ProxyError::Upstream {
                target,
                kind,
                detail,
            } => ProxyError::Upstream {
                target: strip_query(target),
                kind: *kind,
                detail: scrub(detail, target),
            },
        }
    }

    /// Whether the error is timeout-class.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            ProxyError::Timeout { .. }
                | ProxyError::Upstream {
                    kind: UpstreamErrorKind::Timeout,
                    ..
                }
        )
    }
}

/// Errors returned by the update dispatcher before any endpoint is called.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// No category was supplied.
    #[error("missing update type parameter")]
    MissingCategory,

    /// The category is unknown or its name is malformed.
    #[error("no update configuration found for type '{0}'")]
    NotFound(String),

    /// The category exists but lists no endpoints.
    #[error("update endpoint list for type '{0}' is empty")]
    EmptyCategory(String),
}

impl DispatchError {
    /// HTTP status the service answers with for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            DispatchError::MissingCategory => StatusCode::BAD_REQUEST,
            DispatchError::NotFound(_) | DispatchError::EmptyCategory(_) => StatusCode::NOT_FOUND,
        }
    }
}

/// Reasons a staleness notice could not be delivered.
#[derive(Error, Debug)]
pub enum NotificationError {
    /// Messaging key or recipient id is empty; nothing was sent.
    #[error("notification credentials are incomplete (messaging key or recipient id missing)")]
    MissingCredentials,

    /// The messaging endpoint could not be turned into a request URL.
    #[error("invalid messaging endpoint '{0}'")]
    InvalidEndpoint(String),

    /// The messaging webhook answered with a non-success status.
    #[error("messaging webhook rejected the notice with status {status}")]
    Rejected {
        /// Status the webhook answered with
        status: StatusCode,
    },

    /// The relay failed to reach the messaging webhook.
    #[error(transparent)]
    Proxy(#[from] ProxyError),
}
