//! Error handling.
//!
//! This module provides:
//! - Error type definitions, one enum per concern
//! - Categorization of `reqwest` failures into upstream error kinds
//!
//! Errors are surfaced differently by layer:
//! - **Input errors** (missing `url`/`type`) go straight back to the caller
//! - **Upstream errors** are captured per endpoint and never abort siblings
//! - **Settings and notification errors** are logged and absorbed

mod categorization;
mod types;

// Re-export public API
pub use categorization::{categorize_reqwest_error, upstream_error};
pub use types::{
    DispatchError, InitializationError, NotificationError, ProxyError, SettingsError,
    UpstreamErrorKind,
};
