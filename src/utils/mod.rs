//! Utility functions.
//!
//! This module provides string sanitization for upstream text and URLs that
//! are echoed back to callers or logged.

pub mod sanitize;

pub use sanitize::{sanitize_and_truncate_detail, strip_query};
