//! Main application modules.
//!
//! This module provides the shutdown handling used by the server entry point.

pub mod shutdown;

// Re-export public API
pub use shutdown::{cancel_on_ctrl_c, shutdown_gracefully};
