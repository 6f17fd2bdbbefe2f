//! update_relay library: update dispatch and staleness notification service
//!
//! This library provides the pieces of an HTTP service that lets a browser
//! dashboard trigger data updates on third-party endpoints it cannot reach
//! directly, and reminds an operator when a record has gone stale:
//!
//! - a CORS-safe relay forwarding arbitrary requests server-side
//! - a dispatcher fanning a category update out to all its endpoints
//! - a notifier sending a reminder through a messaging webhook
//! - a settings resolver reading a file, a remote document or defaults
//!
//! # Example
//!
//! ```no_run
//! use update_relay::{run_server, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     port: 8080,
//!     ..Default::default()
//! };
//!
//! run_server(config).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

mod app;
pub mod config;
pub mod dispatch;
pub mod error_handling;
pub mod initialization;
pub mod notify;
pub mod proxy;
pub mod server;
pub mod settings;
mod utils;

// Re-export public API
pub use config::{Config, ConfigValidationError, LogFormat, LogLevel};
pub use dispatch::{AggregateReport, DispatchResult, DispatchStatus, Dispatcher};
pub use notify::{NoticeOutcome, RecordTimestamps, StalenessNotifier};
pub use proxy::{Forward, ProxiedResponse, Proxy, ProxyRequest};
pub use server::{build_router, AppState};
pub use settings::{AppSettings, SettingsResolver, SettingsSource};

use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;
use tokio_util::sync::CancellationToken;

use crate::app::{cancel_on_ctrl_c, shutdown_gracefully};
use crate::error_handling::InitializationError;
use crate::initialization::init_client;
use crate::server::start_server;

/// Runs the HTTP service until Ctrl-C.
///
/// Validates the configuration, builds the shared HTTP client, loads the
/// settings once so problems show up at startup, then serves until a shutdown
/// signal arrives and in-flight requests have finished.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the HTTP client cannot
/// be built, or the server cannot bind its address.
pub async fn run_server(config: Config) -> Result<()> {
    config.validate().context("Invalid configuration")?;

    let client = init_client(&config)
        .map_err(InitializationError::from)
        .context("Failed to initialize HTTP client")?;

    let settings = Arc::new(SettingsResolver::from_config(&config, Arc::clone(&client)));
    let loaded = settings.load().await;
    info!(
        "Serving {} update type(s) from {:?} settings, notifications {}",
        loaded.settings.categories_with_endpoints().len(),
        loaded.source,
        if loaded.settings.notification.enabled {
            "enabled"
        } else {
            "disabled"
        }
    );

    let state = AppState::new(settings, Proxy::new(client, config.proxy_timeout()));

    let shutdown = CancellationToken::new();
    let signal_task = cancel_on_ctrl_c(shutdown.clone());

    let result = start_server(&config.bind, config.port, state, shutdown.clone()).await;
    shutdown_gracefully(shutdown, signal_task).await;
    result
}
