//! HTTP client initialization.
//!
//! This module provides the function that builds the shared upstream client.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, TCP_CONNECT_TIMEOUT_SECS};
use reqwest::ClientBuilder;

/// Initializes the HTTP client shared by the relay and the settings loader.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from the configuration (used when the caller sends none)
/// - TCP connect timeout of `TCP_CONNECT_TIMEOUT_SECS`
/// - Redirect following enabled (reqwest default, up to 10 hops)
///
/// No overall request timeout is set here: the relay wraps every exchange in
/// its own timeout so it can report elapsed time.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(config: &Config) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = ClientBuilder::new()
        .connect_timeout(Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS))
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_client_with_default_config() {
        let client = init_client(&Config::default());
        assert!(client.is_ok());
    }
}
