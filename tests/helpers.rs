// Shared test helpers for starting the service and writing settings files.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use tempfile::NamedTempFile;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use update_relay::server::serve;
use update_relay::settings::default_settings;
use update_relay::{AppSettings, AppState, Proxy, SettingsResolver};

/// A running service on an ephemeral port. Stops when dropped.
pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    shutdown: CancellationToken,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Starts the service with a resolver and relay timeout.
#[allow(dead_code)] // Used by other test files
pub async fn spawn_app_with(resolver: SettingsResolver, proxy_timeout: Duration) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let base_url = format!(
        "http://{}",
        listener.local_addr().expect("Failed to read local address")
    );

    let state = AppState::new(
        Arc::new(resolver),
        Proxy::new(Arc::new(reqwest::Client::new()), proxy_timeout),
    );
    let shutdown = CancellationToken::new();
    tokio::spawn(serve(listener, state, shutdown.clone()));

    TestApp {
        base_url,
        client: reqwest::Client::new(),
        shutdown,
    }
}

/// Starts the service with fixed settings and a 5 second relay timeout.
#[allow(dead_code)] // Used by other test files
pub async fn spawn_app(settings: AppSettings) -> TestApp {
    spawn_app_with(SettingsResolver::provided(settings), Duration::from_secs(5)).await
}

/// Default settings with the given categories instead of the built-in ones.
#[allow(dead_code)] // Used by other test files
pub fn settings_with_categories(categories: Vec<(&str, Vec<String>)>) -> AppSettings {
    let mut settings = default_settings();
    let mut map = IndexMap::new();
    for (name, urls) in categories {
        map.insert(name.to_string(), urls);
    }
    settings.update_mode = map.keys().next().cloned();
    settings.update_api = map;
    settings
}

/// Writes `json` to a temporary settings file.
#[allow(dead_code)] // Used by other test files
pub fn settings_file(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(json.as_bytes())
        .expect("Failed to write settings file");
    file
}
