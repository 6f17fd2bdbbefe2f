//! Settings resolution.
//!
//! Loads the update-endpoint and notification settings from a layered set of
//! sources, first successful read wins:
//! 1. the static JSON settings file
//! 2. `<base>/vercel.config.json` fetched from the configured base URL
//! 3. the built-in defaults
//!
//! Sources 1 and 2 are read concurrently. Resolution never fails: every error
//! is logged and the next source is used. The result is cached by the
//! resolver until its TTL expires or `invalidate()` is called.

mod cache;
mod defaults;
mod loader;
mod redact;
mod types;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::Client;

use crate::config::Config;
use crate::error_handling::SettingsError;

pub use cache::SettingsCache;
pub use defaults::default_settings;
pub use loader::{load_from_file, load_from_remote, remote_settings_url};
pub use redact::{mask_recipient, RedactedNotification, RedactedSettings};
pub use types::{
    is_http_url, AppSettings, EndpointConfig, NotificationOverrides, NotificationSettings,
    RawNotification, RawSettings, SettingsSource,
};

/// Settings together with the source they were read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSettings {
    /// Merged settings
    pub settings: AppSettings,
    /// Where they were read from
    pub source: SettingsSource,
}

/// Endpoint map plus the resolved default category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoints {
    /// Category name to endpoint URLs
    pub endpoints: EndpointConfig,
    /// Configured default, or the first category
    pub default_category: Option<String>,
}

/// Resolves settings from the configured sources and caches the result.
pub struct SettingsResolver {
    file: Option<PathBuf>,
    remote: Option<(Arc<Client>, String)>,
    provided: Option<AppSettings>,
    overrides: NotificationOverrides,
    cache: SettingsCache,
}

impl SettingsResolver {
    /// Creates a resolver reading the given file and/or remote base URL.
    pub fn new(
        file: Option<PathBuf>,
        remote: Option<(Arc<Client>, String)>,
        overrides: NotificationOverrides,
        ttl: Option<Duration>,
    ) -> Self {
        Self {
            file,
            remote,
            provided: None,
            overrides,
            cache: SettingsCache::new(ttl),
        }
    }

    /// Creates a resolver from the service configuration.
    pub fn from_config(config: &Config, client: Arc<Client>) -> Self {
        let overrides = NotificationOverrides {
            notice_days: config.notice_days,
            messaging_key: config.messaging_key.clone(),
            recipient_id: config.recipient_id.clone(),
        };
        Self::new(
            Some(config.settings_file.clone()),
            config
                .settings_base_url
                .clone()
                .map(|base| (client, base)),
            overrides,
            config.settings_ttl(),
        )
    }

    /// Creates a resolver that always yields `settings`.
    pub fn provided(settings: AppSettings) -> Self {
        Self {
            file: None,
            remote: None,
            provided: Some(settings),
            overrides: NotificationOverrides::default(),
            cache: SettingsCache::new(None),
        }
    }

    /// Returns the current settings, loading them if the cache is empty.
    pub async fn load(&self) -> Arc<LoadedSettings> {
        if let Some(hit) = self.cache.get().await {
            return hit;
        }
        let loaded = Arc::new(self.read_sources().await);
        self.cache.store(Arc::clone(&loaded)).await;
        loaded
    }

    /// Endpoint map and default category.
    pub async fn resolve_endpoints(&self) -> ResolvedEndpoints {
        let loaded = self.load().await;
        ResolvedEndpoints {
            endpoints: loaded.settings.update_api.clone(),
            default_category: loaded.settings.default_category(),
        }
    }

    /// Category names with a non-empty endpoint list, in configuration order.
    pub async fn list_categories(&self) -> Vec<String> {
        self.load().await.settings.categories_with_endpoints()
    }

    /// Notification settings.
    pub async fn notification(&self) -> NotificationSettings {
        self.load().await.settings.notification.clone()
    }

    /// Settings view with credentials removed.
    pub async fn redacted(&self) -> RedactedSettings {
        let loaded = self.load().await;
        RedactedSettings::new(&loaded.settings, loaded.source)
    }

    /// Drops the cached settings so the next read goes back to the sources.
    pub async fn invalidate(&self) {
        self.cache.invalidate().await;
        debug!("Settings cache invalidated");
    }

    async fn read_sources(&self) -> LoadedSettings {
        if let Some(settings) = &self.provided {
            let mut settings = settings.clone();
            settings.apply_overrides(&self.overrides);
            return LoadedSettings {
                settings,
                source: SettingsSource::Provided,
            };
        }

        let file_read = async {
            match &self.file {
                Some(path) => load_from_file(path).await,
                None => Err(SettingsError::NotConfigured),
            }
        };
        let remote_read = async {
            match &self.remote {
                Some((client, base)) => load_from_remote(client, base).await,
                None => Err(SettingsError::NotConfigured),
            }
        };
        let (file_result, remote_result) = tokio::join!(file_read, remote_read);

        let (raw, source) = match (file_result, remote_result) {
            (Ok(raw), _) => (raw, SettingsSource::File),
            (Err(file_err), Ok(raw)) => {
                log_skipped_source("file", &file_err);
                (raw, SettingsSource::Remote)
            }
            (Err(file_err), Err(remote_err)) => {
                log_skipped_source("file", &file_err);
                log_skipped_source("remote", &remote_err);
                warn!("No settings source could be read, using built-in defaults");
                (RawSettings::default(), SettingsSource::Default)
            }
        };

        let mut settings = AppSettings::with_defaults(raw);
        settings.apply_overrides(&self.overrides);
        info!(
            "Loaded settings from {:?} source ({} update categories)",
            source,
            settings.update_api.len()
        );

        LoadedSettings { settings, source }
    }
}

fn log_skipped_source(name: &str, error: &SettingsError) {
    match error {
        SettingsError::NotConfigured => debug!("Settings {name} source not configured"),
        other => warn!("Skipping settings {name} source: {other}"),
    }
}
