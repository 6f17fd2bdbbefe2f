//! Settings sources.
//!
//! Each function reads one source and returns the partial document or a
//! `SettingsError`; choosing between sources is the resolver's job.

use std::path::Path;

use log::debug;
use reqwest::Client;
use tokio::fs;

use super::types::RawSettings;
use crate::config::{REMOTE_SETTINGS_PATH, SETTINGS_FETCH_TIMEOUT};
use crate::error_handling::SettingsError;

/// Reads and parses the static settings file.
pub async fn load_from_file(path: &Path) -> Result<RawSettings, SettingsError> {
    let display = path.display().to_string();
    let contents = fs::read_to_string(path)
        .await
        .map_err(|source| SettingsError::Io {
            path: display.clone(),
            source,
        })?;

    let raw = parse_settings(&contents, &display)?;
    debug!("Read settings from file {}", display);
    Ok(raw)
}

/// Fetches `<base_url>/vercel.config.json` and parses it.
pub async fn load_from_remote(client: &Client, base_url: &str) -> Result<RawSettings, SettingsError> {
    let url = remote_settings_url(base_url)?;

    let response = client
        .get(url.clone())
        .header(reqwest::header::CACHE_CONTROL, "no-store")
        .timeout(SETTINGS_FETCH_TIMEOUT)
        .send()
        .await
        .map_err(|e| SettingsError::Fetch {
            url: url.to_string(),
            detail: e.to_string(),
        })?;

    if !response.status().is_success() {
        return Err(SettingsError::Fetch {
            url: url.to_string(),
            detail: format!("HTTP {}", response.status()),
        });
    }

    let body = response.text().await.map_err(|e| SettingsError::Fetch {
        url: url.to_string(),
        detail: e.to_string(),
    })?;

    let raw = parse_settings(&body, url.as_str())?;
    debug!("Read settings from {}", url);
    Ok(raw)
}

/// Joins the remote settings path onto a base URL.
pub fn remote_settings_url(base_url: &str) -> Result<url::Url, SettingsError> {
    let base = url::Url::parse(base_url).map_err(|e| SettingsError::Fetch {
        url: base_url.to_string(),
        detail: e.to_string(),
    })?;
    base.join(REMOTE_SETTINGS_PATH)
        .map_err(|e| SettingsError::Fetch {
            url: base_url.to_string(),
            detail: e.to_string(),
        })
}

fn parse_settings(contents: &str, origin: &str) -> Result<RawSettings, SettingsError> {
    serde_json::from_str(contents).map_err(|source| SettingsError::Parse {
        origin: origin.to_string(),
        source,
    })
}
