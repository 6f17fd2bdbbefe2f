//! Settings data structures.
//!
//! `RawSettings` mirrors the JSON document with every field optional;
//! `AppSettings::with_defaults` turns it into the fully populated form the
//! rest of the service uses.

use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Serialize};

use super::defaults;

/// Category name → ordered endpoint URLs.
pub type EndpointConfig = IndexMap<String, Vec<String>>;

/// Where a loaded settings document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsSource {
    /// The static settings file
    File,
    /// `<base>/vercel.config.json` over HTTP
    Remote,
    /// Settings handed to the resolver directly
    Provided,
    /// The built-in fallback
    Default,
}

/// Notification settings after defaults and overrides are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationSettings {
    /// Master switch for staleness notices
    pub enabled: bool,
    /// Days without an update before a record is stale
    pub notice_days: u32,
    /// Key of the messaging service, empty when unset
    pub messaging_key: String,
    /// Recipient of notices, empty when unset
    pub recipient_id: String,
    /// Base URL of the messaging webhook
    pub endpoint: String,
    /// Send at most one notice per record per UTC day
    pub once_per_day: bool,
}

impl NotificationSettings {
    /// Whether both credentials needed to send a notice are present.
    pub fn has_credentials(&self) -> bool {
        !self.messaging_key.trim().is_empty() && !self.recipient_id.trim().is_empty()
    }
}

/// Fully populated service settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    /// Notification settings
    pub notification: NotificationSettings,
    /// Update categories in document order
    pub update_api: EndpointConfig,
    /// Configured default category, as written in the document
    pub update_mode: Option<String>,
}

/// Partial settings document as found on disk or over HTTP.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSettings {
    /// `notification` block
    #[serde(default)]
    pub notification: Option<RawNotification>,
    /// `updateAPI` category map
    #[serde(default, rename = "updateAPI")]
    pub update_api: Option<IndexMap<String, Vec<String>>>,
    /// `updateMode` default category
    #[serde(default)]
    pub update_mode: Option<String>,
}

/// Partial notification block. Accepts both the descriptive field names and
/// the names used by existing deployments (`qmsgKey`, `qqNumber`).
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNotification {
    /// `enabled`
    #[serde(default)]
    pub enabled: Option<bool>,
    /// `noticeDays`
    #[serde(default)]
    pub notice_days: Option<u32>,
    /// `messagingKey` or `qmsgKey`
    #[serde(default, alias = "qmsgKey")]
    pub messaging_key: Option<String>,
    /// `recipientId` or `qqNumber`
    #[serde(default, alias = "qqNumber")]
    pub recipient_id: Option<String>,
    /// `endpoint` of the messaging webhook
    #[serde(default)]
    pub endpoint: Option<String>,
    /// `oncePerDay`
    #[serde(default)]
    pub once_per_day: Option<bool>,
}

/// Values supplied on the command line or through the environment that take
/// precedence over whatever the settings document says.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NotificationOverrides {
    /// Replaces `noticeDays`
    pub notice_days: Option<u32>,
    /// Replaces the messaging key
    pub messaging_key: Option<String>,
    /// Replaces the recipient
    pub recipient_id: Option<String>,
}

impl AppSettings {
    /// Builds settings from a partial document, filling every absent field
    /// from the built-in defaults.
    ///
    /// A present, non-empty `updateAPI` replaces the default categories as a
    /// whole. Endpoint URLs that are not absolute http(s) URLs are dropped.
    pub fn with_defaults(raw: RawSettings) -> Self {
        let fallback = defaults::default_settings();
        let raw_notification = raw.notification.unwrap_or_default();

        let notification = NotificationSettings {
            enabled: raw_notification
                .enabled
                .unwrap_or(fallback.notification.enabled),
            notice_days: raw_notification
                .notice_days
                .unwrap_or(fallback.notification.notice_days),
            messaging_key: raw_notification
                .messaging_key
                .unwrap_or(fallback.notification.messaging_key),
            recipient_id: raw_notification
                .recipient_id
                .unwrap_or(fallback.notification.recipient_id),
            endpoint: raw_notification
                .endpoint
                .filter(|e| is_http_url(e))
                .unwrap_or(fallback.notification.endpoint),
            once_per_day: raw_notification
                .once_per_day
                .unwrap_or(fallback.notification.once_per_day),
        };

        let update_api = match raw.update_api {
            Some(map) if !map.is_empty() => sanitize_endpoints(map),
            _ => fallback.update_api,
        };

        let update_mode = raw
            .update_mode
            .filter(|m| !m.trim().is_empty())
            .or(fallback.update_mode);

        Self {
            notification,
            update_api,
            update_mode,
        }
    }

    /// Applies command-line/environment overrides on top of the document.
    pub fn apply_overrides(&mut self, overrides: &NotificationOverrides) {
        if let Some(days) = overrides.notice_days {
            self.notification.notice_days = days;
        }
        if let Some(key) = &overrides.messaging_key {
            self.notification.messaging_key = key.clone();
        }
        if let Some(recipient) = &overrides.recipient_id {
            self.notification.recipient_id = recipient.clone();
        }
    }

    /// The implicit default category.
    ///
    /// The configured `updateMode` when it names a known category, otherwise
    /// the first category, otherwise `None`.
    pub fn default_category(&self) -> Option<String> {
        match &self.update_mode {
            Some(mode) if self.update_api.contains_key(mode) => Some(mode.clone()),
            _ => self.update_api.keys().next().cloned(),
        }
    }

    /// Categories with at least one endpoint, in configuration order.
    pub fn categories_with_endpoints(&self) -> Vec<String> {
        self.update_api
            .iter()
            .filter(|(_, urls)| !urls.is_empty())
            .map(|(name, _)| name.clone())
            .collect()
    }
}

/// Whether `candidate` parses as an absolute http or https URL.
pub fn is_http_url(candidate: &str) -> bool {
    url::Url::parse(candidate)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false)
}

fn sanitize_endpoints(map: IndexMap<String, Vec<String>>) -> EndpointConfig {
    map.into_iter()
        .map(|(category, urls)| {
            let kept: Vec<String> = urls
                .into_iter()
                .filter(|u| {
                    let ok = is_http_url(u);
                    if !ok {
                        warn!("Dropping invalid endpoint URL for category '{category}': {u}");
                    }
                    ok
                })
                .collect();
            (category, kept)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> RawSettings {
        serde_json::from_str(json).expect("valid settings JSON")
    }

    #[test]
    fn test_with_defaults_on_empty_document() {
        let settings = AppSettings::with_defaults(RawSettings::default());
        assert_eq!(settings, defaults::default_settings());
    }

    #[test]
    fn test_with_defaults_fills_partial_notification() {
        let settings =
            AppSettings::with_defaults(parse(r#"{"notification": {"noticeDays": 3}}"#));
        assert_eq!(settings.notification.notice_days, 3);
        assert!(settings.notification.enabled);
        assert_eq!(settings.notification.messaging_key, "");
        assert!(!settings.update_api.is_empty());
    }

    #[test]
    fn test_legacy_credential_names_are_accepted() {
        let settings = AppSettings::with_defaults(parse(
            r#"{"notification": {"qmsgKey": "k-123", "qqNumber": "1234567890"}}"#,
        ));
        assert_eq!(settings.notification.messaging_key, "k-123");
        assert_eq!(settings.notification.recipient_id, "1234567890");
        assert!(settings.notification.has_credentials());
    }

    #[test]
    fn test_update_api_replaces_defaults_and_keeps_order() {
        let settings = AppSettings::with_defaults(parse(
            r#"{"updateAPI": {"zeta": ["http://z.example.com/a"], "alpha": ["https://a.example.com/"]}}"#,
        ));
        let keys: Vec<_> = settings.update_api.keys().cloned().collect();
        assert_eq!(keys, vec!["zeta".to_string(), "alpha".to_string()]);
    }

    #[test]
    fn test_invalid_endpoint_urls_are_dropped() {
        let settings = AppSettings::with_defaults(parse(
            r#"{"updateAPI": {"max": ["https://ok.example.com/api", "ftp://nope.example.com", "relative/path"]}}"#,
        ));
        assert_eq!(
            settings.update_api["max"],
            vec!["https://ok.example.com/api".to_string()]
        );
    }

    #[test]
    fn test_default_category_falls_back_to_first_key() {
        let settings = AppSettings::with_defaults(parse(
            r#"{"updateAPI": {"one": ["http://1.example.com"], "two": []}, "updateMode": "missing"}"#,
        ));
        assert_eq!(settings.default_category(), Some("one".to_string()));

        let settings = AppSettings::with_defaults(parse(
            r#"{"updateAPI": {"one": ["http://1.example.com"], "two": []}, "updateMode": "two"}"#,
        ));
        assert_eq!(settings.default_category(), Some("two".to_string()));
    }

    #[test]
    fn test_default_category_is_none_without_categories() {
        let mut settings = defaults::default_settings();
        settings.update_api.clear();
        assert_eq!(settings.default_category(), None);
    }

    #[test]
    fn test_categories_with_endpoints_skips_empty_lists() {
        let settings = AppSettings::with_defaults(parse(
            r#"{"updateAPI": {"a": ["http://a.example.com"], "b": [], "c": ["http://c.example.com"]}}"#,
        ));
        assert_eq!(
            settings.categories_with_endpoints(),
            vec!["a".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn test_overrides_win_over_document() {
        let mut settings = AppSettings::with_defaults(parse(
            r#"{"notification": {"noticeDays": 3, "qmsgKey": "file-key"}}"#,
        ));
        settings.apply_overrides(&NotificationOverrides {
            notice_days: Some(21),
            messaging_key: None,
            recipient_id: Some("9876543210".into()),
        });
        assert_eq!(settings.notification.notice_days, 21);
        assert_eq!(settings.notification.messaging_key, "file-key");
        assert_eq!(settings.notification.recipient_id, "9876543210");
    }

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("http://homezzw.example.com/updatadata/api.php"));
        assert!(is_http_url("https://example.com"));
        assert!(!is_http_url("example.com"));
        assert!(!is_http_url("file:///etc/passwd"));
        assert!(!is_http_url(""));
    }
}
