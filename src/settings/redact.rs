//! Redacted settings view returned by `GET /config`.

use serde::Serialize;

use super::types::{AppSettings, SettingsSource};
use crate::config::{MASK_MIN_VISIBLE_LENGTH, REDACTED_PLACEHOLDER};

/// Notification block with credentials removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedactedNotification {
    /// Whether notices are sent
    pub enabled: bool,
    /// Staleness threshold in days
    pub notice_days: u32,
    /// Recipient with the middle masked, or `not set`
    pub recipient_id_masked: String,
    /// Whether a messaging key is configured
    pub messaging_key_set: bool,
}

/// Settings safe to hand to a browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedactedSettings {
    /// Notification block without credentials
    pub notification: RedactedNotification,
    /// Categories with at least one endpoint
    pub update_types: Vec<String>,
    /// Default category
    pub update_mode: Option<String>,
    /// Where the settings were read from
    pub source: SettingsSource,
}

impl RedactedSettings {
    /// Builds the redacted view of `settings`.
    pub fn new(settings: &AppSettings, source: SettingsSource) -> Self {
        Self {
            notification: RedactedNotification {
                enabled: settings.notification.enabled,
                notice_days: settings.notification.notice_days,
                recipient_id_masked: mask_recipient(&settings.notification.recipient_id),
                messaging_key_set: !settings.notification.messaging_key.trim().is_empty(),
            },
            update_types: settings.update_api.keys().cloned().collect(),
            update_mode: settings.default_category(),
            source,
        }
    }
}

/// Masks a recipient id for display.
///
/// Ids of up to 8 characters are replaced entirely by the placeholder; longer
/// ids keep their first 3 and last 2 characters.
pub fn mask_recipient(recipient: &str) -> String {
    let chars: Vec<char> = recipient.trim().chars().collect();
    if chars.len() <= MASK_MIN_VISIBLE_LENGTH {
        return REDACTED_PLACEHOLDER.to_string();
    }
    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{head}****{tail}")
}
