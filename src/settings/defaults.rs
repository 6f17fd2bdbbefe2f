//! Built-in fallback settings.

use indexmap::IndexMap;

use super::types::{AppSettings, NotificationSettings};
use crate::config::{DEFAULT_MESSAGING_ENDPOINT, DEFAULT_NOTICE_DAYS};

/// Settings used when no source can be read.
///
/// Always has at least one category with at least one endpoint.
pub fn default_settings() -> AppSettings {
    let mut update_api = IndexMap::new();
    update_api.insert(
        "max".to_string(),
        vec!["https://home.maxtral.fun/plugin/updatadate/api.php".to_string()],
    );
    update_api.insert(
        "zzw".to_string(),
        vec!["http://homezzw.maxtral.fun/updatadata/api.php".to_string()],
    );
    update_api.insert(
        "test".to_string(),
        vec!["https://api.example.com/easystack/update".to_string()],
    );

    AppSettings {
        notification: NotificationSettings {
            enabled: true,
            notice_days: DEFAULT_NOTICE_DAYS,
            messaging_key: String::new(),
            recipient_id: String::new(),
            endpoint: DEFAULT_MESSAGING_ENDPOINT.to_string(),
            once_per_day: false,
        },
        update_api,
        update_mode: Some("max".to_string()),
    }
}
