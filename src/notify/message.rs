//! Staleness notice text and webhook URL.

use url::Url;

use crate::error_handling::NotificationError;
use crate::settings::NotificationSettings;

/// Human-readable notice for a stale record.
pub fn notice_text(record_id: &str, days: u32) -> String {
    format!("Data reminder: record {record_id} has not been updated for {days} days, please check!")
}

/// Builds the messaging webhook call for one notice.
///
/// The webhook takes everything in the query string:
/// `<endpoint>?qmsg_key=<key>&qq_number=<recipient>&send_qmsg=<text>`.
pub fn build_notice_url(
    settings: &NotificationSettings,
    record_id: &str,
    days: u32,
) -> Result<Url, NotificationError> {
    if !settings.has_credentials() {
        return Err(NotificationError::MissingCredentials);
    }

    let mut url = Url::parse(&settings.endpoint)
        .map_err(|_| NotificationError::InvalidEndpoint(settings.endpoint.clone()))?;
    url.query_pairs_mut()
        .append_pair("qmsg_key", settings.messaging_key.trim())
        .append_pair("qq_number", settings.recipient_id.trim())
        .append_pair("send_qmsg", &notice_text(record_id, days));
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::default_settings;

    fn settings(key: &str, recipient: &str) -> NotificationSettings {
        let mut notification = default_settings().notification;
        notification.messaging_key = key.to_string();
        notification.recipient_id = recipient.to_string();
        notification
    }

    #[test]
    fn test_notice_text() {
        assert_eq!(
            notice_text("rec-42", 15),
            "Data reminder: record rec-42 has not been updated for 15 days, please check!"
        );
    }

    #[test]
    fn test_build_notice_url_encodes_query() {
        let url = build_notice_url(&settings("key&1", "1029384756"), "rec 42", 20)
            .expect("credentials present");

        assert!(url
            .as_str()
            .starts_with("https://home.maxtral.fun/qmasgnotice/notice.php?"));
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(pairs[0], ("qmsg_key".into(), "key&1".into()));
        assert_eq!(pairs[1], ("qq_number".into(), "1029384756".into()));
        assert_eq!(pairs[2].0, "send_qmsg");
        assert!(pairs[2].1.contains("record rec 42"));
        assert!(pairs[2].1.contains("20 days"));
    }

    #[test]
    fn test_build_notice_url_requires_credentials() {
        for (key, recipient) in [("", "1029384756"), ("key", ""), ("  ", "  ")] {
            assert!(matches!(
                build_notice_url(&settings(key, recipient), "rec", 20),
                Err(NotificationError::MissingCredentials)
            ));
        }
    }

    #[test]
    fn test_build_notice_url_rejects_bad_endpoint() {
        let mut s = settings("key", "1029384756");
        s.endpoint = "not a url".into();
        assert!(matches!(
            build_notice_url(&s, "rec", 20),
            Err(NotificationError::InvalidEndpoint(_))
        ));
    }
}
