//! Configuration constants.
//!
//! This module defines the constants used throughout the service, including
//! timeouts, size limits, and the wire names of the settings sources.

use std::time::Duration;

/// Default address the HTTP server binds to
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
/// Default HTTP server port
pub const DEFAULT_PORT: u16 = 3000;

// Network operation timeouts
/// Hard upper bound for one proxied exchange (request + response body)
pub const PROXY_TIMEOUT: Duration = Duration::from_secs(30);
/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Timeout for fetching the remote settings document
pub const SETTINGS_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// User-Agent sent upstream when the caller did not provide one.
pub const DEFAULT_USER_AGENT: &str = "data-management-proxy";

// Settings sources
/// Default path of the static settings file
pub const DEFAULT_SETTINGS_FILE: &str = "./config.json";
/// Path of the settings document under the remote base URL
pub const REMOTE_SETTINGS_PATH: &str = "/vercel.config.json";

// Notification defaults
/// Days without an update before a record is considered stale
pub const DEFAULT_NOTICE_DAYS: u32 = 14;
/// Messaging webhook used when the settings do not name one
pub const DEFAULT_MESSAGING_ENDPOINT: &str = "https://home.maxtral.fun/qmasgnotice/notice.php";

// Environment overrides
/// Overrides the staleness threshold in days
pub const ENV_NOTICE_DAYS: &str = "NOTICE_DAYS";
/// Overrides the messaging service key
pub const ENV_MESSAGING_KEY: &str = "QMSG_KEY";
/// Overrides the notification recipient
pub const ENV_RECIPIENT_ID: &str = "QQ_NUMBER";
/// Base URL serving the remote settings document
pub const ENV_SETTINGS_BASE_URL: &str = "SETTINGS_BASE_URL";

/// Public path of the relay endpoint, used to build `proxied_url` values
pub const RELAY_PATH: &str = "/proxy";

// Error message size limits
/// Maximum error detail length in characters (2000 chars)
/// Upstream error bodies longer than this are truncated with a note about the original length
pub const MAX_ERROR_DETAIL_LENGTH: usize = 2000;

/// Placeholder reported for unset or too-short sensitive settings
pub const REDACTED_PLACEHOLDER: &str = "not set";
/// Recipient ids up to this many characters are fully redacted
pub const MASK_MIN_VISIBLE_LENGTH: usize = 8;
