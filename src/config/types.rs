//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::fmt;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_BIND_ADDRESS, DEFAULT_PORT, DEFAULT_SETTINGS_FILE, DEFAULT_USER_AGENT,
    ENV_MESSAGING_KEY, ENV_NOTICE_DAYS, ENV_RECIPIENT_ID, ENV_SETTINGS_BASE_URL, PROXY_TIMEOUT,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Service configuration.
///
/// Parsed from the command line (and a few environment variables) by `clap`,
/// or constructed programmatically with `..Default::default()`.
///
/// # Examples
///
/// ```no_run
/// use update_relay::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     port: 8080,
///     settings_file: PathBuf::from("/etc/update_relay/config.json"),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "update_relay",
    about = "Relays update requests to configured endpoints and sends staleness notifications."
)]
pub struct Config {
    /// Address to bind the HTTP server to
    #[arg(long, default_value = DEFAULT_BIND_ADDRESS)]
    pub bind: String,

    /// Port to bind the HTTP server to (0 picks a free port)
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Static JSON settings file (highest priority source)
    #[arg(long, value_parser, default_value = DEFAULT_SETTINGS_FILE)]
    pub settings_file: PathBuf,

    /// Base URL serving `/vercel.config.json` (second priority source)
    #[arg(long, env = ENV_SETTINGS_BASE_URL)]
    pub settings_base_url: Option<String>,

    /// Seconds a loaded settings document stays cached (0 keeps it until reload)
    #[arg(long, default_value_t = 0)]
    pub settings_ttl_secs: u64,

    /// Upstream timeout for proxied requests in seconds
    #[arg(long, default_value_t = 30)]
    pub proxy_timeout_secs: u64,

    /// User-Agent sent upstream when the caller sends none
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Overrides `notification.noticeDays` from the settings
    #[arg(long, env = ENV_NOTICE_DAYS)]
    pub notice_days: Option<u32>,

    /// Overrides `notification.qmsgKey` from the settings
    #[arg(long, env = ENV_MESSAGING_KEY, hide_env_values = true)]
    pub messaging_key: Option<String>,

    /// Overrides `notification.qqNumber` from the settings
    #[arg(long, env = ENV_RECIPIENT_ID, hide_env_values = true)]
    pub recipient_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            settings_file: PathBuf::from(DEFAULT_SETTINGS_FILE),
            settings_base_url: None,
            settings_ttl_secs: 0,
            proxy_timeout_secs: PROXY_TIMEOUT.as_secs(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            notice_days: None,
            messaging_key: None,
            recipient_id: None,
        }
    }
}

/// A configuration value that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Name of the offending field
    pub field: &'static str,
    /// Human-readable description of the valid range
    pub message: String,
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigValidationError {}

impl Config {
    /// Checks option values that `clap` cannot check on its own.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.bind.parse::<IpAddr>().is_err() {
            return Err(ConfigValidationError {
                field: "bind",
                message: format!("'{}' is not an IP address", self.bind),
            });
        }

        if self.proxy_timeout_secs == 0 || self.proxy_timeout_secs > 300 {
            return Err(ConfigValidationError {
                field: "proxy_timeout_secs",
                message: "must be greater than 0 and at most 300".to_string(),
            });
        }

        if self.user_agent.trim().is_empty() {
            return Err(ConfigValidationError {
                field: "user_agent",
                message: "must not be empty".to_string(),
            });
        }

        if let Some(base) = &self.settings_base_url {
            let valid = url::Url::parse(base)
                .map(|u| matches!(u.scheme(), "http" | "https"))
                .unwrap_or(false);
            if !valid {
                return Err(ConfigValidationError {
                    field: "settings_base_url",
                    message: format!("'{}' is not an absolute http(s) URL", base),
                });
            }
        }

        Ok(())
    }

    /// Upstream timeout applied to every proxied exchange.
    pub fn proxy_timeout(&self) -> Duration {
        Duration::from_secs(self.proxy_timeout_secs)
    }

    /// Settings cache TTL, `None` when the cache never expires.
    pub fn settings_ttl(&self) -> Option<Duration> {
        (self.settings_ttl_secs > 0).then(|| Duration::from_secs(self.settings_ttl_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.bind, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.proxy_timeout(), Duration::from_secs(30));
        assert_eq!(config.settings_ttl(), None);
        assert_eq!(config.settings_file, PathBuf::from("./config.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_parse_from_args() {
        let config = Config::parse_from([
            "update_relay",
            "--port",
            "8081",
            "--settings-ttl-secs",
            "60",
            "--log-format",
            "json",
        ]);
        assert_eq!(config.port, 8081);
        assert_eq!(config.settings_ttl(), Some(Duration::from_secs(60)));
        assert!(matches!(config.log_format, LogFormat::Json));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = Config {
            proxy_timeout_secs: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "proxy_timeout_secs");
        assert!(err.message.contains("greater than 0"));
    }

    #[test]
    fn test_validate_rejects_bad_bind_address() {
        let config = Config {
            bind: "localhost:80".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err().field, "bind");
    }

    #[test]
    fn test_validate_rejects_non_http_settings_base_url() {
        let config = Config {
            settings_base_url: Some("ftp://example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err().field, "settings_base_url");

        let config = Config {
            settings_base_url: Some("https://dashboard.example.com".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
