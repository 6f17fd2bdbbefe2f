//! Staleness notifier.
//!
//! Decides whether a record has gone without an update for too long and, if
//! so, sends a reminder through the messaging webhook. The notifier never
//! returns an error: every failure is logged and reported as
//! `NoticeOutcome::Failed`.

mod days;
mod message;
mod watermark;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::error_handling::NotificationError;
use crate::proxy::{Forward, ProxyRequest};
use crate::settings::{NotificationSettings, SettingsResolver};

pub use days::{days_between, days_since_update, RecordTimestamps};
pub use message::{build_notice_url, notice_text};
pub use watermark::NoticeWatermark;

/// What a staleness check did.
#[derive(Debug)]
pub enum NoticeOutcome {
    /// Notifications are switched off; nothing was computed or sent.
    Disabled,
    /// The record is younger than the notice threshold.
    Fresh {
        /// Days since the last update
        days: u32,
        /// Threshold in effect
        notice_days: u32,
    },
    /// Already notified today and `oncePerDay` is set.
    Suppressed {
        /// Days since the last update
        days: u32,
    },
    /// The webhook accepted the notice.
    Sent {
        /// Days since the last update
        days: u32,
    },
    /// The notice was due but could not be delivered.
    Failed {
        /// Days since the last update
        days: u32,
        /// Why delivery failed, with credentials removed
        error: NotificationError,
    },
}

impl NoticeOutcome {
    /// Wire name of the outcome.
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeOutcome::Disabled => "disabled",
            NoticeOutcome::Fresh { .. } => "fresh",
            NoticeOutcome::Suppressed { .. } => "suppressed",
            NoticeOutcome::Sent { .. } => "sent",
            NoticeOutcome::Failed { .. } => "failed",
        }
    }

    /// Days since the last update, when they were computed.
    pub fn days(&self) -> Option<u32> {
        match self {
            NoticeOutcome::Disabled => None,
            NoticeOutcome::Fresh { days, .. }
            | NoticeOutcome::Suppressed { days }
            | NoticeOutcome::Sent { days }
            | NoticeOutcome::Failed { days, .. } => Some(*days),
        }
    }
}

/// Checks records for staleness and sends reminders.
pub struct StalenessNotifier<F: Forward> {
    settings: Arc<SettingsResolver>,
    forwarder: F,
    watermark: NoticeWatermark,
}

impl<F: Forward> StalenessNotifier<F> {
    /// Creates a notifier with an empty watermark.
    pub fn new(settings: Arc<SettingsResolver>, forwarder: F) -> Self {
        Self {
            settings,
            forwarder,
            watermark: NoticeWatermark::new(),
        }
    }

    /// Checks one record against the current time.
    pub async fn check_and_notify(
        &self,
        record_id: &str,
        timestamps: &RecordTimestamps,
    ) -> NoticeOutcome {
        self.check_and_notify_at(record_id, timestamps, Utc::now())
            .await
    }

    /// Checks one record as seen at `now`.
    pub async fn check_and_notify_at(
        &self,
        record_id: &str,
        timestamps: &RecordTimestamps,
        now: DateTime<Utc>,
    ) -> NoticeOutcome {
        let settings = self.settings.notification().await;
        if !settings.enabled {
            debug!("Notifications disabled, skipping record {record_id}");
            return NoticeOutcome::Disabled;
        }

        let days = days_since_update(timestamps, now);
        if days < settings.notice_days {
            debug!(
                "Record {record_id} updated {days} day(s) ago, threshold is {}",
                settings.notice_days
            );
            return NoticeOutcome::Fresh {
                days,
                notice_days: settings.notice_days,
            };
        }

        let today = now.date_naive();
        if settings.once_per_day && self.watermark.sent_on(record_id, today) {
            info!("Record {record_id} already notified on {today}, not sending again");
            return NoticeOutcome::Suppressed { days };
        }

        match self.send(&settings, record_id, days).await {
            Ok(()) => {
                if settings.once_per_day {
                    self.watermark.mark_sent(record_id, today);
                }
                info!("Sent staleness notice for record {record_id} ({days} days)");
                NoticeOutcome::Sent { days }
            }
            Err(error) => {
                warn!("Staleness notice for record {record_id} failed: {error}");
                NoticeOutcome::Failed { days, error }
            }
        }
    }

    async fn send(
        &self,
        settings: &NotificationSettings,
        record_id: &str,
        days: u32,
    ) -> Result<(), NotificationError> {
        let url = build_notice_url(settings, record_id, days)?;
        // The webhook URL carries the messaging key and recipient in its query
        let request = ProxyRequest::get(url.as_str()).map_err(|e| e.redacted())?;
        let response = self
            .forwarder
            .forward(request)
            .await
            .map_err(|e| e.redacted())?;
        if !response.status.is_success() {
            return Err(NotificationError::Rejected {
                status: response.status,
            });
        }
        Ok(())
    }
}
