//! Calendar-day staleness arithmetic.
//!
//! Staleness counts UTC calendar dates, not 24-hour periods: a record
//! updated at 23:59 is one day old at 00:01 the next day.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Creation and last-update instants of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordTimestamps {
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// Last update, absent for never-updated records
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RecordTimestamps {
    /// The last update, or the creation time for never-updated records.
    pub fn last_touched(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }
}

/// Absolute number of calendar days between the UTC dates of `a` and `b`.
pub fn days_between(a: DateTime<Utc>, b: DateTime<Utc>) -> u32 {
    let days = (b.date_naive() - a.date_naive()).num_days().unsigned_abs();
    u32::try_from(days).unwrap_or(u32::MAX)
}

/// Days since the record was last touched, as seen at `now`.
pub fn days_since_update(timestamps: &RecordTimestamps, now: DateTime<Utc>) -> u32 {
    days_between(timestamps.last_touched(), now)
}
