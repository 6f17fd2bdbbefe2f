//! Per-record notice watermark.
//!
//! Remembers the UTC date each record was last notified on so a record is
//! notified at most once per day when `oncePerDay` is enabled. Held in memory
//! only; a restart forgets it.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;

/// Last notice date per record id.
#[derive(Debug, Default)]
pub struct NoticeWatermark {
    sent: Mutex<HashMap<String, NaiveDate>>,
}

impl NoticeWatermark {
    /// Creates an empty watermark.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `record_id` was already notified on `today`.
    pub fn sent_on(&self, record_id: &str, today: NaiveDate) -> bool {
        let sent = self.sent.lock().unwrap_or_else(|e| e.into_inner());
        sent.get(record_id).is_some_and(|date| *date == today)
    }

    /// Records a successful notice.
    ///
    /// Entries from earlier days can no longer suppress anything and are
    /// dropped, so the map holds at most one day's worth of records.
    pub fn mark_sent(&self, record_id: &str, today: NaiveDate) {
        let mut sent = self.sent.lock().unwrap_or_else(|e| e.into_inner());
        sent.retain(|_, date| *date >= today);
        sent.insert(record_id.to_string(), today);
    }

    /// Number of records currently remembered.
    pub fn len(&self) -> usize {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether no record is remembered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
