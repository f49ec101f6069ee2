use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Hours a saved record stays valid after `timestamp`.
const FRESHNESS_WINDOW_HOURS: i64 = 24;

/// Persisted shape of an in-flight quiz.
///
/// This mirrors the session counters so stores can serialize the record
/// without leaking persistence concerns into the session itself. Field names
/// are part of the stored format and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub current_question_index: usize,
    pub score: u32,
    /// Absent in records written by older versions; restores as 0.
    #[serde(default)]
    pub first_attempt_correct: u32,
    /// Epoch milliseconds at save time.
    pub timestamp: i64,
}

impl ProgressRecord {
    #[must_use]
    pub fn new(
        current_question_index: usize,
        score: u32,
        first_attempt_correct: u32,
        saved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            current_question_index,
            score,
            first_attempt_correct,
            timestamp: saved_at.timestamp_millis(),
        }
    }

    /// The save time, if the stored millisecond timestamp is representable.
    #[must_use]
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// True while the record is within the freshness window of `now`.
    /// Unrepresentable timestamps are never fresh.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.saved_at()
            .is_some_and(|saved| now - saved < Duration::hours(FRESHNESS_WINDOW_HOURS))
    }
}
