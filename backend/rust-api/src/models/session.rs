use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::attempt::{QuizAttemptRecord, QuizMode};

/// `round(correct / total * 100)`, with an empty total guarded to 0.
pub fn rounded_percentage(correct: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    (correct as f64 / total as f64 * 100.0).round() as i64
}

/// A run of attempts on one book that happened close together in time.
/// Derived on every request, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSession {
    pub book_id: i64,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub total_correct: i64,
    pub total_total: i64,
    pub percentage: i64,
    pub mode: QuizMode,
    pub attempt_count: usize,
}

impl QuizSession {
    /// Empty session anchored at the record's timestamp; the caller absorbs
    /// the record next.
    pub(crate) fn open(record: &QuizAttemptRecord) -> Self {
        let at = record.occurred_at();
        Self {
            book_id: record.book_id,
            start_at: at,
            end_at: at,
            total_correct: 0,
            total_total: 0,
            percentage: 0,
            mode: record.mode,
            attempt_count: 0,
        }
    }

    pub(crate) fn absorb(&mut self, record: &QuizAttemptRecord) {
        let at = record.occurred_at();
        if at > self.end_at {
            self.end_at = at;
        }

        let (correct, total) = record.counted_scores();
        self.total_correct = self.total_correct.saturating_add(correct);
        self.total_total = self.total_total.saturating_add(total);
        self.percentage = rounded_percentage(self.total_correct, self.total_total);
        self.mode = self.mode.escalate(record.mode);
        self.attempt_count += 1;
    }
}
