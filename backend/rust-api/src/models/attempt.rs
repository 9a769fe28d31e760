use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

use super::session::rounded_percentage;
use crate::utils::{lenient, time::millis_or_epoch};

/// Quiz retry policy. A `straight` quiz is a single pass; `retry` lets the
/// student re-answer questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizMode {
    #[default]
    Retry,
    Straight,
}

impl QuizMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuizMode::Retry => "retry",
            QuizMode::Straight => "straight",
        }
    }

    /// Unknown or missing tags fall back to `retry`.
    pub fn parse_lenient(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("straight") {
            QuizMode::Straight
        } else {
            QuizMode::Retry
        }
    }

    /// Straight wins over retry and never downgrades.
    pub fn escalate(self, other: QuizMode) -> QuizMode {
        if self == QuizMode::Straight || other == QuizMode::Straight {
            QuizMode::Straight
        } else {
            QuizMode::Retry
        }
    }
}

impl<'de> Deserialize<'de> for QuizMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(value
            .as_str()
            .map(QuizMode::parse_lenient)
            .unwrap_or_default())
    }
}

/// One submitted quiz, as stored by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttemptRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(alias = "user_id", default, deserialize_with = "lenient::i64_or_zero")]
    pub user_id: i64,
    #[serde(alias = "book_id", default, deserialize_with = "lenient::i64_or_zero")]
    pub book_id: i64,
    #[serde(alias = "page_id", default, deserialize_with = "lenient::opt_i64")]
    pub page_id: Option<i64>,
    #[serde(alias = "score_correct", default, deserialize_with = "lenient::i64_or_zero")]
    pub score_correct: i64,
    #[serde(alias = "score_total", default, deserialize_with = "lenient::i64_or_zero")]
    pub score_total: i64,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub percentage: Option<f64>,
    #[serde(default)]
    pub mode: QuizMode,
    #[serde(alias = "attempt_number", default, deserialize_with = "lenient::opt_i64")]
    pub attempt_number: Option<i64>,
    #[serde(alias = "duration_sec", default, deserialize_with = "lenient::opt_i64")]
    pub duration_sec: Option<i64>,
    #[serde(alias = "created_at", default, deserialize_with = "lenient::opt_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl QuizAttemptRecord {
    pub fn occurred_at_millis(&self) -> i64 {
        millis_or_epoch(self.created_at)
    }

    /// Submission time; rows without one sort as the epoch.
    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.created_at.unwrap_or_default()
    }

    /// Correct/total pair as it counts towards a session. Rows with no
    /// questions contribute nothing.
    pub fn counted_scores(&self) -> (i64, i64) {
        if self.score_total <= 0 {
            (0, 0)
        } else {
            (self.score_correct.max(0), self.score_total)
        }
    }

    /// Stored percentage when the row has one, otherwise derived from the scores.
    pub fn effective_percentage(&self) -> i64 {
        match self.percentage {
            Some(stored) => stored.round() as i64,
            None => rounded_percentage(self.score_correct, self.score_total),
        }
    }

    /// Copy with `percentage` resolved, for views that show the attempt itself.
    pub fn with_effective_percentage(mut self) -> Self {
        self.percentage = Some(self.effective_percentage() as f64);
        self
    }
}

/// Body of `POST /api/v1/quiz-attempts`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_score_bounds"))]
pub struct NewQuizAttempt {
    #[validate(range(min = 1, message = "userId must be a positive id"))]
    pub user_id: i64,
    #[validate(range(min = 1, message = "bookId must be a positive id"))]
    pub book_id: i64,
    #[validate(range(min = 1, message = "pageId must be a positive id"))]
    pub page_id: Option<i64>,
    #[validate(range(min = 0, max = 1000, message = "scoreCorrect must be within 0..=1000"))]
    pub score_correct: i64,
    #[validate(range(min = 0, max = 1000, message = "scoreTotal must be within 0..=1000"))]
    pub score_total: i64,
    #[validate(range(min = 0.0, max = 100.0, message = "percentage must be within 0..=100"))]
    pub percentage: Option<f64>,
    #[serde(default)]
    pub mode: QuizMode,
    #[validate(range(min = 1, message = "attemptNumber starts at 1"))]
    pub attempt_number: Option<i64>,
    #[validate(range(min = 0, message = "durationSec cannot be negative"))]
    pub duration_sec: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
}

fn validate_score_bounds(attempt: &NewQuizAttempt) -> Result<(), ValidationError> {
    if attempt.score_correct > attempt.score_total {
        let mut error = ValidationError::new("score_bounds");
        error.message = Some("scoreCorrect cannot exceed scoreTotal".into());
        return Err(error);
    }
    Ok(())
}

impl NewQuizAttempt {
    pub fn into_record(self, now: DateTime<Utc>) -> QuizAttemptRecord {
        let percentage = self
            .percentage
            .unwrap_or_else(|| rounded_percentage(self.score_correct, self.score_total) as f64);

        QuizAttemptRecord {
            id: None,
            user_id: self.user_id,
            book_id: self.book_id,
            page_id: self.page_id,
            score_correct: self.score_correct,
            score_total: self.score_total,
            percentage: Some(percentage),
            mode: self.mode,
            attempt_number: self.attempt_number,
            duration_sec: self.duration_sec,
            created_at: Some(self.created_at.unwrap_or(now)),
        }
    }
}
