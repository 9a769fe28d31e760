use serde::{Deserialize, Serialize};

use super::{attempt::QuizAttemptRecord, session::QuizSession};

/// Per-book row of the student progress view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookProgress {
    pub book_id: i64,
    pub session_count: usize,
    pub attempt_count: usize,
    /// `None` renders as a placeholder, not as 0%.
    pub average_percentage: Option<i64>,
    pub latest_session: Option<QuizSession>,
    pub latest_attempt: Option<QuizAttemptRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressOverview {
    pub user_id: i64,
    pub books: Vec<BookProgress>,
    pub overall_average: Option<i64>,
    pub total_sessions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSessions {
    pub user_id: i64,
    pub book_id: i64,
    pub sessions: Vec<QuizSession>,
    pub latest: Option<QuizSession>,
    pub average_percentage: Option<i64>,
}
