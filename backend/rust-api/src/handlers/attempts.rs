use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

use crate::{
    error::ApiError,
    extractors::AppJson,
    metrics::QUIZ_ATTEMPTS_RECORDED_TOTAL,
    models::{NewQuizAttempt, QuizAttemptRecord},
    services::AppState,
};

/// POST /api/v1/quiz-attempts
pub async fn record_attempt(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<NewQuizAttempt>,
) -> Result<(StatusCode, Json<QuizAttemptRecord>), ApiError> {
    req.validate()?;

    let record = req.into_record(Utc::now());
    let stored = state.store.record_attempt(record).await?;

    QUIZ_ATTEMPTS_RECORDED_TOTAL
        .with_label_values(&[stored.mode.as_str()])
        .inc();

    tracing::info!(
        user_id = stored.user_id,
        book_id = stored.book_id,
        mode = stored.mode.as_str(),
        "Quiz attempt recorded"
    );

    Ok((StatusCode::CREATED, Json(stored)))
}
