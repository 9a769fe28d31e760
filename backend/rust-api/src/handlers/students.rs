use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    error::ApiError,
    extractors::AppPath,
    metrics::QUIZ_SESSIONS_PER_REQUEST,
    models::{BadgeView, BookSessions, ProgressOverview},
    services::{badges, progress, AppState},
};

/// GET /api/v1/students/{user_id}/progress
pub async fn get_progress(
    State(state): State<Arc<AppState>>,
    AppPath(user_id): AppPath<i64>,
) -> Result<Json<ProgressOverview>, ApiError> {
    let attempts = state.store.attempts_for_user(user_id).await?;
    let overview = progress::build_overview(&attempts, user_id, state.session_gap());

    QUIZ_SESSIONS_PER_REQUEST.observe(overview.total_sessions as f64);
    tracing::info!(
        user_id,
        attempts = attempts.len(),
        sessions = overview.total_sessions,
        "Built progress overview"
    );

    Ok(Json(overview))
}

/// GET /api/v1/students/{user_id}/books/{book_id}/sessions
pub async fn get_book_sessions(
    State(state): State<Arc<AppState>>,
    AppPath((user_id, book_id)): AppPath<(i64, i64)>,
) -> Result<Json<BookSessions>, ApiError> {
    let attempts = state.store.attempts_for_user(user_id).await?;
    let view = progress::book_sessions(&attempts, user_id, book_id, state.session_gap());

    QUIZ_SESSIONS_PER_REQUEST.observe(view.sessions.len() as f64);
    tracing::debug!(user_id, book_id, sessions = view.sessions.len(), "Grouped book sessions");

    Ok(Json(view))
}

/// GET /api/v1/students/{user_id}/badges
pub async fn list_badges(
    State(state): State<Arc<AppState>>,
    AppPath(user_id): AppPath<i64>,
) -> Result<Json<Vec<BadgeView>>, ApiError> {
    let earned = state.store.badges_for_user(user_id).await?;
    Ok(Json(badges::badge_shelf(earned)))
}
