#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use storybook_api::{
    config::Config,
    create_router,
    models::{QuizAttemptRecord, QuizMode},
    services::{store::InMemoryLearningStore, AppState},
};
use tower::ServiceExt;

pub const T0: i64 = 1_717_200_000_000;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn create_test_app(store: InMemoryLearningStore) -> Router {
    create_test_app_with_config(Config::default(), store)
}

pub fn create_test_app_with_config(config: Config, store: InMemoryLearningStore) -> Router {
    init_tracing();
    let app_state = Arc::new(AppState::new(config, Arc::new(store)));
    create_router(app_state)
}

pub fn attempt(user_id: i64, book_id: i64, at_ms: i64, correct: i64, total: i64) -> QuizAttemptRecord {
    QuizAttemptRecord {
        id: None,
        user_id,
        book_id,
        page_id: None,
        score_correct: correct,
        score_total: total,
        percentage: None,
        mode: QuizMode::Retry,
        attempt_number: None,
        duration_sec: None,
        created_at: DateTime::<Utc>::from_timestamp_millis(at_ms),
    }
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read_json(response).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    read_json(response).await
}

async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or_else(|_| {
        panic!(
            "non-JSON body with status {}: {}",
            status,
            String::from_utf8_lossy(&body)
        )
    });
    (status, json)
}
