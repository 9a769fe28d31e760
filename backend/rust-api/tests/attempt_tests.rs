use axum::http::StatusCode;
use serde_json::json;
use storybook_api::services::store::InMemoryLearningStore;

mod common;

#[tokio::test]
async fn test_record_attempt_fills_defaults() {
    let app = common::create_test_app(InMemoryLearningStore::new());

    let (status, json) = common::post_json(
        &app,
        "/api/v1/quiz-attempts",
        json!({
            "userId": 3,
            "bookId": 11,
            "pageId": 2,
            "scoreCorrect": 2,
            "scoreTotal": 3,
            "mode": "straight",
            "attemptNumber": 1,
            "durationSec": 48
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(json["id"].is_string());
    assert_eq!(json["percentage"], 67.0);
    assert_eq!(json["mode"], "straight");
    assert!(json["createdAt"].is_string());
}

#[tokio::test]
async fn test_recorded_attempts_show_up_in_progress() {
    let app = common::create_test_app(InMemoryLearningStore::new());

    for (correct, at) in [(3, "2024-06-01T10:00:00Z"), (4, "2024-06-01T10:00:30Z")] {
        let (status, _) = common::post_json(
            &app,
            "/api/v1/quiz-attempts",
            json!({
                "userId": 1, "bookId": 1, "scoreCorrect": correct, "scoreTotal": 5,
                "createdAt": at
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, json) = common::get_json(&app, "/api/v1/students/1/books/1/sessions").await;
    let sessions = json["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["totalCorrect"], 7);
    assert_eq!(sessions[0]["totalTotal"], 10);
    assert_eq!(sessions[0]["percentage"], 70);
    assert_eq!(sessions[0]["startAt"], "2024-06-01T10:00:00Z");
    assert_eq!(sessions[0]["endAt"], "2024-06-01T10:00:30Z");
}

#[tokio::test]
async fn test_record_attempt_rejects_impossible_scores() {
    let app = common::create_test_app(InMemoryLearningStore::new());

    let (status, json) = common::post_json(
        &app,
        "/api/v1/quiz-attempts",
        json!({ "userId": 1, "bookId": 1, "scoreCorrect": 6, "scoreTotal": 5 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
    assert!(json["message"]
        .as_str()
        .unwrap()
        .contains("scoreCorrect cannot exceed scoreTotal"));
}

#[tokio::test]
async fn test_record_attempt_rejects_bad_ids_and_percentage() {
    let app = common::create_test_app(InMemoryLearningStore::new());

    let (status, _) = common::post_json(
        &app,
        "/api/v1/quiz-attempts",
        json!({ "userId": 0, "bookId": 1, "scoreCorrect": 1, "scoreTotal": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = common::post_json(
        &app,
        "/api/v1/quiz-attempts",
        json!({ "userId": 1, "bookId": 1, "scoreCorrect": 1, "scoreTotal": 1, "percentage": 140 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_record_attempt_rejects_oversized_scores() {
    let app = common::create_test_app(InMemoryLearningStore::new());

    let (status, json) = common::post_json(
        &app,
        "/api/v1/quiz-attempts",
        json!({ "userId": 1, "bookId": 1, "scoreCorrect": 1, "scoreTotal": i64::MAX }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["message"]
        .as_str()
        .unwrap()
        .contains("scoreTotal must be within 0..=1000"));

    let (status, json) = common::get_json(&app, "/api/v1/students/1/progress").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["totalSessions"], 0);
}

#[tokio::test]
async fn test_record_attempt_rejects_malformed_json() {
    let app = common::create_test_app(InMemoryLearningStore::new());

    let (status, json) = common::post_json(
        &app,
        "/api/v1/quiz-attempts",
        json!({ "userId": "one", "bookId": 1 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["message"]
        .as_str()
        .unwrap()
        .starts_with("Failed to parse JSON request body"));
}
