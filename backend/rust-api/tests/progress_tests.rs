use axum::http::StatusCode;
use storybook_api::{config::Config, models::QuizMode, services::store::InMemoryLearningStore};

mod common;
use common::{attempt, T0};

#[tokio::test]
async fn test_progress_groups_close_attempts_into_one_session() {
    let store = InMemoryLearningStore::new().with_attempts(vec![
        attempt(1, 1, T0, 3, 5),
        attempt(1, 1, T0 + 30_000, 4, 5),
    ]);
    let app = common::create_test_app(store);

    let (status, json) = common::get_json(&app, "/api/v1/students/1/progress").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["userId"], 1);
    assert_eq!(json["totalSessions"], 1);
    assert_eq!(json["overallAverage"], 70);

    let book = &json["books"][0];
    assert_eq!(book["bookId"], 1);
    assert_eq!(book["sessionCount"], 1);
    assert_eq!(book["attemptCount"], 2);
    assert_eq!(book["latestSession"]["totalCorrect"], 7);
    assert_eq!(book["latestSession"]["totalTotal"], 10);
    assert_eq!(book["latestSession"]["percentage"], 70);
    assert_eq!(book["latestSession"]["mode"], "retry");
    assert_eq!(book["latestAttempt"]["scoreCorrect"], 4);
}

#[tokio::test]
async fn test_progress_without_attempts_reports_no_data() {
    let app = common::create_test_app(InMemoryLearningStore::new());

    let (status, json) = common::get_json(&app, "/api/v1/students/42/progress").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["books"].as_array().unwrap().len(), 0);
    assert_eq!(json["totalSessions"], 0);
    assert!(json["overallAverage"].is_null());
}

#[tokio::test]
async fn test_progress_ignores_other_students() {
    let store = InMemoryLearningStore::new().with_attempts(vec![
        attempt(1, 1, T0, 1, 1),
        attempt(2, 1, T0 + 1_000, 0, 1),
        attempt(2, 3, T0 + 2_000, 0, 1),
    ]);
    let app = common::create_test_app(store);

    let (_, json) = common::get_json(&app, "/api/v1/students/1/progress").await;
    assert_eq!(json["totalSessions"], 1);
    assert_eq!(json["overallAverage"], 100);
}

#[tokio::test]
async fn test_book_sessions_split_on_gap_and_report_latest() {
    let mut late = attempt(5, 8, T0 + 121_000, 2, 2);
    late.mode = QuizMode::Straight;
    let store = InMemoryLearningStore::new().with_attempts(vec![
        late,
        attempt(5, 8, T0, 0, 2),
        attempt(5, 9, T0, 2, 2),
    ]);
    let app = common::create_test_app(store);

    let (status, json) = common::get_json(&app, "/api/v1/students/5/books/8/sessions").await;
    assert_eq!(status, StatusCode::OK);

    let sessions = json["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0]["percentage"], 0);
    assert_eq!(sessions[0]["mode"], "retry");
    assert_eq!(sessions[1]["percentage"], 100);
    assert_eq!(sessions[1]["mode"], "straight");
    assert_eq!(json["latest"], sessions[1]);
    assert_eq!(json["averagePercentage"], 50);
}

#[tokio::test]
async fn test_book_sessions_for_untouched_book_are_empty() {
    let store = InMemoryLearningStore::new().with_attempts(vec![attempt(5, 8, T0, 1, 2)]);
    let app = common::create_test_app(store);

    let (status, json) = common::get_json(&app, "/api/v1/students/5/books/99/sessions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["sessions"].as_array().unwrap().len(), 0);
    assert!(json["latest"].is_null());
    assert!(json["averagePercentage"].is_null());
}

#[tokio::test]
async fn test_configured_gap_is_used() {
    let store = InMemoryLearningStore::new().with_attempts(vec![
        attempt(1, 1, T0, 1, 1),
        attempt(1, 1, T0 + 100_000, 1, 1),
    ]);
    let config = Config {
        session_gap_seconds: 60,
        ..Config::default()
    };
    let app = common::create_test_app_with_config(config, store);

    let (_, json) = common::get_json(&app, "/api/v1/students/1/books/1/sessions").await;
    assert_eq!(json["sessions"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_progress_is_idempotent() {
    let store = InMemoryLearningStore::new().with_attempts(vec![
        attempt(1, 1, T0, 1, 3),
        attempt(1, 2, T0 + 50_000, 2, 3),
        attempt(1, 1, T0 + 900_000, 3, 3),
    ]);
    let app = common::create_test_app(store);

    let (_, first) = common::get_json(&app, "/api/v1/students/1/progress").await;
    let (_, second) = common::get_json(&app, "/api/v1/students/1/progress").await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_non_numeric_student_id_is_rejected() {
    let app = common::create_test_app(InMemoryLearningStore::new());

    let (status, json) = common::get_json(&app, "/api/v1/students/abc/progress").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
    assert!(json["message"].as_str().unwrap().contains("abc"));

    let (status, json) = common::get_json(&app, "/api/v1/students/1/books/nope/sessions").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn test_unknown_route_returns_json_not_found() {
    let app = common::create_test_app(InMemoryLearningStore::new());

    let (status, json) = common::get_json(&app, "/api/v1/students").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
    assert_eq!(json["message"], "No route for /api/v1/students");
}

#[tokio::test]
async fn test_latest_attempt_without_stored_percentage_is_derived() {
    let store = InMemoryLearningStore::new().with_attempts(vec![attempt(1, 4, T0, 1, 3)]);
    let app = common::create_test_app(store);

    let (_, json) = common::get_json(&app, "/api/v1/students/1/progress").await;
    assert_eq!(json["books"][0]["latestAttempt"]["percentage"], 33.0);
}

#[tokio::test]
async fn test_oversized_stored_scores_do_not_break_progress() {
    let store = InMemoryLearningStore::new().with_attempts(vec![
        attempt(1, 1, T0, 1, i64::MAX),
        attempt(1, 1, T0 + 30_000, 1, i64::MAX),
    ]);
    let app = common::create_test_app(store);

    let (status, json) = common::get_json(&app, "/api/v1/students/1/progress").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["totalSessions"], 1);
    assert_eq!(json["books"][0]["latestSession"]["totalTotal"], i64::MAX);
    assert_eq!(json["books"][0]["latestSession"]["percentage"], 0);
}
