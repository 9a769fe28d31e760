use std::sync::Arc;

use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use services::AppState;

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(tower_http::cors::Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/metrics",
            get(handlers::metrics_handler).layer(middleware::from_fn_with_state(
                app_state.clone(),
                handlers::metrics_auth_middleware,
            )),
        )
        .nest("/api/v1", api_routes().layer(cors))
        .fallback(handlers::route_not_found)
        .with_state(app_state)
        .layer(middleware::from_fn(
            middlewares::metrics::metrics_middleware,
        ))
        .layer(middleware::from_fn(
            middlewares::request_id::request_id_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Student dashboard
        .route(
            "/students/{user_id}/progress",
            get(handlers::students::get_progress),
        )
        .route(
            "/students/{user_id}/books/{book_id}/sessions",
            get(handlers::students::get_book_sessions),
        )
        .route(
            "/students/{user_id}/badges",
            get(handlers::students::list_badges),
        )
        // Quiz submissions
        .route("/quiz-attempts", post(handlers::attempts::record_attempt))
        // Teacher library
        .route("/teacher/books", get(handlers::teacher::list_books))
}
