use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::ApiError,
    models::{Book, BookFilterQuery},
    services::{book_filter, AppState},
};

#[derive(Debug, Serialize)]
pub struct BookListResponse {
    pub books: Vec<Book>,
    pub total: usize,
}

/// GET /api/v1/teacher/books?grade=&subject=&q=
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BookFilterQuery>,
) -> Result<Json<BookListResponse>, ApiError> {
    let library = state.store.list_books().await?;
    let library_size = library.len();
    let books = book_filter::filter_books(library, &query);

    tracing::debug!(
        "Filtered {} of {} books (grade={:?}, subject={:?})",
        books.len(),
        library_size,
        query.grade,
        query.subject
    );

    Ok(Json(BookListResponse {
        total: books.len(),
        books,
    }))
}
