use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};
use tracing::info;

use crate::db::Database;
use crate::error::HandlerError;
use crate::id::{self, ID_LENGTH};
use crate::model::Book;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db: Arc::new(db) }
    }
}

pub async fn healthcheck() -> impl IntoResponse {
    info!("got healthcheck request");
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn list_books(State(state): State<AppState>) -> Json<Vec<Book>> {
    let books = state.db.all().await;
    tracing::debug!(count = books.len(), "got books");
    Json(books)
}

pub async fn get_book(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.db.find(&id).await {
        Some(book) => (StatusCode::OK, Json(book)).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Stores `{ id, ...payload }`. A payload `id` wins over the generated one.
pub async fn create_book(
    State(state): State<AppState>,
    Json(payload): Json<Map<String, Value>>,
) -> Result<Json<Book>, HandlerError> {
    let book = Book::new(id::generate(ID_LENGTH), payload);
    let book = state.db.push(book).await?;

    info!(id = ?book.id(), "created book");
    Ok(Json(book))
}

/// Merges `payload` into the book, then answers with whatever the requested
/// path id resolves to afterwards. That is nothing when the book was absent
/// or the payload changed its id, and the status stays 200 either way.
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<Map<String, Value>>,
) -> Result<Response, HandlerError> {
    state.db.assign(&id, &payload).await?;

    let response = match state.db.find(&id).await {
        Some(book) => (StatusCode::OK, Json(book)).into_response(),
        None => StatusCode::OK.into_response(),
    };
    Ok(response)
}

pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, HandlerError> {
    let removed = state.db.remove(&id).await?;

    info!(id = %id, removed, "deleted book");
    Ok(StatusCode::OK)
}
