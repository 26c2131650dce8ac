//! Book endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::db::repos::{Book, BookRepo};
use crate::http::error::{ApiError, Resource};
use crate::http::extractors::{PageQuery, ValidId, ValidJson};
use crate::http::server::AppState;
use crate::models::{BookInput, Paginated};

fn book_error(err: crate::db::DbError) -> ApiError {
    ApiError::from_db(Resource::Book, err)
}

/// GET /books - list books with their authors, newest first
async fn list_books(
    State(state): State<Arc<AppState>>,
    PageQuery(page): PageQuery,
) -> Result<Json<Paginated<Book>>, ApiError> {
    let books = BookRepo::new(state.pool.inner())
        .fetch(page, None)
        .await
        .map_err(book_error)?;
    Ok(Json(books))
}

/// POST /books - create a book for an existing author
async fn create_book(
    State(state): State<Arc<AppState>>,
    ValidJson(input): ValidJson<BookInput>,
) -> Result<Json<Book>, ApiError> {
    let book = BookRepo::new(state.pool.inner())
        .insert(&input)
        .await
        .map_err(book_error)?;

    tracing::info!(book_id = book.id, author_id = book.author.id, "book created");
    Ok(Json(book))
}

/// GET /books/{id}
async fn get_book(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Book>, ApiError> {
    let book = BookRepo::new(state.pool.inner())
        .detail(id)
        .await
        .map_err(book_error)?;
    Ok(Json(book))
}

/// PUT /books/{id} - replace all fields
async fn update_book(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(input): ValidJson<BookInput>,
) -> Result<Json<Book>, ApiError> {
    let book = BookRepo::new(state.pool.inner())
        .update(id, &input)
        .await
        .map_err(book_error)?;
    Ok(Json(book))
}

/// DELETE /books/{id}
async fn delete_book(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Value>, ApiError> {
    let book = BookRepo::new(state.pool.inner())
        .delete(id)
        .await
        .map_err(book_error)?;

    tracing::info!(book_id = book.id, title = %book.title, "book removed");
    Ok(Json(json!({ "msg": "Book Removed" })))
}

/// Book routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/books", get(list_books).post(create_book))
        .route(
            "/books/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
}
