//! Author endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::db::repos::{Author, AuthorRepo, Book, BookRepo};
use crate::http::error::{ApiError, Resource};
use crate::http::extractors::{PageQuery, ValidId, ValidJson};
use crate::http::server::AppState;
use crate::models::{AuthorInput, Paginated};

fn author_error(err: crate::db::DbError) -> ApiError {
    ApiError::from_db(Resource::Author, err)
}

/// GET /authors - list authors, newest first
async fn list_authors(
    State(state): State<Arc<AppState>>,
    PageQuery(page): PageQuery,
) -> Result<Json<Paginated<Author>>, ApiError> {
    let authors = AuthorRepo::new(state.pool.inner())
        .fetch(page)
        .await
        .map_err(author_error)?;
    Ok(Json(authors))
}

/// POST /authors - create an author
async fn create_author(
    State(state): State<Arc<AppState>>,
    ValidJson(input): ValidJson<AuthorInput>,
) -> Result<Json<Author>, ApiError> {
    let author = AuthorRepo::new(state.pool.inner())
        .insert(&input)
        .await
        .map_err(author_error)?;

    tracing::info!(author_id = author.id, "author created");
    Ok(Json(author))
}

/// GET /authors/{id}
async fn get_author(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Author>, ApiError> {
    let author = AuthorRepo::new(state.pool.inner())
        .detail(id)
        .await
        .map_err(author_error)?;
    Ok(Json(author))
}

/// PUT /authors/{id} - replace all fields
async fn update_author(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(input): ValidJson<AuthorInput>,
) -> Result<Json<Author>, ApiError> {
    let author = AuthorRepo::new(state.pool.inner())
        .update(id, &input)
        .await
        .map_err(author_error)?;
    Ok(Json(author))
}

/// DELETE /authors/{id}
async fn delete_author(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Value>, ApiError> {
    let author = AuthorRepo::new(state.pool.inner())
        .delete(id)
        .await
        .map_err(author_error)?;

    tracing::info!(author_id = author.id, "author removed");
    Ok(Json(json!({ "msg": "Author Removed" })))
}

/// GET /authors/{id}/books - books of one author, newest first
///
/// An unknown author simply has no books.
async fn list_author_books(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    PageQuery(page): PageQuery,
) -> Result<Json<Paginated<Book>>, ApiError> {
    let books = BookRepo::new(state.pool.inner())
        .fetch(page, Some(id))
        .await
        .map_err(|e| ApiError::from_db(Resource::Book, e))?;
    Ok(Json(books))
}

/// Author routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/authors", get(list_authors).post(create_author))
        .route(
            "/authors/{id}",
            get(get_author).put(update_author).delete(delete_author),
        )
        .route("/authors/{id}/books", get(list_author_books))
}
