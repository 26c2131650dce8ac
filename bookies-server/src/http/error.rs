//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.
//! Store errors reach this module already classified by [`DbError`]; the
//! resource they concern decides the final status and message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;
use crate::models::{PaginationError, ValidationErrors};

/// Opaque message for every 500 response
const INTERNAL_MESSAGE: &str = "oops, we made a mistake";

/// Entity a request operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Author,
    Book,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Book => "book",
        }
    }
}

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Payload or path failed validation (422)
    Validation(ValidationErrors),

    /// page/limit query rejected (422)
    Pagination(PaginationError),

    /// Resource not found (404)
    NotFound { resource: Resource },

    /// Unique constraint or dependent rows (409)
    Conflict { message: &'static str },

    /// Referenced row does not exist (422)
    UnknownReference { message: &'static str },

    /// Anything else from the store (500, logged)
    Database(DbError),
}

impl ApiError {
    /// Translate a classified store error for the given resource.
    ///
    /// This is the only place store failures become HTTP semantics.
    pub fn from_db(resource: Resource, err: DbError) -> Self {
        match (resource, err) {
            (_, DbError::NotFound { .. }) => Self::NotFound { resource },
            (Resource::Author, DbError::UniqueViolation { .. }) => Self::Conflict {
                message: "email already registered",
            },
            (Resource::Book, DbError::UniqueViolation { .. }) => Self::Conflict {
                message: "book already exists",
            },
            (Resource::Author, DbError::ForeignKeyViolation { .. }) => Self::Conflict {
                message: "author still has books",
            },
            (Resource::Book, DbError::ForeignKeyViolation { .. }) => Self::UnknownReference {
                message: "unknown author",
            },
            (_, err) => Self::Database(err),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Pagination(_) | Self::UnknownReference { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Validation(errors) => json!({
                "msg": "validation failed",
                "errors": errors
            }),
            Self::Pagination(e) => json!({ "msg": e.to_string() }),
            Self::NotFound { resource } => json!({
                "msg": format!("{} not found", resource.as_str())
            }),
            Self::Conflict { message } | Self::UnknownReference { message } => {
                json!({ "msg": message })
            }
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!(error = %e, "database error");
                json!({ "msg": INTERNAL_MESSAGE })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(e: ValidationErrors) -> Self {
        Self::Validation(e)
    }
}

impl From<PaginationError> for ApiError {
    fn from(e: PaginationError) -> Self {
        Self::Pagination(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rule;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_is_422_with_fields() {
        let err = ApiError::Validation(ValidationErrors::single(
            "name",
            Rule::ValidName,
            json!("R2D2"),
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["msg"], "validation failed");
        assert_eq!(body["errors"][0]["field"], "name");
        assert_eq!(body["errors"][0]["message"], "invalid name (digit is not allowed)");
        assert_eq!(body["errors"][0]["value"], "R2D2");
    }

    #[tokio::test]
    async fn not_found_names_the_resource() {
        let err = ApiError::from_db(
            Resource::Book,
            DbError::NotFound {
                resource: "book",
                id: 4,
            },
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["msg"], "book not found");
    }

    #[tokio::test]
    async fn duplicate_email_is_409() {
        let err = ApiError::from_db(
            Resource::Author,
            DbError::UniqueViolation {
                constraint: "authors_email_key".into(),
            },
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["msg"], "email already registered");
    }

    #[tokio::test]
    async fn missing_author_reference_is_422() {
        let err = ApiError::from_db(
            Resource::Book,
            DbError::ForeignKeyViolation {
                constraint: "books_author_id_fkey".into(),
            },
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["msg"], "unknown author");
    }

    #[tokio::test]
    async fn author_with_books_is_409() {
        let err = ApiError::from_db(
            Resource::Author,
            DbError::ForeignKeyViolation {
                constraint: "books_author_id_fkey".into(),
            },
        );
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn store_failures_are_opaque_500s() {
        let err = ApiError::from_db(
            Resource::Author,
            DbError::UnexpectedRowCount {
                expected: 1,
                actual: 2,
            },
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["msg"], "oops, we made a mistake");

        let err = ApiError::from_db(Resource::Book, DbError::from(sqlx::Error::PoolTimedOut));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn pagination_error_is_422() {
        let response = ApiError::from(PaginationError::Limit).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_json(response).await["msg"],
            "limit parameter should be number and between 5 and 100"
        );
    }
}
