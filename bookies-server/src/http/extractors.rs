//! Custom Axum extractors
//!
//! Each extractor validates its input and rejects with [`ApiError`], so a
//! handler only ever sees well-formed ids, pages and payloads.

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde_json::Value;

use super::error::ApiError;
use crate::models::{
    parse_id, FromPayload, Pagination, PaginationError, PaginationParams, Rule, ValidationErrors,
};

/// Extract and validate a positive integer `{id}` from the path
#[derive(Debug, Clone, Copy)]
pub struct ValidId(pub i64);

impl<S> FromRequestParts<S> for ValidId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ValidationErrors::single("id", Rule::Required, Value::Null))?;

        Ok(Self(parse_id(&id)?))
    }
}

/// Extract `page`/`limit` from the query string, applying defaults and bounds
#[derive(Debug, Clone, Copy)]
pub struct PageQuery(pub Pagination);

impl<S> FromRequestParts<S> for PageQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params): Query<PaginationParams> = Query::from_request_parts(parts, state)
            .await
            .map_err(|_| PaginationError::Page)?;

        Ok(Self(Pagination::try_from(params)?))
    }
}

/// Extract a JSON object body and validate it into `T`
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: FromPayload,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body): Json<Value> = Json::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!(%rejection, "rejected request body");
            ValidationErrors::single("body", Rule::Type, Value::Null)
        })?;

        let Some(object) = body.as_object() else {
            return Err(ValidationErrors::single("body", Rule::Type, body).into());
        };

        Ok(Self(T::from_payload(object)?))
    }
}
