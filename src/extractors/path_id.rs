use crate::error::AppError;
use crate::model::DbId;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

/// The `:id` path segment as a database id. Anything else is a 400.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntityId(pub DbId);

#[async_trait]
impl<S> FromRequestParts<S> for EntityId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::BadRequest("invalid id".into()))?;
        raw.trim()
            .parse::<DbId>()
            .map(EntityId)
            .map_err(|_| AppError::BadRequest("invalid id".into()))
    }
}
