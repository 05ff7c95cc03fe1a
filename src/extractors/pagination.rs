//! `?limit=&offset=` query extractor.

use crate::error::AppError;
use crate::store::Page;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;

/// Optional `limit` and `offset`, parsed as non-negative integers.
/// Values reach the store unchanged; absent values mean "no limit" / "from the start".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pagination(pub Page);

/// Raw query values, kept as text so bad numbers get our own message.
#[derive(Debug, Default, Deserialize)]
struct RawPage {
    limit: Option<String>,
    offset: Option<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<RawPage>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(Pagination(Page::new(
            parse_bound("limit", raw.limit.as_deref())?,
            parse_bound("offset", raw.offset.as_deref())?,
        )))
    }
}

fn parse_bound(key: &str, raw: Option<&str>) -> Result<Option<i64>, AppError> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(raw) => raw,
    };
    match raw.parse::<i64>() {
        Ok(n) if n >= 0 => Ok(Some(n)),
        _ => Err(AppError::BadRequest(format!(
            "{key} must be a non-negative integer"
        ))),
    }
}
