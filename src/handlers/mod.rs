//! HTTP handlers, one module per entity. Each parses the request, calls its
//! service, and renders the envelope.

pub mod attribute;
pub mod product;
pub mod product_type;
pub mod product_variant;

use crate::error::AppError;
use crate::model::Entity;
use crate::response::{created, ok};
use crate::service::{not_found, Paged};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Carries the unpaged total of a list response.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

fn created_response<E: Entity + Serialize>(record: E) -> Response {
    created(&format!("{} Created Successfully", E::LABEL), record).into_response()
}

fn fetched_response<E: Entity + Serialize>(record: Option<E>) -> Result<Response, AppError> {
    let record = record.ok_or_else(not_found::<E>)?;
    Ok(ok(&format!("{} Retrieved Successfully", E::LABEL), record).into_response())
}

fn updated_response<E: Entity + Serialize>(record: E) -> Response {
    ok(&format!("{} Updated Successfully", E::LABEL), record).into_response()
}

fn listed_response<E: Entity + Serialize>(page: Paged<E>) -> Response {
    let (status, body): (StatusCode, Json<_>) =
        ok(&format!("{}s Retrieved Successfully", E::LABEL), page.items);
    (status, [(TOTAL_COUNT_HEADER, page.total.to_string())], body).into_response()
}

fn deleted_response<E: Entity>(deleted: bool) -> Result<Response, AppError> {
    if deleted {
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        Err(not_found::<E>())
    }
}
