use super::{created_response, deleted_response, fetched_response, listed_response, updated_response};
use crate::error::AppError;
use crate::extractors::{EntityId, JsonBody, Pagination};
use crate::model::{CreateProduct, Product, UpdateProduct};
use crate::state::AppState;
use axum::{extract::State, response::Response};

/// The parent type comes from `productTypeId` in the body.
pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateProduct>,
) -> Result<Response, AppError> {
    let product_type_id = body
        .product_type_id
        .ok_or_else(|| AppError::Validation("Product Type ID is required".into()))?;
    Ok(created_response(state.products.create(body, product_type_id).await?))
}

pub async fn list(
    State(state): State<AppState>,
    Pagination(page): Pagination,
) -> Result<Response, AppError> {
    Ok(listed_response(state.products.get_page(page).await?))
}

pub async fn get(State(state): State<AppState>, EntityId(id): EntityId) -> Result<Response, AppError> {
    fetched_response::<Product>(state.products.get_by_id(id).await?)
}

pub async fn update(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    JsonBody(body): JsonBody<UpdateProduct>,
) -> Result<Response, AppError> {
    Ok(updated_response(state.products.update(id, body).await?))
}

pub async fn delete(State(state): State<AppState>, EntityId(id): EntityId) -> Result<Response, AppError> {
    deleted_response::<Product>(state.products.delete(id).await?)
}
