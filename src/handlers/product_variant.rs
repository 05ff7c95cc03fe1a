use super::{created_response, deleted_response, fetched_response, listed_response, updated_response};
use crate::error::AppError;
use crate::extractors::{EntityId, JsonBody, Pagination};
use crate::model::{CreateProductVariant, ProductVariant, UpdateProductVariant};
use crate::state::AppState;
use axum::{extract::State, response::Response};

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateProductVariant>,
) -> Result<Response, AppError> {
    let product_id = body
        .product_id
        .ok_or_else(|| AppError::Validation("Product ID is required".into()))?;
    Ok(created_response(state.variants.create(body, product_id).await?))
}

pub async fn list(
    State(state): State<AppState>,
    Pagination(page): Pagination,
) -> Result<Response, AppError> {
    Ok(listed_response(state.variants.get_page(page).await?))
}

pub async fn get(State(state): State<AppState>, EntityId(id): EntityId) -> Result<Response, AppError> {
    fetched_response::<ProductVariant>(state.variants.get_by_id(id).await?)
}

pub async fn update(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    JsonBody(body): JsonBody<UpdateProductVariant>,
) -> Result<Response, AppError> {
    Ok(updated_response(state.variants.update(id, body).await?))
}

pub async fn delete(State(state): State<AppState>, EntityId(id): EntityId) -> Result<Response, AppError> {
    deleted_response::<ProductVariant>(state.variants.delete(id).await?)
}
