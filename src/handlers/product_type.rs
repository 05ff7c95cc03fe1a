use super::{created_response, deleted_response, fetched_response, listed_response, updated_response};
use crate::error::AppError;
use crate::extractors::{EntityId, JsonBody, Pagination};
use crate::model::{CreateProductType, ProductType, UpdateProductType};
use crate::state::AppState;
use axum::{extract::State, response::Response};

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateProductType>,
) -> Result<Response, AppError> {
    Ok(created_response(state.product_types.create(body).await?))
}

pub async fn list(
    State(state): State<AppState>,
    Pagination(page): Pagination,
) -> Result<Response, AppError> {
    Ok(listed_response(state.product_types.get_page(page).await?))
}

/// Includes the type's products.
pub async fn get(State(state): State<AppState>, EntityId(id): EntityId) -> Result<Response, AppError> {
    fetched_response::<ProductType>(state.product_types.get_by_id(id).await?)
}

pub async fn update(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    JsonBody(body): JsonBody<UpdateProductType>,
) -> Result<Response, AppError> {
    Ok(updated_response(state.product_types.update(id, body).await?))
}

pub async fn delete(State(state): State<AppState>, EntityId(id): EntityId) -> Result<Response, AppError> {
    deleted_response::<ProductType>(state.product_types.delete(id).await?)
}
