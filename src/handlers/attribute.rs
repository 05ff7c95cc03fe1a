use super::{created_response, deleted_response, fetched_response, listed_response, updated_response};
use crate::error::AppError;
use crate::extractors::{EntityId, JsonBody, Pagination};
use crate::model::{Attribute, CreateAttribute, UpdateAttribute};
use crate::state::AppState;
use axum::{extract::State, response::Response};

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateAttribute>,
) -> Result<Response, AppError> {
    let attribute = state.attributes.create(body).await?;
    Ok(created_response(attribute))
}

pub async fn list(
    State(state): State<AppState>,
    Pagination(page): Pagination,
) -> Result<Response, AppError> {
    Ok(listed_response(state.attributes.get_page(page).await?))
}

pub async fn get(State(state): State<AppState>, EntityId(id): EntityId) -> Result<Response, AppError> {
    fetched_response::<Attribute>(state.attributes.get_by_id(id).await?)
}

pub async fn update(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    JsonBody(body): JsonBody<UpdateAttribute>,
) -> Result<Response, AppError> {
    Ok(updated_response(state.attributes.update(id, body).await?))
}

pub async fn delete(State(state): State<AppState>, EntityId(id): EntityId) -> Result<Response, AppError> {
    deleted_response::<Attribute>(state.attributes.delete(id).await?)
}
