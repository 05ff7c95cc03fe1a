//! Entity services: validation and orchestration on top of the persistence gateway.

mod attribute;
mod product;
mod product_type;
mod product_variant;
pub mod validation;

pub use attribute::AttributeService;
pub use product::ProductService;
pub use product_type::ProductTypeService;
pub use product_variant::ProductVariantService;

use crate::error::{AppError, StoreError};
use crate::model::Entity;

/// `NotFound` for a record addressed by the request path ("Attribute Not Found").
pub fn not_found<E: Entity>() -> AppError {
    AppError::NotFound(format!("{} Not Found", E::LABEL))
}

/// `NotFound` for a referenced parent ("Product with ID 4 not found").
pub fn parent_not_found<E: Entity>(id: crate::model::DbId) -> AppError {
    AppError::NotFound(format!("{} with ID {} not found", E::LABEL, id))
}

/// Result of a gateway `save`. A row removed after it was read surfaces as
/// `NotFound` for the entity instead of the raw driver error.
pub(crate) fn saved_or_not_found<E: Entity>(result: Result<E, StoreError>) -> Result<E, AppError> {
    match result {
        Err(StoreError::Db(sqlx::Error::RowNotFound)) => Err(not_found::<E>()),
        other => Ok(other?),
    }
}

/// A page of records plus the unpaged total.
#[derive(Debug, Clone, PartialEq)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
}
