//! Entity records, insert drafts, and request payloads.

pub mod attribute;
pub mod product;
pub mod product_type;
pub mod product_variant;

pub use attribute::{Attribute, CreateAttribute, NewAttribute, UpdateAttribute};
pub use product::{CreateProduct, NewProduct, Product, UpdateProduct};
pub use product_type::{CreateProductType, NewProductType, ProductType, UpdateProductType};
pub use product_variant::{
    CreateProductVariant, NewProductVariant, ProductVariant, UpdateProductVariant,
};

/// Primary key type shared by every catalog table (`BIGSERIAL`).
pub type DbId = i64;

/// Timestamp type used for `created_at` columns.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// A persisted record type.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Insert payload: everything the store needs to create a row.
    type Draft: Send + Sync + 'static;

    /// Human-readable name used in response messages ("Product Variant").
    const LABEL: &'static str;

    fn id(&self) -> DbId;
}

/// Trims and drops blank strings.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
