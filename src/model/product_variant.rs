use super::{DbId, Entity, Product, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: DbId,
    pub sku: String,
    pub price: f64,
    pub stock: i32,
    pub product_id: DbId,
    pub created_at: Timestamp,
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}

impl Entity for ProductVariant {
    type Draft = NewProductVariant;
    const LABEL: &'static str = "Product Variant";

    fn id(&self) -> DbId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProductVariant {
    pub sku: String,
    pub price: f64,
    pub stock: i32,
    pub product_id: DbId,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductVariant {
    pub sku: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    /// Parent product; taken out of the body by the handler and passed separately.
    pub product_id: Option<DbId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductVariant {
    pub sku: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub product_id: Option<DbId>,
}
