use super::{DbId, Entity, ProductType, ProductVariant, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub product_type_id: DbId,
    pub created_at: Timestamp,
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_type: Option<ProductType>,
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<ProductVariant>>,
}

impl Entity for Product {
    type Draft = NewProduct;
    const LABEL: &'static str = "Product";

    fn id(&self) -> DbId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub product_type_id: DbId,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Parent type; taken out of the body by the handler and passed separately.
    pub product_type_id: Option<DbId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub product_type_id: Option<DbId>,
}
