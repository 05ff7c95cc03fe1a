use super::{DbId, Entity, Product, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductType {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    /// Loaded only when the `Products` relation is requested.
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<Product>>,
}

impl Entity for ProductType {
    type Draft = NewProductType;
    const LABEL: &'static str = "Product Type";

    fn id(&self) -> DbId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProductType {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProductType {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductType {
    pub name: Option<String>,
    pub description: Option<String>,
}
