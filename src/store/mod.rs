//! Persistence gateway: one generic repository contract per entity type,
//! with a PostgreSQL implementation and an in-memory one.

mod bootstrap;
mod memory;
mod postgres;
mod relations;

pub use bootstrap::{ensure_catalog_tables, ensure_database_exists, qualified_table, DEFAULT_SCHEMA};
pub use memory::{MemoryStore, Operation, OperationKind};
pub use postgres::PgStore;

use crate::error::StoreError;
use crate::model::{Attribute, DbId, Entity, Product, ProductType, ProductVariant};
use async_trait::async_trait;
use serde::Deserialize;

/// Equality filter on one column. Each repository accepts the subset that
/// exists on its table and rejects the rest with `UnsupportedCondition`.
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    Id(DbId),
    Name(String),
    Sku(String),
    ProductId(DbId),
    ProductTypeId(DbId),
}

impl Condition {
    pub fn label(&self) -> &'static str {
        match self {
            Condition::Id(_) => "id",
            Condition::Name(_) => "name",
            Condition::Sku(_) => "sku",
            Condition::ProductId(_) => "product_id",
            Condition::ProductTypeId(_) => "product_type_id",
        }
    }
}

/// Related records that can be eagerly attached to query results.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relation {
    /// Variant → its product.
    Product,
    /// Product → its product type.
    ProductType,
    /// Product type → its products.
    Products,
    /// Product → its variants.
    Variants,
}

/// Optional `limit` / `offset`, each applied independently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Page {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Page {
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Page { limit, offset }
    }
}

/// Query criteria: conditions are AND-ed, results are ordered by id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FindOptions {
    pub conditions: Vec<Condition>,
    pub relations: Vec<Relation>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(id: DbId) -> Self {
        Self::new().filter(Condition::Id(id))
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with(mut self, relation: Relation) -> Self {
        if !self.relations.contains(&relation) {
            self.relations.push(relation);
        }
        self
    }

    pub fn page(mut self, page: Page) -> Self {
        self.limit = page.limit;
        self.offset = page.offset;
        self
    }

    pub fn loads(&self, relation: Relation) -> bool {
        self.relations.contains(&relation)
    }
}

/// Generic repository over one entity type.
///
/// `create` inserts a draft and returns the stored record; `save` writes
/// back an existing record (matched by id); `delete` returns the number of
/// rows removed.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    async fn find(&self, options: &FindOptions) -> Result<Vec<E>, StoreError>;

    async fn find_one(&self, options: &FindOptions) -> Result<Option<E>, StoreError>;

    /// Page of records plus the total number matching the conditions.
    async fn find_and_count(&self, options: &FindOptions) -> Result<(Vec<E>, u64), StoreError>;

    async fn create(&self, draft: E::Draft) -> Result<E, StoreError>;

    async fn save(&self, entity: &E) -> Result<E, StoreError>;

    async fn delete(&self, id: DbId) -> Result<u64, StoreError>;
}

/// A store that can back every catalog entity.
pub trait CatalogStore:
    Repository<Attribute>
    + Repository<ProductType>
    + Repository<Product>
    + Repository<ProductVariant>
    + 'static
{
}

impl<T> CatalogStore for T where
    T: Repository<Attribute>
        + Repository<ProductType>
        + Repository<Product>
        + Repository<ProductVariant>
        + 'static
{
}

pub(crate) fn unsupported<E: Entity>(condition: &Condition) -> StoreError {
    StoreError::UnsupportedCondition {
        entity: E::LABEL,
        condition: condition.label(),
    }
}
