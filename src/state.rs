//! Shared application state for all routes: one service per entity, all wired to the same store.

use crate::model::{Attribute, Product, ProductType, ProductVariant};
use crate::service::{AttributeService, ProductService, ProductTypeService, ProductVariantService};
use crate::store::{CatalogStore, MemoryStore, PgStore, Repository};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub attributes: AttributeService,
    pub product_types: ProductTypeService,
    pub products: ProductService,
    pub variants: ProductVariantService,
    /// Set when backed by PostgreSQL; checked by the readiness route.
    pub pool: Option<PgPool>,
}

impl AppState {
    pub fn from_store<S: CatalogStore>(store: Arc<S>, pool: Option<PgPool>) -> Self {
        let attributes: Arc<dyn Repository<Attribute>> = store.clone();
        let product_types: Arc<dyn Repository<ProductType>> = store.clone();
        let products: Arc<dyn Repository<Product>> = store.clone();
        let variants: Arc<dyn Repository<ProductVariant>> = store;
        AppState {
            attributes: AttributeService::new(attributes),
            product_types: ProductTypeService::new(product_types.clone()),
            products: ProductService::new(products.clone(), product_types),
            variants: ProductVariantService::new(variants, products),
            pool,
        }
    }

    /// Backed by PostgreSQL tables in `schema`.
    pub fn postgres(pool: PgPool, schema: &str) -> Self {
        Self::from_store(Arc::new(PgStore::new(pool.clone(), schema)), Some(pool))
    }

    pub fn in_memory(store: Arc<MemoryStore>) -> Self {
        Self::from_store(store, None)
    }
}
