//! Service-level tests for product variants against the in-memory store.

use std::sync::Arc;

use async_trait::async_trait;
use catalog_backend::error::{AppError, StoreError};
use catalog_backend::model::{
    CreateProduct, CreateProductType, CreateProductVariant, DbId, NewProductVariant, Product, ProductVariant,
    UpdateProductVariant,
};
use catalog_backend::service::{ProductService, ProductTypeService, ProductVariantService};
use catalog_backend::store::{FindOptions, MemoryStore, OperationKind, Page, Relation, Repository};

const VARIANT: &str = "Product Variant";

fn services(store: &Arc<MemoryStore>) -> (ProductService, ProductVariantService) {
    let products: Arc<dyn Repository<Product>> = store.clone();
    let variants: Arc<dyn Repository<ProductVariant>> = store.clone();
    let product_types = store.clone();
    (
        ProductService::new(products.clone(), product_types),
        ProductVariantService::new(variants, products),
    )
}

/// One "Electronics" type with one "Laptop" product; returns the product id.
async fn seed_laptop(store: &Arc<MemoryStore>) -> DbId {
    let types = ProductTypeService::new(store.clone());
    let (products, _) = services(store);
    let electronics = types
        .create(CreateProductType {
            name: Some("Electronics".into()),
            description: Some("Category for electronics".into()),
        })
        .await
        .unwrap();
    let laptop = products
        .create(
            CreateProduct {
                name: Some("Laptop".into()),
                description: Some("A high-end gaming laptop".into()),
                product_type_id: Some(electronics.id),
            },
            electronics.id,
        )
        .await
        .unwrap();
    store.clear_journal();
    laptop.id
}

fn laptop_variant(sku: Option<&str>, price: Option<f64>, stock: Option<i32>) -> CreateProductVariant {
    CreateProductVariant {
        sku: sku.map(str::to_string),
        price,
        stock,
        product_id: None,
    }
}

#[tokio::test]
async fn create_attaches_product() {
    let store = Arc::new(MemoryStore::new());
    let product_id = seed_laptop(&store).await;
    let (_, variants) = services(&store);

    let created = variants
        .create(laptop_variant(Some("LAP123"), Some(999.99), Some(10)), product_id)
        .await
        .unwrap();

    assert_eq!(created.sku, "LAP123");
    assert_eq!(created.price, 999.99);
    assert_eq!(created.stock, 10);
    assert_eq!(created.product_id, product_id);
    assert_eq!(created.product.as_ref().map(|p| p.name.as_str()), Some("Laptop"));

    let ops = store.operations();
    assert_eq!(ops[0].entity, "Product");
    assert_eq!(ops[0].options, Some(FindOptions::by_id(product_id)));
    assert_eq!(store.writes(VARIANT).len(), 1);
    assert_eq!(store.writes(VARIANT)[0].kind, OperationKind::Create);
}

#[tokio::test]
async fn create_defaults_stock_to_zero() {
    let store = Arc::new(MemoryStore::new());
    let product_id = seed_laptop(&store).await;
    let (_, variants) = services(&store);

    let created = variants
        .create(laptop_variant(Some("LAP000"), Some(10.0), None), product_id)
        .await
        .unwrap();
    assert_eq!(created.stock, 0);
}

#[tokio::test]
async fn create_without_sku_writes_nothing() {
    let store = Arc::new(MemoryStore::new());
    let product_id = seed_laptop(&store).await;
    let (_, variants) = services(&store);

    let err = variants
        .create(laptop_variant(None, Some(999.99), Some(10)), product_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(err.to_string(), "SKU is required");

    let err = variants
        .create(laptop_variant(Some("   "), Some(999.99), Some(10)), product_id)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "SKU is required");
    assert!(store.writes(VARIANT).is_empty());
}

#[tokio::test]
async fn create_for_missing_product_writes_nothing() {
    let store = Arc::new(MemoryStore::new());
    let (_, variants) = services(&store);

    let err = variants
        .create(laptop_variant(Some("LAP123"), Some(999.99), Some(10)), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(err.to_string(), "Product with ID 1 not found");
    assert!(store.writes(VARIANT).is_empty());
}

#[tokio::test]
async fn missing_product_is_reported_before_missing_sku() {
    let store = Arc::new(MemoryStore::new());
    let (_, variants) = services(&store);

    let err = variants
        .create(laptop_variant(None, None, None), 42)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Product with ID 42 not found");
}

#[tokio::test]
async fn create_rejects_bad_price_and_stock() {
    let store = Arc::new(MemoryStore::new());
    let product_id = seed_laptop(&store).await;
    let (_, variants) = services(&store);

    let err = variants
        .create(laptop_variant(Some("LAP123"), Some(-999.99), Some(10)), product_id)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Price cannot be negative");

    let err = variants
        .create(laptop_variant(Some("LAP123"), None, Some(10)), product_id)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Price is required");

    let err = variants
        .create(laptop_variant(Some("LAP123"), Some(1.0), Some(-1)), product_id)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Stock cannot be negative");

    assert!(store.writes(VARIANT).is_empty());
}

#[tokio::test]
async fn get_all_loads_product_and_passes_page_through() {
    let store = Arc::new(MemoryStore::new());
    let product_id = seed_laptop(&store).await;
    let (_, variants) = services(&store);
    for (sku, price) in [("LAP123", 999.99), ("LAP456", 899.99), ("LAP789", 799.99)] {
        variants
            .create(laptop_variant(Some(sku), Some(price), Some(5)), product_id)
            .await
            .unwrap();
    }
    store.clear_journal();

    let all = variants.get_all(Page::default()).await.unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.iter().all(|v| v.product.as_ref().map(|p| p.id) == Some(product_id)));

    let page = variants.get_all(Page::new(Some(1), Some(1))).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].sku, "LAP456");

    let ops = store.operations();
    assert_eq!(ops[0].options, Some(FindOptions::new().with(Relation::Product)));
    let paged = ops[1].options.as_ref().unwrap();
    assert_eq!((paged.limit, paged.offset), (Some(1), Some(1)));
}

#[tokio::test]
async fn get_page_reports_unpaged_total() {
    let store = Arc::new(MemoryStore::new());
    let product_id = seed_laptop(&store).await;
    let (_, variants) = services(&store);
    for sku in ["A-1", "A-2", "A-3"] {
        variants
            .create(laptop_variant(Some(sku), Some(1.0), None), product_id)
            .await
            .unwrap();
    }

    let page = variants.get_page(Page::new(Some(2), None)).await.unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total, 3);
}

#[tokio::test]
async fn get_by_id_includes_product() {
    let store = Arc::new(MemoryStore::new());
    let product_id = seed_laptop(&store).await;
    let (_, variants) = services(&store);
    let created = variants
        .create(laptop_variant(Some("LAP123"), Some(999.99), Some(10)), product_id)
        .await
        .unwrap();
    store.clear_journal();

    let found = variants.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(found.sku, "LAP123");
    assert_eq!(found.product.map(|p| p.id), Some(product_id));
    assert_eq!(
        store.operations()[0].options,
        Some(FindOptions::by_id(created.id).with(Relation::Product))
    );

    assert!(variants.get_by_id(999).await.unwrap().is_none());
}

#[tokio::test]
async fn update_merges_fields() {
    let store = Arc::new(MemoryStore::new());
    let product_id = seed_laptop(&store).await;
    let (_, variants) = services(&store);
    let created = variants
        .create(laptop_variant(Some("LAP123"), Some(999.99), Some(10)), product_id)
        .await
        .unwrap();

    let updated = variants
        .update(
            created.id,
            UpdateProductVariant {
                price: Some(899.99),
                stock: Some(15),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.sku, "LAP123");
    assert_eq!(updated.price, 899.99);
    assert_eq!(updated.stock, 15);
    assert_eq!(updated.product.map(|p| p.id), Some(product_id));
}

#[tokio::test]
async fn update_revalidates_merged_record() {
    let store = Arc::new(MemoryStore::new());
    let product_id = seed_laptop(&store).await;
    let (_, variants) = services(&store);
    let created = variants
        .create(laptop_variant(Some("LAP123"), Some(999.99), Some(10)), product_id)
        .await
        .unwrap();
    store.clear_journal();

    let err = variants
        .update(
            created.id,
            UpdateProductVariant {
                price: Some(-1.0),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Price cannot be negative");

    let err = variants
        .update(
            created.id,
            UpdateProductVariant {
                product_id: Some(77),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Product with ID 77 not found");
    assert!(store.writes(VARIANT).is_empty());
}

#[tokio::test]
async fn update_of_missing_variant_is_not_found_and_never_saves() {
    let store = Arc::new(MemoryStore::new());
    let (_, variants) = services(&store);

    let err = variants
        .update(
            1,
            UpdateProductVariant {
                price: Some(899.99),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(err.to_string(), "Product Variant Not Found");
    assert_eq!(
        store.operations()[0].options,
        Some(FindOptions::by_id(1).with(Relation::Product))
    );
    assert!(store.writes(VARIANT).is_empty());
}

/// Delegates to the memory store but fails every `save` with the given error.
struct FailingSave(Arc<MemoryStore>, fn() -> StoreError);

#[async_trait]
impl Repository<ProductVariant> for FailingSave {
    async fn find(&self, options: &FindOptions) -> Result<Vec<ProductVariant>, StoreError> {
        Repository::<ProductVariant>::find(&*self.0, options).await
    }

    async fn find_one(&self, options: &FindOptions) -> Result<Option<ProductVariant>, StoreError> {
        Repository::<ProductVariant>::find_one(&*self.0, options).await
    }

    async fn find_and_count(
        &self,
        options: &FindOptions,
    ) -> Result<(Vec<ProductVariant>, u64), StoreError> {
        Repository::<ProductVariant>::find_and_count(&*self.0, options).await
    }

    async fn create(&self, draft: NewProductVariant) -> Result<ProductVariant, StoreError> {
        Repository::<ProductVariant>::create(&*self.0, draft).await
    }

    async fn save(&self, _entity: &ProductVariant) -> Result<ProductVariant, StoreError> {
        Err((self.1)())
    }

    async fn delete(&self, id: DbId) -> Result<u64, StoreError> {
        Repository::<ProductVariant>::delete(&*self.0, id).await
    }
}

#[tokio::test]
async fn save_failure_during_update_propagates() {
    let store = Arc::new(MemoryStore::new());
    let product_id = seed_laptop(&store).await;
    let (_, variants) = services(&store);
    let created = variants
        .create(laptop_variant(Some("LAP123"), Some(999.99), Some(10)), product_id)
        .await
        .unwrap();

    let failing = ProductVariantService::new(
        Arc::new(FailingSave(store.clone(), || {
            StoreError::Unavailable("Database error".into())
        })),
        store.clone(),
    );
    let err = failing
        .update(
            created.id,
            UpdateProductVariant {
                price: Some(899.99),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Store(StoreError::Unavailable(_))));
    assert!(err.to_string().contains("Database error"));

    let stored = variants.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(stored.price, 999.99);
}

#[tokio::test]
async fn row_removed_before_save_is_not_found() {
    let store = Arc::new(MemoryStore::new());
    let product_id = seed_laptop(&store).await;
    let (_, variants) = services(&store);
    let created = variants
        .create(laptop_variant(Some("LAP123"), Some(999.99), Some(10)), product_id)
        .await
        .unwrap();

    let vanished = ProductVariantService::new(
        Arc::new(FailingSave(store.clone(), || StoreError::Db(sqlx::Error::RowNotFound))),
        store.clone(),
    );
    let err = vanished
        .update(
            created.id,
            UpdateProductVariant {
                stock: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(err.to_string(), "Product Variant Not Found");
    assert_eq!(err.status(), axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_reports_whether_a_row_was_removed() {
    let store = Arc::new(MemoryStore::new());
    let product_id = seed_laptop(&store).await;
    let (_, variants) = services(&store);
    let created = variants
        .create(laptop_variant(Some("LAP123"), Some(999.99), Some(10)), product_id)
        .await
        .unwrap();
    store.clear_journal();

    assert!(variants.delete(created.id).await.unwrap());
    assert!(!variants.delete(created.id).await.unwrap());

    let deletes: Vec<_> = store
        .writes(VARIANT)
        .into_iter()
        .map(|op| (op.kind, op.id))
        .collect();
    assert_eq!(
        deletes,
        vec![
            (OperationKind::Delete, Some(created.id)),
            (OperationKind::Delete, Some(created.id)),
        ]
    );
}
