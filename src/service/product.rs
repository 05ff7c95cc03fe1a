use super::validation::{max_length, required_text, MAX_NAME_LENGTH};
use super::{not_found, saved_or_not_found, parent_not_found, Paged};
use crate::error::AppError;
use crate::model::{
    non_blank, CreateProduct, DbId, NewProduct, Product, ProductType, UpdateProduct,
};
use crate::store::{FindOptions, Page, Relation, Repository};
use std::sync::Arc;

#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn Repository<Product>>,
    product_types: Arc<dyn Repository<ProductType>>,
}

impl ProductService {
    pub fn new(
        products: Arc<dyn Repository<Product>>,
        product_types: Arc<dyn Repository<ProductType>>,
    ) -> Self {
        ProductService {
            products,
            product_types,
        }
    }

    async fn resolve_product_type(&self, id: DbId) -> Result<ProductType, AppError> {
        self.product_types
            .find_one(&FindOptions::by_id(id))
            .await?
            .ok_or_else(|| parent_not_found::<ProductType>(id))
    }

    /// Insert a product under `product_type_id`. The type must exist.
    pub async fn create(&self, input: CreateProduct, product_type_id: DbId) -> Result<Product, AppError> {
        let product_type = self.resolve_product_type(product_type_id).await?;
        let name = required_text(input.name, "Name is required")?;
        max_length("name", &name, MAX_NAME_LENGTH)?;

        let mut created = self
            .products
            .create(NewProduct {
                name,
                description: non_blank(input.description),
                product_type_id: product_type.id,
            })
            .await?;
        tracing::info!(
            product_id = created.id,
            product_type_id = product_type.id,
            name = %created.name,
            "product created",
        );
        created.product_type = Some(product_type);
        Ok(created)
    }

    /// Products with their product type attached.
    pub async fn get_all(&self, page: Page) -> Result<Vec<Product>, AppError> {
        Ok(self
            .products
            .find(&FindOptions::new().with(Relation::ProductType).page(page))
            .await?)
    }

    pub async fn get_page(&self, page: Page) -> Result<Paged<Product>, AppError> {
        let (items, total) = self
            .products
            .find_and_count(&FindOptions::new().with(Relation::ProductType).page(page))
            .await?;
        Ok(Paged { items, total })
    }

    /// The product with its type and variants attached.
    pub async fn get_by_id(&self, id: DbId) -> Result<Option<Product>, AppError> {
        Ok(self
            .products
            .find_one(
                &FindOptions::by_id(id)
                    .with(Relation::ProductType)
                    .with(Relation::Variants),
            )
            .await?)
    }

    pub async fn update(&self, id: DbId, input: UpdateProduct) -> Result<Product, AppError> {
        let mut product = self
            .products
            .find_one(&FindOptions::by_id(id).with(Relation::ProductType))
            .await?
            .ok_or_else(not_found::<Product>)?;

        if let Some(type_id) = input.product_type_id {
            if type_id != product.product_type_id {
                let product_type = self.resolve_product_type(type_id).await?;
                product.product_type_id = product_type.id;
                product.product_type = Some(product_type);
            }
        }
        if let Some(raw) = input.name {
            let name = required_text(Some(raw), "Name is required")?;
            max_length("name", &name, MAX_NAME_LENGTH)?;
            product.name = name;
        }
        if input.description.is_some() {
            product.description = non_blank(input.description);
        }

        let mut saved = saved_or_not_found(self.products.save(&product).await)?;
        saved.product_type = product.product_type;
        tracing::info!(product_id = saved.id, "product updated");
        Ok(saved)
    }

    /// Returns `false` without touching the store when nothing has this id.
    /// A product that still has variants cannot be removed (`Conflict`).
    pub async fn delete(&self, id: DbId) -> Result<bool, AppError> {
        if self.products.find_one(&FindOptions::by_id(id)).await?.is_none() {
            return Ok(false);
        }
        let affected = self.products.delete(id).await?;
        if affected > 0 {
            tracing::info!(product_id = id, "product deleted");
        }
        Ok(affected > 0)
    }
}
