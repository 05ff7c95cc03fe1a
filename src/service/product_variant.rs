use super::validation::{
    max_length, non_negative_price, non_negative_stock, required_text, MAX_SKU_LENGTH,
};
use super::{not_found, saved_or_not_found, parent_not_found, Paged};
use crate::error::AppError;
use crate::model::{
    CreateProductVariant, DbId, NewProductVariant, Product, ProductVariant, UpdateProductVariant,
};
use crate::store::{FindOptions, Page, Relation, Repository};
use std::sync::Arc;

#[derive(Clone)]
pub struct ProductVariantService {
    variants: Arc<dyn Repository<ProductVariant>>,
    products: Arc<dyn Repository<Product>>,
}

/// Rules shared by create and update, applied to the complete record.
fn validate(sku: &str, price: f64, stock: i32) -> Result<(), AppError> {
    max_length("sku", sku, MAX_SKU_LENGTH)?;
    non_negative_price(price)?;
    non_negative_stock(stock)
}

impl ProductVariantService {
    pub fn new(
        variants: Arc<dyn Repository<ProductVariant>>,
        products: Arc<dyn Repository<Product>>,
    ) -> Self {
        ProductVariantService { variants, products }
    }

    async fn resolve_product(&self, id: DbId) -> Result<Product, AppError> {
        self.products
            .find_one(&FindOptions::by_id(id))
            .await?
            .ok_or_else(|| parent_not_found::<Product>(id))
    }

    /// Insert a variant of `product_id`.
    ///
    /// Checks run in order: the product must exist, the SKU must be present,
    /// and the price must be present and not negative. Nothing is written
    /// when any check fails.
    pub async fn create(
        &self,
        input: CreateProductVariant,
        product_id: DbId,
    ) -> Result<ProductVariant, AppError> {
        let product = self.resolve_product(product_id).await?;
        let sku = required_text(input.sku, "SKU is required")?;
        let price = input
            .price
            .ok_or_else(|| AppError::Validation("Price is required".into()))?;
        let stock = input.stock.unwrap_or(0);
        validate(&sku, price, stock)?;

        let mut created = self
            .variants
            .create(NewProductVariant {
                sku,
                price,
                stock,
                product_id: product.id,
            })
            .await?;
        tracing::info!(
            variant_id = created.id,
            product_id = product.id,
            sku = %created.sku,
            "product variant created",
        );
        created.product = Some(product);
        Ok(created)
    }

    /// Variants with their product attached.
    pub async fn get_all(&self, page: Page) -> Result<Vec<ProductVariant>, AppError> {
        Ok(self
            .variants
            .find(&FindOptions::new().with(Relation::Product).page(page))
            .await?)
    }

    pub async fn get_page(&self, page: Page) -> Result<Paged<ProductVariant>, AppError> {
        let (items, total) = self
            .variants
            .find_and_count(&FindOptions::new().with(Relation::Product).page(page))
            .await?;
        Ok(Paged { items, total })
    }

    pub async fn get_by_id(&self, id: DbId) -> Result<Option<ProductVariant>, AppError> {
        Ok(self
            .variants
            .find_one(&FindOptions::by_id(id).with(Relation::Product))
            .await?)
    }

    /// Merge `input` into the stored variant and re-validate the result.
    /// Store failures during save are returned unchanged.
    pub async fn update(
        &self,
        id: DbId,
        input: UpdateProductVariant,
    ) -> Result<ProductVariant, AppError> {
        let mut variant = self
            .get_by_id(id)
            .await?
            .ok_or_else(not_found::<ProductVariant>)?;

        if let Some(product_id) = input.product_id {
            if product_id != variant.product_id {
                let product = self.resolve_product(product_id).await?;
                variant.product_id = product.id;
                variant.product = Some(product);
            }
        }
        if let Some(raw) = input.sku {
            variant.sku = required_text(Some(raw), "SKU is required")?;
        }
        if let Some(price) = input.price {
            variant.price = price;
        }
        if let Some(stock) = input.stock {
            variant.stock = stock;
        }
        validate(&variant.sku, variant.price, variant.stock)?;

        let mut saved = saved_or_not_found(self.variants.save(&variant).await)?;
        saved.product = variant.product;
        tracing::info!(variant_id = saved.id, "product variant updated");
        Ok(saved)
    }

    /// `true` when the store reports a removed row.
    pub async fn delete(&self, id: DbId) -> Result<bool, AppError> {
        let affected = self.variants.delete(id).await?;
        if affected > 0 {
            tracing::info!(variant_id = id, "product variant deleted");
        }
        Ok(affected > 0)
    }
}
