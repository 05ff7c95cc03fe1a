use super::validation::{max_length, required_text, MAX_NAME_LENGTH};
use super::{not_found, saved_or_not_found, Paged};
use crate::error::AppError;
use crate::model::{non_blank, CreateProductType, DbId, NewProductType, ProductType, UpdateProductType};
use crate::store::{FindOptions, Page, Relation, Repository};
use std::sync::Arc;

#[derive(Clone)]
pub struct ProductTypeService {
    repo: Arc<dyn Repository<ProductType>>,
}

impl ProductTypeService {
    pub fn new(repo: Arc<dyn Repository<ProductType>>) -> Self {
        ProductTypeService { repo }
    }

    pub async fn create(&self, input: CreateProductType) -> Result<ProductType, AppError> {
        let name = required_text(input.name, "Name is required")?;
        max_length("name", &name, MAX_NAME_LENGTH)?;
        let created = self
            .repo
            .create(NewProductType {
                name,
                description: non_blank(input.description),
            })
            .await?;
        tracing::info!(product_type_id = created.id, name = %created.name, "product type created");
        Ok(created)
    }

    pub async fn get_all(&self, page: Page) -> Result<Vec<ProductType>, AppError> {
        Ok(self.repo.find(&FindOptions::new().page(page)).await?)
    }

    pub async fn get_page(&self, page: Page) -> Result<Paged<ProductType>, AppError> {
        let (items, total) = self.repo.find_and_count(&FindOptions::new().page(page)).await?;
        Ok(Paged { items, total })
    }

    /// The product type with its products attached.
    pub async fn get_by_id(&self, id: DbId) -> Result<Option<ProductType>, AppError> {
        Ok(self
            .repo
            .find_one(&FindOptions::by_id(id).with(Relation::Products))
            .await?)
    }

    pub async fn update(&self, id: DbId, input: UpdateProductType) -> Result<ProductType, AppError> {
        let mut product_type = self
            .repo
            .find_one(&FindOptions::by_id(id))
            .await?
            .ok_or_else(not_found::<ProductType>)?;

        if let Some(raw) = input.name {
            let name = required_text(Some(raw), "Name is required")?;
            max_length("name", &name, MAX_NAME_LENGTH)?;
            product_type.name = name;
        }
        if input.description.is_some() {
            product_type.description = non_blank(input.description);
        }

        let saved = saved_or_not_found(self.repo.save(&product_type).await)?;
        tracing::info!(product_type_id = saved.id, "product type updated");
        Ok(saved)
    }

    /// Returns `false` without touching the store when nothing has this id.
    /// A type that still owns products cannot be removed (`Conflict`).
    pub async fn delete(&self, id: DbId) -> Result<bool, AppError> {
        if self.repo.find_one(&FindOptions::by_id(id)).await?.is_none() {
            return Ok(false);
        }
        let affected = self.repo.delete(id).await?;
        if affected > 0 {
            tracing::info!(product_type_id = id, "product type deleted");
        }
        Ok(affected > 0)
    }
}
