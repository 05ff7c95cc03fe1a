use super::validation::{max_length, required_text, MAX_NAME_LENGTH};
use super::{not_found, saved_or_not_found, Paged};
use crate::error::AppError;
use crate::model::attribute::strip_reserved;
use crate::model::{Attribute, CreateAttribute, DbId, NewAttribute, UpdateAttribute};
use crate::store::{Condition, FindOptions, Page, Repository};
use std::sync::Arc;

const DUPLICATE_NAME: &str = "Attribute with this name already exists";

#[derive(Clone)]
pub struct AttributeService {
    repo: Arc<dyn Repository<Attribute>>,
}

impl AttributeService {
    pub fn new(repo: Arc<dyn Repository<Attribute>>) -> Self {
        AttributeService { repo }
    }

    /// Insert a new attribute. Fails with `Conflict` when the name is taken.
    pub async fn create(&self, input: CreateAttribute) -> Result<Attribute, AppError> {
        let name = required_text(input.name, "Name is required")?;
        max_length("name", &name, MAX_NAME_LENGTH)?;
        if self.get_by_name(&name).await?.is_some() {
            return Err(AppError::Conflict(DUPLICATE_NAME.into()));
        }
        let created = self
            .repo
            .create(NewAttribute {
                name,
                properties: strip_reserved(input.properties),
            })
            .await?;
        tracing::info!(attribute_id = created.id, name = %created.name, "attribute created");
        Ok(created)
    }

    /// `limit` and `offset` are handed to the store unchanged.
    pub async fn get_all(&self, page: Page) -> Result<Vec<Attribute>, AppError> {
        Ok(self.repo.find(&FindOptions::new().page(page)).await?)
    }

    pub async fn get_page(&self, page: Page) -> Result<Paged<Attribute>, AppError> {
        let (items, total) = self.repo.find_and_count(&FindOptions::new().page(page)).await?;
        Ok(Paged { items, total })
    }

    pub async fn get_by_id(&self, id: DbId) -> Result<Option<Attribute>, AppError> {
        Ok(self.repo.find_one(&FindOptions::by_id(id)).await?)
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<Attribute>, AppError> {
        Ok(self
            .repo
            .find_one(&FindOptions::new().filter(Condition::Name(name.to_string())))
            .await?)
    }

    /// Merge `input` into the stored record. A changed name must not belong to
    /// another attribute; keeping the current name is always allowed.
    pub async fn update(&self, id: DbId, input: UpdateAttribute) -> Result<Attribute, AppError> {
        let mut attribute = self.get_by_id(id).await?.ok_or_else(not_found::<Attribute>)?;

        let name = match input.name {
            Some(raw) => {
                let name = required_text(Some(raw), "Name is required")?;
                max_length("name", &name, MAX_NAME_LENGTH)?;
                if name != attribute.name {
                    if let Some(other) = self.get_by_name(&name).await? {
                        if other.id != id {
                            return Err(AppError::Conflict(DUPLICATE_NAME.into()));
                        }
                    }
                }
                Some(name)
            }
            None => None,
        };

        attribute.apply(name, input.properties);
        let saved = saved_or_not_found(self.repo.save(&attribute).await)?;
        tracing::info!(attribute_id = saved.id, name = %saved.name, "attribute updated");
        Ok(saved)
    }

    /// Returns `false` without touching the store when nothing has this id.
    pub async fn delete(&self, id: DbId) -> Result<bool, AppError> {
        if self.get_by_id(id).await?.is_none() {
            return Ok(false);
        }
        let affected = self.repo.delete(id).await?;
        if affected > 0 {
            tracing::info!(attribute_id = id, "attribute deleted");
        }
        Ok(affected > 0)
    }
}
