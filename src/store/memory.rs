//! In-memory gateway.
//!
//! Mirrors the PostgreSQL tables closely enough for tests and for running the
//! server without a database: per-table id sequences, the unique attribute
//! name, and `ON DELETE RESTRICT` parent references. Every call is recorded in
//! a journal so callers can check which operations reached the store.

use super::relations::{attach_product, attach_product_type, attach_products, attach_variants};
use super::{unsupported, Condition, FindOptions, Relation, Repository};
use crate::error::StoreError;
use crate::model::{
    Attribute, DbId, Entity, NewAttribute, NewProduct, NewProductType, NewProductVariant, Product,
    ProductType, ProductVariant,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationKind {
    Find,
    FindOne,
    FindAndCount,
    Create,
    Save,
    Delete,
}

/// One recorded gateway call.
#[derive(Clone, Debug, PartialEq)]
pub struct Operation {
    /// Entity label, e.g. "Product Variant".
    pub entity: &'static str,
    pub kind: OperationKind,
    pub options: Option<FindOptions>,
    pub id: Option<DbId>,
}

impl Operation {
    pub fn is_write(&self) -> bool {
        matches!(
            self.kind,
            OperationKind::Create | OperationKind::Save | OperationKind::Delete
        )
    }
}

#[derive(Debug, Default)]
struct Tables {
    attributes: BTreeMap<DbId, Attribute>,
    product_types: BTreeMap<DbId, ProductType>,
    products: BTreeMap<DbId, Product>,
    variants: BTreeMap<DbId, ProductVariant>,
    sequences: HashMap<&'static str, DbId>,
}

impl Tables {
    fn next_id(&mut self, label: &'static str) -> DbId {
        let n = self.sequences.entry(label).or_insert(0);
        *n += 1;
        *n
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    journal: Mutex<Vec<Operation>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call made so far, oldest first.
    pub fn operations(&self) -> Vec<Operation> {
        self.journal.lock().map(|j| j.clone()).unwrap_or_default()
    }

    /// Create/save/delete calls recorded for one entity label.
    pub fn writes(&self, entity: &str) -> Vec<Operation> {
        self.operations()
            .into_iter()
            .filter(|op| op.entity == entity && op.is_write())
            .collect()
    }

    pub fn clear_journal(&self) {
        if let Ok(mut j) = self.journal.lock() {
            j.clear();
        }
    }

    fn record<E: Entity>(&self, kind: OperationKind, options: Option<&FindOptions>, id: Option<DbId>) {
        if let Ok(mut j) = self.journal.lock() {
            j.push(Operation {
                entity: E::LABEL,
                kind,
                options: options.cloned(),
                id,
            });
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))
    }

    fn attributes(&self, options: &FindOptions) -> Result<(Vec<Attribute>, u64), StoreError> {
        let t = self.read()?;
        select(&t.attributes, options, attribute_matches)
    }

    fn product_types(&self, options: &FindOptions) -> Result<(Vec<ProductType>, u64), StoreError> {
        let t = self.read()?;
        let (mut rows, total) = select(&t.product_types, options, product_type_matches)?;
        if options.loads(Relation::Products) {
            let products: Vec<Product> = t.products.values().cloned().collect();
            attach_products(&mut rows, &products);
        }
        Ok((rows, total))
    }

    fn products(&self, options: &FindOptions) -> Result<(Vec<Product>, u64), StoreError> {
        let t = self.read()?;
        let (mut rows, total) = select(&t.products, options, product_matches)?;
        if options.loads(Relation::ProductType) {
            let types: Vec<ProductType> = t.product_types.values().cloned().collect();
            attach_product_type(&mut rows, &types);
        }
        if options.loads(Relation::Variants) {
            let variants: Vec<ProductVariant> = t.variants.values().cloned().collect();
            attach_variants(&mut rows, &variants);
        }
        Ok((rows, total))
    }

    fn variants(&self, options: &FindOptions) -> Result<(Vec<ProductVariant>, u64), StoreError> {
        let t = self.read()?;
        let (mut rows, total) = select(&t.variants, options, variant_matches)?;
        if options.loads(Relation::Product) {
            let products: Vec<Product> = t.products.values().cloned().collect();
            attach_product(&mut rows, &products);
        }
        Ok((rows, total))
    }

    fn insert_attribute(&self, draft: NewAttribute) -> Result<Attribute, StoreError> {
        let mut t = self.write()?;
        ensure_unique_name(&t.attributes, &draft.name, None)?;
        let id = t.next_id(Attribute::LABEL);
        let row = Attribute {
            id,
            name: draft.name,
            properties: draft.properties,
            created_at: Utc::now(),
        };
        t.attributes.insert(id, row.clone());
        Ok(row)
    }

    fn update_attribute(&self, entity: &Attribute) -> Result<Attribute, StoreError> {
        let mut t = self.write()?;
        ensure_unique_name(&t.attributes, &entity.name, Some(entity.id))?;
        let stored = t.attributes.get_mut(&entity.id).ok_or(StoreError::Db(sqlx::Error::RowNotFound))?;
        stored.name = entity.name.clone();
        stored.properties = entity.properties.clone();
        Ok(stored.clone())
    }

    fn insert_product_type(&self, draft: NewProductType) -> Result<ProductType, StoreError> {
        let mut t = self.write()?;
        let id = t.next_id(ProductType::LABEL);
        let row = ProductType {
            id,
            name: draft.name,
            description: draft.description,
            created_at: Utc::now(),
            products: None,
        };
        t.product_types.insert(id, row.clone());
        Ok(row)
    }

    fn update_product_type(&self, entity: &ProductType) -> Result<ProductType, StoreError> {
        let mut t = self.write()?;
        let stored = t
            .product_types
            .get_mut(&entity.id)
            .ok_or(StoreError::Db(sqlx::Error::RowNotFound))?;
        stored.name = entity.name.clone();
        stored.description = entity.description.clone();
        Ok(stored.clone())
    }

    fn remove_product_type(&self, id: DbId) -> Result<u64, StoreError> {
        let mut t = self.write()?;
        if t.products.values().any(|p| p.product_type_id == id) {
            return Err(restricted("products", "product_type_id"));
        }
        Ok(t.product_types.remove(&id).map_or(0, |_| 1))
    }

    fn insert_product(&self, draft: NewProduct) -> Result<Product, StoreError> {
        let mut t = self.write()?;
        if !t.product_types.contains_key(&draft.product_type_id) {
            return Err(missing_parent("products", "product_type_id"));
        }
        let id = t.next_id(Product::LABEL);
        let row = Product {
            id,
            name: draft.name,
            description: draft.description,
            product_type_id: draft.product_type_id,
            created_at: Utc::now(),
            product_type: None,
            variants: None,
        };
        t.products.insert(id, row.clone());
        Ok(row)
    }

    fn update_product(&self, entity: &Product) -> Result<Product, StoreError> {
        let mut t = self.write()?;
        if !t.product_types.contains_key(&entity.product_type_id) {
            return Err(missing_parent("products", "product_type_id"));
        }
        let stored = t.products.get_mut(&entity.id).ok_or(StoreError::Db(sqlx::Error::RowNotFound))?;
        stored.name = entity.name.clone();
        stored.description = entity.description.clone();
        stored.product_type_id = entity.product_type_id;
        Ok(stored.clone())
    }

    fn remove_product(&self, id: DbId) -> Result<u64, StoreError> {
        let mut t = self.write()?;
        if t.variants.values().any(|v| v.product_id == id) {
            return Err(restricted("product_variants", "product_id"));
        }
        Ok(t.products.remove(&id).map_or(0, |_| 1))
    }

    fn insert_variant(&self, draft: NewProductVariant) -> Result<ProductVariant, StoreError> {
        let mut t = self.write()?;
        if !t.products.contains_key(&draft.product_id) {
            return Err(missing_parent("product_variants", "product_id"));
        }
        let id = t.next_id(ProductVariant::LABEL);
        let row = ProductVariant {
            id,
            sku: draft.sku,
            price: draft.price,
            stock: draft.stock,
            product_id: draft.product_id,
            created_at: Utc::now(),
            product: None,
        };
        t.variants.insert(id, row.clone());
        Ok(row)
    }

    fn update_variant(&self, entity: &ProductVariant) -> Result<ProductVariant, StoreError> {
        let mut t = self.write()?;
        if !t.products.contains_key(&entity.product_id) {
            return Err(missing_parent("product_variants", "product_id"));
        }
        let stored = t.variants.get_mut(&entity.id).ok_or(StoreError::Db(sqlx::Error::RowNotFound))?;
        stored.sku = entity.sku.clone();
        stored.price = entity.price;
        stored.stock = entity.stock;
        stored.product_id = entity.product_id;
        Ok(stored.clone())
    }

    fn remove_variant(&self, id: DbId) -> Result<u64, StoreError> {
        let mut t = self.write()?;
        Ok(t.variants.remove(&id).map_or(0, |_| 1))
    }

    fn remove_attribute(&self, id: DbId) -> Result<u64, StoreError> {
        let mut t = self.write()?;
        Ok(t.attributes.remove(&id).map_or(0, |_| 1))
    }
}

/// Filter by conditions (AND), then apply offset and limit. Returns the page and the unpaged total.
fn select<E: Entity>(
    rows: &BTreeMap<DbId, E>,
    options: &FindOptions,
    matches: fn(&E, &Condition) -> Option<bool>,
) -> Result<(Vec<E>, u64), StoreError> {
    let mut hits = Vec::new();
    for row in rows.values() {
        let mut keep = true;
        for c in &options.conditions {
            if !matches(row, c).ok_or_else(|| unsupported::<E>(c))? {
                keep = false;
                break;
            }
        }
        if keep {
            hits.push(row.clone());
        }
    }
    let total = hits.len() as u64;
    let offset = options.offset.map_or(0, |o| usize::try_from(o).unwrap_or(0));
    let limit = options.limit.map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(0));
    let page = hits.into_iter().skip(offset).take(limit).collect();
    Ok((page, total))
}

fn first_of(options: &FindOptions) -> FindOptions {
    let mut options = options.clone();
    options.limit = Some(1);
    options
}

fn attribute_matches(a: &Attribute, c: &Condition) -> Option<bool> {
    match c {
        Condition::Id(id) => Some(a.id == *id),
        Condition::Name(name) => Some(&a.name == name),
        _ => None,
    }
}

fn product_type_matches(t: &ProductType, c: &Condition) -> Option<bool> {
    match c {
        Condition::Id(id) => Some(t.id == *id),
        Condition::Name(name) => Some(&t.name == name),
        _ => None,
    }
}

fn product_matches(p: &Product, c: &Condition) -> Option<bool> {
    match c {
        Condition::Id(id) => Some(p.id == *id),
        Condition::Name(name) => Some(&p.name == name),
        Condition::ProductTypeId(id) => Some(p.product_type_id == *id),
        _ => None,
    }
}

fn variant_matches(v: &ProductVariant, c: &Condition) -> Option<bool> {
    match c {
        Condition::Id(id) => Some(v.id == *id),
        Condition::Sku(sku) => Some(&v.sku == sku),
        Condition::ProductId(id) => Some(v.product_id == *id),
        _ => None,
    }
}

fn ensure_unique_name(
    attributes: &BTreeMap<DbId, Attribute>,
    name: &str,
    except: Option<DbId>,
) -> Result<(), StoreError> {
    let taken = attributes
        .values()
        .any(|a| a.name == name && Some(a.id) != except);
    if taken {
        return Err(StoreError::Constraint(
            "duplicate key value violates unique constraint (uq_attributes_name)".into(),
        ));
    }
    Ok(())
}

fn missing_parent(table: &str, column: &str) -> StoreError {
    StoreError::Constraint(format!(
        "insert or update on table \"{}\" violates foreign key constraint ({})",
        table, column
    ))
}

fn restricted(child_table: &str, column: &str) -> StoreError {
    StoreError::Constraint(format!(
        "delete is still referenced from table \"{}\" ({})",
        child_table, column
    ))
}

#[async_trait]
impl Repository<Attribute> for MemoryStore {
    async fn find(&self, options: &FindOptions) -> Result<Vec<Attribute>, StoreError> {
        self.record::<Attribute>(OperationKind::Find, Some(options), None);
        Ok(self.attributes(options)?.0)
    }

    async fn find_one(&self, options: &FindOptions) -> Result<Option<Attribute>, StoreError> {
        self.record::<Attribute>(OperationKind::FindOne, Some(options), None);
        Ok(self.attributes(&first_of(options))?.0.into_iter().next())
    }

    async fn find_and_count(&self, options: &FindOptions) -> Result<(Vec<Attribute>, u64), StoreError> {
        self.record::<Attribute>(OperationKind::FindAndCount, Some(options), None);
        self.attributes(options)
    }

    async fn create(&self, draft: NewAttribute) -> Result<Attribute, StoreError> {
        self.record::<Attribute>(OperationKind::Create, None, None);
        self.insert_attribute(draft)
    }

    async fn save(&self, entity: &Attribute) -> Result<Attribute, StoreError> {
        self.record::<Attribute>(OperationKind::Save, None, Some(entity.id));
        self.update_attribute(entity)
    }

    async fn delete(&self, id: DbId) -> Result<u64, StoreError> {
        self.record::<Attribute>(OperationKind::Delete, None, Some(id));
        self.remove_attribute(id)
    }
}

#[async_trait]
impl Repository<ProductType> for MemoryStore {
    async fn find(&self, options: &FindOptions) -> Result<Vec<ProductType>, StoreError> {
        self.record::<ProductType>(OperationKind::Find, Some(options), None);
        Ok(self.product_types(options)?.0)
    }

    async fn find_one(&self, options: &FindOptions) -> Result<Option<ProductType>, StoreError> {
        self.record::<ProductType>(OperationKind::FindOne, Some(options), None);
        Ok(self.product_types(&first_of(options))?.0.into_iter().next())
    }

    async fn find_and_count(&self, options: &FindOptions) -> Result<(Vec<ProductType>, u64), StoreError> {
        self.record::<ProductType>(OperationKind::FindAndCount, Some(options), None);
        self.product_types(options)
    }

    async fn create(&self, draft: NewProductType) -> Result<ProductType, StoreError> {
        self.record::<ProductType>(OperationKind::Create, None, None);
        self.insert_product_type(draft)
    }

    async fn save(&self, entity: &ProductType) -> Result<ProductType, StoreError> {
        self.record::<ProductType>(OperationKind::Save, None, Some(entity.id));
        self.update_product_type(entity)
    }

    async fn delete(&self, id: DbId) -> Result<u64, StoreError> {
        self.record::<ProductType>(OperationKind::Delete, None, Some(id));
        self.remove_product_type(id)
    }
}

#[async_trait]
impl Repository<Product> for MemoryStore {
    async fn find(&self, options: &FindOptions) -> Result<Vec<Product>, StoreError> {
        self.record::<Product>(OperationKind::Find, Some(options), None);
        Ok(self.products(options)?.0)
    }

    async fn find_one(&self, options: &FindOptions) -> Result<Option<Product>, StoreError> {
        self.record::<Product>(OperationKind::FindOne, Some(options), None);
        Ok(self.products(&first_of(options))?.0.into_iter().next())
    }

    async fn find_and_count(&self, options: &FindOptions) -> Result<(Vec<Product>, u64), StoreError> {
        self.record::<Product>(OperationKind::FindAndCount, Some(options), None);
        self.products(options)
    }

    async fn create(&self, draft: NewProduct) -> Result<Product, StoreError> {
        self.record::<Product>(OperationKind::Create, None, None);
        self.insert_product(draft)
    }

    async fn save(&self, entity: &Product) -> Result<Product, StoreError> {
        self.record::<Product>(OperationKind::Save, None, Some(entity.id));
        self.update_product(entity)
    }

    async fn delete(&self, id: DbId) -> Result<u64, StoreError> {
        self.record::<Product>(OperationKind::Delete, None, Some(id));
        self.remove_product(id)
    }
}

#[async_trait]
impl Repository<ProductVariant> for MemoryStore {
    async fn find(&self, options: &FindOptions) -> Result<Vec<ProductVariant>, StoreError> {
        self.record::<ProductVariant>(OperationKind::Find, Some(options), None);
        Ok(self.variants(options)?.0)
    }

    async fn find_one(&self, options: &FindOptions) -> Result<Option<ProductVariant>, StoreError> {
        self.record::<ProductVariant>(OperationKind::FindOne, Some(options), None);
        Ok(self.variants(&first_of(options))?.0.into_iter().next())
    }

    async fn find_and_count(
        &self,
        options: &FindOptions,
    ) -> Result<(Vec<ProductVariant>, u64), StoreError> {
        self.record::<ProductVariant>(OperationKind::FindAndCount, Some(options), None);
        self.variants(options)
    }

    async fn create(&self, draft: NewProductVariant) -> Result<ProductVariant, StoreError> {
        self.record::<ProductVariant>(OperationKind::Create, None, None);
        self.insert_variant(draft)
    }

    async fn save(&self, entity: &ProductVariant) -> Result<ProductVariant, StoreError> {
        self.record::<ProductVariant>(OperationKind::Save, None, Some(entity.id));
        self.update_variant(entity)
    }

    async fn delete(&self, id: DbId) -> Result<u64, StoreError> {
        self.record::<ProductVariant>(OperationKind::Delete, None, Some(id));
        self.remove_variant(id)
    }
}
