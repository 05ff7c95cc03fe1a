//! PostgreSQL gateway: one `Repository` impl per catalog table.

use super::relations::{attach_product, attach_product_type, attach_products, attach_variants, keys};
use super::{qualified_table, unsupported, Condition, FindOptions, Relation, Repository};
use crate::error::StoreError;
use crate::model::{
    Attribute, DbId, Entity, NewAttribute, NewProduct, NewProductType, NewProductVariant, Product,
    ProductType, ProductVariant,
};
use crate::sql::{bind_params, count, select_list, QueryBuf, SqlParam};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

const ATTRIBUTE_TABLE: &str = "attributes";
const ATTRIBUTE_COLUMNS: &str = "id, name, properties, created_at";

const PRODUCT_TYPE_TABLE: &str = "product_types";
const PRODUCT_TYPE_COLUMNS: &str = "id, name, description, created_at";

const PRODUCT_TABLE: &str = "products";
const PRODUCT_COLUMNS: &str = "id, name, description, product_type_id, created_at";

const VARIANT_TABLE: &str = "product_variants";
const VARIANT_COLUMNS: &str = "id, sku, price, stock, product_id, created_at";

type Filter = (&'static str, SqlParam);

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    schema: String,
}

impl PgStore {
    /// Store over tables in `schema`; see [`ensure_catalog_tables`](super::ensure_catalog_tables).
    pub fn new(pool: PgPool, schema: impl Into<String>) -> Self {
        PgStore {
            pool,
            schema: schema.into(),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    fn table(&self, table: &str) -> String {
        qualified_table(&self.schema, table)
    }

    async fn fetch_all<O>(&self, q: &QueryBuf) -> Result<Vec<O>, StoreError>
    where
        O: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows = bind_params(sqlx::query_as::<_, O>(&q.sql), &q.params)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn fetch_count(&self, q: &QueryBuf) -> Result<u64, StoreError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let (n,): (i64,) = bind_params(sqlx::query_as::<_, (i64,)>(&q.sql), &q.params)
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(n).unwrap_or(0))
    }

    /// Rows of `table` where `column` is one of `values`. Used for batch-loading related rows.
    async fn fetch_where_in<O>(
        &self,
        table: &str,
        columns: &str,
        column: &str,
        values: &[DbId],
    ) -> Result<Vec<O>, StoreError>
    where
        O: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        if values.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {} FROM {} WHERE \"{}\" = ANY($1) ORDER BY \"id\"",
            columns,
            self.table(table),
            column
        );
        tracing::debug!(sql = %sql, params = ?values, "query");
        let rows = sqlx::query_as::<_, O>(&sql)
            .bind(values.to_vec())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn delete_by_id(&self, table: &str, id: DbId) -> Result<u64, StoreError> {
        let sql = format!("DELETE FROM {} WHERE \"id\" = $1", self.table(table));
        tracing::debug!(sql = %sql, id, "query");
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

fn filters<E: Entity>(
    conditions: &[Condition],
    column: fn(&Condition) -> Option<Filter>,
) -> Result<Vec<Filter>, StoreError> {
    conditions
        .iter()
        .map(|c| column(c).ok_or_else(|| unsupported::<E>(c)))
        .collect()
}

fn attribute_column(c: &Condition) -> Option<Filter> {
    match c {
        Condition::Id(id) => Some(("id", SqlParam::I64(*id))),
        Condition::Name(name) => Some(("name", SqlParam::Text(name.clone()))),
        _ => None,
    }
}

fn product_type_column(c: &Condition) -> Option<Filter> {
    match c {
        Condition::Id(id) => Some(("id", SqlParam::I64(*id))),
        Condition::Name(name) => Some(("name", SqlParam::Text(name.clone()))),
        _ => None,
    }
}

fn product_column(c: &Condition) -> Option<Filter> {
    match c {
        Condition::Id(id) => Some(("id", SqlParam::I64(*id))),
        Condition::Name(name) => Some(("name", SqlParam::Text(name.clone()))),
        Condition::ProductTypeId(id) => Some(("product_type_id", SqlParam::I64(*id))),
        _ => None,
    }
}

fn variant_column(c: &Condition) -> Option<Filter> {
    match c {
        Condition::Id(id) => Some(("id", SqlParam::I64(*id))),
        Condition::Sku(sku) => Some(("sku", SqlParam::Text(sku.clone()))),
        Condition::ProductId(id) => Some(("product_id", SqlParam::I64(*id))),
        _ => None,
    }
}

fn first_of(mut options: FindOptions) -> FindOptions {
    options.limit = Some(1);
    options
}

#[async_trait]
impl Repository<Attribute> for PgStore {
    async fn find(&self, options: &FindOptions) -> Result<Vec<Attribute>, StoreError> {
        let f = filters::<Attribute>(&options.conditions, attribute_column)?;
        let q = select_list(
            &self.table(ATTRIBUTE_TABLE),
            ATTRIBUTE_COLUMNS,
            &f,
            options.limit,
            options.offset,
        );
        self.fetch_all(&q).await
    }

    async fn find_one(&self, options: &FindOptions) -> Result<Option<Attribute>, StoreError> {
        let rows = <Self as Repository<Attribute>>::find(self, &first_of(options.clone())).await?;
        Ok(rows.into_iter().next())
    }

    async fn find_and_count(
        &self,
        options: &FindOptions,
    ) -> Result<(Vec<Attribute>, u64), StoreError> {
        let rows = <Self as Repository<Attribute>>::find(self, options).await?;
        let f = filters::<Attribute>(&options.conditions, attribute_column)?;
        let total = self.fetch_count(&count(&self.table(ATTRIBUTE_TABLE), &f)).await?;
        Ok((rows, total))
    }

    async fn create(&self, draft: NewAttribute) -> Result<Attribute, StoreError> {
        let sql = format!(
            "INSERT INTO {} (name, properties) VALUES ($1, $2) RETURNING {}",
            self.table(ATTRIBUTE_TABLE),
            ATTRIBUTE_COLUMNS
        );
        tracing::debug!(sql = %sql, name = %draft.name, "query");
        let row = sqlx::query_as::<_, Attribute>(&sql)
            .bind(&draft.name)
            .bind(Json(&draft.properties))
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn save(&self, entity: &Attribute) -> Result<Attribute, StoreError> {
        let sql = format!(
            "UPDATE {} SET name = $2, properties = $3 WHERE id = $1 RETURNING {}",
            self.table(ATTRIBUTE_TABLE),
            ATTRIBUTE_COLUMNS
        );
        tracing::debug!(sql = %sql, id = entity.id, "query");
        sqlx::query_as::<_, Attribute>(&sql)
            .bind(entity.id)
            .bind(&entity.name)
            .bind(Json(&entity.properties))
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::Db(sqlx::Error::RowNotFound))
    }

    async fn delete(&self, id: DbId) -> Result<u64, StoreError> {
        self.delete_by_id(ATTRIBUTE_TABLE, id).await
    }
}

#[async_trait]
impl Repository<ProductType> for PgStore {
    async fn find(&self, options: &FindOptions) -> Result<Vec<ProductType>, StoreError> {
        let f = filters::<ProductType>(&options.conditions, product_type_column)?;
        let q = select_list(
            &self.table(PRODUCT_TYPE_TABLE),
            PRODUCT_TYPE_COLUMNS,
            &f,
            options.limit,
            options.offset,
        );
        let mut rows: Vec<ProductType> = self.fetch_all(&q).await?;
        if options.loads(Relation::Products) && !rows.is_empty() {
            let ids = keys(&rows, |t| t.id);
            let products: Vec<Product> = self
                .fetch_where_in(PRODUCT_TABLE, PRODUCT_COLUMNS, "product_type_id", &ids)
                .await?;
            attach_products(&mut rows, &products);
        }
        Ok(rows)
    }

    async fn find_one(&self, options: &FindOptions) -> Result<Option<ProductType>, StoreError> {
        let rows = <Self as Repository<ProductType>>::find(self, &first_of(options.clone())).await?;
        Ok(rows.into_iter().next())
    }

    async fn find_and_count(
        &self,
        options: &FindOptions,
    ) -> Result<(Vec<ProductType>, u64), StoreError> {
        let rows = <Self as Repository<ProductType>>::find(self, options).await?;
        let f = filters::<ProductType>(&options.conditions, product_type_column)?;
        let total = self.fetch_count(&count(&self.table(PRODUCT_TYPE_TABLE), &f)).await?;
        Ok((rows, total))
    }

    async fn create(&self, draft: NewProductType) -> Result<ProductType, StoreError> {
        let sql = format!(
            "INSERT INTO {} (name, description) VALUES ($1, $2) RETURNING {}",
            self.table(PRODUCT_TYPE_TABLE),
            PRODUCT_TYPE_COLUMNS
        );
        tracing::debug!(sql = %sql, name = %draft.name, "query");
        let row = sqlx::query_as::<_, ProductType>(&sql)
            .bind(&draft.name)
            .bind(&draft.description)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn save(&self, entity: &ProductType) -> Result<ProductType, StoreError> {
        let sql = format!(
            "UPDATE {} SET name = $2, description = $3 WHERE id = $1 RETURNING {}",
            self.table(PRODUCT_TYPE_TABLE),
            PRODUCT_TYPE_COLUMNS
        );
        tracing::debug!(sql = %sql, id = entity.id, "query");
        sqlx::query_as::<_, ProductType>(&sql)
            .bind(entity.id)
            .bind(&entity.name)
            .bind(&entity.description)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::Db(sqlx::Error::RowNotFound))
    }

    async fn delete(&self, id: DbId) -> Result<u64, StoreError> {
        self.delete_by_id(PRODUCT_TYPE_TABLE, id).await
    }
}

#[async_trait]
impl Repository<Product> for PgStore {
    async fn find(&self, options: &FindOptions) -> Result<Vec<Product>, StoreError> {
        let f = filters::<Product>(&options.conditions, product_column)?;
        let q = select_list(
            &self.table(PRODUCT_TABLE),
            PRODUCT_COLUMNS,
            &f,
            options.limit,
            options.offset,
        );
        let mut rows: Vec<Product> = self.fetch_all(&q).await?;
        if rows.is_empty() {
            return Ok(rows);
        }
        if options.loads(Relation::ProductType) {
            let ids = keys(&rows, |p| p.product_type_id);
            let types: Vec<ProductType> = self
                .fetch_where_in(PRODUCT_TYPE_TABLE, PRODUCT_TYPE_COLUMNS, "id", &ids)
                .await?;
            attach_product_type(&mut rows, &types);
        }
        if options.loads(Relation::Variants) {
            let ids = keys(&rows, |p| p.id);
            let variants: Vec<ProductVariant> = self
                .fetch_where_in(VARIANT_TABLE, VARIANT_COLUMNS, "product_id", &ids)
                .await?;
            attach_variants(&mut rows, &variants);
        }
        Ok(rows)
    }

    async fn find_one(&self, options: &FindOptions) -> Result<Option<Product>, StoreError> {
        let rows = <Self as Repository<Product>>::find(self, &first_of(options.clone())).await?;
        Ok(rows.into_iter().next())
    }

    async fn find_and_count(&self, options: &FindOptions) -> Result<(Vec<Product>, u64), StoreError> {
        let rows = <Self as Repository<Product>>::find(self, options).await?;
        let f = filters::<Product>(&options.conditions, product_column)?;
        let total = self.fetch_count(&count(&self.table(PRODUCT_TABLE), &f)).await?;
        Ok((rows, total))
    }

    async fn create(&self, draft: NewProduct) -> Result<Product, StoreError> {
        let sql = format!(
            "INSERT INTO {} (name, description, product_type_id) VALUES ($1, $2, $3) RETURNING {}",
            self.table(PRODUCT_TABLE),
            PRODUCT_COLUMNS
        );
        tracing::debug!(sql = %sql, name = %draft.name, "query");
        let row = sqlx::query_as::<_, Product>(&sql)
            .bind(&draft.name)
            .bind(&draft.description)
            .bind(draft.product_type_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn save(&self, entity: &Product) -> Result<Product, StoreError> {
        let sql = format!(
            "UPDATE {} SET name = $2, description = $3, product_type_id = $4 WHERE id = $1 RETURNING {}",
            self.table(PRODUCT_TABLE),
            PRODUCT_COLUMNS
        );
        tracing::debug!(sql = %sql, id = entity.id, "query");
        sqlx::query_as::<_, Product>(&sql)
            .bind(entity.id)
            .bind(&entity.name)
            .bind(&entity.description)
            .bind(entity.product_type_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::Db(sqlx::Error::RowNotFound))
    }

    async fn delete(&self, id: DbId) -> Result<u64, StoreError> {
        self.delete_by_id(PRODUCT_TABLE, id).await
    }
}

#[async_trait]
impl Repository<ProductVariant> for PgStore {
    async fn find(&self, options: &FindOptions) -> Result<Vec<ProductVariant>, StoreError> {
        let f = filters::<ProductVariant>(&options.conditions, variant_column)?;
        let q = select_list(
            &self.table(VARIANT_TABLE),
            VARIANT_COLUMNS,
            &f,
            options.limit,
            options.offset,
        );
        let mut rows: Vec<ProductVariant> = self.fetch_all(&q).await?;
        if options.loads(Relation::Product) && !rows.is_empty() {
            let ids = keys(&rows, |v| v.product_id);
            let products: Vec<Product> = self
                .fetch_where_in(PRODUCT_TABLE, PRODUCT_COLUMNS, "id", &ids)
                .await?;
            attach_product(&mut rows, &products);
        }
        Ok(rows)
    }

    async fn find_one(&self, options: &FindOptions) -> Result<Option<ProductVariant>, StoreError> {
        let rows = <Self as Repository<ProductVariant>>::find(self, &first_of(options.clone())).await?;
        Ok(rows.into_iter().next())
    }

    async fn find_and_count(
        &self,
        options: &FindOptions,
    ) -> Result<(Vec<ProductVariant>, u64), StoreError> {
        let rows = <Self as Repository<ProductVariant>>::find(self, options).await?;
        let f = filters::<ProductVariant>(&options.conditions, variant_column)?;
        let total = self.fetch_count(&count(&self.table(VARIANT_TABLE), &f)).await?;
        Ok((rows, total))
    }

    async fn create(&self, draft: NewProductVariant) -> Result<ProductVariant, StoreError> {
        let sql = format!(
            "INSERT INTO {} (sku, price, stock, product_id) VALUES ($1, $2, $3, $4) RETURNING {}",
            self.table(VARIANT_TABLE),
            VARIANT_COLUMNS
        );
        tracing::debug!(sql = %sql, sku = %draft.sku, "query");
        let row = sqlx::query_as::<_, ProductVariant>(&sql)
            .bind(&draft.sku)
            .bind(draft.price)
            .bind(draft.stock)
            .bind(draft.product_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn save(&self, entity: &ProductVariant) -> Result<ProductVariant, StoreError> {
        let sql = format!(
            "UPDATE {} SET sku = $2, price = $3, stock = $4, product_id = $5 WHERE id = $1 RETURNING {}",
            self.table(VARIANT_TABLE),
            VARIANT_COLUMNS
        );
        tracing::debug!(sql = %sql, id = entity.id, "query");
        sqlx::query_as::<_, ProductVariant>(&sql)
            .bind(entity.id)
            .bind(&entity.sku)
            .bind(entity.price)
            .bind(entity.stock)
            .bind(entity.product_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::Db(sqlx::Error::RowNotFound))
    }

    async fn delete(&self, id: DbId) -> Result<u64, StoreError> {
        self.delete_by_id(VARIANT_TABLE, id).await
    }
}
