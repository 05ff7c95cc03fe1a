//! Catalog table DDL. All tables live in one configurable schema (default `catalog`).

use crate::error::StoreError;
use crate::sql::quote_ident;
use sqlx::postgres::PgConnectOptions;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

/// Schema used when none is configured.
pub const DEFAULT_SCHEMA: &str = "catalog";

/// Quoted schema-qualified table name (e.g. `"catalog"."products"`).
pub fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(table))
}

/// Create the schema and the four catalog tables if they do not exist.
/// Products and variants reference their parents with `ON DELETE RESTRICT`.
pub async fn ensure_catalog_tables(pool: &PgPool, schema: &str) -> Result<(), StoreError> {
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(schema)))
        .execute(pool)
        .await?;

    let attributes = qualified_table(schema, "attributes");
    let product_types = qualified_table(schema, "product_types");
    let products = qualified_table(schema, "products");
    let variants = qualified_table(schema, "product_variants");

    let statements = [
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                properties JSONB NOT NULL DEFAULT '{{}}'::jsonb,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT uq_attributes_name UNIQUE (name)
            )
            "#,
            attributes
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            product_types
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                product_type_id BIGINT NOT NULL REFERENCES {} (id) ON DELETE RESTRICT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            products, product_types
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id BIGSERIAL PRIMARY KEY,
                sku TEXT NOT NULL,
                price DOUBLE PRECISION NOT NULL CHECK (price >= 0),
                stock INTEGER NOT NULL DEFAULT 0,
                product_id BIGINT NOT NULL REFERENCES {} (id) ON DELETE RESTRICT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            variants, products
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS idx_products_product_type_id ON {} (product_type_id)",
            products
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS idx_product_variants_product_id ON {} (product_id)",
            variants
        ),
    ];

    for ddl in &statements {
        sqlx::query(ddl).execute(pool).await?;
    }
    tracing::info!(schema = %schema, "catalog tables ready");
    Ok(())
}

/// Ensure the database named in `database_url` exists; create it if not. Connects to the
/// `postgres` maintenance database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), StoreError> {
    let Some((admin, db_name)) = target_database(database_url)? else {
        return Ok(());
    };
    let mut conn: sqlx::PgConnection = admin.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %db_name, "created database");
    }
    Ok(())
}

/// Admin connect options plus the database to create. `None` when the URL names no
/// database, or names the maintenance database itself.
fn target_database(database_url: &str) -> Result<Option<(PgConnectOptions, String)>, StoreError> {
    let options = PgConnectOptions::from_str(database_url)?;
    let db_name = match options.get_database() {
        Some(name) if !name.is_empty() && name != "postgres" => name.to_string(),
        _ => return Ok(None),
    };
    Ok(Some((options.database("postgres"), db_name)))
}
