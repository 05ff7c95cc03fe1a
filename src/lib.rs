//! Catalog backend: REST CRUD for attributes, product types, products and
//! product variants over PostgreSQL or an in-memory store.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;
pub mod telemetry;

pub use config::{ServerConfig, StoreBackend};
pub use error::{AppError, ConfigError, StoreError};
pub use response::Envelope;
pub use routes::{app, catalog_routes, common_routes};
pub use state::AppState;
pub use store::{ensure_catalog_tables, ensure_database_exists, MemoryStore, PgStore};
pub use telemetry::init_tracing;
