//! Catalog HTTP server.
//!
//! Run from repo root: `cargo run -p catalog-server`
//! Set `CATALOG_STORE=memory` to run without PostgreSQL.

use catalog_backend::{
    app, ensure_catalog_tables, ensure_database_exists, init_tracing, AppState, MemoryStore,
    ServerConfig, StoreBackend,
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;
    init_tracing();

    let state = match config.store {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or("DATABASE_URL is required for the postgres store")?;
            ensure_database_exists(database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(database_url)
                .await?;
            ensure_catalog_tables(&pool, &config.schema).await?;
            AppState::postgres(pool, &config.schema)
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; data is lost on shutdown");
            AppState::in_memory(Arc::new(MemoryStore::new()))
        }
    };

    let router = app(state, config.body_limit);
    let listener = TcpListener::bind(config.bind_address()).await?;
    tracing::info!("catalog server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("catalog server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
