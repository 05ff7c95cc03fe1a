//! Server configuration loaded from environment variables.

use crate::error::ConfigError;
use crate::store::DEFAULT_SCHEMA;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(ConfigError::Invalid {
                key: "CATALOG_STORE",
                value: s.to_string(),
            }),
        }
    }
}

/// | Env Var                    | Default      |
/// |----------------------------|--------------|
/// | `CATALOG_HOST`             | `127.0.0.1`  |
/// | `CATALOG_PORT`             | `3000`       |
/// | `CATALOG_STORE`            | `postgres`   |
/// | `DATABASE_URL`             | required for `postgres` |
/// | `DATABASE_MAX_CONNECTIONS` | `5`          |
/// | `CATALOG_BODY_LIMIT`       | `1048576`    |
/// | `CATALOG_SCHEMA`           | `catalog`    |
#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreBackend,
    pub database_url: Option<String>,
    pub max_connections: u32,
    /// Maximum accepted request body, in bytes.
    pub body_limit: usize,
    /// PostgreSQL schema holding the catalog tables.
    pub schema: String,
}

impl ServerConfig {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` uses the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("CATALOG_HOST").unwrap_or_else(|| "127.0.0.1".into());
        let port = parse_or(&lookup, "CATALOG_PORT", 3000u16)?;
        let store = match lookup("CATALOG_STORE") {
            Some(v) => v.parse()?,
            None => StoreBackend::Postgres,
        };
        let database_url = lookup("DATABASE_URL").filter(|s| !s.trim().is_empty());
        if store == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        let max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5u32)?;
        let body_limit = parse_or(&lookup, "CATALOG_BODY_LIMIT", 1024 * 1024usize)?;
        let schema = match lookup("CATALOG_SCHEMA") {
            Some(raw) => schema_name(raw)?,
            None => DEFAULT_SCHEMA.to_string(),
        };

        Ok(ServerConfig {
            host,
            port,
            store,
            database_url,
            max_connections,
            body_limit,
            schema,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}

/// Plain identifier: a letter or `_`, then letters, digits or `_`; at most 63 bytes.
fn schema_name(raw: String) -> Result<String, ConfigError> {
    let name = raw.trim();
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && name.len() <= 63;
    if !valid {
        return Err(ConfigError::Invalid {
            key: "CATALOG_SCHEMA",
            value: raw,
        });
    }
    Ok(name.to_string())
}
