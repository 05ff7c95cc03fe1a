//! Typed errors and HTTP mapping.

use crate::response::Envelope;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// PostgreSQL SQLSTATE for unique_violation.
const PG_UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL SQLSTATE for foreign_key_violation.
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Failures raised by a persistence gateway.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database: {0}")]
    Db(sqlx::Error),
    /// Unique or foreign-key constraint rejected the write.
    #[error("constraint violation: {0}")]
    Constraint(String),
    #[error("{entity} does not support lookup by {condition}")]
    UnsupportedCondition {
        entity: &'static str,
        condition: &'static str,
    },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let code = db_err.code();
            if matches!(
                code.as_deref(),
                Some(PG_UNIQUE_VIOLATION) | Some(PG_FOREIGN_KEY_VIOLATION)
            ) {
                let constraint = db_err.constraint().unwrap_or("unknown");
                return StoreError::Constraint(format!("{} ({})", db_err.message(), constraint));
            }
        }
        StoreError::Db(err)
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Store(StoreError::Constraint(_)) => StatusCode::CONFLICT,
            AppError::Store(StoreError::Db(sqlx::Error::RowNotFound)) => StatusCode::NOT_FOUND,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body: Envelope<()> = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            Envelope::failure("Internal Server Error", Some(self.to_string()))
        } else {
            Envelope::failure(self.to_string(), None)
        };
        (status, Json(body)).into_response()
    }
}
