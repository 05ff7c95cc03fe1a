//! Bind values for builder-produced queries.

use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;

/// A value that can be bound to a PostgreSQL query parameter.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlParam {
    I64(i64),
    Text(String),
}

/// Bind params in order ($1, $2, ...).
pub fn bind_params<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    params: &[SqlParam],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for p in params {
        query = match p {
            SqlParam::I64(n) => query.bind(*n),
            SqlParam::Text(s) => query.bind(s.clone()),
        };
    }
    query
}
