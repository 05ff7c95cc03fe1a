//! Builds parameterized SELECT statements. Identifiers come from code constants only, values are always parameters.

use super::SqlParam;

/// Quote identifier for PostgreSQL.
pub fn quote_ident(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: SqlParam) -> usize {
        self.params.push(v);
        self.params.len()
    }

    fn push_where(&mut self, filters: &[(&str, SqlParam)]) {
        if filters.is_empty() {
            return;
        }
        let mut parts = Vec::with_capacity(filters.len());
        for (col, value) in filters {
            let n = self.push_param(value.clone());
            parts.push(format!("{} = ${}", quote_ident(col), n));
        }
        self.sql.push_str(" WHERE ");
        self.sql.push_str(&parts.join(" AND "));
    }
}

/// SELECT columns FROM table [WHERE col = $n AND ...] ORDER BY id [LIMIT $n] [OFFSET $n].
/// Limit and offset are bound only when given.
pub fn select_list(
    table: &str,
    columns: &str,
    filters: &[(&str, SqlParam)],
    limit: Option<i64>,
    offset: Option<i64>,
) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT {} FROM {}", columns, table);
    q.push_where(filters);
    q.sql.push_str(" ORDER BY \"id\"");
    if let Some(limit) = limit {
        let n = q.push_param(SqlParam::I64(limit));
        q.sql.push_str(&format!(" LIMIT ${}", n));
    }
    if let Some(offset) = offset {
        let n = q.push_param(SqlParam::I64(offset));
        q.sql.push_str(&format!(" OFFSET ${}", n));
    }
    q
}

/// SELECT COUNT(*) FROM table [WHERE ...].
pub fn count(table: &str, filters: &[(&str, SqlParam)]) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT COUNT(*) FROM {}", table);
    q.push_where(filters);
    q
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_binds_filters_then_pagination() {
        let q = select_list(
            "catalog.product_variants",
            "id, sku",
            &[("product_id", SqlParam::I64(4))],
            Some(10),
            Some(5),
        );
        assert_eq!(
            q.sql,
            "SELECT id, sku FROM catalog.product_variants WHERE \"product_id\" = $1 ORDER BY \"id\" LIMIT $2 OFFSET $3"
        );
        assert_eq!(q.params, vec![SqlParam::I64(4), SqlParam::I64(10), SqlParam::I64(5)]);
    }

    #[test]
    fn offset_without_limit() {
        let q = select_list("catalog.attributes", "id", &[], None, Some(20));
        assert_eq!(q.sql, "SELECT id FROM catalog.attributes ORDER BY \"id\" OFFSET $1");
        assert_eq!(q.params, vec![SqlParam::I64(20)]);
    }

    #[test]
    fn count_uses_same_filters() {
        let q = count("catalog.attributes", &[("name", SqlParam::Text("Color".into()))]);
        assert_eq!(q.sql, "SELECT COUNT(*) FROM catalog.attributes WHERE \"name\" = $1");
    }
}
