//! Parameterized SQL generation.
//!
//! Two stateless builders produce every dynamic statement in the crate:
//!
//! - [`FilterQueryBuilder`] turns optional filter keys into an AND-joined
//!   predicate.
//! - [`PartialUpdate`] turns a subset of columns into an `UPDATE` statement.
//!
//! Both return a [`GeneratedQuery`]: SQL text plus the values for its `$n`
//! placeholders. Identifiers (table and column names) are written into the
//! text and must come from program code; only values are parameterized.

use crate::client::GenericClient;
use crate::error::JoblyResult;
use crate::monitor;
use crate::row::FromRow;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

mod filter;
mod param;
mod update;
mod value;

pub use filter::{FilterField, FilterOp, FilterQueryBuilder, FilterSpec, build_filter, check_range};
pub use param::{SEARCH_WORD_SEPARATOR, contains_pattern, decode_search_term};
pub use update::{PartialUpdate, PartialUpdateSpec, sql_for_partial_update};
pub use value::SqlValue;

/// SQL text paired with the values for its placeholders.
///
/// Placeholder `$n` in [`sql`](Self::sql) refers to `values()[n - 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedQuery {
    sql: String,
    values: Vec<SqlValue>,
}

impl GeneratedQuery {
    /// Pair hand-written SQL with its values.
    ///
    /// The caller is responsible for `values.len()` matching the highest
    /// placeholder in `sql`.
    pub fn new(sql: impl Into<String>, values: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            values,
        }
    }

    /// A statement with no dynamic parts.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::new(sql, Vec::new())
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    /// Whether the SQL text is empty (a filter with no recognized keys).
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    pub fn into_parts(self) -> (String, Vec<SqlValue>) {
        (self.sql, self.values)
    }

    /// `WHERE <predicate>`, or an empty string when the predicate is empty.
    pub fn where_clause(&self) -> String {
        if self.sql.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.sql)
        }
    }

    /// Embed a filter predicate between a statement head and tail.
    ///
    /// `WHERE` is only emitted when the predicate is non-empty; the values
    /// carry over unchanged, so their placeholders stay valid.
    ///
    /// ```ignore
    /// let stmt = predicate.into_statement("SELECT * FROM companies", "ORDER BY name");
    /// ```
    pub fn into_statement(self, head: &str, tail: &str) -> Self {
        let where_clause = self.where_clause();
        let mut sql = String::from(head);
        for part in [where_clause.as_str(), tail] {
            if !part.is_empty() {
                sql.push(' ');
                sql.push_str(part);
            }
        }
        Self::new(sql, self.values)
    }

    /// Parameter references for tokio-postgres.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.values.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
    }

    /// Execute and return all rows.
    pub async fn fetch_all(&self, conn: &impl GenericClient) -> JoblyResult<Vec<Row>> {
        monitor::trace_sql(&self.sql, self.values.len());
        conn.query(&self.sql, &self.params_ref()).await
    }

    /// Execute and map all rows to `T`.
    pub async fn fetch_all_as<T: FromRow>(&self, conn: &impl GenericClient) -> JoblyResult<Vec<T>> {
        let rows = self.fetch_all(conn).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// Execute and map the first row, if any, to `T`.
    pub async fn fetch_opt_as<T: FromRow>(
        &self,
        conn: &impl GenericClient,
    ) -> JoblyResult<Option<T>> {
        monitor::trace_sql(&self.sql, self.values.len());
        let row = conn.query_opt(&self.sql, &self.params_ref()).await?;
        row.as_ref().map(T::from_row).transpose()
    }

    /// Execute and return the number of affected rows.
    pub async fn execute(&self, conn: &impl GenericClient) -> JoblyResult<u64> {
        monitor::trace_sql(&self.sql, self.values.len());
        conn.execute(&self.sql, &self.params_ref()).await
    }
}
