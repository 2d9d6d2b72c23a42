//! Partial UPDATE statements from a subset of an entity's columns.

use super::GeneratedQuery;
use super::param::Placeholders;
use super::value::SqlValue;
use crate::error::{JoblyError, JoblyResult};

/// Columns to change and their new values, in insertion order.
///
/// Column names are `&'static str`: they come from program text, never from
/// request data, so they can be written into SQL without escaping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialUpdateSpec {
    fields: Vec<(&'static str, SqlValue)>,
}

impl PartialUpdateSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column. Setting the same column again replaces its value.
    pub fn set(&mut self, column: &'static str, value: impl Into<SqlValue>) -> &mut Self {
        let value = value.into();
        match self.fields.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((column, value)),
        }
        self
    }

    /// Set an optional column (None => skip).
    pub fn set_opt<T>(&mut self, column: &'static str, value: Option<T>) -> &mut Self
    where
        T: Into<SqlValue>,
    {
        if let Some(v) = value {
            self.set(column, v);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(c, _)| *c)
    }

    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.fields
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &SqlValue)> {
        self.fields.iter().map(|(c, v)| (*c, v))
    }
}

#[derive(Debug, Clone, Copy)]
enum Returning {
    All,
    Columns(&'static [&'static str]),
}

/// UPDATE builder for one table keyed by one column.
///
/// ```ignore
/// let mut fields = PartialUpdateSpec::new();
/// fields.set("description", "updated");
///
/// let stmt = PartialUpdate::new("companies", "handle").build(&fields, "test1")?;
/// assert_eq!(
///     stmt.sql(),
///     "UPDATE companies SET description = $1 WHERE handle = $2 RETURNING *"
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PartialUpdate {
    table: &'static str,
    id_column: &'static str,
    returning: Returning,
}

impl PartialUpdate {
    pub const fn new(table: &'static str, id_column: &'static str) -> Self {
        Self {
            table,
            id_column,
            returning: Returning::All,
        }
    }

    /// Narrow the `RETURNING` projection (default: `*`).
    pub const fn returning(self, columns: &'static [&'static str]) -> Self {
        Self {
            returning: Returning::Columns(columns),
            ..self
        }
    }

    /// Build the statement.
    ///
    /// Assignment values come first, in field order; the identifier value is
    /// the last parameter. Fails with [`JoblyError::EmptyUpdate`] when there
    /// is nothing to set.
    pub fn build(
        &self,
        fields: &PartialUpdateSpec,
        id_value: impl Into<SqlValue>,
    ) -> JoblyResult<GeneratedQuery> {
        if fields.is_empty() {
            return Err(JoblyError::EmptyUpdate);
        }

        let mut params = Placeholders::with_capacity(fields.len() + 1);
        let set_parts: Vec<String> = fields
            .iter()
            .map(|(column, value)| format!("{} = {}", column, params.bind(value.clone())))
            .collect();
        let id_placeholder = params.bind(id_value.into());

        let mut sql = format!(
            "UPDATE {} SET {} WHERE {} = {}",
            self.table,
            set_parts.join(", "),
            self.id_column,
            id_placeholder
        );

        sql.push_str(" RETURNING ");
        match self.returning {
            Returning::All => sql.push('*'),
            Returning::Columns(cols) if cols.is_empty() => sql.push('*'),
            Returning::Columns(cols) => sql.push_str(&cols.join(", ")),
        }

        Ok(GeneratedQuery::new(sql, params.into_values()))
    }
}

/// Build `UPDATE {table} SET … WHERE {id_column} = $n RETURNING *`.
pub fn sql_for_partial_update(
    table: &'static str,
    fields: &PartialUpdateSpec,
    id_column: &'static str,
    id_value: impl Into<SqlValue>,
) -> JoblyResult<GeneratedQuery> {
    PartialUpdate::new(table, id_column).build(fields, id_value)
}
