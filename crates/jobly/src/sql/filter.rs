//! Dynamic filter predicates from optional query parameters.

use super::GeneratedQuery;
use super::param::{Placeholders, contains_pattern};
use super::value::SqlValue;
use crate::error::{JoblyError, JoblyResult};
use std::collections::HashMap;

/// Comparison applied by one filter key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    /// `ILIKE` with the value bound verbatim.
    ILike,
    /// `ILIKE` substring match: the value is decoded and wrapped in `%…%`.
    Contains,
}

impl FilterOp {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::ILike | Self::Contains => "ILIKE",
        }
    }
}

/// Declares how one filter key maps onto a column.
///
/// `column` is a trusted identifier and is written into the SQL text as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterField {
    pub key: &'static str,
    pub column: &'static str,
    pub op: FilterOp,
}

impl FilterField {
    pub const fn new(key: &'static str, column: &'static str, op: FilterOp) -> Self {
        Self { key, column, op }
    }

    pub const fn contains(key: &'static str, column: &'static str) -> Self {
        Self::new(key, column, FilterOp::Contains)
    }

    pub const fn eq(key: &'static str, column: &'static str) -> Self {
        Self::new(key, column, FilterOp::Eq)
    }

    pub const fn gt(key: &'static str, column: &'static str) -> Self {
        Self::new(key, column, FilterOp::Gt)
    }

    pub const fn gte(key: &'static str, column: &'static str) -> Self {
        Self::new(key, column, FilterOp::Gte)
    }

    pub const fn lt(key: &'static str, column: &'static str) -> Self {
        Self::new(key, column, FilterOp::Lt)
    }

    pub const fn lte(key: &'static str, column: &'static str) -> Self {
        Self::new(key, column, FilterOp::Lte)
    }
}

/// Filter keys and the values they were given.
///
/// Keys that were not supplied are simply absent. A [`SqlValue::Null`] value
/// is treated the same as an absent key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    values: HashMap<String, SqlValue>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<SqlValue>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Insert only when `value` is `Some`.
    pub fn insert_opt<T>(&mut self, key: impl Into<String>, value: Option<T>) -> &mut Self
    where
        T: Into<SqlValue>,
    {
        if let Some(v) = value {
            self.insert(key, v);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&SqlValue> {
        self.values.get(key).filter(|v| !v.is_null())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

impl<K, V> FromIterator<(K, V)> for FilterSpec
where
    K: Into<String>,
    V: Into<SqlValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Builds an AND-joined predicate from a [`FilterSpec`].
///
/// The field list is declared per entity and fixes both which keys are
/// recognized and the order their fragments appear in. Keys in the spec that
/// the list does not mention are ignored.
///
/// ```ignore
/// const COMPANY_FILTERS: FilterQueryBuilder = FilterQueryBuilder::new(&[
///     FilterField::contains("search", "name"),
///     FilterField::gt("minEmployees", "num_employees"),
///     FilterField::lt("maxEmployees", "num_employees"),
/// ]);
///
/// let predicate = COMPANY_FILTERS.build(&spec);
/// // "name ILIKE $1 AND num_employees > $2"
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FilterQueryBuilder {
    fields: &'static [FilterField],
}

impl FilterQueryBuilder {
    pub const fn new(fields: &'static [FilterField]) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &'static [FilterField] {
        self.fields
    }

    /// Build the predicate (without the `WHERE` keyword).
    ///
    /// With no recognized keys present, both the SQL text and the value list
    /// are empty.
    pub fn build(&self, filters: &FilterSpec) -> GeneratedQuery {
        build_filter(filters, self.fields)
    }
}

/// Build an AND-joined predicate for the keys in `fields` that `filters` has
/// values for.
pub fn build_filter(filters: &FilterSpec, fields: &[FilterField]) -> GeneratedQuery {
    let mut params = Placeholders::with_capacity(fields.len());
    let mut conditions = Vec::new();

    for field in fields {
        let Some(value) = filters.get(field.key) else {
            continue;
        };
        let value = match field.op {
            FilterOp::Contains => SqlValue::Text(contains_pattern(&value.to_string())),
            _ => value.clone(),
        };
        let placeholder = params.bind(value);
        conditions.push(format!("{} {} {}", field.column, field.op.as_sql(), placeholder));
    }

    GeneratedQuery::new(conditions.join(" AND "), params.into_values())
}

/// Reject a lower bound that exceeds its upper bound.
///
/// This runs before the builder; the builder itself never inspects values.
pub fn check_range<T: PartialOrd>(
    min: Option<T>,
    max: Option<T>,
    min_key: &'static str,
    max_key: &'static str,
) -> JoblyResult<()> {
    match (min, max) {
        (Some(lo), Some(hi)) if hi < lo => Err(JoblyError::InvalidRange { min_key, max_key }),
        _ => Ok(()),
    }
}
