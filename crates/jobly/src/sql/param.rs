//! Placeholder bookkeeping and value sanitization shared by the builders.

use super::value::SqlValue;

/// Parameter list for a single statement.
///
/// The `$n` placeholder handed out by [`Placeholders::bind`] is derived from
/// the position of the pushed value, so placeholder `$n` always refers to
/// value `n` (1-based, no gaps, no reuse). A fresh list is created per build
/// call; nothing is shared across calls.
#[derive(Debug, Default)]
pub(crate) struct Placeholders {
    values: Vec<SqlValue>,
}

impl Placeholders {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    /// Push a value and return the placeholder that refers to it.
    pub(crate) fn bind(&mut self, value: SqlValue) -> String {
        self.values.push(value);
        format!("${}", self.values.len())
    }

    pub(crate) fn into_values(self) -> Vec<SqlValue> {
        self.values
    }
}

/// Separator used on the wire for multi-word search terms.
pub const SEARCH_WORD_SEPARATOR: char = '+';

/// Decode a wire-format search term: the word separator becomes a space.
pub fn decode_search_term(raw: &str) -> String {
    raw.replace(SEARCH_WORD_SEPARATOR, " ")
}

/// Build a case-insensitive substring pattern for `ILIKE`.
///
/// `"foo+bar"` becomes `"%foo bar%"`.
pub fn contains_pattern(raw: &str) -> String {
    format!("%{}%", decode_search_term(raw))
}
