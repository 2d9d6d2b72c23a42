//! Entity records and their repository functions.
//!
//! Each entity declares:
//! - a record type mapped from rows,
//! - a `New*` input for inserts and a `*Patch` input for partial updates,
//!   both rejecting unknown JSON keys so only known columns can be set,
//! - where it has one, a `*Filters` input coerced from query-string values.
//!
//! Repository functions take any [`GenericClient`](crate::GenericClient).

mod company;
mod job;
mod user;

pub use company::{Company, CompanyFilters, CompanyPatch, NewCompany};
pub use job::{Job, JobFilters, JobPatch, NewJob};
pub use user::{NewUser, User, UserPatch};

use serde::{Deserialize, Deserializer};
use std::fmt::Display;
use std::str::FromStr;

/// Deserialize a nullable patch field.
///
/// Missing key => `None` (leave the column alone), `null` => `Some(None)`
/// (clear it), a value => `Some(Some(v))`. Use together with
/// `#[serde(default)]`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Treat an empty or whitespace-only search term as absent.
pub(crate) fn non_blank(search: &Option<String>) -> Option<&str> {
    search.as_deref().filter(|s| !s.trim().is_empty())
}

/// Deserialize an optional numeric filter, treating an empty or
/// whitespace-only value as absent.
///
/// Query strings deliver every value as text, so text is trimmed and parsed;
/// native values (JSON numbers) are taken as-is. Use together with
/// `#[serde(default)]`.
pub(crate) fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<T> {
        Text(String),
        Value(T),
    }

    match Option::<Raw<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Value(v)) => Ok(Some(v)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
