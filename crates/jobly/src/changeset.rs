//! Changeset-style validation error types.
//!
//! Request bodies are validated into a [`ValidationErrors`] collection before
//! any SQL is built, so a client sees every problem at once.

use serde::Serialize;

/// A machine-friendly validation code.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationCode {
    Required,
    Len,
    Range,
    Email,
    Url,
    Custom(String),
}

impl ValidationCode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Required => "required",
            Self::Len => "len",
            Self::Range => "range",
            Self::Email => "email",
            Self::Url => "url",
            Self::Custom(s) => s.as_str(),
        }
    }
}

impl Serialize for ValidationCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// A single field validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub code: ValidationCode,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, code: ValidationCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
        }
    }
}

/// A collection of validation errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    pub items: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn push(&mut self, err: ValidationError) {
        self.items.push(err);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.items.iter()
    }

    /// Whether any error was recorded for `field`.
    pub fn has(&self, field: &str) -> bool {
        self.items.iter().any(|e| e.field == field)
    }

    // ==================== Checks ====================

    /// Record `required` when `value` is blank.
    pub fn require_non_blank(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(ValidationError::new(
                field,
                ValidationCode::Required,
                format!("{field} must not be empty"),
            ));
        }
    }

    /// Record `len` when `value` is shorter than `min` characters.
    pub fn min_len(&mut self, field: &str, value: &str, min: usize) {
        if value.chars().count() < min {
            self.push(ValidationError::new(
                field,
                ValidationCode::Len,
                format!("{field} must be at least {min} characters"),
            ));
        }
    }

    /// Record `range` when `value` falls outside `min..=max`.
    pub fn in_range<T>(&mut self, field: &str, value: T, min: Option<T>, max: Option<T>)
    where
        T: PartialOrd + std::fmt::Display + Copy,
    {
        let below = min.is_some_and(|m| value < m);
        let above = max.is_some_and(|m| value > m);
        if below || above {
            let message = match (min, max) {
                (Some(lo), Some(hi)) => format!("{field} must be between {lo} and {hi}"),
                (Some(lo), None) => format!("{field} must be at least {lo}"),
                (None, Some(hi)) => format!("{field} must be at most {hi}"),
                (None, None) => unreachable!("a bound was violated"),
            };
            self.push(ValidationError::new(field, ValidationCode::Range, message));
        }
    }

    /// Record `email` when `value` is not an email address.
    pub fn email(&mut self, field: &str, value: &str) {
        if !crate::validate::is_email(value) {
            self.push(ValidationError::new(
                field,
                ValidationCode::Email,
                format!("{field} must be a valid email address"),
            ));
        }
    }

    /// Record `url` when `value` is not an absolute URL.
    pub fn url(&mut self, field: &str, value: &str) {
        if !crate::validate::is_url(value) {
            self.push(ValidationError::new(
                field,
                ValidationCode::Url,
                format!("{field} must be a valid URL"),
            ));
        }
    }

    /// Turn the collection into a result: `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> crate::error::JoblyResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(crate::error::JoblyError::Invalid(self))
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            f.write_str(&item.message)?;
        }
        Ok(())
    }
}
