//! Error types for jobly

use crate::changeset::ValidationErrors;
use thiserror::Error;

/// Result type alias for jobly operations
pub type JoblyResult<T> = Result<T, JoblyError>;

/// Error types for query building and database operations
#[derive(Debug, Error)]
pub enum JoblyError {
    /// A partial update was requested with no fields to change
    #[error("Update requires at least one field to change")]
    EmptyUpdate,

    /// Filter bounds are inconsistent (e.g. max below min)
    #[error("Max value cannot be lower than min value")]
    InvalidRange {
        min_key: &'static str,
        max_key: &'static str,
    },

    /// A filter query matched no rows
    #[error("{0}")]
    NoMatch(String),

    /// A filter query matched no rows and the filter itself is reported as
    /// the bad input
    #[error("{0}")]
    UnmatchedFilter(String),

    /// Row not found
    #[error("{0}")]
    NotFound(String),

    /// Credentials did not match
    #[error("Invalid username or password")]
    Unauthorized,

    /// Request validation failed
    #[error("Validation error: {0}")]
    Invalid(ValidationErrors),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Password hashing error
    #[error("Password hashing error: {0}")]
    Password(String),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl JoblyError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a no-match error
    pub fn no_match(message: impl Into<String>) -> Self {
        Self::NoMatch(message.into())
    }

    /// Create an unmatched-filter error
    pub fn unmatched_filter(message: impl Into<String>) -> Self {
        Self::UnmatchedFilter(message.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a unique violation error
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    /// Whether the failure was caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyUpdate
                | Self::InvalidRange { .. }
                | Self::NoMatch(_)
                | Self::UnmatchedFilter(_)
                | Self::NotFound(_)
                | Self::Unauthorized
                | Self::Invalid(_)
                | Self::UniqueViolation(_)
                | Self::ForeignKeyViolation(_)
                | Self::CheckViolation(_)
        )
    }

    /// Parse a tokio_postgres error into a more specific JoblyError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::UniqueViolation(format!("{}: {}", constraint, message)),
                "23503" => {
                    return Self::ForeignKeyViolation(format!("{}: {}", constraint, message));
                }
                "23514" => return Self::CheckViolation(format!("{}: {}", constraint, message)),
                _ => {}
            }
        }
        Self::Query(err)
    }
}

impl From<ValidationErrors> for JoblyError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Invalid(errors)
    }
}

impl From<bcrypt::BcryptError> for JoblyError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::Password(err.to_string())
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for JoblyError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
