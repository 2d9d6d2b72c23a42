//! # jobly
//!
//! Companies, jobs and users stored in PostgreSQL.
//!
//! Every dynamic statement comes from one of two builders in [`sql`]:
//!
//! - **Filter queries**: optional filter keys become an AND-joined `WHERE`
//!   predicate with `$n` placeholders.
//! - **Partial updates**: a subset of columns becomes
//!   `UPDATE … SET … WHERE <id> = $n RETURNING …`.
//!
//! Identifiers are always program text; request data only ever reaches the
//! database as bound values.
//!
//! ```ignore
//! use jobly::{Company, CompanyFilters};
//!
//! let filters = CompanyFilters { min_employees: Some(30), ..Default::default() };
//! let companies = Company::filter(&client, &filters).await?;
//! ```
//!
//! The entity functions in [`models`] accept any [`GenericClient`]: a
//! `tokio_postgres::Client`, a transaction, or (with the `pool` feature) a
//! pooled `deadpool_postgres::Client`.

pub mod changeset;
pub mod client;
pub mod error;
pub mod models;
pub mod monitor;
pub mod password;
pub mod row;
pub mod sql;
pub mod validate;

pub use changeset::{ValidationCode, ValidationError, ValidationErrors};
pub use client::GenericClient;
pub use error::{JoblyError, JoblyResult};
pub use models::{
    Company, CompanyFilters, CompanyPatch, Job, JobFilters, JobPatch, NewCompany, NewJob, NewUser,
    User, UserPatch,
};
pub use password::PasswordHasher;
pub use row::{FromRow, RowExt};
pub use sql::{
    FilterField, FilterOp, FilterQueryBuilder, FilterSpec, GeneratedQuery, PartialUpdate,
    PartialUpdateSpec, SqlValue, build_filter, check_range, sql_for_partial_update,
};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config};
