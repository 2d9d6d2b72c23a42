use super::{blank_as_none, non_blank};
use crate::changeset::ValidationErrors;
use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::row::{FromRow, RowExt};
use crate::sql::{
    FilterField, FilterQueryBuilder, FilterSpec, GeneratedQuery, PartialUpdate,
    PartialUpdateSpec, SqlValue,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

const COLUMNS: &str = "id, title, salary, equity, company_handle, date_posted";

pub const JOB_FILTERS: FilterQueryBuilder = FilterQueryBuilder::new(&[
    FilterField::contains("search", "title"),
    FilterField::gt("minSalary", "salary"),
    FilterField::gt("minEquity", "equity"),
]);

const UPDATE: PartialUpdate = PartialUpdate::new("jobs", "id");

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: f64,
    pub equity: f64,
    pub company_handle: String,
    pub date_posted: DateTime<Utc>,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("company_handle")?,
            date_posted: row.try_get_column("date_posted")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewJob {
    pub title: String,
    pub salary: f64,
    pub equity: f64,
    pub company_handle: String,
}

fn check_salary(errors: &mut ValidationErrors, salary: f64) {
    errors.in_range("salary", salary, Some(0.0), None);
}

fn check_equity(errors: &mut ValidationErrors, equity: f64) {
    errors.in_range("equity", equity, Some(0.0), Some(1.0));
}

impl NewJob {
    pub fn validate(&self) -> JoblyResult<()> {
        let mut errors = ValidationErrors::new();
        errors.require_non_blank("title", &self.title);
        check_salary(&mut errors, self.salary);
        check_equity(&mut errors, self.equity);
        errors.require_non_blank("company_handle", &self.company_handle);
        errors.into_result()
    }
}

/// A job keeps its company; only the posting itself can change.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub salary: Option<f64>,
    #[serde(default)]
    pub equity: Option<f64>,
}

impl JobPatch {
    pub fn validate(&self) -> JoblyResult<()> {
        let mut errors = ValidationErrors::new();
        if let Some(title) = &self.title {
            errors.require_non_blank("title", title);
        }
        if let Some(salary) = self.salary {
            check_salary(&mut errors, salary);
        }
        if let Some(equity) = self.equity {
            check_equity(&mut errors, equity);
        }
        errors.into_result()
    }

    pub fn to_update_spec(&self) -> PartialUpdateSpec {
        let mut fields = PartialUpdateSpec::new();
        fields
            .set_opt("title", self.title.clone())
            .set_opt("salary", self.salary)
            .set_opt("equity", self.equity);
        fields
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFilters {
    pub search: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub min_salary: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub min_equity: Option<f64>,
}

impl JobFilters {
    pub fn to_filter_spec(&self) -> FilterSpec {
        let mut spec = FilterSpec::new();
        spec.insert_opt("search", non_blank(&self.search))
            .insert_opt("minSalary", self.min_salary)
            .insert_opt("minEquity", self.min_equity);
        spec
    }
}

impl Job {
    /// Jobs matching `filters`, newest first.
    ///
    /// No filter keys lists every job. When keys are present and nothing
    /// matches, fails with [`JoblyError::NoMatch`].
    pub async fn filter(conn: &impl GenericClient, filters: &JobFilters) -> JoblyResult<Vec<Self>> {
        let predicate = JOB_FILTERS.build(&filters.to_filter_spec());
        let filtered = !predicate.is_empty();
        let jobs: Vec<Self> = predicate
            .into_statement(
                &format!("SELECT {COLUMNS} FROM jobs"),
                "ORDER BY date_posted DESC, id DESC",
            )
            .fetch_all_as(conn)
            .await?;

        if filtered && jobs.is_empty() {
            return Err(JoblyError::no_match("No jobs found"));
        }
        Ok(jobs)
    }

    pub async fn get(conn: &impl GenericClient, id: i32) -> JoblyResult<Self> {
        GeneratedQuery::new(
            format!("SELECT {COLUMNS} FROM jobs WHERE id = $1"),
            vec![SqlValue::from(id)],
        )
        .fetch_opt_as(conn)
        .await?
        .ok_or_else(|| JoblyError::not_found("Job not found"))
    }

    /// Insert a posting; `id` and `date_posted` are assigned by the store.
    pub async fn create(conn: &impl GenericClient, new: &NewJob) -> JoblyResult<Self> {
        new.validate()?;

        GeneratedQuery::new(
            format!(
                "INSERT INTO jobs (title, salary, equity, company_handle) \
                 VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
            ),
            vec![
                new.title.as_str().into(),
                new.salary.into(),
                new.equity.into(),
                new.company_handle.as_str().into(),
            ],
        )
        .fetch_opt_as(conn)
        .await?
        .ok_or_else(|| JoblyError::Other("INSERT returned no row".to_string()))
    }

    pub async fn update(conn: &impl GenericClient, id: i32, patch: &JobPatch) -> JoblyResult<Self> {
        patch.validate()?;

        UPDATE
            .build(&patch.to_update_spec(), id)?
            .fetch_opt_as(conn)
            .await?
            .ok_or_else(|| JoblyError::not_found("Job does not exist"))
    }

    pub async fn delete(conn: &impl GenericClient, id: i32) -> JoblyResult<()> {
        let deleted = GeneratedQuery::new("DELETE FROM jobs WHERE id = $1", vec![SqlValue::from(id)])
            .execute(conn)
            .await?;

        if deleted == 0 {
            return Err(JoblyError::not_found("Job does not exist"));
        }
        Ok(())
    }
}
