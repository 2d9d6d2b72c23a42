use super::{blank_as_none, non_blank, nullable};
use crate::changeset::ValidationErrors;
use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::row::{FromRow, RowExt};
use crate::sql::{
    FilterField, FilterQueryBuilder, FilterSpec, GeneratedQuery, PartialUpdate,
    PartialUpdateSpec, SqlValue, check_range,
};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

const COLUMNS: &str = "handle, name, description, num_employees, logo_url";
const RETURNING: &[&str] = &["handle", "name", "description", "num_employees", "logo_url"];

/// Query keys accepted by `GET /companies`.
pub const COMPANY_FILTERS: FilterQueryBuilder = FilterQueryBuilder::new(&[
    FilterField::contains("search", "name"),
    FilterField::gt("minEmployees", "num_employees"),
    FilterField::lt("maxEmployees", "num_employees"),
]);

const UPDATE: PartialUpdate = PartialUpdate::new("companies", "handle").returning(RETURNING);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: Option<String>,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl FromRow for Company {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            handle: row.try_get_column("handle")?,
            name: row.try_get_column("name")?,
            description: row.try_get_column("description")?,
            num_employees: row.try_get_column("num_employees")?,
            logo_url: row.try_get_column("logo_url")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub num_employees: Option<i32>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl NewCompany {
    pub fn validate(&self) -> JoblyResult<()> {
        let mut errors = ValidationErrors::new();
        errors.require_non_blank("handle", &self.handle);
        errors.require_non_blank("name", &self.name);
        if let Some(n) = self.num_employees {
            errors.in_range("num_employees", n, Some(0), None);
        }
        if let Some(url) = &self.logo_url {
            errors.url("logo_url", url);
        }
        errors.into_result()
    }
}

/// Fields a `PATCH /companies/:handle` body may change.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompanyPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub num_employees: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub logo_url: Option<Option<String>>,
}

impl CompanyPatch {
    pub fn validate(&self) -> JoblyResult<()> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name {
            errors.require_non_blank("name", name);
        }
        if let Some(Some(n)) = self.num_employees {
            errors.in_range("num_employees", n, Some(0), None);
        }
        if let Some(Some(url)) = &self.logo_url {
            errors.url("logo_url", url);
        }
        errors.into_result()
    }

    pub fn to_update_spec(&self) -> PartialUpdateSpec {
        let mut fields = PartialUpdateSpec::new();
        fields
            .set_opt("name", self.name.clone())
            .set_opt("description", self.description.clone())
            .set_opt("num_employees", self.num_employees)
            .set_opt("logo_url", self.logo_url.clone());
        fields
    }
}

/// Query-string filters for listing companies.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyFilters {
    pub search: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub min_employees: Option<i32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub max_employees: Option<i32>,
}

impl CompanyFilters {
    pub fn check_range(&self) -> JoblyResult<()> {
        check_range(
            self.min_employees,
            self.max_employees,
            "minEmployees",
            "maxEmployees",
        )
    }

    pub fn to_filter_spec(&self) -> FilterSpec {
        let mut spec = FilterSpec::new();
        spec.insert_opt("search", non_blank(&self.search))
            .insert_opt("minEmployees", self.min_employees)
            .insert_opt("maxEmployees", self.max_employees);
        spec
    }
}

impl Company {
    /// Every company, ordered by name.
    pub async fn all(conn: &impl GenericClient) -> JoblyResult<Vec<Self>> {
        GeneratedQuery::raw(format!("SELECT {COLUMNS} FROM companies ORDER BY name"))
            .fetch_all_as(conn)
            .await
    }

    /// Companies matching `filters`.
    ///
    /// With no filter keys this is [`Company::all`]. When keys are present
    /// and nothing matches, fails with [`JoblyError::UnmatchedFilter`].
    pub async fn filter(conn: &impl GenericClient, filters: &CompanyFilters) -> JoblyResult<Vec<Self>> {
        filters.check_range()?;

        let predicate = COMPANY_FILTERS.build(&filters.to_filter_spec());
        let filtered = !predicate.is_empty();
        let companies: Vec<Self> = predicate
            .into_statement(&format!("SELECT {COLUMNS} FROM companies"), "ORDER BY name")
            .fetch_all_as(conn)
            .await?;

        if filtered && companies.is_empty() {
            return Err(JoblyError::unmatched_filter(
                "No companies exist with those parameters",
            ));
        }
        Ok(companies)
    }

    pub async fn get(conn: &impl GenericClient, handle: &str) -> JoblyResult<Self> {
        GeneratedQuery::new(
            format!("SELECT {COLUMNS} FROM companies WHERE handle = $1"),
            vec![SqlValue::from(handle)],
        )
        .fetch_opt_as(conn)
        .await?
        .ok_or_else(|| JoblyError::not_found("Company not found"))
    }

    pub async fn create(conn: &impl GenericClient, new: &NewCompany) -> JoblyResult<Self> {
        new.validate()?;

        GeneratedQuery::new(
            format!(
                "INSERT INTO companies ({COLUMNS}) VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
            ),
            vec![
                new.handle.as_str().into(),
                new.name.as_str().into(),
                new.description.clone().into(),
                new.num_employees.into(),
                new.logo_url.clone().into(),
            ],
        )
        .fetch_opt_as(conn)
        .await?
        .ok_or_else(|| JoblyError::Other("INSERT returned no row".to_string()))
    }

    pub async fn update(
        conn: &impl GenericClient,
        handle: &str,
        patch: &CompanyPatch,
    ) -> JoblyResult<Self> {
        patch.validate()?;

        UPDATE
            .build(&patch.to_update_spec(), handle)?
            .fetch_opt_as(conn)
            .await?
            .ok_or_else(|| JoblyError::not_found("Company does not exist"))
    }

    pub async fn delete(conn: &impl GenericClient, handle: &str) -> JoblyResult<()> {
        let deleted = GeneratedQuery::new(
            "DELETE FROM companies WHERE handle = $1",
            vec![SqlValue::from(handle)],
        )
        .execute(conn)
        .await?;

        if deleted == 0 {
            return Err(JoblyError::not_found("Company does not exist"));
        }
        Ok(())
    }
}
