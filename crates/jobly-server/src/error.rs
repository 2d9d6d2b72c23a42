//! JSON error responses.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use jobly::{JoblyError, ValidationErrors};
use serde::Serialize;

/// Every handler failure. Rendered as `{"status", "message", "errors"?}`.
#[derive(Debug)]
pub enum ApiError {
    Jobly(JoblyError),
    /// The request could not be decoded (bad JSON, query string or path).
    BadRequest(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    status: u16,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a ValidationErrors>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Jobly(err) => match err {
                JoblyError::EmptyUpdate
                | JoblyError::InvalidRange { .. }
                | JoblyError::UnmatchedFilter(_)
                | JoblyError::Invalid(_)
                | JoblyError::ForeignKeyViolation(_)
                | JoblyError::CheckViolation(_) => StatusCode::BAD_REQUEST,
                JoblyError::NoMatch(_) | JoblyError::NotFound(_) => StatusCode::NOT_FOUND,
                JoblyError::Unauthorized => StatusCode::UNAUTHORIZED,
                JoblyError::UniqueViolation(_) => StatusCode::CONFLICT,
                JoblyError::Pool(_) | JoblyError::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn message(&self) -> String {
        match self {
            Self::BadRequest(msg) => msg.clone(),
            Self::Jobly(JoblyError::Invalid(_)) => "Validation failed".to_string(),
            Self::Jobly(JoblyError::UniqueViolation(_)) => "Duplicate record".to_string(),
            Self::Jobly(JoblyError::ForeignKeyViolation(_)) => {
                "Referenced record does not exist".to_string()
            }
            Self::Jobly(JoblyError::CheckViolation(_)) => "Value out of range".to_string(),
            Self::Jobly(err) => err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
            status
                .canonical_reason()
                .unwrap_or("Internal Server Error")
                .to_string()
        } else {
            tracing::debug!(error = %self.message(), status = status.as_u16(), "request rejected");
            self.message()
        };

        let errors = match &self {
            Self::Jobly(JoblyError::Invalid(errors)) => Some(errors),
            _ => None,
        };

        let body = ErrorBody {
            status: status.as_u16(),
            message,
            errors,
        };
        (status, Json(body)).into_response()
    }
}

impl From<JoblyError> for ApiError {
    fn from(err: JoblyError) -> Self {
        Self::Jobly(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: JoblyError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn domain_errors_map_to_client_statuses() {
        assert_eq!(status_of(JoblyError::EmptyUpdate), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(JoblyError::InvalidRange {
                min_key: "minEmployees",
                max_key: "maxEmployees",
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(JoblyError::no_match("No jobs found")), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(JoblyError::unmatched_filter("No companies exist with those parameters")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(JoblyError::not_found("Company not found")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(status_of(JoblyError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(JoblyError::UniqueViolation("companies_pkey".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(JoblyError::ForeignKeyViolation("jobs_company_handle_fkey".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn server_errors_hide_details() {
        let err = ApiError::from(JoblyError::decode("salary", "wrong type"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ApiError::from(JoblyError::Pool("timed out".into())).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn messages_pass_through_for_client_errors() {
        let err = ApiError::from(JoblyError::not_found("Company not found"));
        assert_eq!(err.message(), "Company not found");

        let err = ApiError::from(JoblyError::InvalidRange {
            min_key: "minEmployees",
            max_key: "maxEmployees",
        });
        assert_eq!(err.message(), "Max value cannot be lower than min value");

        let err = ApiError::from(JoblyError::unmatched_filter(
            "No companies exist with those parameters",
        ));
        assert_eq!(err.message(), "No companies exist with those parameters");
    }

    #[test]
    fn validation_body_lists_fields() {
        let mut errors = ValidationErrors::new();
        errors.require_non_blank("name", "");
        let body = ErrorBody {
            status: 400,
            message: "Validation failed".into(),
            errors: Some(&errors),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["status"], 400);
        assert_eq!(json["errors"][0]["field"], "name");
        assert_eq!(json["errors"][0]["code"], "required");

        let bare = ErrorBody {
            status: 404,
            message: "User not found".into(),
            errors: None,
        };
        assert!(serde_json::to_value(&bare).unwrap().get("errors").is_none());
    }
}
