use crate::error::ApiResult;
use crate::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use jobly::{Company, CompanyFilters, CompanyPatch, NewCompany};
use serde_json::{Value, json};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/companies", get(list).post(create))
        .route("/companies/:handle", get(show).patch(update).delete(remove))
}

/// `GET /companies?search=&minEmployees=&maxEmployees=`
async fn list(
    State(state): State<AppState>,
    filters: Result<Query<CompanyFilters>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(filters) = filters?;
    let client = state.client().await?;
    let companies = Company::filter(&client, &filters).await?;
    Ok(Json(json!({ "companies": companies })))
}

async fn create(
    State(state): State<AppState>,
    body: Result<Json<NewCompany>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(new) = body?;
    let client = state.client().await?;
    let company = Company::create(&client, &new).await?;
    Ok((StatusCode::CREATED, Json(json!({ "company": company }))))
}

async fn show(
    State(state): State<AppState>,
    handle: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(handle) = handle?;
    let client = state.client().await?;
    let company = Company::get(&client, &handle).await?;
    Ok(Json(json!({ "company": company })))
}

async fn update(
    State(state): State<AppState>,
    handle: Result<Path<String>, PathRejection>,
    body: Result<Json<CompanyPatch>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Path(handle) = handle?;
    let Json(patch) = body?;
    let client = state.client().await?;
    let company = Company::update(&client, &handle, &patch).await?;
    Ok(Json(json!({ "company": company })))
}

async fn remove(
    State(state): State<AppState>,
    handle: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(handle) = handle?;
    let client = state.client().await?;
    Company::delete(&client, &handle).await?;
    Ok(Json(json!({ "message": "Company deleted" })))
}
