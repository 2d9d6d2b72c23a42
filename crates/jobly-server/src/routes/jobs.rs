use crate::error::ApiResult;
use crate::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use jobly::{Job, JobFilters, JobPatch, NewJob};
use serde_json::{Value, json};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(list).post(create))
        .route("/jobs/:id", get(show).patch(update).delete(remove))
}

/// `GET /jobs?search=&minSalary=&minEquity=`
async fn list(
    State(state): State<AppState>,
    filters: Result<Query<JobFilters>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(filters) = filters?;
    let client = state.client().await?;
    let jobs = Job::filter(&client, &filters).await?;
    Ok(Json(json!({ "jobs": jobs })))
}

async fn create(
    State(state): State<AppState>,
    body: Result<Json<NewJob>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(new) = body?;
    let client = state.client().await?;
    let job = Job::create(&client, &new).await?;
    Ok((StatusCode::CREATED, Json(json!({ "job": job }))))
}

async fn show(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(id) = id?;
    let client = state.client().await?;
    let job = Job::get(&client, id).await?;
    Ok(Json(json!({ "job": job })))
}

async fn update(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<JobPatch>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Path(id) = id?;
    let Json(patch) = body?;
    let client = state.client().await?;
    let job = Job::update(&client, id, &patch).await?;
    Ok(Json(json!({ "job": job })))
}

async fn remove(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(id) = id?;
    let client = state.client().await?;
    Job::delete(&client, id).await?;
    Ok(Json(json!({ "message": "Job deleted" })))
}
