use crate::error::ApiResult;
use crate::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use jobly::{NewUser, User, UserPatch};
use serde_json::{Value, json};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list).post(create))
        .route("/users/:username", get(show).patch(update).delete(remove))
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let client = state.client().await?;
    let users = User::all(&client).await?;
    Ok(Json(json!({ "users": users })))
}

async fn create(
    State(state): State<AppState>,
    body: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(new) = body?;
    let client = state.client().await?;
    let user = User::create(&client, &state.hasher, &new).await?;
    Ok((StatusCode::CREATED, Json(json!({ "user": user }))))
}

async fn show(
    State(state): State<AppState>,
    username: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(username) = username?;
    let client = state.client().await?;
    let user = User::get(&client, &username).await?;
    Ok(Json(json!({ "user": user })))
}

async fn update(
    State(state): State<AppState>,
    username: Result<Path<String>, PathRejection>,
    body: Result<Json<UserPatch>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Path(username) = username?;
    let Json(patch) = body?;
    let client = state.client().await?;
    let user = User::update(&client, &state.hasher, &username, &patch).await?;
    Ok(Json(json!({ "user": user })))
}

async fn remove(
    State(state): State<AppState>,
    username: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(username) = username?;
    let client = state.client().await?;
    User::delete(&client, &username).await?;
    Ok(Json(json!({ "message": "User deleted" })))
}
