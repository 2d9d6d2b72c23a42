use crate::AppState;
use axum::Router;

mod companies;
mod jobs;
mod users;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(companies::router())
        .merge(jobs::router())
        .merge(users::router())
}
