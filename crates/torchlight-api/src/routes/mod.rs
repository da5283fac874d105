//! Route modules organized by pipeline context.

pub mod health;
pub mod jobs;
pub mod picks;
pub mod scoring;
pub mod standings;

use axum::Router;

use crate::state::AppState;

/// Every versioned route; the caller nests it under `/api/v1`.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(picks::router())
        .merge(scoring::router())
        .merge(standings::router())
        .nest("/jobs", jobs::router())
}
