//! Torchlight: HTTP API.
//!
//! Thin axum layer over the pipeline contexts: each route builds a command
//! or query, calls the owning context's handler with the stores held in
//! [`state::AppState`], and maps `DomainError` to a JSON error body.

pub mod actor;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

#[cfg(test)]
mod test_helpers;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the full application router: `/health` plus every versioned route
/// under `/api/v1`.
pub fn app(state: AppState) -> Router {
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
