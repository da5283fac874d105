//! Routes for the Standings context.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use torchlight_core::command::Command;
use tracing::{info, instrument};
use uuid::Uuid;

use torchlight_standings::application::command_handlers::{
    self, LeagueStandingsSummary, RecalculateStandingsResult,
};
use torchlight_standings::application::query_handlers::{
    self, LeagueStandingsView, WeightedRankingsView,
};
use torchlight_standings::domain::commands;

use crate::error::ApiError;
use crate::state::AppState;

/// Response body returned after standings are recomputed.
#[derive(Debug, Serialize)]
pub struct RecalculateStandingsResponse {
    /// The recomputed season.
    pub season_id: Uuid,
    /// One summary per active league.
    pub leagues: Vec<LeagueStandingsSummary>,
    /// IDs of the domain events produced.
    pub event_ids: Vec<Uuid>,
}

impl From<RecalculateStandingsResult> for RecalculateStandingsResponse {
    fn from(result: RecalculateStandingsResult) -> Self {
        Self {
            season_id: result.season_id,
            event_ids: result.events.iter().map(|e| e.metadata.event_id).collect(),
            leagues: result.leagues,
        }
    }
}

/// Recomputes one season's standings; shared with the scheduled job.
pub(crate) async fn recalculate(
    state: &AppState,
    season_id: Uuid,
) -> Result<RecalculateStandingsResponse, ApiError> {
    let command = commands::RecalculateStandings {
        correlation_id: Uuid::new_v4(),
        season_id,
    };

    info!(
        correlation_id = %command.correlation_id(),
        command_type = command.command_type(),
        "handling command"
    );

    let result = command_handlers::handle_recalculate_standings(
        &command,
        state.clock.as_ref(),
        &*state.standings_store,
    )
    .await?;

    Ok(result.into())
}

/// POST /seasons/{season_id}/standings/recalculate
#[instrument(skip(state))]
async fn recalculate_standings(
    State(state): State<AppState>,
    Path(season_id): Path<Uuid>,
) -> Result<Json<RecalculateStandingsResponse>, ApiError> {
    recalculate(&state, season_id).await.map(Json)
}

/// GET /leagues/{league_id}/standings
async fn get_league_standings(
    State(state): State<AppState>,
    Path(league_id): Path<Uuid>,
) -> Result<Json<LeagueStandingsView>, ApiError> {
    let view = query_handlers::get_league_standings(league_id, &*state.standings_store).await?;
    Ok(Json(view))
}

/// GET /seasons/{season_id}/weighted-rankings
async fn get_weighted_rankings(
    State(state): State<AppState>,
    Path(season_id): Path<Uuid>,
) -> Result<Json<WeightedRankingsView>, ApiError> {
    let view = query_handlers::get_weighted_rankings(season_id, &*state.standings_store).await?;
    Ok(Json(view))
}

/// Returns the router for the standings context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/seasons/{season_id}/standings/recalculate",
            post(recalculate_standings),
        )
        .route("/leagues/{league_id}/standings", get(get_league_standings))
        .route(
            "/seasons/{season_id}/weighted-rankings",
            get(get_weighted_rankings),
        )
}
