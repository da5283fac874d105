//! Endpoints invoked by the external scheduler.
//!
//! Each job is idempotent; a failed run is logged and reported in the
//! response, and the next scheduled run picks up where it left off.

use axum::extract::{Path, State};
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use torchlight_core::command::Command;
use torchlight_core::error::DomainError;
use tracing::{error, info, instrument};
use uuid::Uuid;

use torchlight_picks::application::command_handlers::{
    self, EpisodeLockSummary, UnfillableMember,
};
use torchlight_picks::application::query_handlers::PickView;
use torchlight_picks::domain::commands;
use torchlight_picks::domain::events::PickEvent;

use crate::error::ApiError;
use crate::routes::standings::{RecalculateStandingsResponse, recalculate};
use crate::state::AppState;

/// Response body for POST /jobs/lock-picks.
#[derive(Debug, Serialize)]
pub struct LockPicksResponse {
    /// Per-episode counts of newly locked picks.
    pub episodes: Vec<EpisodeLockSummary>,
    /// Episodes left for the next run.
    pub failed_episode_ids: Vec<Uuid>,
    /// IDs of the domain events produced.
    pub event_ids: Vec<Uuid>,
}

/// Response body for POST /jobs/auto-fill-picks.
#[derive(Debug, Serialize)]
pub struct AutoFillPicksResponse {
    /// Picks assigned by this run.
    pub assigned: Vec<PickView>,
    /// Members with nobody left to pick.
    pub unfillable: Vec<UnfillableMember>,
    /// IDs of the domain events produced.
    pub event_ids: Vec<Uuid>,
}

/// Response body for POST /jobs/seasons/{season_id}/invalidate-config.
#[derive(Debug, Serialize)]
pub struct InvalidateConfigResponse {
    /// The season whose cached configuration was dropped.
    pub season_id: Uuid,
}

fn event_ids(events: &[PickEvent]) -> Vec<Uuid> {
    events.iter().map(|e| e.metadata.event_id).collect()
}

/// POST /jobs/lock-picks
#[instrument(skip(state))]
async fn lock_picks(State(state): State<AppState>) -> Result<Json<LockPicksResponse>, ApiError> {
    let command = commands::LockPicks {
        correlation_id: Uuid::new_v4(),
    };

    info!(
        correlation_id = %command.correlation_id(),
        command_type = command.command_type(),
        "running job"
    );

    let result =
        command_handlers::handle_lock_picks(&command, state.clock.as_ref(), &*state.pick_store)
            .await
            .inspect_err(|err| error!(error = %err, "lock_picks job failed"))?;

    Ok(Json(LockPicksResponse {
        event_ids: event_ids(&result.events),
        episodes: result.episodes,
        failed_episode_ids: result.failed_episode_ids,
    }))
}

/// POST /jobs/auto-fill-picks
#[instrument(skip(state))]
async fn auto_fill_picks(
    State(state): State<AppState>,
) -> Result<Json<AutoFillPicksResponse>, ApiError> {
    let command = commands::AutoFillPicks {
        correlation_id: Uuid::new_v4(),
    };

    info!(
        correlation_id = %command.correlation_id(),
        command_type = command.command_type(),
        "running job"
    );

    let result = command_handlers::handle_auto_fill_picks(
        &command,
        state.clock.as_ref(),
        &*state.pick_store,
        &*state.outbox,
    )
    .await
    .inspect_err(|err| error!(error = %err, "auto_fill_picks job failed"))?;

    Ok(Json(AutoFillPicksResponse {
        event_ids: event_ids(&result.events),
        assigned: result.assigned.into_iter().map(PickView::from).collect(),
        unfillable: result.unfillable,
    }))
}

/// POST /jobs/recalculate-standings
#[instrument(skip(state))]
async fn recalculate_active_season(
    State(state): State<AppState>,
) -> Result<Json<RecalculateStandingsResponse>, ApiError> {
    let season = state
        .standings_store
        .active_season()
        .await
        .inspect_err(|err| error!(error = %err, "recalculate_standings job failed"))?
        .ok_or_else(|| {
            error!("recalculate_standings job found no active season");
            DomainError::not_found("season", Uuid::nil())
        })?;

    recalculate(&state, season.id)
        .await
        .inspect_err(|err| error!(error = %err.0, "recalculate_standings job failed"))
        .map(Json)
}

/// POST /jobs/seasons/{season_id}/invalidate-config
///
/// Called after an admin edits a season or its rule catalog so the next
/// scoring call reloads instead of waiting out the TTL.
#[instrument(skip(state))]
async fn invalidate_season_config(
    State(state): State<AppState>,
    Path(season_id): Path<Uuid>,
) -> Json<InvalidateConfigResponse> {
    state.season_cache.invalidate(season_id);
    info!(%season_id, "season config invalidated");
    Json(InvalidateConfigResponse { season_id })
}

/// Returns the router for the scheduled jobs.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/lock-picks", post(lock_picks))
        .route("/auto-fill-picks", post(auto_fill_picks))
        .route("/recalculate-standings", post(recalculate_active_season))
        .route(
            "/seasons/{season_id}/invalidate-config",
            post(invalidate_season_config),
        )
}
