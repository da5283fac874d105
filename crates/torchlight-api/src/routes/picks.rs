//! Routes for the Weekly Picks context.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use torchlight_core::command::Command;
use tracing::{info, instrument};
use uuid::Uuid;

use torchlight_picks::application::query_handlers::{self, PickView};
use torchlight_picks::application::command_handlers;
use torchlight_picks::domain::commands;

use crate::actor::Actor;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /picks.
#[derive(Debug, Deserialize)]
pub struct SubmitPickRequest {
    /// The league the pick is for.
    pub league_id: Uuid,
    /// The episode the pick is for.
    pub episode_id: Uuid,
    /// The contestant picked from the caller's roster.
    pub contestant_id: Uuid,
}

/// Response body returned after a pick is stored.
#[derive(Debug, Serialize)]
pub struct SubmitPickResponse {
    /// The stored pick.
    pub pick: PickView,
    /// IDs of the domain events produced.
    pub event_ids: Vec<Uuid>,
}

/// POST /picks
#[instrument(
    skip(state, request),
    fields(participant_id = %actor.0, league_id = %request.league_id, episode_id = %request.episode_id)
)]
async fn submit_pick(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<SubmitPickRequest>,
) -> Result<Json<SubmitPickResponse>, ApiError> {
    let command = commands::SubmitPick {
        correlation_id: Uuid::new_v4(),
        league_id: request.league_id,
        participant_id: actor.0,
        episode_id: request.episode_id,
        contestant_id: request.contestant_id,
    };

    info!(
        correlation_id = %command.correlation_id(),
        command_type = command.command_type(),
        "handling command"
    );

    let result = command_handlers::handle_submit_pick(
        &command,
        state.clock.as_ref(),
        &*state.pick_store,
        &*state.outbox,
    )
    .await?;

    Ok(Json(SubmitPickResponse {
        pick: PickView::from(result.pick),
        event_ids: result.events.iter().map(|e| e.metadata.event_id).collect(),
    }))
}

/// GET /leagues/{league_id}/episodes/{episode_id}/picks
async fn list_episode_picks(
    State(state): State<AppState>,
    Path((league_id, episode_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<PickView>>, ApiError> {
    let picks =
        query_handlers::list_episode_picks(league_id, episode_id, &*state.pick_store).await?;
    Ok(Json(picks))
}

/// GET /leagues/{league_id}/episodes/{episode_id}/picks/{participant_id}
async fn get_pick(
    State(state): State<AppState>,
    Path((league_id, episode_id, participant_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<Json<PickView>, ApiError> {
    let pick =
        query_handlers::get_pick(league_id, participant_id, episode_id, &*state.pick_store)
            .await?;
    Ok(Json(pick))
}

/// Returns the router for the picks context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/picks", post(submit_pick))
        .route(
            "/leagues/{league_id}/episodes/{episode_id}/picks",
            get(list_episode_picks),
        )
        .route(
            "/leagues/{league_id}/episodes/{episode_id}/picks/{participant_id}",
            get(get_pick),
        )
}
