//! Routes for the Scoring context.

use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use torchlight_core::command::Command;
use torchlight_core::model::{Contestant, ScoringRule, ScoringSession};
use torchlight_scoring::application::command_handlers::{self, CascadeOutcome};
use torchlight_scoring::application::query_handlers::{
    self, EpisodeScoresView, ScoringStatusView,
};
use torchlight_scoring::domain::commands;
use torchlight_scoring::domain::entries::ScoreEntry;
use torchlight_scoring::domain::events::ScoringEvent;

use crate::actor::Actor;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for PUT /episodes/{episode_id}/scores.
#[derive(Debug, Deserialize)]
pub struct SaveScoresRequest {
    /// Rule counts per contestant; each named contestant's rows are
    /// replaced by exactly these.
    pub entries: Vec<ScoreEntry>,
}

/// Request body for PUT /episodes/{episode_id}/eliminations/{contestant_id}.
#[derive(Debug, Deserialize)]
pub struct RecordEliminationRequest {
    /// Final placement, 1 being the winner.
    pub placement: i32,
}

/// Response body for POST /episodes/{episode_id}/scoring-session.
#[derive(Debug, Serialize)]
pub struct ScoringSessionResponse {
    /// The draft session.
    pub session: ScoringSession,
    /// Contestants still in the game.
    pub active_contestants: Vec<Contestant>,
    /// Rules that may be scored.
    pub rules: Vec<ScoringRule>,
    /// IDs of the domain events produced.
    pub event_ids: Vec<Uuid>,
}

/// Response body for PUT /episodes/{episode_id}/scores.
#[derive(Debug, Serialize)]
pub struct SaveScoresResponse {
    /// Contestants whose rows were replaced.
    pub contestant_ids: Vec<Uuid>,
    /// Score rows written.
    pub rows_written: usize,
    /// IDs of the domain events produced.
    pub event_ids: Vec<Uuid>,
}

/// One contestant's point total for the finalized episode.
#[derive(Debug, Serialize)]
pub struct ContestantTotal {
    /// The contestant.
    pub contestant_id: Uuid,
    /// Points scored this episode.
    pub points: i64,
}

/// Response body for POST /episodes/{episode_id}/finalize.
#[derive(Debug, Serialize)]
pub struct FinalizeResponse {
    /// The finalized episode.
    pub episode_id: Uuid,
    /// The episode's season.
    pub season_id: Uuid,
    /// Contestants eliminated by this episode.
    pub eliminated_contestant_ids: Vec<Uuid>,
    /// Per-contestant totals.
    pub contestant_totals: Vec<ContestantTotal>,
    /// Weekly picks credited.
    pub credited_picks: u64,
    /// Whether the season's standings were recomputed.
    pub standings_updated: bool,
    /// Members whose torch went out or who were alerted.
    pub cascade: CascadeOutcome,
    /// IDs of the domain events produced.
    pub event_ids: Vec<Uuid>,
}

/// Response body for commands with no other result.
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    /// IDs of the domain events produced.
    pub event_ids: Vec<Uuid>,
}

fn event_ids(events: &[ScoringEvent]) -> Vec<Uuid> {
    events.iter().map(|e| e.metadata.event_id).collect()
}

/// POST /episodes/{episode_id}/scoring-session
#[instrument(skip(state), fields(actor_id = %actor.0))]
async fn start_scoring_session(
    State(state): State<AppState>,
    actor: Actor,
    Path(episode_id): Path<Uuid>,
) -> Result<Json<ScoringSessionResponse>, ApiError> {
    let command = commands::StartScoringSession {
        correlation_id: Uuid::new_v4(),
        episode_id,
        actor_id: actor.0,
    };

    info!(
        correlation_id = %command.correlation_id(),
        command_type = command.command_type(),
        "handling command"
    );

    let result = command_handlers::handle_start_scoring_session(
        &command,
        state.clock.as_ref(),
        &*state.scoring_store,
        &state.season_cache,
    )
    .await?;

    Ok(Json(ScoringSessionResponse {
        event_ids: event_ids(&result.events),
        session: result.session,
        active_contestants: result.active_contestants,
        rules: result.rules,
    }))
}

/// PUT /episodes/{episode_id}/scores
#[instrument(skip(state, request), fields(actor_id = %actor.0, entries = request.entries.len()))]
async fn save_scores(
    State(state): State<AppState>,
    actor: Actor,
    Path(episode_id): Path<Uuid>,
    Json(request): Json<SaveScoresRequest>,
) -> Result<Json<SaveScoresResponse>, ApiError> {
    let command = commands::SaveScores {
        correlation_id: Uuid::new_v4(),
        episode_id,
        actor_id: actor.0,
        entries: request.entries,
    };

    info!(
        correlation_id = %command.correlation_id(),
        command_type = command.command_type(),
        "handling command"
    );

    let result = command_handlers::handle_save_scores(
        &command,
        state.clock.as_ref(),
        &*state.scoring_store,
        &state.season_cache,
    )
    .await?;

    Ok(Json(SaveScoresResponse {
        event_ids: event_ids(&result.events),
        contestant_ids: result.contestant_ids,
        rows_written: result.rows_written,
    }))
}

/// GET /episodes/{episode_id}/scores
async fn get_episode_scores(
    State(state): State<AppState>,
    Path(episode_id): Path<Uuid>,
) -> Result<Json<EpisodeScoresView>, ApiError> {
    let view = query_handlers::get_episode_scores(episode_id, &*state.scoring_store).await?;
    Ok(Json(view))
}

/// GET /episodes/{episode_id}/scoring-status
async fn get_scoring_status(
    State(state): State<AppState>,
    Path(episode_id): Path<Uuid>,
) -> Result<Json<ScoringStatusView>, ApiError> {
    let view = query_handlers::get_scoring_status(episode_id, &*state.scoring_store).await?;
    Ok(Json(view))
}

/// PUT /episodes/{episode_id}/eliminations/{contestant_id}
#[instrument(skip(state, request), fields(actor_id = %actor.0, placement = request.placement))]
async fn record_elimination(
    State(state): State<AppState>,
    actor: Actor,
    Path((episode_id, contestant_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<RecordEliminationRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::RecordElimination {
        correlation_id: Uuid::new_v4(),
        episode_id,
        contestant_id,
        placement: request.placement,
        actor_id: actor.0,
    };

    info!(
        correlation_id = %command.correlation_id(),
        command_type = command.command_type(),
        "handling command"
    );

    let events = command_handlers::handle_record_elimination(
        &command,
        state.clock.as_ref(),
        &*state.scoring_store,
    )
    .await?;

    Ok(Json(CommandResponse {
        event_ids: event_ids(&events),
    }))
}

/// DELETE /episodes/{episode_id}/eliminations/{contestant_id}
#[instrument(skip(state), fields(actor_id = %actor.0))]
async fn clear_elimination(
    State(state): State<AppState>,
    actor: Actor,
    Path((episode_id, contestant_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::ClearElimination {
        correlation_id: Uuid::new_v4(),
        episode_id,
        contestant_id,
        actor_id: actor.0,
    };

    info!(
        correlation_id = %command.correlation_id(),
        command_type = command.command_type(),
        "handling command"
    );

    let events = command_handlers::handle_clear_elimination(
        &command,
        state.clock.as_ref(),
        &*state.scoring_store,
    )
    .await?;

    Ok(Json(CommandResponse {
        event_ids: event_ids(&events),
    }))
}

/// POST /episodes/{episode_id}/finalize
#[instrument(skip(state), fields(actor_id = %actor.0))]
async fn finalize_scoring(
    State(state): State<AppState>,
    actor: Actor,
    Path(episode_id): Path<Uuid>,
) -> Result<Json<FinalizeResponse>, ApiError> {
    let command = commands::FinalizeScoring {
        correlation_id: Uuid::new_v4(),
        episode_id,
        actor_id: actor.0,
    };

    info!(
        correlation_id = %command.correlation_id(),
        command_type = command.command_type(),
        "handling command"
    );

    let result = command_handlers::handle_finalize_scoring(
        &command,
        state.clock.as_ref(),
        &*state.scoring_store,
        &*state.standings_store,
        &*state.outbox,
    )
    .await?;

    Ok(Json(FinalizeResponse {
        event_ids: event_ids(&result.events),
        episode_id: result.episode_id,
        season_id: result.season_id,
        eliminated_contestant_ids: result.eliminated_contestant_ids,
        contestant_totals: result
            .contestant_totals
            .into_iter()
            .map(|(contestant_id, points)| ContestantTotal {
                contestant_id,
                points,
            })
            .collect(),
        credited_picks: result.credited_picks,
        standings_updated: result.standings_updated,
        cascade: result.cascade,
    }))
}

/// Returns the router for the scoring context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/episodes/{episode_id}/scoring-session",
            post(start_scoring_session),
        )
        .route(
            "/episodes/{episode_id}/scores",
            put(save_scores).get(get_episode_scores),
        )
        .route(
            "/episodes/{episode_id}/scoring-status",
            get(get_scoring_status),
        )
        .route(
            "/episodes/{episode_id}/eliminations/{contestant_id}",
            put(record_elimination).delete(clear_elimination),
        )
        .route("/episodes/{episode_id}/finalize", post(finalize_scoring))
}
