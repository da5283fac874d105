//! Command handlers for the Scoring context.
//!
//! Finalization commits in one store transaction, which also flags members
//! left without an active contestant. Notifications and the standings run
//! happen afterwards; a standings failure is logged and left to the
//! scheduled recalculation, never undoing or failing the commit.

use serde::Serialize;
use torchlight_core::cache::SeasonConfigCache;
use torchlight_core::clock::Clock;
use torchlight_core::error::DomainError;
use torchlight_core::event::EventMetadata;
use torchlight_core::model::{
    AffectedMember, Contestant, EliminationRecord, ScoringRule, ScoringSession,
};
use torchlight_core::outbox::{
    Notification, NotificationKind, NotificationOutbox, Priority, submit_or_log,
};
use torchlight_core::status::ContestantStatus;
use torchlight_core::store::{ScoringStore, StandingsStore};
use torchlight_standings::application::command_handlers::handle_recalculate_standings;
use torchlight_standings::domain::commands::RecalculateStandings;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::domain::cascade::{RosterOutcome, classify};
use crate::domain::commands::{
    ClearElimination, FinalizeScoring, RecordElimination, SaveScores, StartScoringSession,
};
use crate::domain::entries::{build_score_rows, ensure_session_open};
use crate::domain::events::{
    ELIMINATION_CLEARED_EVENT_TYPE, ELIMINATION_RECORDED_EVENT_TYPE,
    EPISODE_FINALIZED_EVENT_TYPE, EliminationCleared, EliminationRecorded, EpisodeFinalized,
    SCORES_SAVED_EVENT_TYPE, SCORING_SESSION_STARTED_EVENT_TYPE, ScoresSaved, ScoringEvent,
    ScoringEventKind, ScoringSessionStarted, TORCH_SNUFFED_EVENT_TYPE, TorchSnuffed,
};

/// Result of opening a scoring session.
#[derive(Debug)]
pub struct StartSessionResult {
    /// The draft session.
    pub session: ScoringSession,
    /// Contestants that still need scores.
    pub active_contestants: Vec<Contestant>,
    /// Season-specific and season-agnostic rules.
    pub rules: Vec<ScoringRule>,
    /// Events describing the change.
    pub events: Vec<ScoringEvent>,
}

/// Result of a score save.
#[derive(Debug)]
pub struct SaveScoresResult {
    /// Contestants whose rows were replaced.
    pub contestant_ids: Vec<Uuid>,
    /// Rows written in total.
    pub rows_written: usize,
    /// Events describing the change.
    pub events: Vec<ScoringEvent>,
}

/// A (league, participant) pair touched by the elimination cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemberRef {
    /// The league identifier.
    pub league_id: Uuid,
    /// The participant identifier.
    pub participant_id: Uuid,
}

/// What the elimination cascade did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CascadeOutcome {
    /// Members whose last contestant went out.
    pub torches_snuffed: Vec<MemberRef>,
    /// Members down to one contestant.
    pub alerted: Vec<MemberRef>,
}

/// Result of a finalization.
#[derive(Debug)]
pub struct FinalizeResult {
    /// The finalized episode.
    pub episode_id: Uuid,
    /// The episode's season.
    pub season_id: Uuid,
    /// Contestants eliminated by this commit.
    pub eliminated_contestant_ids: Vec<Uuid>,
    /// Episode total per contestant.
    pub contestant_totals: Vec<(Uuid, i64)>,
    /// Weekly picks credited with points.
    pub credited_picks: u64,
    /// Whether the standings run after the commit succeeded.
    pub standings_updated: bool,
    /// What the elimination cascade did.
    pub cascade: CascadeOutcome,
    /// Events describing the change.
    pub events: Vec<ScoringEvent>,
}

/// Handles `StartScoringSession`: returns the episode's draft session,
/// creating it on first call, with the contestants and rules to score
/// against.
///
/// # Errors
///
/// Returns `NotFound` for an unknown episode or season, `AlreadyFinalized`
/// once the episode is scored, and the store's error if a read or write
/// fails.
#[instrument(skip_all, fields(episode_id = %command.episode_id, actor_id = %command.actor_id))]
pub async fn handle_start_scoring_session(
    command: &StartScoringSession,
    clock: &dyn Clock,
    store: &dyn ScoringStore,
    cache: &SeasonConfigCache,
) -> Result<StartSessionResult, DomainError> {
    let episode = store
        .find_episode(command.episode_id)
        .await?
        .ok_or_else(|| DomainError::not_found("episode", command.episode_id))?;
    if episode.is_scored {
        return Err(DomainError::AlreadyFinalized {
            episode_id: episode.id,
        });
    }

    let existing = store.find_session(episode.id).await?;
    let session = match existing {
        Some(session) => session,
        None => store.open_session(episode.id, clock.now()).await?,
    };
    let session = ensure_session_open(&episode, Some(&session))?.clone();

    let config = cache.get_or_load(episode.season_id, store).await?;
    let active_contestants: Vec<Contestant> = store
        .season_contestants(episode.season_id)
        .await?
        .into_iter()
        .filter(|c| c.status == ContestantStatus::Active)
        .collect();

    info!(
        session_id = %session.id,
        contestants = active_contestants.len(),
        rules = config.rules.len(),
        "scoring session ready"
    );

    let event = ScoringEvent {
        metadata: EventMetadata::new(
            SCORING_SESSION_STARTED_EVENT_TYPE,
            session.id,
            command.correlation_id,
            clock,
        ),
        kind: ScoringEventKind::ScoringSessionStarted(ScoringSessionStarted {
            session_id: session.id,
            episode_id: episode.id,
        }),
    };

    Ok(StartSessionResult {
        session,
        active_contestants,
        rules: config.rules.clone(),
        events: vec![event],
    })
}

/// Handles `SaveScores`: validates every entry, then for each contestant
/// named replaces their score rows with the new set.
///
/// Nothing is written if any entry is invalid.
///
/// # Errors
///
/// Returns `NotFound` for an unknown episode or a missing session,
/// `AlreadyFinalized` once the episode is scored, `InvalidSelection` for a
/// bad entry, and the store's error if a read or write fails.
#[instrument(
    skip_all,
    fields(episode_id = %command.episode_id, actor_id = %command.actor_id, entries = command.entries.len())
)]
pub async fn handle_save_scores(
    command: &SaveScores,
    clock: &dyn Clock,
    store: &dyn ScoringStore,
    cache: &SeasonConfigCache,
) -> Result<SaveScoresResult, DomainError> {
    let episode = store
        .find_episode(command.episode_id)
        .await?
        .ok_or_else(|| DomainError::not_found("episode", command.episode_id))?;
    let session = store.find_session(episode.id).await?;
    ensure_session_open(&episode, session.as_ref())?;

    let config = cache.get_or_load(episode.season_id, store).await?;
    let contestants = store.season_contestants(episode.season_id).await?;
    let grouped = build_score_rows(
        &episode,
        &command.entries,
        &config,
        &contestants,
        clock.now(),
    )?;

    let mut rows_written = 0;
    let mut contestant_ids = Vec::with_capacity(grouped.len());
    for (contestant_id, rows) in &grouped {
        store
            .replace_contestant_scores(episode.id, *contestant_id, rows)
            .await?;
        rows_written += rows.len();
        contestant_ids.push(*contestant_id);
    }

    info!(
        contestants = contestant_ids.len(),
        rows_written, "scores saved"
    );

    let event = ScoringEvent {
        metadata: EventMetadata::new(
            SCORES_SAVED_EVENT_TYPE,
            episode.id,
            command.correlation_id,
            clock,
        ),
        kind: ScoringEventKind::ScoresSaved(ScoresSaved {
            episode_id: episode.id,
            contestant_ids: contestant_ids.clone(),
            row_count: rows_written,
        }),
    };

    Ok(SaveScoresResult {
        contestant_ids,
        rows_written,
        events: vec![event],
    })
}

/// Handles `RecordElimination`: stores a placement that finalization will
/// turn into an elimination.
///
/// # Errors
///
/// Returns `NotFound` for an unknown episode, contestant or session,
/// `AlreadyFinalized` once the episode is scored, `InvalidSelection` for a
/// contestant outside the season, one already eliminated, or a placement
/// below 1, and the store's error if a read or write fails.
#[instrument(
    skip_all,
    fields(episode_id = %command.episode_id, contestant_id = %command.contestant_id)
)]
pub async fn handle_record_elimination(
    command: &RecordElimination,
    clock: &dyn Clock,
    store: &dyn ScoringStore,
) -> Result<Vec<ScoringEvent>, DomainError> {
    let episode = store
        .find_episode(command.episode_id)
        .await?
        .ok_or_else(|| DomainError::not_found("episode", command.episode_id))?;
    let session = store.find_session(episode.id).await?;
    ensure_session_open(&episode, session.as_ref())?;

    let contestant = store
        .find_contestant(command.contestant_id)
        .await?
        .ok_or_else(|| DomainError::not_found("contestant", command.contestant_id))?;
    if contestant.season_id != episode.season_id {
        return Err(DomainError::InvalidSelection(format!(
            "contestant {} is not part of this season",
            contestant.id
        )));
    }
    if contestant.status != ContestantStatus::Active {
        return Err(DomainError::InvalidSelection(format!(
            "contestant {} is already eliminated",
            contestant.id
        )));
    }
    if command.placement < 1 {
        return Err(DomainError::InvalidSelection(format!(
            "placement must be at least 1, got {}",
            command.placement
        )));
    }

    store
        .record_elimination(&EliminationRecord {
            episode_id: episode.id,
            contestant_id: contestant.id,
            placement: command.placement,
        })
        .await?;
    info!(placement = command.placement, "elimination recorded");

    Ok(vec![ScoringEvent {
        metadata: EventMetadata::new(
            ELIMINATION_RECORDED_EVENT_TYPE,
            contestant.id,
            command.correlation_id,
            clock,
        ),
        kind: ScoringEventKind::EliminationRecorded(EliminationRecorded {
            episode_id: episode.id,
            contestant_id: contestant.id,
            placement: command.placement,
        }),
    }])
}

/// Handles `ClearElimination`.
///
/// # Errors
///
/// Returns `NotFound` for an unknown episode, a missing session or when no
/// placement was recorded, `AlreadyFinalized` once the episode is scored,
/// and the store's error if a read or write fails.
#[instrument(
    skip_all,
    fields(episode_id = %command.episode_id, contestant_id = %command.contestant_id)
)]
pub async fn handle_clear_elimination(
    command: &ClearElimination,
    clock: &dyn Clock,
    store: &dyn ScoringStore,
) -> Result<Vec<ScoringEvent>, DomainError> {
    let episode = store
        .find_episode(command.episode_id)
        .await?
        .ok_or_else(|| DomainError::not_found("episode", command.episode_id))?;
    let session = store.find_session(episode.id).await?;
    ensure_session_open(&episode, session.as_ref())?;

    if !store
        .clear_elimination(episode.id, command.contestant_id)
        .await?
    {
        return Err(DomainError::not_found("elimination", command.contestant_id));
    }
    info!("elimination cleared");

    Ok(vec![ScoringEvent {
        metadata: EventMetadata::new(
            ELIMINATION_CLEARED_EVENT_TYPE,
            command.contestant_id,
            command.correlation_id,
            clock,
        ),
        kind: ScoringEventKind::EliminationCleared(EliminationCleared {
            episode_id: episode.id,
            contestant_id: command.contestant_id,
        }),
    }])
}

/// Handles `FinalizeScoring`: commits the episode, then runs the
/// elimination cascade and recomputes the season's standings.
///
/// The commit claims the session with a conditional update, so of two
/// concurrent calls exactly one succeeds and the other fails with
/// `AlreadyFinalized` without re-running anything.
///
/// # Errors
///
/// Returns `NotFound` for an unknown episode or a missing session,
/// `AlreadyFinalized` on a repeat call, and the store's error if the
/// commit fails (in which case nothing was written).
#[instrument(skip_all, fields(episode_id = %command.episode_id, actor_id = %command.actor_id))]
pub async fn handle_finalize_scoring(
    command: &FinalizeScoring,
    clock: &dyn Clock,
    store: &dyn ScoringStore,
    standings_store: &dyn StandingsStore,
    outbox: &dyn NotificationOutbox,
) -> Result<FinalizeResult, DomainError> {
    let episode = store
        .find_episode(command.episode_id)
        .await?
        .ok_or_else(|| DomainError::not_found("episode", command.episode_id))?;

    let receipt = store
        .commit_finalization(episode.id, command.actor_id, clock.now())
        .await?;
    info!(
        season_id = %receipt.season_id,
        eliminated = receipt.eliminated_contestant_ids.len(),
        credited_picks = receipt.credited_picks,
        "episode finalized"
    );

    let mut events = vec![ScoringEvent {
        metadata: EventMetadata::new(
            EPISODE_FINALIZED_EVENT_TYPE,
            episode.id,
            command.correlation_id,
            clock,
        ),
        kind: ScoringEventKind::EpisodeFinalized(EpisodeFinalized {
            episode_id: episode.id,
            season_id: receipt.season_id,
            eliminated_contestant_ids: receipt.eliminated_contestant_ids.clone(),
            credited_picks: receipt.credited_picks,
        }),
    }];

    let cascade = run_elimination_cascade(
        command.correlation_id,
        outbox,
        &receipt.affected_members,
    );
    for member in &cascade.torches_snuffed {
        events.push(ScoringEvent {
            metadata: EventMetadata::new(
                TORCH_SNUFFED_EVENT_TYPE,
                member.participant_id,
                command.correlation_id,
                clock,
            ),
            kind: ScoringEventKind::TorchSnuffed(TorchSnuffed {
                league_id: member.league_id,
                participant_id: member.participant_id,
            }),
        });
    }

    let recalculate = RecalculateStandings {
        correlation_id: command.correlation_id,
        season_id: receipt.season_id,
    };
    let standings_updated =
        match handle_recalculate_standings(&recalculate, clock, standings_store).await {
            Ok(_) => true,
            Err(err) => {
                error!(error = %err, "standings recalculation after finalization failed");
                false
            }
        };

    Ok(FinalizeResult {
        episode_id: episode.id,
        season_id: receipt.season_id,
        eliminated_contestant_ids: receipt.eliminated_contestant_ids,
        contestant_totals: receipt.contestant_totals,
        credited_picks: receipt.credited_picks,
        standings_updated,
        cascade,
        events,
    })
}

/// Sends what each affected member is owed. The member flags were already
/// written by the commit; only notifications happen here.
fn run_elimination_cascade(
    correlation_id: Uuid,
    outbox: &dyn NotificationOutbox,
    affected: &[AffectedMember],
) -> CascadeOutcome {
    let mut outcome = CascadeOutcome::default();

    for member in affected {
        let member_ref = MemberRef {
            league_id: member.league_id,
            participant_id: member.participant_id,
        };

        match classify(member.remaining_contestants.len()) {
            RosterOutcome::TorchSnuffed if member.newly_eliminated => {
                info!(
                    league_id = %member.league_id,
                    participant_id = %member.participant_id,
                    "torch snuffed"
                );
                submit_or_log(
                    outbox,
                    Notification::new(
                        member.participant_id,
                        NotificationKind::TorchSnuffed,
                        Priority::Guaranteed,
                        correlation_id,
                    )
                    .with_var("league_name", member.league_name.clone()),
                );
                outcome.torches_snuffed.push(member_ref);
            }
            RosterOutcome::LastContestant => {
                submit_or_log(
                    outbox,
                    Notification::new(
                        member.participant_id,
                        NotificationKind::EliminationAlert,
                        Priority::BestEffort,
                        correlation_id,
                    )
                    .with_var("league_name", member.league_name.clone())
                    .with_var("remaining_contestant", member.remaining_contestants[0].clone()),
                );
                outcome.alerted.push(member_ref);
            }
            RosterOutcome::TorchSnuffed | RosterOutcome::Safe => {}
        }
    }

    outcome
}
