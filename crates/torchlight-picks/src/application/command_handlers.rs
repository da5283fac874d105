//! Command handlers for the Weekly Picks context.
//!
//! Each handler validates against the store, performs the write, and only
//! then submits notifications to the outbox. A refused notification is
//! logged and never turns a committed write into an error.

use std::collections::HashSet;

use serde::Serialize;
use torchlight_core::clock::Clock;
use torchlight_core::command::Command;
use torchlight_core::error::DomainError;
use torchlight_core::event::EventMetadata;
use torchlight_core::model::{Episode, League, WeeklyPick};
use torchlight_core::outbox::{
    Notification, NotificationKind, NotificationOutbox, Priority, submit_or_log,
};
use torchlight_core::status::PickStatus;
use torchlight_core::store::PickStore;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::domain::commands::{AutoFillPicks, LockPicks, SubmitPick};
use crate::domain::eligibility::{
    ensure_active_member, ensure_episode_open, ensure_pickable, ensure_revisable,
    select_fallback,
};
use crate::domain::events::{
    PICK_AUTO_ASSIGNED_EVENT_TYPE, PICK_SUBMITTED_EVENT_TYPE, PICKS_LOCKED_EVENT_TYPE,
    PickAutoAssigned, PickEvent, PickEventKind, PickSubmitted, PicksLocked,
};

/// Result of a successfully submitted pick.
#[derive(Debug)]
pub struct SubmitPickResult {
    /// The stored pick.
    pub pick: WeeklyPick,
    /// Events describing the change.
    pub events: Vec<PickEvent>,
}

/// Per-episode outcome of a lock sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpisodeLockSummary {
    /// The swept episode.
    pub episode_id: Uuid,
    /// Picks moved from pending to locked by this run.
    pub locked: u64,
}

/// Result of a lock sweep.
#[derive(Debug, Default)]
pub struct LockSweepResult {
    /// One summary per swept episode.
    pub episodes: Vec<EpisodeLockSummary>,
    /// Episodes whose sweep failed; retried by the next run.
    pub failed_episode_ids: Vec<Uuid>,
    /// Events describing the change.
    pub events: Vec<PickEvent>,
}

/// A member the resolver could not help: nothing left to pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnfillableMember {
    /// The league identifier.
    pub league_id: Uuid,
    /// The participant identifier.
    pub participant_id: Uuid,
    /// The episode identifier.
    pub episode_id: Uuid,
}

/// Result of an auto-fill run.
#[derive(Debug, Default)]
pub struct AutoFillResult {
    /// Picks inserted by this run.
    pub assigned: Vec<WeeklyPick>,
    /// Members without any active contestant.
    pub unfillable: Vec<UnfillableMember>,
    /// Events describing the change.
    pub events: Vec<PickEvent>,
}

/// Handles `SubmitPick`: validates deadline, membership and roster
/// eligibility, upserts the pending pick, then queues a confirmation.
///
/// # Errors
///
/// Returns `NotFound` for an unknown episode or league, `Forbidden` for a
/// non-member or closed league, `InvalidSelection` for an ineligible
/// contestant, `DeadlinePassed` once picks are frozen, and the store's error
/// if a read or write fails.
#[instrument(
    skip_all,
    fields(
        league_id = %command.league_id,
        participant_id = %command.participant_id,
        episode_id = %command.episode_id,
    )
)]
pub async fn handle_submit_pick(
    command: &SubmitPick,
    clock: &dyn Clock,
    store: &dyn PickStore,
    outbox: &dyn NotificationOutbox,
) -> Result<SubmitPickResult, DomainError> {
    let episode = store
        .find_episode(command.episode_id)
        .await?
        .ok_or_else(|| DomainError::not_found("episode", command.episode_id))?;
    let league = store
        .find_league(command.league_id)
        .await?
        .ok_or_else(|| DomainError::not_found("league", command.league_id))?;
    if league.season_id != episode.season_id {
        return Err(DomainError::InvalidSelection(format!(
            "episode {} is not part of league {}'s season",
            episode.id, league.id
        )));
    }

    let member = store
        .find_member(command.league_id, command.participant_id)
        .await?;
    ensure_active_member(&league, member.as_ref(), command.participant_id)?;

    let now = clock.now();
    ensure_episode_open(&episode, now)?;

    let existing = store
        .find_pick(command.league_id, command.participant_id, command.episode_id)
        .await?;
    ensure_revisable(existing.as_ref())?;

    let roster = store
        .roster(command.league_id, command.participant_id)
        .await?;
    ensure_pickable(&roster, command.contestant_id)?;
    let contestant = store
        .find_contestant(command.contestant_id)
        .await?
        .ok_or_else(|| DomainError::not_found("contestant", command.contestant_id))?;

    let candidate = WeeklyPick {
        id: existing.as_ref().map_or_else(Uuid::new_v4, |p| p.id),
        league_id: command.league_id,
        participant_id: command.participant_id,
        episode_id: command.episode_id,
        contestant_id: command.contestant_id,
        status: PickStatus::Pending,
        picked_at: now,
        locked_at: None,
        points_earned: 0,
    };
    // The row may have been locked between the check above and the write.
    let pick = store
        .upsert_pending_pick(&candidate)
        .await?
        .ok_or(DomainError::DeadlinePassed {
            episode_id: command.episode_id,
        })?;

    info!(
        correlation_id = %command.correlation_id(),
        pick_id = %pick.id,
        contestant_id = %pick.contestant_id,
        "pick submitted"
    );

    submit_or_log(
        outbox,
        Notification::new(
            command.participant_id,
            NotificationKind::PickConfirmation,
            Priority::BestEffort,
            command.correlation_id,
        )
        .with_var("contestant_name", contestant.name)
        .with_var("episode_number", episode.number.to_string())
        .with_var("league_name", league.name),
    );

    let event = PickEvent {
        metadata: EventMetadata::new(
            PICK_SUBMITTED_EVENT_TYPE,
            pick.id,
            command.correlation_id,
            clock,
        ),
        kind: PickEventKind::PickSubmitted(PickSubmitted {
            pick_id: pick.id,
            league_id: pick.league_id,
            participant_id: pick.participant_id,
            episode_id: pick.episode_id,
            contestant_id: pick.contestant_id,
        }),
    };

    Ok(SubmitPickResult {
        pick,
        events: vec![event],
    })
}

/// Handles `LockPicks`: freezes the pending picks of every unscored episode
/// whose deadline has passed. Running it again changes nothing.
///
/// A failure on one episode is logged and the sweep moves on; the next
/// scheduled run picks it up again.
///
/// # Errors
///
/// Returns the store's error if the lockable episodes cannot be listed.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id))]
pub async fn handle_lock_picks(
    command: &LockPicks,
    clock: &dyn Clock,
    store: &dyn PickStore,
) -> Result<LockSweepResult, DomainError> {
    let now = clock.now();
    let episodes = store.lockable_episodes(now).await?;
    let mut result = LockSweepResult::default();

    for episode in episodes {
        match store.lock_pending_picks(episode.id, now).await {
            Ok(locked) => {
                if locked > 0 {
                    info!(episode_id = %episode.id, locked, "picks locked");
                    result.events.push(PickEvent {
                        metadata: EventMetadata::new(
                            PICKS_LOCKED_EVENT_TYPE,
                            episode.id,
                            command.correlation_id,
                            clock,
                        ),
                        kind: PickEventKind::PicksLocked(PicksLocked {
                            episode_id: episode.id,
                            locked_count: locked,
                        }),
                    });
                }
                result.episodes.push(EpisodeLockSummary {
                    episode_id: episode.id,
                    locked,
                });
            }
            Err(err) => {
                error!(episode_id = %episode.id, error = %err, "lock sweep failed for episode");
                result.failed_episode_ids.push(episode.id);
            }
        }
    }

    Ok(result)
}

/// Handles `AutoFillPicks`: for every past-deadline unscored episode and
/// every active league of its season, gives each member without a pick the
/// first active contestant in roster order, then queues an auto-pick alert.
///
/// The insert only succeeds when no pick exists, so repeated or concurrent
/// runs never produce a second pick for the same member.
///
/// # Errors
///
/// Returns the store's error if a read or write fails.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id))]
pub async fn handle_auto_fill_picks(
    command: &AutoFillPicks,
    clock: &dyn Clock,
    store: &dyn PickStore,
    outbox: &dyn NotificationOutbox,
) -> Result<AutoFillResult, DomainError> {
    let now = clock.now();
    let episodes = store.lockable_episodes(now).await?;
    let mut result = AutoFillResult::default();

    for episode in &episodes {
        for league in store.active_leagues(episode.season_id).await? {
            fill_league(command, clock, store, outbox, episode, &league, &mut result).await?;
        }
    }

    info!(
        assigned = result.assigned.len(),
        unfillable = result.unfillable.len(),
        "auto-fill complete"
    );
    Ok(result)
}

#[allow(clippy::too_many_arguments)]
async fn fill_league(
    command: &AutoFillPicks,
    clock: &dyn Clock,
    store: &dyn PickStore,
    outbox: &dyn NotificationOutbox,
    episode: &Episode,
    league: &League,
    result: &mut AutoFillResult,
) -> Result<(), DomainError> {
    let picked: HashSet<Uuid> = store
        .episode_picks(league.id, episode.id)
        .await?
        .into_iter()
        .map(|p| p.participant_id)
        .collect();

    for member in store.league_members(league.id).await? {
        if member.is_eliminated || picked.contains(&member.participant_id) {
            continue;
        }

        let roster = store.roster(league.id, member.participant_id).await?;
        let Some(fallback) = select_fallback(&roster) else {
            warn!(
                league_id = %league.id,
                participant_id = %member.participant_id,
                episode_id = %episode.id,
                "no active contestant to auto-pick"
            );
            result.unfillable.push(UnfillableMember {
                league_id: league.id,
                participant_id: member.participant_id,
                episode_id: episode.id,
            });
            continue;
        };

        let pick = WeeklyPick {
            id: Uuid::new_v4(),
            league_id: league.id,
            participant_id: member.participant_id,
            episode_id: episode.id,
            contestant_id: fallback.slot.contestant_id,
            status: PickStatus::AutoPicked,
            picked_at: clock.now(),
            locked_at: None,
            points_earned: 0,
        };
        if !store.insert_auto_pick(&pick).await? {
            continue;
        }

        let contestant_name = store
            .find_contestant(pick.contestant_id)
            .await?
            .map(|c| c.name)
            .unwrap_or_default();
        submit_or_log(
            outbox,
            Notification::new(
                member.participant_id,
                NotificationKind::AutoPickAlert,
                Priority::BestEffort,
                command.correlation_id,
            )
            .with_var("contestant_name", contestant_name)
            .with_var("episode_number", episode.number.to_string())
            .with_var("league_name", league.name.clone()),
        );

        result.events.push(PickEvent {
            metadata: EventMetadata::new(
                PICK_AUTO_ASSIGNED_EVENT_TYPE,
                pick.id,
                command.correlation_id,
                clock,
            ),
            kind: PickEventKind::PickAutoAssigned(PickAutoAssigned {
                pick_id: pick.id,
                league_id: pick.league_id,
                participant_id: pick.participant_id,
                episode_id: pick.episode_id,
                contestant_id: pick.contestant_id,
            }),
        });
        result.assigned.push(pick);
    }
    Ok(())
}
