//! Pick eligibility rules and the fallback selection.

use chrono::{DateTime, Utc};
use torchlight_core::error::DomainError;
use torchlight_core::model::{Episode, League, LeagueMember, RosterEntry, WeeklyPick};
use torchlight_core::status::{LeagueStatus, PickStatus, Transition};
use uuid::Uuid;

/// Fails with `DeadlinePassed` once the episode's picks are frozen.
///
/// # Errors
///
/// Returns `DomainError::DeadlinePassed` if `now` is at or past
/// `picks_lock_at` or the episode has been scored.
pub fn ensure_episode_open(episode: &Episode, now: DateTime<Utc>) -> Result<(), DomainError> {
    if episode.picks_locked(now) {
        return Err(DomainError::DeadlinePassed {
            episode_id: episode.id,
        });
    }
    Ok(())
}

/// Requires an active league that the participant belongs to.
///
/// # Errors
///
/// Returns `DomainError::Forbidden` if the league is closed or the
/// participant is not a member.
pub fn ensure_active_member(
    league: &League,
    member: Option<&LeagueMember>,
    participant_id: Uuid,
) -> Result<(), DomainError> {
    if league.status != LeagueStatus::Active {
        return Err(DomainError::Forbidden(format!(
            "league {} is {}",
            league.id, league.status
        )));
    }
    if member.is_none() {
        return Err(DomainError::Forbidden(format!(
            "participant {participant_id} is not a member of league {}",
            league.id
        )));
    }
    Ok(())
}

/// Requires the contestant to sit on an undropped roster slot with active
/// status.
///
/// # Errors
///
/// Returns `DomainError::InvalidSelection` otherwise.
pub fn ensure_pickable(roster: &[RosterEntry], contestant_id: Uuid) -> Result<(), DomainError> {
    match roster.iter().find(|e| e.slot.contestant_id == contestant_id) {
        Some(entry) if entry.is_pickable() => Ok(()),
        Some(_) => Err(DomainError::InvalidSelection(format!(
            "contestant {contestant_id} is no longer active"
        ))),
        None => Err(DomainError::InvalidSelection(format!(
            "contestant {contestant_id} is not on the participant's roster"
        ))),
    }
}

/// Requires any existing pick to still accept a resubmission.
///
/// # Errors
///
/// Returns `DomainError::DeadlinePassed` if the stored pick is locked or
/// auto-picked.
pub fn ensure_revisable(existing: Option<&WeeklyPick>) -> Result<(), DomainError> {
    match existing {
        Some(pick) if pick.status.transition_to(PickStatus::Pending).is_err() => {
            Err(DomainError::DeadlinePassed {
                episode_id: pick.episode_id,
            })
        }
        _ => Ok(()),
    }
}

/// The fallback for a member without a pick: the first active contestant
/// in natural roster order.
#[must_use]
pub fn select_fallback(roster: &[RosterEntry]) -> Option<&RosterEntry> {
    roster.iter().find(|entry| entry.is_pickable())
}
