//! Query handlers for the Weekly Picks context.

use chrono::{DateTime, Utc};
use serde::Serialize;
use torchlight_core::error::DomainError;
use torchlight_core::model::WeeklyPick;
use torchlight_core::status::PickStatus;
use torchlight_core::store::PickStore;
use uuid::Uuid;

/// Read-only view of a weekly pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickView {
    /// The pick identifier.
    pub pick_id: Uuid,
    /// The league identifier.
    pub league_id: Uuid,
    /// The participant identifier.
    pub participant_id: Uuid,
    /// The episode identifier.
    pub episode_id: Uuid,
    /// The selected contestant.
    pub contestant_id: Uuid,
    /// Lifecycle status.
    pub status: PickStatus,
    /// When the pick was made.
    pub picked_at: DateTime<Utc>,
    /// When the pick was locked.
    pub locked_at: Option<DateTime<Utc>>,
    /// Points credited at finalization.
    pub points_earned: i64,
}

impl From<WeeklyPick> for PickView {
    fn from(pick: WeeklyPick) -> Self {
        Self {
            pick_id: pick.id,
            league_id: pick.league_id,
            participant_id: pick.participant_id,
            episode_id: pick.episode_id,
            contestant_id: pick.contestant_id,
            status: pick.status,
            picked_at: pick.picked_at,
            locked_at: pick.locked_at,
            points_earned: pick.points_earned,
        }
    }
}

/// Retrieves one participant's pick for an episode.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if no pick exists.
pub async fn get_pick(
    league_id: Uuid,
    participant_id: Uuid,
    episode_id: Uuid,
    store: &dyn PickStore,
) -> Result<PickView, DomainError> {
    store
        .find_pick(league_id, participant_id, episode_id)
        .await?
        .map(PickView::from)
        .ok_or_else(|| DomainError::not_found("weekly_pick", episode_id))
}

/// Lists every pick of a league for an episode.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown league.
pub async fn list_episode_picks(
    league_id: Uuid,
    episode_id: Uuid,
    store: &dyn PickStore,
) -> Result<Vec<PickView>, DomainError> {
    if store.find_league(league_id).await?.is_none() {
        return Err(DomainError::not_found("league", league_id));
    }
    let mut picks: Vec<PickView> = store
        .episode_picks(league_id, episode_id)
        .await?
        .into_iter()
        .map(PickView::from)
        .collect();
    picks.sort_by_key(|p| p.picked_at);
    Ok(picks)
}
