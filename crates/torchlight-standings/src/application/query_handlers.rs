//! Query handlers for the Standings context.

use serde::Serialize;
use torchlight_core::error::DomainError;
use torchlight_core::store::StandingsStore;
use uuid::Uuid;

use crate::domain::weighted::{Leaderboard, build_leaderboard};

/// Read-only view of one league member's standing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandingView {
    /// Position in the league; `None` before the first standings run.
    pub rank: Option<i32>,
    /// Participant identifier.
    pub participant_id: Uuid,
    /// League total.
    pub total_points: i64,
    /// Whether the participant's torch has been snuffed.
    pub is_eliminated: bool,
}

/// Read-only view of a league table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeagueStandingsView {
    /// The league identifier.
    pub league_id: Uuid,
    /// Members ordered by rank; unranked members last.
    pub standings: Vec<StandingView>,
}

/// Read-only view of the cross-league leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedRankingsView {
    /// The season identifier.
    pub season_id: Uuid,
    /// The computed leaderboard.
    #[serde(flatten)]
    pub leaderboard: Leaderboard,
}

/// Retrieves a league's current table.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown league.
pub async fn get_league_standings(
    league_id: Uuid,
    store: &dyn StandingsStore,
) -> Result<LeagueStandingsView, DomainError> {
    if store.find_league(league_id).await?.is_none() {
        return Err(DomainError::not_found("league", league_id));
    }
    let mut standings: Vec<StandingView> = store
        .league_members(league_id)
        .await?
        .into_iter()
        .map(|m| StandingView {
            rank: m.rank,
            participant_id: m.participant_id,
            total_points: m.total_points,
            is_eliminated: m.is_eliminated,
        })
        .collect();
    standings.sort_by_key(|s| (s.rank.is_none(), s.rank));
    Ok(LeagueStandingsView {
        league_id,
        standings,
    })
}

/// Computes the weighted cross-league leaderboard for a season from the
/// current member totals. Nothing is cached or written.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown season.
pub async fn get_weighted_rankings(
    season_id: Uuid,
    store: &dyn StandingsStore,
) -> Result<WeightedRankingsView, DomainError> {
    if store.find_season(season_id).await?.is_none() {
        return Err(DomainError::not_found("season", season_id));
    }
    let totals = store.season_member_totals(season_id).await?;
    Ok(WeightedRankingsView {
        season_id,
        leaderboard: build_leaderboard(&totals),
    })
}
