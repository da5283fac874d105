//! Command handlers for the Standings context.

use std::collections::HashMap;

use serde::Serialize;
use torchlight_core::clock::Clock;
use torchlight_core::error::DomainError;
use torchlight_core::event::EventMetadata;
use torchlight_core::store::StandingsStore;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::commands::RecalculateStandings;
use crate::domain::events::{
    LEAGUE_STANDINGS_RECALCULATED_EVENT_TYPE, LeagueStandingsRecalculated, StandingsEvent,
    StandingsEventKind,
};
use crate::domain::ranking::rank_members;

/// Per-league outcome of a standings run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeagueStandingsSummary {
    /// The league identifier.
    pub league_id: Uuid,
    /// Number of ranked members.
    pub member_count: usize,
}

/// Result of a standings run.
#[derive(Debug)]
pub struct RecalculateStandingsResult {
    /// The recomputed season.
    pub season_id: Uuid,
    /// One summary per active league.
    pub leagues: Vec<LeagueStandingsSummary>,
    /// Events describing the change.
    pub events: Vec<StandingsEvent>,
}

/// Handles `RecalculateStandings`: for every active league of the season,
/// totals each member's pick points from scratch, ranks them and writes the
/// whole league back in one store call.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown season, or the store's
/// error if a read or write fails.
#[instrument(skip_all, fields(season_id = %command.season_id))]
pub async fn handle_recalculate_standings(
    command: &RecalculateStandings,
    clock: &dyn Clock,
    store: &dyn StandingsStore,
) -> Result<RecalculateStandingsResult, DomainError> {
    if store.find_season(command.season_id).await?.is_none() {
        return Err(DomainError::not_found("season", command.season_id));
    }

    let mut leagues = Vec::new();
    let mut events = Vec::new();
    for league in store.active_leagues(command.season_id).await? {
        let members = store.league_members(league.id).await?;
        let totals: HashMap<Uuid, i64> = store
            .member_pick_points(league.id)
            .await?
            .into_iter()
            .collect();
        let rows = rank_members(&members, &totals);
        store.write_standings(league.id, &rows).await?;

        events.push(StandingsEvent {
            metadata: EventMetadata::new(
                LEAGUE_STANDINGS_RECALCULATED_EVENT_TYPE,
                league.id,
                command.correlation_id,
                clock,
            ),
            kind: StandingsEventKind::LeagueStandingsRecalculated(LeagueStandingsRecalculated {
                league_id: league.id,
                member_count: rows.len(),
                leader_id: rows.first().map(|r| r.participant_id),
            }),
        });
        leagues.push(LeagueStandingsSummary {
            league_id: league.id,
            member_count: rows.len(),
        });
    }

    info!(leagues = leagues.len(), "standings recalculated");
    Ok(RecalculateStandingsResult {
        season_id: command.season_id,
        leagues,
        events,
    })
}
