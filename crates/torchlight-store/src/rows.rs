//! Row shapes returned by queries, converted into core entities.
//!
//! Statuses are stored as text; an unknown value fails the conversion with
//! `StoreUnavailable`, since it means the database holds data this build
//! cannot interpret.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use torchlight_core::error::DomainError;
use torchlight_core::model::{
    Contestant, Episode, EpisodeScore, League, LeagueMember, RosterEntry, RosterSlot,
    ScoringRule, ScoringSession, Season, WeeklyPick,
};
use uuid::Uuid;

#[derive(Debug, FromRow)]
pub(crate) struct SeasonRow {
    id: Uuid,
    name: String,
    status: String,
}

impl TryFrom<SeasonRow> for Season {
    type Error = DomainError;

    fn try_from(row: SeasonRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            name: row.name,
            status: row.status.parse()?,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct EpisodeRow {
    id: Uuid,
    season_id: Uuid,
    number: i32,
    air_date: NaiveDate,
    picks_lock_at: DateTime<Utc>,
    is_scored: bool,
}

impl From<EpisodeRow> for Episode {
    fn from(row: EpisodeRow) -> Self {
        Self {
            id: row.id,
            season_id: row.season_id,
            number: row.number,
            air_date: row.air_date,
            picks_lock_at: row.picks_lock_at,
            is_scored: row.is_scored,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct LeagueRow {
    id: Uuid,
    season_id: Uuid,
    name: String,
    status: String,
}

impl TryFrom<LeagueRow> for League {
    type Error = DomainError;

    fn try_from(row: LeagueRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            season_id: row.season_id,
            name: row.name,
            status: row.status.parse()?,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct MemberRow {
    league_id: Uuid,
    participant_id: Uuid,
    total_points: i64,
    rank: Option<i32>,
    is_eliminated: bool,
    joined_at: DateTime<Utc>,
}

impl From<MemberRow> for LeagueMember {
    fn from(row: MemberRow) -> Self {
        Self {
            league_id: row.league_id,
            participant_id: row.participant_id,
            total_points: row.total_points,
            rank: row.rank,
            is_eliminated: row.is_eliminated,
            joined_at: row.joined_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct ContestantRow {
    id: Uuid,
    season_id: Uuid,
    name: String,
    status: String,
    eliminated_episode_id: Option<Uuid>,
    placement: Option<i32>,
}

impl TryFrom<ContestantRow> for Contestant {
    type Error = DomainError;

    fn try_from(row: ContestantRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            season_id: row.season_id,
            name: row.name,
            status: row.status.parse()?,
            eliminated_episode_id: row.eliminated_episode_id,
            placement: row.placement,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct SlotRow {
    id: Uuid,
    league_id: Uuid,
    participant_id: Uuid,
    contestant_id: Uuid,
    draft_position: i32,
    drafted_at: DateTime<Utc>,
    dropped_at: Option<DateTime<Utc>>,
}

impl From<SlotRow> for RosterSlot {
    fn from(row: SlotRow) -> Self {
        Self {
            id: row.id,
            league_id: row.league_id,
            participant_id: row.participant_id,
            contestant_id: row.contestant_id,
            draft_position: row.draft_position,
            drafted_at: row.drafted_at,
            dropped_at: row.dropped_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct RosterRow {
    #[sqlx(flatten)]
    slot: SlotRow,
    contestant_status: String,
}

impl TryFrom<RosterRow> for RosterEntry {
    type Error = DomainError;

    fn try_from(row: RosterRow) -> Result<Self, Self::Error> {
        Ok(Self {
            slot: row.slot.into(),
            contestant_status: row.contestant_status.parse()?,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct RuleRow {
    id: Uuid,
    season_id: Option<Uuid>,
    code: String,
    name: String,
    points: i32,
}

impl From<RuleRow> for ScoringRule {
    fn from(row: RuleRow) -> Self {
        Self {
            id: row.id,
            season_id: row.season_id,
            code: row.code,
            name: row.name,
            points: row.points,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct PickRow {
    id: Uuid,
    league_id: Uuid,
    participant_id: Uuid,
    episode_id: Uuid,
    contestant_id: Uuid,
    status: String,
    picked_at: DateTime<Utc>,
    locked_at: Option<DateTime<Utc>>,
    points_earned: i64,
}

impl TryFrom<PickRow> for WeeklyPick {
    type Error = DomainError;

    fn try_from(row: PickRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            league_id: row.league_id,
            participant_id: row.participant_id,
            episode_id: row.episode_id,
            contestant_id: row.contestant_id,
            status: row.status.parse()?,
            picked_at: row.picked_at,
            locked_at: row.locked_at,
            points_earned: row.points_earned,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct SessionRow {
    id: Uuid,
    episode_id: Uuid,
    status: String,
    created_at: DateTime<Utc>,
    finalized_at: Option<DateTime<Utc>>,
    finalized_by: Option<Uuid>,
}

impl TryFrom<SessionRow> for ScoringSession {
    type Error = DomainError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            episode_id: row.episode_id,
            status: row.status.parse()?,
            created_at: row.created_at,
            finalized_at: row.finalized_at,
            finalized_by: row.finalized_by,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct ScoreRow {
    id: Uuid,
    episode_id: Uuid,
    contestant_id: Uuid,
    rule_id: Uuid,
    quantity: i32,
    points: i32,
    created_at: DateTime<Utc>,
}

impl From<ScoreRow> for EpisodeScore {
    fn from(row: ScoreRow) -> Self {
        Self {
            id: row.id,
            episode_id: row.episode_id,
            contestant_id: row.contestant_id,
            rule_id: row.rule_id,
            quantity: row.quantity,
            points: row.points,
            created_at: row.created_at,
        }
    }
}

/// Converts every row, failing on the first unreadable one.
pub(crate) fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, DomainError>
where
    T: TryFrom<R, Error = DomainError>,
{
    rows.into_iter().map(T::try_from).collect()
}
