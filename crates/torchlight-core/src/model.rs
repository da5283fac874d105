//! Entities of the season pipeline.
//!
//! These are plain data carriers shared by the store implementations and the
//! context crates. Status changes go through [`crate::status::Transition`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::status::{ContestantStatus, LeagueStatus, PickStatus, SeasonStatus, SessionStatus};

/// A broadcast season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    /// Season identifier.
    pub id: Uuid,
    /// Display name, e.g. "Season 47".
    pub name: String,
    /// Lifecycle status.
    pub status: SeasonStatus,
}

/// One aired episode of a season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    /// Episode identifier.
    pub id: Uuid,
    /// Owning season.
    pub season_id: Uuid,
    /// Episode number within the season.
    pub number: i32,
    /// Broadcast date.
    pub air_date: NaiveDate,
    /// Weekly picks are frozen from this instant on.
    pub picks_lock_at: DateTime<Utc>,
    /// One-way latch set by finalization.
    pub is_scored: bool,
}

impl Episode {
    /// Returns `true` when picks can no longer be written at `now`.
    #[must_use]
    pub fn picks_locked(&self, now: DateTime<Utc>) -> bool {
        self.is_scored || now >= self.picks_lock_at
    }
}

/// A group of participants playing within one season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    /// League identifier.
    pub id: Uuid,
    /// Owning season.
    pub season_id: Uuid,
    /// Display name.
    pub name: String,
    /// Lifecycle status.
    pub status: LeagueStatus,
}

/// A participant's aggregate standing within one league.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueMember {
    /// League identifier.
    pub league_id: Uuid,
    /// Participant identifier.
    pub participant_id: Uuid,
    /// Sum of points earned by the participant's weekly picks.
    pub total_points: i64,
    /// Position in the league; `None` until the first standings run.
    pub rank: Option<i32>,
    /// Set once every contestant on the roster is eliminated.
    pub is_eliminated: bool,
    /// When the participant joined; secondary standings sort key.
    pub joined_at: DateTime<Utc>,
}

/// A reality-show contestant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contestant {
    /// Contestant identifier.
    pub id: Uuid,
    /// Owning season.
    pub season_id: Uuid,
    /// Display name.
    pub name: String,
    /// Lifecycle status.
    pub status: ContestantStatus,
    /// Episode in which the contestant was eliminated.
    pub eliminated_episode_id: Option<Uuid>,
    /// Finishing placement, set together with elimination.
    pub placement: Option<i32>,
}

/// Ownership of one contestant by one participant within one league.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSlot {
    /// Slot identifier.
    pub id: Uuid,
    /// League identifier.
    pub league_id: Uuid,
    /// Owning participant.
    pub participant_id: Uuid,
    /// Owned contestant.
    pub contestant_id: Uuid,
    /// Draft order within the participant's roster.
    pub draft_position: i32,
    /// When the contestant was drafted.
    pub drafted_at: DateTime<Utc>,
    /// Soft-delete marker; dropped slots keep their scoring history.
    pub dropped_at: Option<DateTime<Utc>>,
}

/// An undropped roster slot joined with its contestant's status, in natural
/// roster order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    /// The slot.
    pub slot: RosterSlot,
    /// Status of the slot's contestant.
    pub contestant_status: ContestantStatus,
}

impl RosterEntry {
    /// Returns `true` if the slot's contestant can still be picked.
    #[must_use]
    pub fn is_pickable(&self) -> bool {
        self.slot.dropped_at.is_none() && self.contestant_status == ContestantStatus::Active
    }
}

/// A participant's active-contestant selection for one episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyPick {
    /// Pick identifier.
    pub id: Uuid,
    /// League identifier.
    pub league_id: Uuid,
    /// Participant identifier.
    pub participant_id: Uuid,
    /// Episode identifier.
    pub episode_id: Uuid,
    /// Selected contestant.
    pub contestant_id: Uuid,
    /// Lifecycle status.
    pub status: PickStatus,
    /// When the pick was submitted or auto-assigned.
    pub picked_at: DateTime<Utc>,
    /// When the lock sweep froze the pick.
    pub locked_at: Option<DateTime<Utc>>,
    /// Points credited at finalization.
    pub points_earned: i64,
}

/// A scoring rule from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRule {
    /// Rule identifier.
    pub id: Uuid,
    /// Season the rule applies to; `None` for season-agnostic rules.
    pub season_id: Option<Uuid>,
    /// Stable short code, e.g. `immunity_win`.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Points per unit of quantity; may be negative.
    pub points: i32,
}

/// The episode-scoped workspace for raw scoring facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringSession {
    /// Session identifier.
    pub id: Uuid,
    /// Episode identifier; one session per episode.
    pub episode_id: Uuid,
    /// Lifecycle status.
    pub status: SessionStatus,
    /// When the session was opened.
    pub created_at: DateTime<Utc>,
    /// When the session was finalized.
    pub finalized_at: Option<DateTime<Utc>>,
    /// Actor that finalized the session.
    pub finalized_by: Option<Uuid>,
}

/// One scoring fact: a contestant triggered a rule `quantity` times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeScore {
    /// Row identifier.
    pub id: Uuid,
    /// Episode identifier.
    pub episode_id: Uuid,
    /// Contestant identifier.
    pub contestant_id: Uuid,
    /// Rule identifier.
    pub rule_id: Uuid,
    /// How many times the rule applied; always positive when stored.
    pub quantity: i32,
    /// `rule.points * quantity`.
    pub points: i32,
    /// When the row was written.
    pub created_at: DateTime<Utc>,
}

/// Result of the store-side completeness predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringStatus {
    /// Episode identifier.
    pub episode_id: Uuid,
    /// Status of the episode's scoring session, if one was started.
    pub session_status: Option<SessionStatus>,
    /// Number of active contestants in the season.
    pub active_contestants: usize,
    /// Number of active contestants with at least one score row.
    pub scored_contestants: usize,
    /// Active contestants without any score row.
    pub missing_contestant_ids: Vec<Uuid>,
}

impl ScoringStatus {
    /// Returns `true` once every active contestant has a score row.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_contestant_ids.is_empty()
    }
}

/// What the atomic finalization commit changed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FinalizationReceipt {
    /// Season the episode belongs to.
    pub season_id: Uuid,
    /// Episode total per contestant, sorted by contestant id.
    pub contestant_totals: Vec<(Uuid, i64)>,
    /// Contestants whose status changed to eliminated in this commit.
    pub eliminated_contestant_ids: Vec<Uuid>,
    /// Number of weekly picks credited with points.
    pub credited_picks: u64,
    /// Members of active leagues holding a contestant eliminated by this
    /// commit, one entry per (league, participant), sorted by league then
    /// participant.
    pub affected_members: Vec<AffectedMember>,
}

/// A league member touched by an elimination, as seen inside the
/// finalization commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedMember {
    /// League identifier.
    pub league_id: Uuid,
    /// League display name.
    pub league_name: String,
    /// Participant identifier.
    pub participant_id: Uuid,
    /// Names of the member's contestants still active after the commit, in
    /// roster order.
    pub remaining_contestants: Vec<String>,
    /// Set when this commit flipped the member's `is_eliminated` flag.
    pub newly_eliminated: bool,
}

/// One computed standings row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingRow {
    /// Participant identifier.
    pub participant_id: Uuid,
    /// Recomputed total.
    pub total_points: i64,
    /// Assigned rank, starting at 1.
    pub rank: i32,
}

/// A league member's total within a season, input to the weighted ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberTotal {
    /// Participant identifier.
    pub participant_id: Uuid,
    /// League identifier.
    pub league_id: Uuid,
    /// The member's league total.
    pub total_points: i64,
}

/// A placement recorded against a contestant while an episode is being
/// scored; turned into an elimination at finalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EliminationRecord {
    /// Episode identifier.
    pub episode_id: Uuid,
    /// Contestant identifier.
    pub contestant_id: Uuid,
    /// Finishing placement.
    pub placement: i32,
}
