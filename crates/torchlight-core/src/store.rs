//! Persistent store abstractions.
//!
//! The pipeline needs a store with filtered reads, per-call atomic writes and
//! one true multi-statement transaction (finalization). The traits are split
//! by pipeline context; every context trait extends [`SeasonStore`] so
//! handlers can reach the shared lookups through one reference.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;
use crate::model::{
    Contestant, EliminationRecord, Episode, EpisodeScore, FinalizationReceipt, League,
    LeagueMember, MemberTotal, RosterEntry, ScoringRule, ScoringSession, ScoringStatus, Season,
    StandingRow, WeeklyPick,
};

/// Lookups shared by every context.
#[async_trait]
pub trait SeasonStore: Send + Sync {
    /// Returns the single active season, if any.
    async fn active_season(&self) -> Result<Option<Season>, DomainError>;

    /// Loads a season by id.
    async fn find_season(&self, season_id: Uuid) -> Result<Option<Season>, DomainError>;

    /// Loads an episode by id.
    async fn find_episode(&self, episode_id: Uuid) -> Result<Option<Episode>, DomainError>;

    /// Loads a league by id.
    async fn find_league(&self, league_id: Uuid) -> Result<Option<League>, DomainError>;

    /// Loads a contestant by id.
    async fn find_contestant(&self, contestant_id: Uuid)
    -> Result<Option<Contestant>, DomainError>;

    /// Loads one league membership.
    async fn find_member(
        &self,
        league_id: Uuid,
        participant_id: Uuid,
    ) -> Result<Option<LeagueMember>, DomainError>;

    /// Active leagues of a season.
    async fn active_leagues(&self, season_id: Uuid) -> Result<Vec<League>, DomainError>;

    /// All members of a league.
    async fn league_members(&self, league_id: Uuid) -> Result<Vec<LeagueMember>, DomainError>;

    /// A participant's undropped roster slots in natural roster order
    /// (`draft_position`, then `drafted_at`).
    async fn roster(
        &self,
        league_id: Uuid,
        participant_id: Uuid,
    ) -> Result<Vec<RosterEntry>, DomainError>;

    /// Every contestant of a season, active or not.
    async fn season_contestants(&self, season_id: Uuid) -> Result<Vec<Contestant>, DomainError>;

    /// Season-specific rules together with season-agnostic ones.
    async fn scoring_rules(&self, season_id: Uuid) -> Result<Vec<ScoringRule>, DomainError>;
}

/// Weekly pick persistence.
#[async_trait]
pub trait PickStore: SeasonStore {
    /// Loads the pick for (league, participant, episode).
    async fn find_pick(
        &self,
        league_id: Uuid,
        participant_id: Uuid,
        episode_id: Uuid,
    ) -> Result<Option<WeeklyPick>, DomainError>;

    /// Inserts or replaces the pending pick keyed by (league, participant,
    /// episode). Returns `None` without writing when the stored row is no
    /// longer pending.
    async fn upsert_pending_pick(
        &self,
        pick: &WeeklyPick,
    ) -> Result<Option<WeeklyPick>, DomainError>;

    /// Unscored episodes whose pick deadline is at or before `now`.
    async fn lockable_episodes(&self, now: DateTime<Utc>) -> Result<Vec<Episode>, DomainError>;

    /// Moves every pending pick of the episode to locked, stamping
    /// `locked_at`. Returns the number of rows changed.
    async fn lock_pending_picks(
        &self,
        episode_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<u64, DomainError>;

    /// All picks of a league for one episode.
    async fn episode_picks(
        &self,
        league_id: Uuid,
        episode_id: Uuid,
    ) -> Result<Vec<WeeklyPick>, DomainError>;

    /// Inserts an auto-assigned pick unless one already exists for the key.
    /// Returns `true` if the row was inserted.
    async fn insert_auto_pick(&self, pick: &WeeklyPick) -> Result<bool, DomainError>;
}

/// Scoring session, score facts and the finalization transaction.
#[async_trait]
pub trait ScoringStore: SeasonStore {
    /// Loads the session of an episode.
    async fn find_session(&self, episode_id: Uuid)
    -> Result<Option<ScoringSession>, DomainError>;

    /// Returns the episode's session, creating a draft one if absent.
    async fn open_session(
        &self,
        episode_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<ScoringSession, DomainError>;

    /// Atomically deletes every score row of (episode, contestant) and
    /// inserts `scores` in their place. The session is checked in the same
    /// atomic unit: fails `AlreadyFinalized` unless it is still draft.
    async fn replace_contestant_scores(
        &self,
        episode_id: Uuid,
        contestant_id: Uuid,
        scores: &[EpisodeScore],
    ) -> Result<(), DomainError>;

    /// All score rows of an episode.
    async fn episode_scores(&self, episode_id: Uuid) -> Result<Vec<EpisodeScore>, DomainError>;

    /// Compares active contestants against scored ones in one consistent
    /// read.
    async fn scoring_status(&self, episode_id: Uuid) -> Result<ScoringStatus, DomainError>;

    /// Records (or replaces) a placement for a contestant in an episode.
    /// Fails `AlreadyFinalized` unless the session is still draft.
    async fn record_elimination(&self, record: &EliminationRecord) -> Result<(), DomainError>;

    /// Removes a recorded placement. Returns `true` if one existed. Fails
    /// `AlreadyFinalized` unless the session is still draft.
    async fn clear_elimination(
        &self,
        episode_id: Uuid,
        contestant_id: Uuid,
    ) -> Result<bool, DomainError>;

    /// Placements recorded for an episode.
    async fn episode_eliminations(
        &self,
        episode_id: Uuid,
    ) -> Result<Vec<EliminationRecord>, DomainError>;

    /// The finalization transaction. In one atomic unit: claims the session
    /// `draft -> finalized` (failing `AlreadyFinalized` if it is not draft),
    /// totals the score rows per contestant, credits every weekly pick of
    /// the episode, eliminates contestants with a recorded placement, marks
    /// members of active leagues left without an active contestant as
    /// eliminated and sets `is_scored`.
    async fn commit_finalization(
        &self,
        episode_id: Uuid,
        actor_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<FinalizationReceipt, DomainError>;
}

/// Standings persistence.
#[async_trait]
pub trait StandingsStore: SeasonStore {
    /// Sum of `points_earned` over each member's weekly picks in a league.
    /// Members without picks are included with zero.
    async fn member_pick_points(&self, league_id: Uuid) -> Result<Vec<(Uuid, i64)>, DomainError>;

    /// Atomically writes totals and ranks for every member of a league.
    async fn write_standings(
        &self,
        league_id: Uuid,
        rows: &[StandingRow],
    ) -> Result<(), DomainError>;

    /// Every league member total within a season.
    async fn season_member_totals(&self, season_id: Uuid)
    -> Result<Vec<MemberTotal>, DomainError>;
}
