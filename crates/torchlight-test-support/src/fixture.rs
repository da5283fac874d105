//! Season fixture: seeds an in-memory store with a playable season.

use std::sync::atomic::{AtomicI32, AtomicI64, Ordering};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use torchlight_core::model::{
    Contestant, Episode, League, LeagueMember, RosterSlot, ScoringRule, Season, WeeklyPick,
};
use torchlight_core::status::{ContestantStatus, LeagueStatus, PickStatus, SeasonStatus};
use uuid::Uuid;

use crate::clock::fixed_now;
use crate::store::InMemoryLeagueStore;

/// An active season with one league and one episode whose picks lock one
/// hour after [`fixed_now`]. Helper methods add contestants, members,
/// roster slots and rules.
#[derive(Debug)]
pub struct SeasonFixture {
    /// The seeded store.
    pub store: InMemoryLeagueStore,
    /// The active season.
    pub season_id: Uuid,
    /// The default league.
    pub league_id: Uuid,
    /// The default episode.
    pub episode_id: Uuid,
    /// When the default episode's picks lock.
    pub lock_at: DateTime<Utc>,
    joined: AtomicI64,
    draft_position: AtomicI32,
}

impl Default for SeasonFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl SeasonFixture {
    /// Seeds the default season, league and episode.
    ///
    /// # Panics
    ///
    /// Never panics; the literal air date is valid.
    #[must_use]
    pub fn new() -> Self {
        let store = InMemoryLeagueStore::new();
        let season_id = Uuid::new_v4();
        let league_id = Uuid::new_v4();
        let episode_id = Uuid::new_v4();
        let lock_at = fixed_now() + Duration::hours(1);

        store.insert_season(Season {
            id: season_id,
            name: "Season 50".to_owned(),
            status: SeasonStatus::Active,
        });
        store.insert_league(League {
            id: league_id,
            season_id,
            name: "Tribal Council".to_owned(),
            status: LeagueStatus::Active,
        });
        store.insert_episode(Episode {
            id: episode_id,
            season_id,
            number: 1,
            air_date: NaiveDate::from_ymd_opt(2026, 3, 4).unwrap(),
            picks_lock_at: lock_at,
            is_scored: false,
        });

        Self {
            store,
            season_id,
            league_id,
            episode_id,
            lock_at,
            joined: AtomicI64::new(0),
            draft_position: AtomicI32::new(0),
        }
    }

    /// Adds an active contestant to the season.
    pub fn contestant(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.store.insert_contestant(Contestant {
            id,
            season_id: self.season_id,
            name: name.to_owned(),
            status: ContestantStatus::Active,
            eliminated_episode_id: None,
            placement: None,
        });
        id
    }

    /// Adds a new participant to `league_id`. Each call joins one minute
    /// after the previous one.
    pub fn member(&self, league_id: Uuid) -> Uuid {
        let participant_id = Uuid::new_v4();
        let minutes = self.joined.fetch_add(1, Ordering::SeqCst);
        self.store.insert_member(LeagueMember {
            league_id,
            participant_id,
            total_points: 0,
            rank: None,
            is_eliminated: false,
            joined_at: fixed_now() - Duration::days(30) + Duration::minutes(minutes),
        });
        participant_id
    }

    /// Adds another active league to the season.
    pub fn league(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.store.insert_league(League {
            id,
            season_id: self.season_id,
            name: name.to_owned(),
            status: LeagueStatus::Active,
        });
        id
    }

    /// Adds another episode to the season.
    ///
    /// # Panics
    ///
    /// Never panics; the derived air date is valid.
    pub fn episode(&self, number: i32, picks_lock_at: DateTime<Utc>) -> Uuid {
        let id = Uuid::new_v4();
        self.store.insert_episode(Episode {
            id,
            season_id: self.season_id,
            number,
            air_date: picks_lock_at.date_naive(),
            picks_lock_at,
            is_scored: false,
        });
        id
    }

    /// Drafts `contestant_id` onto the participant's roster in `league_id`,
    /// after every earlier draft.
    pub fn draft(&self, league_id: Uuid, participant_id: Uuid, contestant_id: Uuid) -> Uuid {
        let id = Uuid::new_v4();
        let position = self.draft_position.fetch_add(1, Ordering::SeqCst);
        self.store.insert_slot(RosterSlot {
            id,
            league_id,
            participant_id,
            contestant_id,
            draft_position: position,
            drafted_at: fixed_now() - Duration::days(20),
            dropped_at: None,
        });
        id
    }

    /// Adds a season-specific scoring rule.
    pub fn rule(&self, code: &str, points: i32) -> Uuid {
        let id = Uuid::new_v4();
        self.store.insert_rule(ScoringRule {
            id,
            season_id: Some(self.season_id),
            code: code.to_owned(),
            name: code.replace('_', " "),
            points,
        });
        id
    }

    /// Seeds a weekly pick directly.
    pub fn pick(
        &self,
        league_id: Uuid,
        participant_id: Uuid,
        episode_id: Uuid,
        contestant_id: Uuid,
        status: PickStatus,
        points_earned: i64,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.store.insert_pick(WeeklyPick {
            id,
            league_id,
            participant_id,
            episode_id,
            contestant_id,
            status,
            picked_at: fixed_now() - Duration::hours(2),
            locked_at: None,
            points_earned,
        });
        id
    }
}
