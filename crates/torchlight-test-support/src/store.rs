//! Test stores: in-memory and failing implementations of the store traits.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use torchlight_core::error::DomainError;
use torchlight_core::model::{
    AffectedMember, Contestant, EliminationRecord, Episode, EpisodeScore, FinalizationReceipt,
    League, LeagueMember, MemberTotal, RosterEntry, RosterSlot, ScoringRule, ScoringSession,
    ScoringStatus, Season, StandingRow, WeeklyPick,
};
use torchlight_core::status::{
    ContestantStatus, LeagueStatus, PickStatus, SeasonStatus, SessionStatus, Transition,
};
use torchlight_core::store::{PickStore, ScoringStore, SeasonStore, StandingsStore};
use uuid::Uuid;

#[derive(Debug, Default)]
struct State {
    seasons: Vec<Season>,
    episodes: Vec<Episode>,
    leagues: Vec<League>,
    members: Vec<LeagueMember>,
    contestants: Vec<Contestant>,
    slots: Vec<RosterSlot>,
    rules: Vec<ScoringRule>,
    picks: Vec<WeeklyPick>,
    sessions: Vec<ScoringSession>,
    scores: Vec<EpisodeScore>,
    eliminations: Vec<EliminationRecord>,
}

/// A store that keeps every table in memory behind one mutex, so each trait
/// method is atomic with respect to every other. Clones share the same
/// tables.
#[derive(Debug, Default, Clone)]
pub struct InMemoryLeagueStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryLeagueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Seeds a season.
    pub fn insert_season(&self, season: Season) {
        self.lock().seasons.push(season);
    }

    /// Seeds an episode.
    pub fn insert_episode(&self, episode: Episode) {
        self.lock().episodes.push(episode);
    }

    /// Seeds a league.
    pub fn insert_league(&self, league: League) {
        self.lock().leagues.push(league);
    }

    /// Seeds a league member.
    pub fn insert_member(&self, member: LeagueMember) {
        self.lock().members.push(member);
    }

    /// Seeds a contestant.
    pub fn insert_contestant(&self, contestant: Contestant) {
        self.lock().contestants.push(contestant);
    }

    /// Seeds a roster slot.
    pub fn insert_slot(&self, slot: RosterSlot) {
        self.lock().slots.push(slot);
    }

    /// Seeds a scoring rule.
    pub fn insert_rule(&self, rule: ScoringRule) {
        self.lock().rules.push(rule);
    }

    /// Seeds a weekly pick.
    pub fn insert_pick(&self, pick: WeeklyPick) {
        self.lock().picks.push(pick);
    }

    /// Seeds a score row.
    pub fn insert_score(&self, score: EpisodeScore) {
        self.lock().scores.push(score);
    }

    /// Overwrites a contestant's elimination fields directly.
    pub fn set_contestant_eliminated(&self, contestant_id: Uuid, episode_id: Uuid, placement: i32) {
        let mut state = self.lock();
        if let Some(c) = state.contestants.iter_mut().find(|c| c.id == contestant_id) {
            c.status = ContestantStatus::Eliminated;
            c.eliminated_episode_id = Some(episode_id);
            c.placement = Some(placement);
        }
    }

    /// Soft-deletes a roster slot.
    pub fn drop_slot(&self, slot_id: Uuid, at: DateTime<Utc>) {
        if let Some(slot) = self.lock().slots.iter_mut().find(|s| s.id == slot_id) {
            slot.dropped_at = Some(at);
        }
    }

    /// Snapshot of every weekly pick.
    #[must_use]
    pub fn picks(&self) -> Vec<WeeklyPick> {
        self.lock().picks.clone()
    }

    /// Snapshot of every league member.
    #[must_use]
    pub fn members(&self) -> Vec<LeagueMember> {
        self.lock().members.clone()
    }

    /// Snapshot of one contestant.
    #[must_use]
    pub fn contestant(&self, contestant_id: Uuid) -> Option<Contestant> {
        self.lock()
            .contestants
            .iter()
            .find(|c| c.id == contestant_id)
            .cloned()
    }

    /// Snapshot of one episode.
    #[must_use]
    pub fn episode(&self, episode_id: Uuid) -> Option<Episode> {
        self.lock()
            .episodes
            .iter()
            .find(|e| e.id == episode_id)
            .cloned()
    }

    /// Snapshot of every score row.
    #[must_use]
    pub fn scores(&self) -> Vec<EpisodeScore> {
        self.lock().scores.clone()
    }
}

fn roster_entries(state: &State, league_id: Uuid, participant_id: Uuid) -> Vec<RosterEntry> {
    let mut slots: Vec<&RosterSlot> = state
        .slots
        .iter()
        .filter(|s| {
            s.league_id == league_id && s.participant_id == participant_id && s.dropped_at.is_none()
        })
        .collect();
    slots.sort_by_key(|s| (s.draft_position, s.drafted_at));
    slots
        .into_iter()
        .filter_map(|slot| {
            state
                .contestants
                .iter()
                .find(|c| c.id == slot.contestant_id)
                .map(|c| RosterEntry {
                    slot: slot.clone(),
                    contestant_status: c.status,
                })
        })
        .collect()
}

fn ensure_draft_session(state: &State, episode_id: Uuid) -> Result<(), DomainError> {
    match state.sessions.iter().find(|s| s.episode_id == episode_id) {
        Some(session) if session.status == SessionStatus::Draft => Ok(()),
        Some(_) => Err(DomainError::AlreadyFinalized { episode_id }),
        None => Err(DomainError::not_found("scoring_session", episode_id)),
    }
}

/// Members of active leagues holding any of `eliminated`, with what is left
/// of their rosters. Members with nothing left are flagged eliminated.
fn cascade_members(state: &mut State, eliminated: &[Uuid]) -> Vec<AffectedMember> {
    let pairs: BTreeSet<(Uuid, Uuid)> = state
        .slots
        .iter()
        .filter(|s| s.dropped_at.is_none() && eliminated.contains(&s.contestant_id))
        .map(|s| (s.league_id, s.participant_id))
        .collect();

    let mut affected = Vec::with_capacity(pairs.len());
    for (league_id, participant_id) in pairs {
        let Some(league) = state
            .leagues
            .iter()
            .find(|l| l.id == league_id && l.status == LeagueStatus::Active)
        else {
            continue;
        };
        let league_name = league.name.clone();
        let remaining_contestants: Vec<String> = roster_entries(state, league_id, participant_id)
            .iter()
            .filter(|entry| entry.is_pickable())
            .filter_map(|entry| {
                state
                    .contestants
                    .iter()
                    .find(|c| c.id == entry.slot.contestant_id)
                    .map(|c| c.name.clone())
            })
            .collect();

        let mut newly_eliminated = false;
        if remaining_contestants.is_empty() {
            if let Some(member) = state.members.iter_mut().find(|m| {
                m.league_id == league_id && m.participant_id == participant_id && !m.is_eliminated
            }) {
                member.is_eliminated = true;
                newly_eliminated = true;
            }
        }

        affected.push(AffectedMember {
            league_id,
            league_name,
            participant_id,
            remaining_contestants,
            newly_eliminated,
        });
    }
    affected
}

#[async_trait]
impl SeasonStore for InMemoryLeagueStore {
    async fn active_season(&self) -> Result<Option<Season>, DomainError> {
        Ok(self
            .lock()
            .seasons
            .iter()
            .find(|s| s.status == SeasonStatus::Active)
            .cloned())
    }

    async fn find_season(&self, season_id: Uuid) -> Result<Option<Season>, DomainError> {
        Ok(self.lock().seasons.iter().find(|s| s.id == season_id).cloned())
    }

    async fn find_episode(&self, episode_id: Uuid) -> Result<Option<Episode>, DomainError> {
        Ok(self.episode(episode_id))
    }

    async fn find_league(&self, league_id: Uuid) -> Result<Option<League>, DomainError> {
        Ok(self.lock().leagues.iter().find(|l| l.id == league_id).cloned())
    }

    async fn find_contestant(
        &self,
        contestant_id: Uuid,
    ) -> Result<Option<Contestant>, DomainError> {
        Ok(self.contestant(contestant_id))
    }

    async fn find_member(
        &self,
        league_id: Uuid,
        participant_id: Uuid,
    ) -> Result<Option<LeagueMember>, DomainError> {
        Ok(self
            .lock()
            .members
            .iter()
            .find(|m| m.league_id == league_id && m.participant_id == participant_id)
            .cloned())
    }

    async fn active_leagues(&self, season_id: Uuid) -> Result<Vec<League>, DomainError> {
        Ok(self
            .lock()
            .leagues
            .iter()
            .filter(|l| l.season_id == season_id && l.status == LeagueStatus::Active)
            .cloned()
            .collect())
    }

    async fn league_members(&self, league_id: Uuid) -> Result<Vec<LeagueMember>, DomainError> {
        let mut members: Vec<LeagueMember> = self
            .lock()
            .members
            .iter()
            .filter(|m| m.league_id == league_id)
            .cloned()
            .collect();
        members.sort_by_key(|m| (m.joined_at, m.participant_id));
        Ok(members)
    }

    async fn roster(
        &self,
        league_id: Uuid,
        participant_id: Uuid,
    ) -> Result<Vec<RosterEntry>, DomainError> {
        Ok(roster_entries(&self.lock(), league_id, participant_id))
    }

    async fn season_contestants(&self, season_id: Uuid) -> Result<Vec<Contestant>, DomainError> {
        Ok(self
            .lock()
            .contestants
            .iter()
            .filter(|c| c.season_id == season_id)
            .cloned()
            .collect())
    }

    async fn scoring_rules(&self, season_id: Uuid) -> Result<Vec<ScoringRule>, DomainError> {
        Ok(self
            .lock()
            .rules
            .iter()
            .filter(|r| r.season_id.is_none_or(|id| id == season_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PickStore for InMemoryLeagueStore {
    async fn find_pick(
        &self,
        league_id: Uuid,
        participant_id: Uuid,
        episode_id: Uuid,
    ) -> Result<Option<WeeklyPick>, DomainError> {
        Ok(self
            .lock()
            .picks
            .iter()
            .find(|p| {
                p.league_id == league_id
                    && p.participant_id == participant_id
                    && p.episode_id == episode_id
            })
            .cloned())
    }

    async fn upsert_pending_pick(
        &self,
        pick: &WeeklyPick,
    ) -> Result<Option<WeeklyPick>, DomainError> {
        let mut state = self.lock();
        let existing = state.picks.iter_mut().find(|p| {
            p.league_id == pick.league_id
                && p.participant_id == pick.participant_id
                && p.episode_id == pick.episode_id
        });
        match existing {
            Some(stored) if stored.status != PickStatus::Pending => Ok(None),
            Some(stored) => {
                stored.contestant_id = pick.contestant_id;
                stored.picked_at = pick.picked_at;
                Ok(Some(stored.clone()))
            }
            None => {
                state.picks.push(pick.clone());
                Ok(Some(pick.clone()))
            }
        }
    }

    async fn lockable_episodes(&self, now: DateTime<Utc>) -> Result<Vec<Episode>, DomainError> {
        let mut episodes: Vec<Episode> = self
            .lock()
            .episodes
            .iter()
            .filter(|e| !e.is_scored && e.picks_lock_at <= now)
            .cloned()
            .collect();
        episodes.sort_by_key(|e| e.picks_lock_at);
        Ok(episodes)
    }

    async fn lock_pending_picks(
        &self,
        episode_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let mut state = self.lock();
        let mut changed = 0;
        for pick in state
            .picks
            .iter_mut()
            .filter(|p| p.episode_id == episode_id && p.status == PickStatus::Pending)
        {
            pick.status = pick.status.transition_to(PickStatus::Locked)?;
            pick.locked_at = Some(now);
            changed += 1;
        }
        Ok(changed)
    }

    async fn episode_picks(
        &self,
        league_id: Uuid,
        episode_id: Uuid,
    ) -> Result<Vec<WeeklyPick>, DomainError> {
        Ok(self
            .lock()
            .picks
            .iter()
            .filter(|p| p.league_id == league_id && p.episode_id == episode_id)
            .cloned()
            .collect())
    }

    async fn insert_auto_pick(&self, pick: &WeeklyPick) -> Result<bool, DomainError> {
        let mut state = self.lock();
        let exists = state.picks.iter().any(|p| {
            p.league_id == pick.league_id
                && p.participant_id == pick.participant_id
                && p.episode_id == pick.episode_id
        });
        if exists {
            return Ok(false);
        }
        state.picks.push(pick.clone());
        Ok(true)
    }
}

#[async_trait]
impl ScoringStore for InMemoryLeagueStore {
    async fn find_session(
        &self,
        episode_id: Uuid,
    ) -> Result<Option<ScoringSession>, DomainError> {
        Ok(self
            .lock()
            .sessions
            .iter()
            .find(|s| s.episode_id == episode_id)
            .cloned())
    }

    async fn open_session(
        &self,
        episode_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<ScoringSession, DomainError> {
        let mut state = self.lock();
        if let Some(session) = state.sessions.iter().find(|s| s.episode_id == episode_id) {
            return Ok(session.clone());
        }
        let session = ScoringSession {
            id: Uuid::new_v4(),
            episode_id,
            status: SessionStatus::Draft,
            created_at: now,
            finalized_at: None,
            finalized_by: None,
        };
        state.sessions.push(session.clone());
        Ok(session)
    }

    async fn replace_contestant_scores(
        &self,
        episode_id: Uuid,
        contestant_id: Uuid,
        scores: &[EpisodeScore],
    ) -> Result<(), DomainError> {
        let mut state = self.lock();
        ensure_draft_session(&state, episode_id)?;
        state
            .scores
            .retain(|s| !(s.episode_id == episode_id && s.contestant_id == contestant_id));
        state.scores.extend_from_slice(scores);
        Ok(())
    }

    async fn episode_scores(&self, episode_id: Uuid) -> Result<Vec<EpisodeScore>, DomainError> {
        Ok(self
            .lock()
            .scores
            .iter()
            .filter(|s| s.episode_id == episode_id)
            .cloned()
            .collect())
    }

    async fn scoring_status(&self, episode_id: Uuid) -> Result<ScoringStatus, DomainError> {
        let state = self.lock();
        let episode = state
            .episodes
            .iter()
            .find(|e| e.id == episode_id)
            .ok_or_else(|| DomainError::not_found("episode", episode_id))?;
        let scored: HashSet<Uuid> = state
            .scores
            .iter()
            .filter(|s| s.episode_id == episode_id)
            .map(|s| s.contestant_id)
            .collect();
        let active: Vec<Uuid> = state
            .contestants
            .iter()
            .filter(|c| c.season_id == episode.season_id && c.status == ContestantStatus::Active)
            .map(|c| c.id)
            .collect();
        let missing: Vec<Uuid> = active
            .iter()
            .copied()
            .filter(|id| !scored.contains(id))
            .collect();
        Ok(ScoringStatus {
            episode_id,
            session_status: state
                .sessions
                .iter()
                .find(|s| s.episode_id == episode_id)
                .map(|s| s.status),
            active_contestants: active.len(),
            scored_contestants: active.len() - missing.len(),
            missing_contestant_ids: missing,
        })
    }

    async fn record_elimination(&self, record: &EliminationRecord) -> Result<(), DomainError> {
        let mut state = self.lock();
        ensure_draft_session(&state, record.episode_id)?;
        state.eliminations.retain(|r| {
            !(r.episode_id == record.episode_id && r.contestant_id == record.contestant_id)
        });
        state.eliminations.push(record.clone());
        Ok(())
    }

    async fn clear_elimination(
        &self,
        episode_id: Uuid,
        contestant_id: Uuid,
    ) -> Result<bool, DomainError> {
        let mut state = self.lock();
        ensure_draft_session(&state, episode_id)?;
        let before = state.eliminations.len();
        state
            .eliminations
            .retain(|r| !(r.episode_id == episode_id && r.contestant_id == contestant_id));
        Ok(state.eliminations.len() != before)
    }

    async fn episode_eliminations(
        &self,
        episode_id: Uuid,
    ) -> Result<Vec<EliminationRecord>, DomainError> {
        Ok(self
            .lock()
            .eliminations
            .iter()
            .filter(|r| r.episode_id == episode_id)
            .cloned()
            .collect())
    }

    async fn commit_finalization(
        &self,
        episode_id: Uuid,
        actor_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<FinalizationReceipt, DomainError> {
        let mut guard = self.lock();
        let state = &mut *guard;

        let season_id = state
            .episodes
            .iter()
            .find(|e| e.id == episode_id)
            .map(|e| e.season_id)
            .ok_or_else(|| DomainError::not_found("episode", episode_id))?;
        let session = state
            .sessions
            .iter_mut()
            .find(|s| s.episode_id == episode_id)
            .ok_or_else(|| DomainError::not_found("scoring_session", episode_id))?;
        if session.status != SessionStatus::Draft {
            return Err(DomainError::AlreadyFinalized { episode_id });
        }
        session.status = session.status.transition_to(SessionStatus::Finalized)?;
        session.finalized_at = Some(now);
        session.finalized_by = Some(actor_id);

        let mut totals: BTreeMap<Uuid, i64> = BTreeMap::new();
        for score in state.scores.iter().filter(|s| s.episode_id == episode_id) {
            *totals.entry(score.contestant_id).or_default() += i64::from(score.points);
        }

        let mut credited_picks = 0;
        for pick in state.picks.iter_mut().filter(|p| p.episode_id == episode_id) {
            pick.points_earned = totals.get(&pick.contestant_id).copied().unwrap_or(0);
            credited_picks += 1;
        }

        let mut eliminated_contestant_ids = Vec::new();
        for record in state.eliminations.iter().filter(|r| r.episode_id == episode_id) {
            if let Some(contestant) = state
                .contestants
                .iter_mut()
                .find(|c| c.id == record.contestant_id && c.status == ContestantStatus::Active)
            {
                contestant.status = contestant.status.transition_to(ContestantStatus::Eliminated)?;
                contestant.eliminated_episode_id = Some(episode_id);
                contestant.placement = Some(record.placement);
                eliminated_contestant_ids.push(contestant.id);
            }
        }

        eliminated_contestant_ids.sort();
        let affected_members = cascade_members(state, &eliminated_contestant_ids);

        if let Some(episode) = state.episodes.iter_mut().find(|e| e.id == episode_id) {
            episode.is_scored = true;
        }

        Ok(FinalizationReceipt {
            season_id,
            contestant_totals: totals.into_iter().collect(),
            eliminated_contestant_ids,
            credited_picks,
            affected_members,
        })
    }
}

#[async_trait]
impl StandingsStore for InMemoryLeagueStore {
    async fn member_pick_points(&self, league_id: Uuid) -> Result<Vec<(Uuid, i64)>, DomainError> {
        let state = self.lock();
        Ok(state
            .members
            .iter()
            .filter(|m| m.league_id == league_id)
            .map(|m| {
                let total = state
                    .picks
                    .iter()
                    .filter(|p| p.league_id == league_id && p.participant_id == m.participant_id)
                    .map(|p| p.points_earned)
                    .sum();
                (m.participant_id, total)
            })
            .collect())
    }

    async fn write_standings(
        &self,
        league_id: Uuid,
        rows: &[StandingRow],
    ) -> Result<(), DomainError> {
        let mut state = self.lock();
        for row in rows {
            if let Some(member) = state
                .members
                .iter_mut()
                .find(|m| m.league_id == league_id && m.participant_id == row.participant_id)
            {
                member.total_points = row.total_points;
                member.rank = Some(row.rank);
            }
        }
        Ok(())
    }

    async fn season_member_totals(
        &self,
        season_id: Uuid,
    ) -> Result<Vec<MemberTotal>, DomainError> {
        let state = self.lock();
        let leagues: HashSet<Uuid> = state
            .leagues
            .iter()
            .filter(|l| l.season_id == season_id)
            .map(|l| l.id)
            .collect();
        Ok(state
            .members
            .iter()
            .filter(|m| leagues.contains(&m.league_id))
            .map(|m| MemberTotal {
                participant_id: m.participant_id,
                league_id: m.league_id,
                total_points: m.total_points,
            })
            .collect())
    }
}

/// A store whose backing database is unreachable. Every call fails with
/// `DomainError::StoreUnavailable`.
#[derive(Debug)]
pub struct UnavailableStore;

fn unavailable<T>() -> Result<T, DomainError> {
    Err(DomainError::StoreUnavailable("connection refused".into()))
}

#[async_trait]
impl SeasonStore for UnavailableStore {
    async fn active_season(&self) -> Result<Option<Season>, DomainError> {
        unavailable()
    }
    async fn find_season(&self, _: Uuid) -> Result<Option<Season>, DomainError> {
        unavailable()
    }
    async fn find_episode(&self, _: Uuid) -> Result<Option<Episode>, DomainError> {
        unavailable()
    }
    async fn find_league(&self, _: Uuid) -> Result<Option<League>, DomainError> {
        unavailable()
    }
    async fn find_contestant(&self, _: Uuid) -> Result<Option<Contestant>, DomainError> {
        unavailable()
    }
    async fn find_member(&self, _: Uuid, _: Uuid) -> Result<Option<LeagueMember>, DomainError> {
        unavailable()
    }
    async fn active_leagues(&self, _: Uuid) -> Result<Vec<League>, DomainError> {
        unavailable()
    }
    async fn league_members(&self, _: Uuid) -> Result<Vec<LeagueMember>, DomainError> {
        unavailable()
    }
    async fn roster(&self, _: Uuid, _: Uuid) -> Result<Vec<RosterEntry>, DomainError> {
        unavailable()
    }
    async fn season_contestants(&self, _: Uuid) -> Result<Vec<Contestant>, DomainError> {
        unavailable()
    }
    async fn scoring_rules(&self, _: Uuid) -> Result<Vec<ScoringRule>, DomainError> {
        unavailable()
    }
}

#[async_trait]
impl PickStore for UnavailableStore {
    async fn find_pick(&self, _: Uuid, _: Uuid, _: Uuid) -> Result<Option<WeeklyPick>, DomainError> {
        unavailable()
    }
    async fn upsert_pending_pick(&self, _: &WeeklyPick) -> Result<Option<WeeklyPick>, DomainError> {
        unavailable()
    }
    async fn lockable_episodes(&self, _: DateTime<Utc>) -> Result<Vec<Episode>, DomainError> {
        unavailable()
    }
    async fn lock_pending_picks(&self, _: Uuid, _: DateTime<Utc>) -> Result<u64, DomainError> {
        unavailable()
    }
    async fn episode_picks(&self, _: Uuid, _: Uuid) -> Result<Vec<WeeklyPick>, DomainError> {
        unavailable()
    }
    async fn insert_auto_pick(&self, _: &WeeklyPick) -> Result<bool, DomainError> {
        unavailable()
    }
}

#[async_trait]
impl ScoringStore for UnavailableStore {
    async fn find_session(&self, _: Uuid) -> Result<Option<ScoringSession>, DomainError> {
        unavailable()
    }
    async fn open_session(&self, _: Uuid, _: DateTime<Utc>) -> Result<ScoringSession, DomainError> {
        unavailable()
    }
    async fn replace_contestant_scores(
        &self,
        _: Uuid,
        _: Uuid,
        _: &[EpisodeScore],
    ) -> Result<(), DomainError> {
        unavailable()
    }
    async fn episode_scores(&self, _: Uuid) -> Result<Vec<EpisodeScore>, DomainError> {
        unavailable()
    }
    async fn scoring_status(&self, _: Uuid) -> Result<ScoringStatus, DomainError> {
        unavailable()
    }
    async fn record_elimination(&self, _: &EliminationRecord) -> Result<(), DomainError> {
        unavailable()
    }
    async fn clear_elimination(&self, _: Uuid, _: Uuid) -> Result<bool, DomainError> {
        unavailable()
    }
    async fn episode_eliminations(&self, _: Uuid) -> Result<Vec<EliminationRecord>, DomainError> {
        unavailable()
    }
    async fn commit_finalization(
        &self,
        _: Uuid,
        _: Uuid,
        _: DateTime<Utc>,
    ) -> Result<FinalizationReceipt, DomainError> {
        unavailable()
    }
}

#[async_trait]
impl StandingsStore for UnavailableStore {
    async fn member_pick_points(&self, _: Uuid) -> Result<Vec<(Uuid, i64)>, DomainError> {
        unavailable()
    }
    async fn write_standings(&self, _: Uuid, _: &[StandingRow]) -> Result<(), DomainError> {
        unavailable()
    }
    async fn season_member_totals(&self, _: Uuid) -> Result<Vec<MemberTotal>, DomainError> {
        unavailable()
    }
}
