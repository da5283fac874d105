//! `PostgreSQL` implementation of the league store traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use torchlight_core::error::DomainError;
use torchlight_core::model::{
    AffectedMember, Contestant, EliminationRecord, Episode, EpisodeScore, FinalizationReceipt,
    League, LeagueMember, MemberTotal, RosterEntry, ScoringRule, ScoringSession, ScoringStatus,
    Season, StandingRow, WeeklyPick,
};
use torchlight_core::status::{ContestantStatus, LeagueStatus, PickStatus, SessionStatus};
use torchlight_core::store::{PickStore, ScoringStore, SeasonStore, StandingsStore};
use tracing::debug;
use uuid::Uuid;

use crate::error::store_error;
use crate::rows::{
    ContestantRow, EpisodeRow, LeagueRow, MemberRow, PickRow, RosterRow, RuleRow, ScoreRow,
    SeasonRow, SessionRow, convert_all,
};

const EPISODE_COLUMNS: &str = "id, season_id, number, air_date, picks_lock_at, is_scored";
const CONTESTANT_COLUMNS: &str =
    "id, season_id, name, status, eliminated_episode_id, placement";
const MEMBER_COLUMNS: &str =
    "league_id, participant_id, total_points, rank, is_eliminated, joined_at";
const PICK_COLUMNS: &str = "id, league_id, participant_id, episode_id, contestant_id, status, \
                            picked_at, locked_at, points_earned";
const SESSION_COLUMNS: &str = "id, episode_id, status, created_at, finalized_at, finalized_by";

/// PostgreSQL-backed league store.
#[derive(Debug, Clone)]
pub struct PgLeagueStore {
    pool: PgPool,
}

impl PgLeagueStore {
    /// Creates a new `PgLeagueStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Takes a share lock on the episode's session and fails unless it is
/// still draft. The finalization claim updates the same row, so a write
/// holding this lock and a finalization serialize.
async fn lock_draft_session(
    conn: &mut PgConnection,
    episode_id: Uuid,
) -> Result<(), DomainError> {
    let session: Option<(String,)> = sqlx::query_as(
        "SELECT status FROM scoring_sessions WHERE episode_id = $1 FOR SHARE",
    )
    .bind(episode_id)
    .fetch_optional(conn)
    .await
    .map_err(store_error)?;
    match session {
        Some((status,)) if status.parse::<SessionStatus>()? == SessionStatus::Draft => Ok(()),
        Some(_) => Err(DomainError::AlreadyFinalized { episode_id }),
        None => Err(DomainError::not_found("scoring_session", episode_id)),
    }
}

/// Members of active leagues holding any of `eliminated`, read inside the
/// finalization transaction. Members with no active contestant left are
/// flagged eliminated in the same transaction.
async fn cascade_members(
    conn: &mut PgConnection,
    eliminated: &[Uuid],
) -> Result<Vec<AffectedMember>, DomainError> {
    if eliminated.is_empty() {
        return Ok(Vec::new());
    }

    let pairs: Vec<(Uuid, String, Uuid)> = sqlx::query_as(
        "SELECT DISTINCT s.league_id, l.name, s.participant_id \
         FROM roster_slots s \
         JOIN leagues l ON l.id = s.league_id \
         WHERE s.dropped_at IS NULL AND s.contestant_id = ANY($1) AND l.status = $2 \
         ORDER BY s.league_id, s.participant_id",
    )
    .bind(eliminated)
    .bind(LeagueStatus::Active.as_str())
    .fetch_all(&mut *conn)
    .await
    .map_err(store_error)?;

    let mut affected = Vec::with_capacity(pairs.len());
    for (league_id, league_name, participant_id) in pairs {
        let remaining: Vec<(String,)> = sqlx::query_as(
            "SELECT c.name FROM roster_slots s \
             JOIN contestants c ON c.id = s.contestant_id \
             WHERE s.league_id = $1 AND s.participant_id = $2 \
               AND s.dropped_at IS NULL AND c.status = $3 \
             ORDER BY s.draft_position, s.drafted_at",
        )
        .bind(league_id)
        .bind(participant_id)
        .bind(ContestantStatus::Active.as_str())
        .fetch_all(&mut *conn)
        .await
        .map_err(store_error)?;

        let newly_eliminated = if remaining.is_empty() {
            sqlx::query(
                "UPDATE league_members SET is_eliminated = TRUE \
                 WHERE league_id = $1 AND participant_id = $2 AND NOT is_eliminated",
            )
            .bind(league_id)
            .bind(participant_id)
            .execute(&mut *conn)
            .await
            .map_err(store_error)?
            .rows_affected()
                == 1
        } else {
            false
        };

        affected.push(AffectedMember {
            league_id,
            league_name,
            participant_id,
            remaining_contestants: remaining.into_iter().map(|(name,)| name).collect(),
            newly_eliminated,
        });
    }
    Ok(affected)
}

#[async_trait]
impl SeasonStore for PgLeagueStore {
    async fn active_season(&self) -> Result<Option<Season>, DomainError> {
        sqlx::query_as::<_, SeasonRow>(
            "SELECT id, name, status FROM seasons WHERE status = 'active' LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?
        .map(Season::try_from)
        .transpose()
    }

    async fn find_season(&self, season_id: Uuid) -> Result<Option<Season>, DomainError> {
        sqlx::query_as::<_, SeasonRow>("SELECT id, name, status FROM seasons WHERE id = $1")
            .bind(season_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?
            .map(Season::try_from)
            .transpose()
    }

    async fn find_episode(&self, episode_id: Uuid) -> Result<Option<Episode>, DomainError> {
        let row = sqlx::query_as::<_, EpisodeRow>(&format!(
            "SELECT {EPISODE_COLUMNS} FROM episodes WHERE id = $1"
        ))
        .bind(episode_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(row.map(Episode::from))
    }

    async fn find_league(&self, league_id: Uuid) -> Result<Option<League>, DomainError> {
        sqlx::query_as::<_, LeagueRow>(
            "SELECT id, season_id, name, status FROM leagues WHERE id = $1",
        )
        .bind(league_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?
        .map(League::try_from)
        .transpose()
    }

    async fn find_contestant(
        &self,
        contestant_id: Uuid,
    ) -> Result<Option<Contestant>, DomainError> {
        sqlx::query_as::<_, ContestantRow>(&format!(
            "SELECT {CONTESTANT_COLUMNS} FROM contestants WHERE id = $1"
        ))
        .bind(contestant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?
        .map(Contestant::try_from)
        .transpose()
    }

    async fn find_member(
        &self,
        league_id: Uuid,
        participant_id: Uuid,
    ) -> Result<Option<LeagueMember>, DomainError> {
        let row = sqlx::query_as::<_, MemberRow>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM league_members \
             WHERE league_id = $1 AND participant_id = $2"
        ))
        .bind(league_id)
        .bind(participant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(row.map(LeagueMember::from))
    }

    async fn active_leagues(&self, season_id: Uuid) -> Result<Vec<League>, DomainError> {
        let rows = sqlx::query_as::<_, LeagueRow>(
            "SELECT id, season_id, name, status FROM leagues \
             WHERE season_id = $1 AND status = 'active' ORDER BY name, id",
        )
        .bind(season_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;
        convert_all(rows)
    }

    async fn league_members(&self, league_id: Uuid) -> Result<Vec<LeagueMember>, DomainError> {
        let rows = sqlx::query_as::<_, MemberRow>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM league_members \
             WHERE league_id = $1 ORDER BY joined_at, participant_id"
        ))
        .bind(league_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(rows.into_iter().map(LeagueMember::from).collect())
    }

    async fn roster(
        &self,
        league_id: Uuid,
        participant_id: Uuid,
    ) -> Result<Vec<RosterEntry>, DomainError> {
        let rows = sqlx::query_as::<_, RosterRow>(
            "SELECT s.id, s.league_id, s.participant_id, s.contestant_id, s.draft_position, \
                    s.drafted_at, s.dropped_at, c.status AS contestant_status \
             FROM roster_slots s \
             JOIN contestants c ON c.id = s.contestant_id \
             WHERE s.league_id = $1 AND s.participant_id = $2 AND s.dropped_at IS NULL \
             ORDER BY s.draft_position, s.drafted_at",
        )
        .bind(league_id)
        .bind(participant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;
        convert_all(rows)
    }

    async fn season_contestants(&self, season_id: Uuid) -> Result<Vec<Contestant>, DomainError> {
        let rows = sqlx::query_as::<_, ContestantRow>(&format!(
            "SELECT {CONTESTANT_COLUMNS} FROM contestants WHERE season_id = $1 ORDER BY name, id"
        ))
        .bind(season_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;
        convert_all(rows)
    }

    async fn scoring_rules(&self, season_id: Uuid) -> Result<Vec<ScoringRule>, DomainError> {
        let rows = sqlx::query_as::<_, RuleRow>(
            "SELECT id, season_id, code, name, points FROM scoring_rules \
             WHERE season_id = $1 OR season_id IS NULL ORDER BY code, id",
        )
        .bind(season_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(rows.into_iter().map(ScoringRule::from).collect())
    }
}

#[async_trait]
impl PickStore for PgLeagueStore {
    async fn find_pick(
        &self,
        league_id: Uuid,
        participant_id: Uuid,
        episode_id: Uuid,
    ) -> Result<Option<WeeklyPick>, DomainError> {
        sqlx::query_as::<_, PickRow>(&format!(
            "SELECT {PICK_COLUMNS} FROM weekly_picks \
             WHERE league_id = $1 AND participant_id = $2 AND episode_id = $3"
        ))
        .bind(league_id)
        .bind(participant_id)
        .bind(episode_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?
        .map(WeeklyPick::try_from)
        .transpose()
    }

    async fn upsert_pending_pick(
        &self,
        pick: &WeeklyPick,
    ) -> Result<Option<WeeklyPick>, DomainError> {
        // The conflict arm only fires while the stored row is still pending;
        // otherwise nothing is returned.
        sqlx::query_as::<_, PickRow>(&format!(
            "INSERT INTO weekly_picks ({PICK_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, NULL, 0) \
             ON CONFLICT (league_id, participant_id, episode_id) DO UPDATE \
                SET contestant_id = EXCLUDED.contestant_id, picked_at = EXCLUDED.picked_at \
                WHERE weekly_picks.status = 'pending' \
             RETURNING {PICK_COLUMNS}"
        ))
        .bind(pick.id)
        .bind(pick.league_id)
        .bind(pick.participant_id)
        .bind(pick.episode_id)
        .bind(pick.contestant_id)
        .bind(PickStatus::Pending.as_str())
        .bind(pick.picked_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?
        .map(WeeklyPick::try_from)
        .transpose()
    }

    async fn lockable_episodes(&self, now: DateTime<Utc>) -> Result<Vec<Episode>, DomainError> {
        let rows = sqlx::query_as::<_, EpisodeRow>(&format!(
            "SELECT {EPISODE_COLUMNS} FROM episodes \
             WHERE NOT is_scored AND picks_lock_at <= $1 ORDER BY picks_lock_at"
        ))
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(rows.into_iter().map(Episode::from).collect())
    }

    async fn lock_pending_picks(
        &self,
        episode_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let result = sqlx::query(
            "UPDATE weekly_picks SET status = 'locked', locked_at = $2 \
             WHERE episode_id = $1 AND status = 'pending'",
        )
        .bind(episode_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(result.rows_affected())
    }

    async fn episode_picks(
        &self,
        league_id: Uuid,
        episode_id: Uuid,
    ) -> Result<Vec<WeeklyPick>, DomainError> {
        let rows = sqlx::query_as::<_, PickRow>(&format!(
            "SELECT {PICK_COLUMNS} FROM weekly_picks \
             WHERE league_id = $1 AND episode_id = $2 ORDER BY picked_at, id"
        ))
        .bind(league_id)
        .bind(episode_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;
        convert_all(rows)
    }

    async fn insert_auto_pick(&self, pick: &WeeklyPick) -> Result<bool, DomainError> {
        let result = sqlx::query(&format!(
            "INSERT INTO weekly_picks ({PICK_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 0) \
             ON CONFLICT (league_id, participant_id, episode_id) DO NOTHING"
        ))
        .bind(pick.id)
        .bind(pick.league_id)
        .bind(pick.participant_id)
        .bind(pick.episode_id)
        .bind(pick.contestant_id)
        .bind(pick.status.as_str())
        .bind(pick.picked_at)
        .bind(pick.locked_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl ScoringStore for PgLeagueStore {
    async fn find_session(
        &self,
        episode_id: Uuid,
    ) -> Result<Option<ScoringSession>, DomainError> {
        sqlx::query_as::<_, SessionRow>(&format!(
            "SELECT {SESSION_COLUMNS} FROM scoring_sessions WHERE episode_id = $1"
        ))
        .bind(episode_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?
        .map(ScoringSession::try_from)
        .transpose()
    }

    async fn open_session(
        &self,
        episode_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<ScoringSession, DomainError> {
        sqlx::query(
            "INSERT INTO scoring_sessions (id, episode_id, status, created_at) \
             VALUES ($1, $2, $3, $4) ON CONFLICT (episode_id) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(episode_id)
        .bind(SessionStatus::Draft.as_str())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        self.find_session(episode_id)
            .await?
            .ok_or_else(|| DomainError::not_found("scoring_session", episode_id))
    }

    async fn replace_contestant_scores(
        &self,
        episode_id: Uuid,
        contestant_id: Uuid,
        scores: &[EpisodeScore],
    ) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;
        lock_draft_session(&mut *tx, episode_id).await?;
        sqlx::query("DELETE FROM episode_scores WHERE episode_id = $1 AND contestant_id = $2")
            .bind(episode_id)
            .bind(contestant_id)
            .execute(&mut *tx)
            .await
            .map_err(store_error)?;
        for score in scores {
            sqlx::query(
                "INSERT INTO episode_scores \
                 (id, episode_id, contestant_id, rule_id, quantity, points, created_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(score.id)
            .bind(score.episode_id)
            .bind(score.contestant_id)
            .bind(score.rule_id)
            .bind(score.quantity)
            .bind(score.points)
            .bind(score.created_at)
            .execute(&mut *tx)
            .await
            .map_err(store_error)?;
        }
        tx.commit().await.map_err(store_error)?;
        debug!(%episode_id, %contestant_id, rows = scores.len(), "contestant scores replaced");
        Ok(())
    }

    async fn episode_scores(&self, episode_id: Uuid) -> Result<Vec<EpisodeScore>, DomainError> {
        let rows = sqlx::query_as::<_, ScoreRow>(
            "SELECT id, episode_id, contestant_id, rule_id, quantity, points, created_at \
             FROM episode_scores WHERE episode_id = $1 ORDER BY contestant_id, rule_id",
        )
        .bind(episode_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(rows.into_iter().map(EpisodeScore::from).collect())
    }

    async fn scoring_status(&self, episode_id: Uuid) -> Result<ScoringStatus, DomainError> {
        // One snapshot for the session and the contestant comparison.
        let mut tx = self.pool.begin().await.map_err(store_error)?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(store_error)?;

        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM episodes WHERE id = $1")
            .bind(episode_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(store_error)?;
        if exists.is_none() {
            return Err(DomainError::not_found("episode", episode_id));
        }

        let session: Option<(String,)> =
            sqlx::query_as("SELECT status FROM scoring_sessions WHERE episode_id = $1")
                .bind(episode_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(store_error)?;
        let coverage: Vec<(Uuid, bool)> = sqlx::query_as(
            "SELECT c.id, EXISTS ( \
                 SELECT 1 FROM episode_scores s \
                 WHERE s.episode_id = e.id AND s.contestant_id = c.id \
             ) AS scored \
             FROM episodes e \
             JOIN contestants c ON c.season_id = e.season_id \
             WHERE e.id = $1 AND c.status = 'active' \
             ORDER BY c.name, c.id",
        )
        .bind(episode_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(store_error)?;
        tx.commit().await.map_err(store_error)?;

        let missing_contestant_ids: Vec<Uuid> = coverage
            .iter()
            .filter(|(_, scored)| !scored)
            .map(|(id, _)| *id)
            .collect();
        Ok(ScoringStatus {
            episode_id,
            session_status: session
                .map(|(status,)| status.parse::<SessionStatus>())
                .transpose()?,
            active_contestants: coverage.len(),
            scored_contestants: coverage.len() - missing_contestant_ids.len(),
            missing_contestant_ids,
        })
    }

    async fn record_elimination(&self, record: &EliminationRecord) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;
        lock_draft_session(&mut *tx, record.episode_id).await?;
        sqlx::query(
            "INSERT INTO episode_eliminations (episode_id, contestant_id, placement) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (episode_id, contestant_id) DO UPDATE SET placement = EXCLUDED.placement",
        )
        .bind(record.episode_id)
        .bind(record.contestant_id)
        .bind(record.placement)
        .execute(&mut *tx)
        .await
        .map_err(store_error)?;
        tx.commit().await.map_err(store_error)
    }

    async fn clear_elimination(
        &self,
        episode_id: Uuid,
        contestant_id: Uuid,
    ) -> Result<bool, DomainError> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;
        lock_draft_session(&mut *tx, episode_id).await?;
        let result = sqlx::query(
            "DELETE FROM episode_eliminations WHERE episode_id = $1 AND contestant_id = $2",
        )
        .bind(episode_id)
        .bind(contestant_id)
        .execute(&mut *tx)
        .await
        .map_err(store_error)?;
        tx.commit().await.map_err(store_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn episode_eliminations(
        &self,
        episode_id: Uuid,
    ) -> Result<Vec<EliminationRecord>, DomainError> {
        let rows: Vec<(Uuid, Uuid, i32)> = sqlx::query_as(
            "SELECT episode_id, contestant_id, placement FROM episode_eliminations \
             WHERE episode_id = $1 ORDER BY placement",
        )
        .bind(episode_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(rows
            .into_iter()
            .map(|(episode_id, contestant_id, placement)| EliminationRecord {
                episode_id,
                contestant_id,
                placement,
            })
            .collect())
    }

    async fn commit_finalization(
        &self,
        episode_id: Uuid,
        actor_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<FinalizationReceipt, DomainError> {
        // Dropping `tx` on any early return rolls everything back.
        let mut tx = self.pool.begin().await.map_err(store_error)?;

        let season: Option<(Uuid,)> =
            sqlx::query_as("SELECT season_id FROM episodes WHERE id = $1 FOR UPDATE")
                .bind(episode_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(store_error)?;
        let Some((season_id,)) = season else {
            return Err(DomainError::not_found("episode", episode_id));
        };

        let claimed: Option<(Uuid,)> = sqlx::query_as(
            "UPDATE scoring_sessions \
             SET status = 'finalized', finalized_at = $2, finalized_by = $3 \
             WHERE episode_id = $1 AND status = 'draft' \
             RETURNING id",
        )
        .bind(episode_id)
        .bind(now)
        .bind(actor_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(store_error)?;
        if claimed.is_none() {
            let session: Option<(Uuid,)> =
                sqlx::query_as("SELECT id FROM scoring_sessions WHERE episode_id = $1")
                    .bind(episode_id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(store_error)?;
            return Err(match session {
                Some(_) => DomainError::AlreadyFinalized { episode_id },
                None => DomainError::not_found("scoring_session", episode_id),
            });
        }

        let contestant_totals: Vec<(Uuid, i64)> = sqlx::query_as(
            "SELECT contestant_id, SUM(points)::BIGINT AS total FROM episode_scores \
             WHERE episode_id = $1 GROUP BY contestant_id ORDER BY contestant_id",
        )
        .bind(episode_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(store_error)?;

        let credited = sqlx::query(
            "UPDATE weekly_picks p SET points_earned = COALESCE(( \
                 SELECT SUM(s.points) FROM episode_scores s \
                 WHERE s.episode_id = p.episode_id AND s.contestant_id = p.contestant_id \
             ), 0) \
             WHERE p.episode_id = $1",
        )
        .bind(episode_id)
        .execute(&mut *tx)
        .await
        .map_err(store_error)?;

        let eliminated: Vec<(Uuid,)> = sqlx::query_as(
            "UPDATE contestants c \
             SET status = $2, eliminated_episode_id = $1, placement = e.placement \
             FROM episode_eliminations e \
             WHERE e.episode_id = $1 AND e.contestant_id = c.id AND c.status = $3 \
             RETURNING c.id",
        )
        .bind(episode_id)
        .bind(ContestantStatus::Eliminated.as_str())
        .bind(ContestantStatus::Active.as_str())
        .fetch_all(&mut *tx)
        .await
        .map_err(store_error)?;

        let mut eliminated_contestant_ids: Vec<Uuid> =
            eliminated.into_iter().map(|(id,)| id).collect();
        eliminated_contestant_ids.sort();
        let affected_members = cascade_members(&mut *tx, &eliminated_contestant_ids).await?;

        sqlx::query("UPDATE episodes SET is_scored = TRUE WHERE id = $1")
            .bind(episode_id)
            .execute(&mut *tx)
            .await
            .map_err(store_error)?;

        tx.commit().await.map_err(store_error)?;

        Ok(FinalizationReceipt {
            season_id,
            contestant_totals,
            eliminated_contestant_ids,
            credited_picks: credited.rows_affected(),
            affected_members,
        })
    }
}

#[async_trait]
impl StandingsStore for PgLeagueStore {
    async fn member_pick_points(&self, league_id: Uuid) -> Result<Vec<(Uuid, i64)>, DomainError> {
        sqlx::query_as(
            "SELECT m.participant_id, COALESCE(SUM(p.points_earned), 0)::BIGINT AS total \
             FROM league_members m \
             LEFT JOIN weekly_picks p \
                ON p.league_id = m.league_id AND p.participant_id = m.participant_id \
             WHERE m.league_id = $1 \
             GROUP BY m.participant_id",
        )
        .bind(league_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)
    }

    async fn write_standings(
        &self,
        league_id: Uuid,
        rows: &[StandingRow],
    ) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;
        for row in rows {
            sqlx::query(
                "UPDATE league_members SET total_points = $3, rank = $4 \
                 WHERE league_id = $1 AND participant_id = $2",
            )
            .bind(league_id)
            .bind(row.participant_id)
            .bind(row.total_points)
            .bind(row.rank)
            .execute(&mut *tx)
            .await
            .map_err(store_error)?;
        }
        tx.commit().await.map_err(store_error)?;
        debug!(%league_id, members = rows.len(), "standings written");
        Ok(())
    }

    async fn season_member_totals(
        &self,
        season_id: Uuid,
    ) -> Result<Vec<MemberTotal>, DomainError> {
        let rows: Vec<(Uuid, Uuid, i64)> = sqlx::query_as(
            "SELECT m.participant_id, m.league_id, m.total_points \
             FROM league_members m \
             JOIN leagues l ON l.id = m.league_id \
             WHERE l.season_id = $1",
        )
        .bind(season_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(rows
            .into_iter()
            .map(|(participant_id, league_id, total_points)| MemberTotal {
                participant_id,
                league_id,
                total_points,
            })
            .collect())
    }
}
