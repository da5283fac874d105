//! Integration tests for `PgLeagueStore`.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use sqlx::PgPool;
use torchlight_core::error::DomainError;
use torchlight_core::model::{EliminationRecord, EpisodeScore, StandingRow, WeeklyPick};
use torchlight_core::status::{ContestantStatus, PickStatus, SessionStatus};
use torchlight_core::store::{PickStore, ScoringStore, SeasonStore, StandingsStore};
use torchlight_store::PgLeagueStore;
use uuid::Uuid;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 4, 20, 0, 0).unwrap()
}

/// Seeds one active season with a league, an episode locking at `now()`
/// and a member.
struct Seed {
    season_id: Uuid,
    league_id: Uuid,
    episode_id: Uuid,
    participant_id: Uuid,
}

async fn seed(pool: &PgPool) -> Seed {
    let seed = Seed {
        season_id: Uuid::new_v4(),
        league_id: Uuid::new_v4(),
        episode_id: Uuid::new_v4(),
        participant_id: Uuid::new_v4(),
    };
    sqlx::query("INSERT INTO seasons (id, name, status) VALUES ($1, 'Season 50', 'active')")
        .bind(seed.season_id)
        .execute(pool)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO leagues (id, season_id, name, status) VALUES ($1, $2, 'Tribal', 'active')",
    )
    .bind(seed.league_id)
    .bind(seed.season_id)
    .execute(pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO episodes (id, season_id, number, air_date, picks_lock_at) \
         VALUES ($1, $2, 1, $3, $4)",
    )
    .bind(seed.episode_id)
    .bind(seed.season_id)
    .bind(NaiveDate::from_ymd_opt(2026, 3, 4).unwrap())
    .bind(now())
    .execute(pool)
    .await
    .unwrap();
    add_member(pool, seed.league_id, seed.participant_id).await;
    seed
}

async fn add_member(pool: &PgPool, league_id: Uuid, participant_id: Uuid) {
    sqlx::query("INSERT INTO league_members (league_id, participant_id) VALUES ($1, $2)")
        .bind(league_id)
        .bind(participant_id)
        .execute(pool)
        .await
        .unwrap();
}

async fn add_contestant(pool: &PgPool, season_id: Uuid, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO contestants (id, season_id, name, status) VALUES ($1, $2, $3, 'active')")
        .bind(id)
        .bind(season_id)
        .bind(name)
        .execute(pool)
        .await
        .unwrap();
    id
}

async fn add_slot(pool: &PgPool, seed: &Seed, contestant_id: Uuid, position: i32) {
    sqlx::query(
        "INSERT INTO roster_slots (id, league_id, participant_id, contestant_id, draft_position) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(Uuid::new_v4())
    .bind(seed.league_id)
    .bind(seed.participant_id)
    .bind(contestant_id)
    .bind(position)
    .execute(pool)
    .await
    .unwrap();
}

async fn add_rule(pool: &PgPool, season_id: Option<Uuid>, code: &str, points: i32) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO scoring_rules (id, season_id, code, name, points) VALUES ($1, $2, $3, $3, $4)")
        .bind(id)
        .bind(season_id)
        .bind(code)
        .bind(points)
        .execute(pool)
        .await
        .unwrap();
    id
}

fn pending_pick(seed: &Seed, contestant_id: Uuid) -> WeeklyPick {
    WeeklyPick {
        id: Uuid::new_v4(),
        league_id: seed.league_id,
        participant_id: seed.participant_id,
        episode_id: seed.episode_id,
        contestant_id,
        status: PickStatus::Pending,
        picked_at: now() - Duration::hours(1),
        locked_at: None,
        points_earned: 0,
    }
}

fn score(seed: &Seed, contestant_id: Uuid, rule_id: Uuid, quantity: i32, points: i32) -> EpisodeScore {
    EpisodeScore {
        id: Uuid::new_v4(),
        episode_id: seed.episode_id,
        contestant_id,
        rule_id,
        quantity,
        points,
        created_at: now(),
    }
}

// --- seasons and rosters ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_second_active_season_is_rejected_by_schema(pool: PgPool) {
    seed(&pool).await;

    let result =
        sqlx::query("INSERT INTO seasons (id, name, status) VALUES ($1, 'Season 51', 'active')")
            .bind(Uuid::new_v4())
            .execute(&pool)
            .await;

    assert!(result.is_err());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_roster_is_in_draft_order_with_contestant_status(pool: PgPool) {
    // Arrange
    let seed = seed(&pool).await;
    let late = add_contestant(&pool, seed.season_id, "Yul").await;
    let early = add_contestant(&pool, seed.season_id, "Ozzy").await;
    add_slot(&pool, &seed, late, 2).await;
    add_slot(&pool, &seed, early, 1).await;
    let store = PgLeagueStore::new(pool);

    // Act
    let roster = store.roster(seed.league_id, seed.participant_id).await.unwrap();

    // Assert
    let order: Vec<Uuid> = roster.iter().map(|e| e.slot.contestant_id).collect();
    assert_eq!(order, vec![early, late]);
    assert!(roster.iter().all(|e| e.contestant_status == ContestantStatus::Active));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_scoring_rules_include_season_agnostic_rules(pool: PgPool) {
    let seed = seed(&pool).await;
    let specific = add_rule(&pool, Some(seed.season_id), "immunity_win", 5).await;
    let agnostic = add_rule(&pool, None, "survived_tribal", 1).await;
    let store = PgLeagueStore::new(pool);

    let rules = store.scoring_rules(seed.season_id).await.unwrap();

    let ids: Vec<Uuid> = rules.iter().map(|r| r.id).collect();
    assert!(ids.contains(&specific));
    assert!(ids.contains(&agnostic));
}

// --- picks ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_upsert_replaces_pending_pick_in_place(pool: PgPool) {
    // Arrange
    let seed = seed(&pool).await;
    let first = add_contestant(&pool, seed.season_id, "Ozzy").await;
    let second = add_contestant(&pool, seed.season_id, "Yul").await;
    let store = PgLeagueStore::new(pool);
    let original = store
        .upsert_pending_pick(&pending_pick(&seed, first))
        .await
        .unwrap()
        .unwrap();

    // Act
    let replaced = store
        .upsert_pending_pick(&pending_pick(&seed, second))
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(replaced.id, original.id);
    assert_eq!(replaced.contestant_id, second);
    let picks = store.episode_picks(seed.league_id, seed.episode_id).await.unwrap();
    assert_eq!(picks.len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_upsert_leaves_locked_pick_untouched(pool: PgPool) {
    let seed = seed(&pool).await;
    let first = add_contestant(&pool, seed.season_id, "Ozzy").await;
    let second = add_contestant(&pool, seed.season_id, "Yul").await;
    let store = PgLeagueStore::new(pool);
    store.upsert_pending_pick(&pending_pick(&seed, first)).await.unwrap();
    store.lock_pending_picks(seed.episode_id, now()).await.unwrap();

    let result = store.upsert_pending_pick(&pending_pick(&seed, second)).await.unwrap();

    assert!(result.is_none());
    let stored = store
        .find_pick(seed.league_id, seed.participant_id, seed.episode_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.contestant_id, first);
    assert_eq!(stored.status, PickStatus::Locked);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_lock_sweep_is_idempotent(pool: PgPool) {
    // Arrange
    let seed = seed(&pool).await;
    let ozzy = add_contestant(&pool, seed.season_id, "Ozzy").await;
    let store = PgLeagueStore::new(pool);
    store.upsert_pending_pick(&pending_pick(&seed, ozzy)).await.unwrap();

    // Act
    let first = store.lock_pending_picks(seed.episode_id, now()).await.unwrap();
    let second = store
        .lock_pending_picks(seed.episode_id, now() + Duration::minutes(10))
        .await
        .unwrap();

    // Assert
    assert_eq!(first, 1);
    assert_eq!(second, 0);
    let pick = store
        .find_pick(seed.league_id, seed.participant_id, seed.episode_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(pick.locked_at, Some(now()));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_auto_pick_never_overwrites_existing_pick(pool: PgPool) {
    let seed = seed(&pool).await;
    let ozzy = add_contestant(&pool, seed.season_id, "Ozzy").await;
    let store = PgLeagueStore::new(pool);
    let mut auto = pending_pick(&seed, ozzy);
    auto.status = PickStatus::AutoPicked;

    let inserted = store.insert_auto_pick(&auto).await.unwrap();
    auto.id = Uuid::new_v4();
    let again = store.insert_auto_pick(&auto).await.unwrap();

    assert!(inserted);
    assert!(!again);
}

// --- scoring ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_replace_contestant_scores_replaces_rather_than_merges(pool: PgPool) {
    // Arrange
    let seed = seed(&pool).await;
    let ozzy = add_contestant(&pool, seed.season_id, "Ozzy").await;
    let immunity = add_rule(&pool, Some(seed.season_id), "immunity_win", 5).await;
    let idol = add_rule(&pool, Some(seed.season_id), "found_idol", 3).await;
    let store = PgLeagueStore::new(pool);
    store.open_session(seed.episode_id, now()).await.unwrap();
    store
        .replace_contestant_scores(seed.episode_id, ozzy, &[score(&seed, ozzy, immunity, 1, 5)])
        .await
        .unwrap();

    // Act
    store
        .replace_contestant_scores(seed.episode_id, ozzy, &[score(&seed, ozzy, idol, 2, 6)])
        .await
        .unwrap();

    // Assert
    let scores = store.episode_scores(seed.episode_id).await.unwrap();
    assert_eq!(scores.len(), 1);
    assert_eq!(scores[0].rule_id, idol);
    assert_eq!(scores[0].points, 6);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_scoring_status_reports_missing_contestants(pool: PgPool) {
    let seed = seed(&pool).await;
    let scored = add_contestant(&pool, seed.season_id, "Ozzy").await;
    let missing = add_contestant(&pool, seed.season_id, "Yul").await;
    let rule = add_rule(&pool, None, "survived_tribal", 1).await;
    let store = PgLeagueStore::new(pool);
    store.open_session(seed.episode_id, now()).await.unwrap();
    store
        .replace_contestant_scores(seed.episode_id, scored, &[score(&seed, scored, rule, 1, 1)])
        .await
        .unwrap();

    let status = store.scoring_status(seed.episode_id).await.unwrap();

    assert_eq!(status.session_status, Some(SessionStatus::Draft));
    assert_eq!(status.active_contestants, 2);
    assert_eq!(status.missing_contestant_ids, vec![missing]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_finalization_commits_once(pool: PgPool) {
    // Arrange
    let seed = seed(&pool).await;
    let ozzy = add_contestant(&pool, seed.season_id, "Ozzy").await;
    let yul = add_contestant(&pool, seed.season_id, "Yul").await;
    let immunity = add_rule(&pool, Some(seed.season_id), "immunity_win", 5).await;
    let store = PgLeagueStore::new(pool);
    store.upsert_pending_pick(&pending_pick(&seed, ozzy)).await.unwrap();
    store.open_session(seed.episode_id, now()).await.unwrap();
    store
        .replace_contestant_scores(seed.episode_id, ozzy, &[score(&seed, ozzy, immunity, 2, 10)])
        .await
        .unwrap();
    store
        .record_elimination(&EliminationRecord {
            episode_id: seed.episode_id,
            contestant_id: yul,
            placement: 18,
        })
        .await
        .unwrap();
    let actor = Uuid::new_v4();

    // Act
    let receipt = store
        .commit_finalization(seed.episode_id, actor, now())
        .await
        .unwrap();
    let repeat = store.commit_finalization(seed.episode_id, actor, now()).await;

    // Assert
    assert_eq!(receipt.season_id, seed.season_id);
    assert_eq!(receipt.contestant_totals, vec![(ozzy, 10)]);
    assert_eq!(receipt.eliminated_contestant_ids, vec![yul]);
    assert_eq!(receipt.credited_picks, 1);
    assert!(matches!(repeat, Err(DomainError::AlreadyFinalized { .. })));
    let pick = store
        .find_pick(seed.league_id, seed.participant_id, seed.episode_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(pick.points_earned, 10);
    assert!(store.find_episode(seed.episode_id).await.unwrap().unwrap().is_scored);
    let yul_row = store.find_contestant(yul).await.unwrap().unwrap();
    assert_eq!(yul_row.status, ContestantStatus::Eliminated);
    assert_eq!(yul_row.placement, Some(18));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_finalization_without_session_writes_nothing(pool: PgPool) {
    let seed = seed(&pool).await;
    let store = PgLeagueStore::new(pool);

    let result = store
        .commit_finalization(seed.episode_id, Uuid::new_v4(), now())
        .await;

    assert!(matches!(
        result,
        Err(DomainError::NotFound {
            entity: "scoring_session",
            ..
        })
    ));
    assert!(!store.find_episode(seed.episode_id).await.unwrap().unwrap().is_scored);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_score_write_after_finalization_is_rejected(pool: PgPool) {
    // Arrange
    let seed = seed(&pool).await;
    let ozzy = add_contestant(&pool, seed.season_id, "Ozzy").await;
    let immunity = add_rule(&pool, Some(seed.season_id), "immunity_win", 5).await;
    let store = PgLeagueStore::new(pool);
    store.open_session(seed.episode_id, now()).await.unwrap();
    store
        .commit_finalization(seed.episode_id, Uuid::new_v4(), now())
        .await
        .unwrap();

    // Act
    let saved = store
        .replace_contestant_scores(seed.episode_id, ozzy, &[score(&seed, ozzy, immunity, 1, 5)])
        .await;
    let recorded = store
        .record_elimination(&EliminationRecord {
            episode_id: seed.episode_id,
            contestant_id: ozzy,
            placement: 18,
        })
        .await;

    // Assert
    assert!(matches!(saved, Err(DomainError::AlreadyFinalized { .. })));
    assert!(matches!(recorded, Err(DomainError::AlreadyFinalized { .. })));
    assert!(store.episode_scores(seed.episode_id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_finalization_flags_member_who_lost_whole_roster(pool: PgPool) {
    // Arrange
    let seed = seed(&pool).await;
    let ozzy = add_contestant(&pool, seed.season_id, "Ozzy").await;
    let yul = add_contestant(&pool, seed.season_id, "Yul").await;
    add_slot(&pool, &seed, ozzy, 1).await;
    add_slot(&pool, &seed, yul, 2).await;
    let store = PgLeagueStore::new(pool);
    store.open_session(seed.episode_id, now()).await.unwrap();
    for (contestant_id, placement) in [(ozzy, 18), (yul, 17)] {
        store
            .record_elimination(&EliminationRecord {
                episode_id: seed.episode_id,
                contestant_id,
                placement,
            })
            .await
            .unwrap();
    }

    // Act
    let receipt = store
        .commit_finalization(seed.episode_id, Uuid::new_v4(), now())
        .await
        .unwrap();

    // Assert
    assert_eq!(receipt.affected_members.len(), 1);
    let member = &receipt.affected_members[0];
    assert_eq!(member.participant_id, seed.participant_id);
    assert_eq!(member.league_name, "Tribal");
    assert!(member.remaining_contestants.is_empty());
    assert!(member.newly_eliminated);
    let row = store
        .find_member(seed.league_id, seed.participant_id)
        .await
        .unwrap()
        .unwrap();
    assert!(row.is_eliminated);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_finalization_reports_last_remaining_contestant(pool: PgPool) {
    let seed = seed(&pool).await;
    let ozzy = add_contestant(&pool, seed.season_id, "Ozzy").await;
    let yul = add_contestant(&pool, seed.season_id, "Yul").await;
    add_slot(&pool, &seed, ozzy, 1).await;
    add_slot(&pool, &seed, yul, 2).await;
    let store = PgLeagueStore::new(pool);
    store.open_session(seed.episode_id, now()).await.unwrap();
    store
        .record_elimination(&EliminationRecord {
            episode_id: seed.episode_id,
            contestant_id: ozzy,
            placement: 18,
        })
        .await
        .unwrap();

    let receipt = store
        .commit_finalization(seed.episode_id, Uuid::new_v4(), now())
        .await
        .unwrap();

    assert_eq!(receipt.affected_members.len(), 1);
    assert_eq!(receipt.affected_members[0].remaining_contestants, vec!["Yul".to_owned()]);
    assert!(!receipt.affected_members[0].newly_eliminated);
}

// --- standings ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_member_pick_points_include_members_without_picks(pool: PgPool) {
    // Arrange
    let seed = seed(&pool).await;
    let idle = Uuid::new_v4();
    add_member(&pool, seed.league_id, idle).await;
    let ozzy = add_contestant(&pool, seed.season_id, "Ozzy").await;
    sqlx::query(
        "INSERT INTO weekly_picks \
         (id, league_id, participant_id, episode_id, contestant_id, status, picked_at, points_earned) \
         VALUES ($1, $2, $3, $4, $5, 'locked', $6, 7)",
    )
    .bind(Uuid::new_v4())
    .bind(seed.league_id)
    .bind(seed.participant_id)
    .bind(seed.episode_id)
    .bind(ozzy)
    .bind(now())
    .execute(&pool)
    .await
    .unwrap();
    let store = PgLeagueStore::new(pool);

    // Act
    let mut totals = store.member_pick_points(seed.league_id).await.unwrap();
    totals.sort_by_key(|(_, points)| std::cmp::Reverse(*points));

    // Assert
    assert_eq!(totals, vec![(seed.participant_id, 7), (idle, 0)]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_write_standings_then_read_season_totals(pool: PgPool) {
    let seed = seed(&pool).await;
    let store = PgLeagueStore::new(pool);

    store
        .write_standings(
            seed.league_id,
            &[StandingRow {
                participant_id: seed.participant_id,
                total_points: 42,
                rank: 1,
            }],
        )
        .await
        .unwrap();

    let totals = store.season_member_totals(seed.season_id).await.unwrap();
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].total_points, 42);
    let member = store
        .find_member(seed.league_id, seed.participant_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(member.rank, Some(1));
}
