//! End-to-end week of play against PostgreSQL: pick, lock, auto-fill,
//! score, finalize and read the standings.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Duration;
use serde_json::json;
use sqlx::PgPool;
use torchlight_core::outbox::{NotificationKind, Priority};
use torchlight_test_support::{ManualClock, fixed_now};
use uuid::Uuid;

#[sqlx::test(migrations = "../../migrations")]
async fn test_full_week_of_play(pool: PgPool) {
    // Arrange
    let seed = common::seed_season(&pool, fixed_now() + Duration::hours(1)).await;
    let alice = common::add_member(&pool, &seed, 0).await;
    let bob = common::add_member(&pool, &seed, 1).await;
    let tony = common::add_contestant(&pool, &seed, "Tony").await;
    let sarah = common::add_contestant(&pool, &seed, "Sarah").await;
    let kim = common::add_contestant(&pool, &seed, "Kim").await;
    common::draft(&pool, &seed, alice, tony, 1).await;
    common::draft(&pool, &seed, alice, sarah, 2).await;
    common::draft(&pool, &seed, bob, kim, 1).await;
    let immunity = common::add_rule(&pool, &seed, "immunity_win", 5).await;
    let clock = Arc::new(ManualClock::new(fixed_now()));
    let (app, outbox) = common::build_test_app_with_clock(pool, clock.clone());
    let episode = seed.episode_id;
    let scorer = Uuid::new_v4();

    // Act: alice picks before the deadline, bob forgets.
    let (pick_status, _) = common::send_json(
        app.clone(),
        "POST",
        "/api/v1/picks",
        Some(alice),
        Some(&json!({
            "league_id": seed.league_id,
            "episode_id": episode,
            "contestant_id": tony,
        })),
    )
    .await;

    clock.advance(Duration::hours(2));
    let (lock_status, locked) =
        common::send_json(app.clone(), "POST", "/api/v1/jobs/lock-picks", None, None).await;
    let (fill_status, filled) =
        common::send_json(app.clone(), "POST", "/api/v1/jobs/auto-fill-picks", None, None).await;
    let (late_status, late) = common::send_json(
        app.clone(),
        "POST",
        "/api/v1/picks",
        Some(alice),
        Some(&json!({
            "league_id": seed.league_id,
            "episode_id": episode,
            "contestant_id": sarah,
        })),
    )
    .await;

    // Act: the scorer records the episode and finalizes it.
    let (session_status, _) = common::send_json(
        app.clone(),
        "POST",
        &format!("/api/v1/episodes/{episode}/scoring-session"),
        Some(scorer),
        None,
    )
    .await;
    let (save_status, _) = common::send_json(
        app.clone(),
        "PUT",
        &format!("/api/v1/episodes/{episode}/scores"),
        Some(scorer),
        Some(&json!({
            "entries": [
                { "contestant_id": tony, "rule_id": immunity, "quantity": 2 },
                { "contestant_id": kim, "rule_id": immunity, "quantity": 1 }
            ]
        })),
    )
    .await;
    let (elim_status, _) = common::send_json(
        app.clone(),
        "PUT",
        &format!("/api/v1/episodes/{episode}/eliminations/{kim}"),
        Some(scorer),
        Some(&json!({ "placement": 18 })),
    )
    .await;
    let (final_status, finalized) = common::send_json(
        app.clone(),
        "POST",
        &format!("/api/v1/episodes/{episode}/finalize"),
        Some(scorer),
        None,
    )
    .await;
    let (again_status, again) = common::send_json(
        app.clone(),
        "POST",
        &format!("/api/v1/episodes/{episode}/finalize"),
        Some(scorer),
        None,
    )
    .await;
    let (table_status, table) = common::get_json(
        app.clone(),
        &format!("/api/v1/leagues/{}/standings", seed.league_id),
    )
    .await;

    // Assert: picks
    assert_eq!(pick_status, StatusCode::OK);
    assert_eq!(lock_status, StatusCode::OK);
    assert_eq!(locked["episodes"][0]["locked"], 1);
    assert_eq!(fill_status, StatusCode::OK);
    assert_eq!(filled["assigned"][0]["participant_id"], bob.to_string());
    assert_eq!(filled["assigned"][0]["contestant_id"], kim.to_string());
    assert_eq!(late_status, StatusCode::CONFLICT);
    assert_eq!(late["error"], "deadline_passed");

    // Assert: scoring
    assert_eq!(session_status, StatusCode::OK);
    assert_eq!(save_status, StatusCode::OK);
    assert_eq!(elim_status, StatusCode::OK);
    assert_eq!(final_status, StatusCode::OK);
    assert_eq!(finalized["credited_picks"], 2);
    assert_eq!(finalized["standings_updated"], true);
    assert_eq!(
        finalized["cascade"]["torches_snuffed"][0]["participant_id"],
        bob.to_string()
    );
    assert_eq!(again_status, StatusCode::CONFLICT);
    assert_eq!(again["error"], "already_finalized");

    // Assert: standings
    assert_eq!(table_status, StatusCode::OK);
    assert_eq!(table["standings"][0]["participant_id"], alice.to_string());
    assert_eq!(table["standings"][0]["total_points"], 10);
    assert_eq!(table["standings"][0]["rank"], 1);
    assert_eq!(table["standings"][1]["participant_id"], bob.to_string());
    assert_eq!(table["standings"][1]["total_points"], 5);
    assert_eq!(table["standings"][1]["is_eliminated"], true);

    // Assert: notifications
    assert_eq!(outbox.sent_of_kind(NotificationKind::PickConfirmation).len(), 1);
    assert_eq!(outbox.sent_of_kind(NotificationKind::AutoPickAlert).len(), 1);
    let torches = outbox.sent_of_kind(NotificationKind::TorchSnuffed);
    assert_eq!(torches.len(), 1);
    assert_eq!(torches[0].recipient, bob);
    assert_eq!(torches[0].priority, Priority::Guaranteed);
    assert!(outbox.sent_of_kind(NotificationKind::EliminationAlert).is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_weighted_rankings_for_seeded_season(pool: PgPool) {
    let seed = common::seed_season(&pool, fixed_now() + Duration::hours(1)).await;
    let member = common::add_member(&pool, &seed, 0).await;
    let (app, _) = common::build_test_app(pool);

    let (status, json) = common::get_json(
        app,
        &format!("/api/v1/seasons/{}/weighted-rankings", seed.season_id),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["rankings"][0]["participant_id"], member.to_string());
    assert_eq!(json["rankings"][0]["league_count"], 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_jobs_without_active_season(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);

    let (lock_status, locked) =
        common::send_json(app.clone(), "POST", "/api/v1/jobs/lock-picks", None, None).await;
    let (recalc_status, recalc) = common::send_json(
        app,
        "POST",
        "/api/v1/jobs/recalculate-standings",
        None,
        None,
    )
    .await;

    assert_eq!(lock_status, StatusCode::OK);
    assert_eq!(locked["episodes"], json!([]));
    assert_eq!(recalc_status, StatusCode::NOT_FOUND);
    assert_eq!(recalc["error"], "not_found");
}
