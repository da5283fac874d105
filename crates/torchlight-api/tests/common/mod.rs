//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Duration, Utc};
use http_body_util::BodyExt;
use sqlx::PgPool;
use torchlight_api::actor::ACTOR_HEADER;
use torchlight_api::state::AppState;
use torchlight_core::clock::Clock;
use torchlight_store::PgLeagueStore;
use torchlight_test_support::{FixedClock, RecordingOutbox, fixed_now};
use tower::ServiceExt;
use uuid::Uuid;

/// Build the full app router over a real `PgLeagueStore` at [`fixed_now`].
pub fn build_test_app(pool: PgPool) -> (Router, Arc<RecordingOutbox>) {
    build_test_app_with_clock(pool, Arc::new(FixedClock(fixed_now())))
}

/// Build the full app router with a caller-controlled clock, for tests that
/// move past a pick deadline.
pub fn build_test_app_with_clock(
    pool: PgPool,
    clock: Arc<dyn Clock>,
) -> (Router, Arc<RecordingOutbox>) {
    let outbox = Arc::new(RecordingOutbox::new());
    let app_state = AppState::new(
        Arc::new(PgLeagueStore::new(pool)),
        clock,
        outbox.clone(),
        Duration::minutes(5),
    );
    (torchlight_api::app(app_state), outbox)
}

/// Send a request with an optional actor header and JSON body, and return
/// the decoded response.
pub async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    actor: Option<Uuid>,
    body: Option<&serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(actor) = actor {
        builder = builder.header(ACTOR_HEADER, actor.to_string());
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send_json(app, "GET", uri, None, None).await
}

/// One active season with one league and one episode.
pub struct Seed {
    pub season_id: Uuid,
    pub league_id: Uuid,
    pub episode_id: Uuid,
}

/// Seeds an active season whose first episode locks at `lock_at`.
pub async fn seed_season(pool: &PgPool, lock_at: DateTime<Utc>) -> Seed {
    let seed = Seed {
        season_id: Uuid::new_v4(),
        league_id: Uuid::new_v4(),
        episode_id: Uuid::new_v4(),
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
    .bind(lock_at.date_naive())
    .bind(lock_at)
    .execute(pool)
    .await
    .unwrap();
    seed
}

/// Adds a member who joined `minutes_in` minutes after the first one.
pub async fn add_member(pool: &PgPool, seed: &Seed, minutes_in: i64) -> Uuid {
    let participant_id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO league_members (league_id, participant_id, joined_at) VALUES ($1, $2, $3)",
    )
    .bind(seed.league_id)
    .bind(participant_id)
    .bind(fixed_now() - Duration::days(30) + Duration::minutes(minutes_in))
    .execute(pool)
    .await
    .unwrap();
    participant_id
}

pub async fn add_contestant(pool: &PgPool, seed: &Seed, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO contestants (id, season_id, name, status) VALUES ($1, $2, $3, 'active')",
    )
    .bind(id)
    .bind(seed.season_id)
    .bind(name)
    .execute(pool)
    .await
    .unwrap();
    id
}

pub async fn draft(
    pool: &PgPool,
    seed: &Seed,
    participant_id: Uuid,
    contestant_id: Uuid,
    position: i32,
) {
    sqlx::query(
        "INSERT INTO roster_slots (id, league_id, participant_id, contestant_id, draft_position) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(Uuid::new_v4())
    .bind(seed.league_id)
    .bind(participant_id)
    .bind(contestant_id)
    .bind(position)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn add_rule(pool: &PgPool, seed: &Seed, code: &str, points: i32) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO scoring_rules (id, season_id, code, name, points) VALUES ($1, $2, $3, $3, $4)",
    )
    .bind(id)
    .bind(seed.season_id)
    .bind(code)
    .bind(points)
    .execute(pool)
    .await
    .unwrap();
    id
}
