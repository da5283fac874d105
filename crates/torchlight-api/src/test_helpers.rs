//! Helpers shared by the route test modules.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Duration;
use serde_json::Value;
use torchlight_core::outbox::NotificationOutbox;
use torchlight_test_support::{FixedClock, InMemoryLeagueStore, RecordingOutbox, fixed_now};
use tower::ServiceExt;
use uuid::Uuid;

use crate::actor::ACTOR_HEADER;
use crate::state::AppState;

/// State over a clone of `store` (sharing its tables) at [`fixed_now`].
pub(crate) fn app_state_with(
    store: &InMemoryLeagueStore,
    outbox: Arc<dyn NotificationOutbox>,
) -> AppState {
    AppState::new(
        Arc::new(store.clone()),
        Arc::new(FixedClock(fixed_now())),
        outbox,
        Duration::minutes(5),
    )
}

/// State plus the outbox it records into.
pub(crate) fn recording_state(store: &InMemoryLeagueStore) -> (AppState, Arc<RecordingOutbox>) {
    let outbox = Arc::new(RecordingOutbox::new());
    (app_state_with(store, outbox.clone()), outbox)
}

/// Sends one request and decodes the JSON response body (`Null` when the
/// body is not JSON).
pub(crate) async fn send(
    app: Router,
    method: &str,
    uri: &str,
    actor: Option<Uuid>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(actor) = actor {
        builder = builder.header(ACTOR_HEADER, actor.to_string());
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}
