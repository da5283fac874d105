//! Torchlight API server entry point.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use torchlight_api::config::AppConfig;
use torchlight_api::error::AppError;
use torchlight_api::state::AppState;
use torchlight_core::clock::SystemClock;
use torchlight_notifications::{Dispatcher, LogTransport, RetryPolicy};
use torchlight_store::{MIGRATOR, PgLeagueStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Torchlight API server");

    let config = AppConfig::from_env()?;

    // Create database connection pool and bring the schema up to date.
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;
    MIGRATOR.run(&pool).await?;

    // Notification queue and its dispatcher task.
    let (outbox, queue) = torchlight_notifications::channel(config.notification_queue_capacity);
    let policy = RetryPolicy::new(
        config.notification_max_attempts,
        config.notification_retry_base,
    );
    let _dispatcher = Dispatcher::new(Arc::new(LogTransport), policy).spawn(queue);

    let app_state = AppState::new(
        Arc::new(PgLeagueStore::new(pool)),
        Arc::new(SystemClock),
        Arc::new(outbox),
        config.season_cache_ttl,
    );
    let app = torchlight_api::app(app_state);

    // Start server.
    let addr = config.addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
