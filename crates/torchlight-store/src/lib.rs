//! Torchlight: PostgreSQL persistence.
//!
//! [`PgLeagueStore`] implements every store trait from `torchlight-core`
//! with runtime `sqlx` queries. Multi-row writes run in transactions.

mod error;
pub mod pg_league_store;
mod rows;

pub use pg_league_store::PgLeagueStore;

/// Embedded schema migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");
