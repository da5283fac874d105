//! Startup configuration read once from the environment.

use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

/// Settings for the API server, the connection pool, the season cache and
/// the notification dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// PostgreSQL connection string (`DATABASE_URL`, required).
    pub database_url: String,
    /// Bind host (`HOST`).
    pub host: String,
    /// Bind port (`PORT`).
    pub port: u16,
    /// Pool size (`DATABASE_MAX_CONNECTIONS`).
    pub database_max_connections: u32,
    /// Lifetime of a cached season configuration (`SEASON_CACHE_TTL_SECS`).
    pub season_cache_ttl: chrono::Duration,
    /// Bound of the notification queue (`NOTIFICATION_QUEUE_CAPACITY`).
    pub notification_queue_capacity: usize,
    /// Attempts per guaranteed notification (`NOTIFICATION_MAX_ATTEMPTS`).
    pub notification_max_attempts: u32,
    /// First retry delay (`NOTIFICATION_RETRY_BASE_MS`).
    pub notification_retry_base: Duration,
}

impl AppConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `DATABASE_URL` is unset or any value
    /// fails to parse.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, applying defaults for
    /// every optional key.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `DATABASE_URL` is missing or any value
    /// fails to parse or is out of range.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let database_url = lookup("DATABASE_URL").ok_or_else(|| {
            AppError::Config("DATABASE_URL environment variable must be set".to_owned())
        })?;

        let ttl_secs: i64 = parse_or(&lookup, "SEASON_CACHE_TTL_SECS", 300)?;
        if ttl_secs < 0 {
            return Err(AppError::Config(
                "SEASON_CACHE_TTL_SECS must not be negative".to_owned(),
            ));
        }

        Ok(Self {
            database_url,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port: parse_or(&lookup, "PORT", 3000)?,
            database_max_connections: positive(
                parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
                "DATABASE_MAX_CONNECTIONS",
            )?,
            season_cache_ttl: chrono::Duration::seconds(ttl_secs),
            notification_queue_capacity: positive(
                parse_or(&lookup, "NOTIFICATION_QUEUE_CAPACITY", 1024)?,
                "NOTIFICATION_QUEUE_CAPACITY",
            )?,
            notification_max_attempts: positive(
                parse_or(&lookup, "NOTIFICATION_MAX_ATTEMPTS", 5)?,
                "NOTIFICATION_MAX_ATTEMPTS",
            )?,
            notification_retry_base: Duration::from_millis(parse_or(
                &lookup,
                "NOTIFICATION_RETRY_BASE_MS",
                200,
            )?),
        })
    }

    /// The socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a socket address.
    pub fn addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key} must be a valid number: {e}"))),
    }
}

fn positive<T>(value: T, key: &str) -> Result<T, AppError>
where
    T: PartialOrd + Default,
{
    if value > T::default() {
        Ok(value)
    } else {
        Err(AppError::Config(format!("{key} must be at least 1")))
    }
}
