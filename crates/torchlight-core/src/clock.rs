//! Clock abstraction for deadline checks.

use chrono::{DateTime, Utc};

/// Abstraction over system time so deadline logic stays deterministic.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time, used by the API server.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
