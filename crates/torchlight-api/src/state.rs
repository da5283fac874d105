//! Shared application state.

use std::fmt;
use std::sync::Arc;

use chrono::Duration;
use torchlight_core::cache::SeasonConfigCache;
use torchlight_core::clock::Clock;
use torchlight_core::outbox::NotificationOutbox;
use torchlight_core::store::{PickStore, ScoringStore, StandingsStore};

/// Application state shared across all request handlers.
///
/// The three store handles point at the same underlying store; each route
/// borrows the one its context's handlers expect.
#[derive(Clone)]
pub struct AppState {
    /// Time source for deadlines and timestamps.
    pub clock: Arc<dyn Clock>,
    /// Weekly pick persistence.
    pub pick_store: Arc<dyn PickStore>,
    /// Scoring persistence.
    pub scoring_store: Arc<dyn ScoringStore>,
    /// Standings persistence.
    pub standings_store: Arc<dyn StandingsStore>,
    /// Queue for outbound notifications.
    pub outbox: Arc<dyn NotificationOutbox>,
    /// Season metadata and rule catalog cache.
    pub season_cache: Arc<SeasonConfigCache>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("season_cache", &self.season_cache)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create new application state around one store implementing every
    /// context trait.
    #[must_use]
    pub fn new<S>(
        store: Arc<S>,
        clock: Arc<dyn Clock>,
        outbox: Arc<dyn NotificationOutbox>,
        season_cache_ttl: Duration,
    ) -> Self
    where
        S: PickStore + ScoringStore + StandingsStore + 'static,
    {
        let season_cache = Arc::new(SeasonConfigCache::new(
            season_cache_ttl,
            Arc::clone(&clock),
        ));
        Self {
            clock,
            pick_store: store.clone(),
            scoring_store: store.clone(),
            standings_store: store,
            outbox,
            season_cache,
        }
    }
}
