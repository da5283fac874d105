//! Season configuration cache.
//!
//! Season metadata and the applicable rule catalog change rarely but are
//! read on every scoring call. The cache is an explicit object handed to the
//! handlers that need it; entries expire after a TTL measured with the
//! injected [`Clock`] and can be invalidated by hand after an admin edit.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::DomainError;
use crate::model::{ScoringRule, Season};
use crate::store::SeasonStore;

/// Cached configuration for one season.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonConfig {
    /// The season row.
    pub season: Season,
    /// Season-specific and season-agnostic rules.
    pub rules: Vec<ScoringRule>,
}

impl SeasonConfig {
    /// Looks up a rule by id.
    #[must_use]
    pub fn rule(&self, rule_id: Uuid) -> Option<&ScoringRule> {
        self.rules.iter().find(|r| r.id == rule_id)
    }
}

#[derive(Debug)]
struct CachedConfig {
    config: Arc<SeasonConfig>,
    loaded_at: DateTime<Utc>,
}

/// TTL cache of [`SeasonConfig`] keyed by season id.
pub struct SeasonConfigCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: RwLock<HashMap<Uuid, CachedConfig>>,
}

impl std::fmt::Debug for SeasonConfigCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeasonConfigCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl SeasonConfigCache {
    /// Creates an empty cache whose entries live for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the season's configuration, loading it from the store when
    /// absent or expired.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the season does not exist, or the
    /// store's error if loading fails.
    pub async fn get_or_load<S>(
        &self,
        season_id: Uuid,
        store: &S,
    ) -> Result<Arc<SeasonConfig>, DomainError>
    where
        S: SeasonStore + ?Sized,
    {
        let now = self.clock.now();
        if let Some(config) = self.fresh(season_id, now) {
            return Ok(config);
        }

        let season = store
            .find_season(season_id)
            .await?
            .ok_or_else(|| DomainError::not_found("season", season_id))?;
        let rules = store.scoring_rules(season_id).await?;
        let config = Arc::new(SeasonConfig { season, rules });

        debug!(%season_id, rules = config.rules.len(), "season config loaded");
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                season_id,
                CachedConfig {
                    config: Arc::clone(&config),
                    loaded_at: now,
                },
            );
        Ok(config)
    }

    /// Drops the cached entry for one season.
    pub fn invalidate(&self, season_id: Uuid) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&season_id);
    }

    fn fresh(&self, season_id: Uuid, now: DateTime<Utc>) -> Option<Arc<SeasonConfig>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(&season_id)
            .filter(|cached| now - cached.loaded_at < self.ttl)
            .map(|cached| Arc::clone(&cached.config))
    }
}
