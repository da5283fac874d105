//! Score entry validation and grouping.
//!
//! A save names any number of (contestant, rule, quantity) facts. They are
//! grouped per contestant so each contestant's rows can be replaced as a
//! unit; zero quantities still produce a group, which clears that
//! contestant's rows.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use torchlight_core::cache::SeasonConfig;
use torchlight_core::error::DomainError;
use torchlight_core::model::{Contestant, Episode, EpisodeScore, ScoringSession};
use torchlight_core::status::SessionStatus;
use uuid::Uuid;

/// One raw scoring fact as submitted by a scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// The contestant the fact is about.
    pub contestant_id: Uuid,
    /// The triggered rule.
    pub rule_id: Uuid,
    /// How many times the rule applied.
    pub quantity: i32,
}

/// Ensures the episode can still be scored and returns its draft session.
///
/// # Errors
///
/// Returns `AlreadyFinalized` if the episode is scored or the session is
/// finalized, and `NotFound` if no session was started.
pub fn ensure_session_open<'a>(
    episode: &Episode,
    session: Option<&'a ScoringSession>,
) -> Result<&'a ScoringSession, DomainError> {
    if episode.is_scored {
        return Err(DomainError::AlreadyFinalized {
            episode_id: episode.id,
        });
    }
    let session = session.ok_or_else(|| DomainError::not_found("scoring_session", episode.id))?;
    if session.status != SessionStatus::Draft {
        return Err(DomainError::AlreadyFinalized {
            episode_id: episode.id,
        });
    }
    Ok(session)
}

/// Validates `entries` and turns them into score rows grouped by
/// contestant. Only positive quantities produce rows.
///
/// # Errors
///
/// Returns `InvalidSelection` for a negative quantity, a repeated
/// (contestant, rule) pair, a rule outside the season catalog, a contestant
/// outside the season, or a point value that overflows.
pub fn build_score_rows(
    episode: &Episode,
    entries: &[ScoreEntry],
    config: &SeasonConfig,
    contestants: &[Contestant],
    now: DateTime<Utc>,
) -> Result<BTreeMap<Uuid, Vec<EpisodeScore>>, DomainError> {
    let season_contestants: HashSet<Uuid> = contestants
        .iter()
        .filter(|c| c.season_id == episode.season_id)
        .map(|c| c.id)
        .collect();
    let mut seen = HashSet::new();
    let mut grouped: BTreeMap<Uuid, Vec<EpisodeScore>> = BTreeMap::new();

    for entry in entries {
        if entry.quantity < 0 {
            return Err(DomainError::InvalidSelection(format!(
                "quantity for rule {} must not be negative",
                entry.rule_id
            )));
        }
        if !season_contestants.contains(&entry.contestant_id) {
            return Err(DomainError::InvalidSelection(format!(
                "contestant {} is not part of this season",
                entry.contestant_id
            )));
        }
        let rule = config.rule(entry.rule_id).ok_or_else(|| {
            DomainError::InvalidSelection(format!(
                "rule {} is not in this season's catalog",
                entry.rule_id
            ))
        })?;
        if !seen.insert((entry.contestant_id, entry.rule_id)) {
            return Err(DomainError::InvalidSelection(format!(
                "rule {} appears twice for contestant {}",
                entry.rule_id, entry.contestant_id
            )));
        }

        let rows = grouped.entry(entry.contestant_id).or_default();
        if entry.quantity == 0 {
            continue;
        }
        let points = rule.points.checked_mul(entry.quantity).ok_or_else(|| {
            DomainError::InvalidSelection(format!("points for rule {} overflow", rule.code))
        })?;
        rows.push(EpisodeScore {
            id: Uuid::new_v4(),
            episode_id: episode.id,
            contestant_id: entry.contestant_id,
            rule_id: rule.id,
            quantity: entry.quantity,
            points,
            created_at: now,
        });
    }

    Ok(grouped)
}
