//! Query handlers for the Scoring context.

use serde::Serialize;
use torchlight_core::error::DomainError;
use torchlight_core::model::{EliminationRecord, EpisodeScore};
use torchlight_core::status::SessionStatus;
use torchlight_core::store::ScoringStore;
use uuid::Uuid;

/// Read-only view of an episode's scoring completeness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoringStatusView {
    /// The episode identifier.
    pub episode_id: Uuid,
    /// Session status; `None` before the session is started.
    pub session_status: Option<SessionStatus>,
    /// Active contestants in the season.
    pub active_contestants: usize,
    /// Active contestants with at least one score row.
    pub scored_contestants: usize,
    /// Active contestants still without a score row.
    pub missing_contestant_ids: Vec<Uuid>,
    /// Whether every active contestant is scored.
    pub is_complete: bool,
}

/// Read-only view of an episode's score rows and recorded placements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpisodeScoresView {
    /// The episode identifier.
    pub episode_id: Uuid,
    /// Score rows ordered by contestant, then rule.
    pub scores: Vec<EpisodeScore>,
    /// Recorded placements.
    pub eliminations: Vec<EliminationRecord>,
}

/// Reports which active contestants still lack scores.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown episode.
pub async fn get_scoring_status(
    episode_id: Uuid,
    store: &dyn ScoringStore,
) -> Result<ScoringStatusView, DomainError> {
    if store.find_episode(episode_id).await?.is_none() {
        return Err(DomainError::not_found("episode", episode_id));
    }
    let status = store.scoring_status(episode_id).await?;
    Ok(ScoringStatusView {
        is_complete: status.is_complete(),
        episode_id,
        session_status: status.session_status,
        active_contestants: status.active_contestants,
        scored_contestants: status.scored_contestants,
        missing_contestant_ids: status.missing_contestant_ids,
    })
}

/// Lists an episode's score rows and placements.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown episode.
pub async fn get_episode_scores(
    episode_id: Uuid,
    store: &dyn ScoringStore,
) -> Result<EpisodeScoresView, DomainError> {
    if store.find_episode(episode_id).await?.is_none() {
        return Err(DomainError::not_found("episode", episode_id));
    }
    let mut scores = store.episode_scores(episode_id).await?;
    scores.sort_by_key(|s| (s.contestant_id, s.rule_id));
    let mut eliminations = store.episode_eliminations(episode_id).await?;
    eliminations.sort_by_key(|e| e.placement);
    Ok(EpisodeScoresView {
        episode_id,
        scores,
        eliminations,
    })
}

#[cfg(test)]
mod tests {
    use torchlight_core::model::EpisodeScore;
    use torchlight_test_support::{SeasonFixture, fixed_now};

    use super::*;

    fn score(fixture: &SeasonFixture, contestant_id: Uuid, rule_id: Uuid) -> EpisodeScore {
        EpisodeScore {
            id: Uuid::new_v4(),
            episode_id: fixture.episode_id,
            contestant_id,
            rule_id,
            quantity: 1,
            points: 4,
            created_at: fixed_now(),
        }
    }

    #[tokio::test]
    async fn test_status_lists_unscored_active_contestants() {
        // Arrange
        let fixture = SeasonFixture::new();
        let scored = fixture.contestant("Boston Rob");
        let missing = fixture.contestant("Amber");
        let rule = fixture.rule("reward_win", 4);
        fixture.store.insert_score(score(&fixture, scored, rule));

        // Act
        let view = get_scoring_status(fixture.episode_id, &fixture.store)
            .await
            .unwrap();

        // Assert
        assert_eq!(view.active_contestants, 2);
        assert_eq!(view.scored_contestants, 1);
        assert_eq!(view.missing_contestant_ids, vec![missing]);
        assert!(!view.is_complete);
        assert_eq!(view.session_status, None);
    }

    #[tokio::test]
    async fn test_status_is_complete_once_every_active_contestant_is_scored() {
        let fixture = SeasonFixture::new();
        let only = fixture.contestant("Boston Rob");
        let rule = fixture.rule("reward_win", 4);
        fixture.store.insert_score(score(&fixture, only, rule));

        let view = get_scoring_status(fixture.episode_id, &fixture.store)
            .await
            .unwrap();

        assert!(view.is_complete);
    }

    #[tokio::test]
    async fn test_unknown_episode_is_not_found() {
        let fixture = SeasonFixture::new();

        let result = get_episode_scores(Uuid::new_v4(), &fixture.store).await;

        assert!(matches!(
            result,
            Err(DomainError::NotFound {
                entity: "episode",
                ..
            })
        ));
    }
}
