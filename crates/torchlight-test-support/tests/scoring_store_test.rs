//! Tests for the scoring half of `InMemoryLeagueStore`: writes guarded by
//! the session state and the member flags set by the finalization commit.

use torchlight_core::error::DomainError;
use torchlight_core::model::{EliminationRecord, EpisodeScore, League};
use torchlight_core::status::LeagueStatus;
use torchlight_core::store::ScoringStore;
use torchlight_test_support::{SeasonFixture, fixed_now};
use uuid::Uuid;

fn score(fixture: &SeasonFixture, contestant_id: Uuid, rule_id: Uuid, points: i32) -> EpisodeScore {
    EpisodeScore {
        id: Uuid::new_v4(),
        episode_id: fixture.episode_id,
        contestant_id,
        rule_id,
        quantity: 1,
        points,
        created_at: fixed_now(),
    }
}

async fn eliminate(fixture: &SeasonFixture, contestant_id: Uuid, placement: i32) {
    fixture
        .store
        .record_elimination(&EliminationRecord {
            episode_id: fixture.episode_id,
            contestant_id,
            placement,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_score_write_landing_after_finalization_is_rejected() {
    // Arrange
    let fixture = SeasonFixture::new();
    let tony = fixture.contestant("Tony");
    let immunity = fixture.rule("immunity_win", 5);
    fixture
        .store
        .open_session(fixture.episode_id, fixed_now())
        .await
        .unwrap();
    fixture
        .store
        .commit_finalization(fixture.episode_id, Uuid::new_v4(), fixed_now())
        .await
        .unwrap();

    // Act
    let result = fixture
        .store
        .replace_contestant_scores(fixture.episode_id, tony, &[score(&fixture, tony, immunity, 5)])
        .await;

    // Assert
    assert!(matches!(result, Err(DomainError::AlreadyFinalized { .. })));
    assert!(fixture.store.scores().is_empty());
}

#[tokio::test]
async fn test_elimination_edits_after_finalization_are_rejected() {
    let fixture = SeasonFixture::new();
    let tony = fixture.contestant("Tony");
    fixture
        .store
        .open_session(fixture.episode_id, fixed_now())
        .await
        .unwrap();
    fixture
        .store
        .commit_finalization(fixture.episode_id, Uuid::new_v4(), fixed_now())
        .await
        .unwrap();

    let recorded = fixture
        .store
        .record_elimination(&EliminationRecord {
            episode_id: fixture.episode_id,
            contestant_id: tony,
            placement: 18,
        })
        .await;
    let cleared = fixture
        .store
        .clear_elimination(fixture.episode_id, tony)
        .await;

    assert!(matches!(recorded, Err(DomainError::AlreadyFinalized { .. })));
    assert!(matches!(cleared, Err(DomainError::AlreadyFinalized { .. })));
}

#[tokio::test]
async fn test_score_write_without_session_is_not_found() {
    let fixture = SeasonFixture::new();
    let tony = fixture.contestant("Tony");
    let immunity = fixture.rule("immunity_win", 5);

    let result = fixture
        .store
        .replace_contestant_scores(fixture.episode_id, tony, &[score(&fixture, tony, immunity, 5)])
        .await;

    assert!(matches!(
        result,
        Err(DomainError::NotFound {
            entity: "scoring_session",
            ..
        })
    ));
}

#[tokio::test]
async fn test_finalization_flags_members_left_without_contestants() {
    // Arrange
    let fixture = SeasonFixture::new();
    let snuffed = fixture.member(fixture.league_id);
    let alerted = fixture.member(fixture.league_id);
    let aubry = fixture.contestant("Aubry");
    let cydney = fixture.contestant("Cydney");
    let tai = fixture.contestant("Tai");
    fixture.draft(fixture.league_id, snuffed, aubry);
    fixture.draft(fixture.league_id, snuffed, cydney);
    fixture.draft(fixture.league_id, alerted, tai);
    fixture.draft(fixture.league_id, alerted, fixture.contestant("Debbie"));
    fixture
        .store
        .open_session(fixture.episode_id, fixed_now())
        .await
        .unwrap();
    eliminate(&fixture, aubry, 18).await;
    eliminate(&fixture, cydney, 17).await;
    eliminate(&fixture, tai, 16).await;

    // Act
    let receipt = fixture
        .store
        .commit_finalization(fixture.episode_id, Uuid::new_v4(), fixed_now())
        .await
        .unwrap();

    // Assert
    assert_eq!(receipt.affected_members.len(), 2);
    let snuffed_entry = receipt
        .affected_members
        .iter()
        .find(|m| m.participant_id == snuffed)
        .unwrap();
    assert!(snuffed_entry.remaining_contestants.is_empty());
    assert!(snuffed_entry.newly_eliminated);
    assert_eq!(snuffed_entry.league_name, "Tribal Council");
    let alerted_entry = receipt
        .affected_members
        .iter()
        .find(|m| m.participant_id == alerted)
        .unwrap();
    assert_eq!(alerted_entry.remaining_contestants, vec!["Debbie".to_owned()]);
    assert!(!alerted_entry.newly_eliminated);
    let members = fixture.store.members();
    assert!(members.iter().any(|m| m.participant_id == snuffed && m.is_eliminated));
    assert!(members.iter().any(|m| m.participant_id == alerted && !m.is_eliminated));
}

#[tokio::test]
async fn test_finalization_skips_closed_leagues() {
    // Arrange
    let fixture = SeasonFixture::new();
    let closed_league = Uuid::new_v4();
    fixture.store.insert_league(League {
        id: closed_league,
        season_id: fixture.season_id,
        name: "Last Season's Leftovers".to_owned(),
        status: LeagueStatus::Closed,
    });
    let participant = fixture.member(closed_league);
    let ozzy = fixture.contestant("Ozzy");
    fixture.draft(closed_league, participant, ozzy);
    fixture
        .store
        .open_session(fixture.episode_id, fixed_now())
        .await
        .unwrap();
    eliminate(&fixture, ozzy, 18).await;

    // Act
    let receipt = fixture
        .store
        .commit_finalization(fixture.episode_id, Uuid::new_v4(), fixed_now())
        .await
        .unwrap();

    // Assert
    assert_eq!(receipt.eliminated_contestant_ids, vec![ozzy]);
    assert!(receipt.affected_members.is_empty());
    assert!(fixture.store.members().iter().all(|m| !m.is_eliminated));
}
