//! Domain events for the Scoring context.

use serde::{Deserialize, Serialize};
use torchlight_core::event::{DomainEvent, EventMetadata};
use uuid::Uuid;

/// Emitted when an episode's scoring session is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringSessionStarted {
    /// The session identifier.
    pub session_id: Uuid,
    /// The episode identifier.
    pub episode_id: Uuid,
}

/// Emitted when score rows are replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoresSaved {
    /// The episode identifier.
    pub episode_id: Uuid,
    /// Contestants whose rows were replaced.
    pub contestant_ids: Vec<Uuid>,
    /// Rows written in total.
    pub row_count: usize,
}

/// Emitted when a placement is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EliminationRecorded {
    /// The episode identifier.
    pub episode_id: Uuid,
    /// The contestant identifier.
    pub contestant_id: Uuid,
    /// Finishing placement.
    pub placement: i32,
}

/// Emitted when a recorded placement is withdrawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EliminationCleared {
    /// The episode identifier.
    pub episode_id: Uuid,
    /// The contestant identifier.
    pub contestant_id: Uuid,
}

/// Emitted once an episode's scores are committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeFinalized {
    /// The episode identifier.
    pub episode_id: Uuid,
    /// The season identifier.
    pub season_id: Uuid,
    /// Contestants eliminated by the commit.
    pub eliminated_contestant_ids: Vec<Uuid>,
    /// Weekly picks credited with points.
    pub credited_picks: u64,
}

/// Emitted when a participant loses their last active contestant in a
/// league.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorchSnuffed {
    /// The league identifier.
    pub league_id: Uuid,
    /// The participant identifier.
    pub participant_id: Uuid,
}

/// Event type identifier for [`ScoringSessionStarted`].
pub const SCORING_SESSION_STARTED_EVENT_TYPE: &str = "scoring.scoring_session_started";

/// Event type identifier for [`ScoresSaved`].
pub const SCORES_SAVED_EVENT_TYPE: &str = "scoring.scores_saved";

/// Event type identifier for [`EliminationRecorded`].
pub const ELIMINATION_RECORDED_EVENT_TYPE: &str = "scoring.elimination_recorded";

/// Event type identifier for [`EliminationCleared`].
pub const ELIMINATION_CLEARED_EVENT_TYPE: &str = "scoring.elimination_cleared";

/// Event type identifier for [`EpisodeFinalized`].
pub const EPISODE_FINALIZED_EVENT_TYPE: &str = "scoring.episode_finalized";

/// Event type identifier for [`TorchSnuffed`].
pub const TORCH_SNUFFED_EVENT_TYPE: &str = "scoring.torch_snuffed";

/// Event payload variants for the Scoring context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoringEventKind {
    /// A session was opened.
    ScoringSessionStarted(ScoringSessionStarted),
    /// Score rows were replaced.
    ScoresSaved(ScoresSaved),
    /// A placement was recorded.
    EliminationRecorded(EliminationRecorded),
    /// A placement was withdrawn.
    EliminationCleared(EliminationCleared),
    /// An episode was finalized.
    EpisodeFinalized(EpisodeFinalized),
    /// A participant's torch was snuffed.
    TorchSnuffed(TorchSnuffed),
}

/// Domain event envelope for the Scoring context.
#[derive(Debug, Clone)]
pub struct ScoringEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: ScoringEventKind,
}

impl DomainEvent for ScoringEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            ScoringEventKind::ScoringSessionStarted(_) => SCORING_SESSION_STARTED_EVENT_TYPE,
            ScoringEventKind::ScoresSaved(_) => SCORES_SAVED_EVENT_TYPE,
            ScoringEventKind::EliminationRecorded(_) => ELIMINATION_RECORDED_EVENT_TYPE,
            ScoringEventKind::EliminationCleared(_) => ELIMINATION_CLEARED_EVENT_TYPE,
            ScoringEventKind::EpisodeFinalized(_) => EPISODE_FINALIZED_EVENT_TYPE,
            ScoringEventKind::TorchSnuffed(_) => TORCH_SNUFFED_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("ScoringEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
