//! Commands for the Scoring context.

use torchlight_core::command::Command;
use uuid::Uuid;

use crate::domain::entries::ScoreEntry;

/// Command to open (or reopen) the scoring workspace of an episode.
#[derive(Debug, Clone)]
pub struct StartScoringSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The episode to score.
    pub episode_id: Uuid,
    /// The scorer.
    pub actor_id: Uuid,
}

impl Command for StartScoringSession {
    fn command_type(&self) -> &'static str {
        "scoring.start_scoring_session"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn actor_id(&self) -> Option<Uuid> {
        Some(self.actor_id)
    }
}

/// Command to replace the score rows of every contestant named in
/// `entries`.
#[derive(Debug, Clone)]
pub struct SaveScores {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The episode being scored.
    pub episode_id: Uuid,
    /// The scorer.
    pub actor_id: Uuid,
    /// Raw scoring facts.
    pub entries: Vec<ScoreEntry>,
}

impl Command for SaveScores {
    fn command_type(&self) -> &'static str {
        "scoring.save_scores"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn actor_id(&self) -> Option<Uuid> {
        Some(self.actor_id)
    }
}

/// Command to record a contestant's finishing placement in an episode.
#[derive(Debug, Clone)]
pub struct RecordElimination {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The episode being scored.
    pub episode_id: Uuid,
    /// The contestant voted out.
    pub contestant_id: Uuid,
    /// Finishing placement, 1 being the winner.
    pub placement: i32,
    /// The scorer.
    pub actor_id: Uuid,
}

impl Command for RecordElimination {
    fn command_type(&self) -> &'static str {
        "scoring.record_elimination"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn actor_id(&self) -> Option<Uuid> {
        Some(self.actor_id)
    }
}

/// Command to withdraw a recorded placement.
#[derive(Debug, Clone)]
pub struct ClearElimination {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The episode being scored.
    pub episode_id: Uuid,
    /// The contestant whose placement is withdrawn.
    pub contestant_id: Uuid,
    /// The scorer.
    pub actor_id: Uuid,
}

impl Command for ClearElimination {
    fn command_type(&self) -> &'static str {
        "scoring.clear_elimination"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn actor_id(&self) -> Option<Uuid> {
        Some(self.actor_id)
    }
}

/// Command to commit an episode's scores. One-way.
#[derive(Debug, Clone)]
pub struct FinalizeScoring {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The episode to finalize.
    pub episode_id: Uuid,
    /// The scorer, recorded as `finalized_by`.
    pub actor_id: Uuid,
}

impl Command for FinalizeScoring {
    fn command_type(&self) -> &'static str {
        "scoring.finalize_scoring"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn actor_id(&self) -> Option<Uuid> {
        Some(self.actor_id)
    }
}
