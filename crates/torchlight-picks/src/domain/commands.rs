//! Commands for the Weekly Picks context.

use torchlight_core::command::Command;
use uuid::Uuid;

/// Command to submit (or resubmit) a weekly pick.
#[derive(Debug, Clone)]
pub struct SubmitPick {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The league the pick is made in.
    pub league_id: Uuid,
    /// The participant making the pick.
    pub participant_id: Uuid,
    /// The episode the pick applies to.
    pub episode_id: Uuid,
    /// The selected contestant.
    pub contestant_id: Uuid,
}

impl Command for SubmitPick {
    fn command_type(&self) -> &'static str {
        "picks.submit_pick"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn actor_id(&self) -> Option<Uuid> {
        Some(self.participant_id)
    }
}

/// Command to lock every pending pick whose deadline has passed.
#[derive(Debug, Clone)]
pub struct LockPicks {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for LockPicks {
    fn command_type(&self) -> &'static str {
        "picks.lock_picks"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to assign fallback picks to members who missed the deadline.
#[derive(Debug, Clone)]
pub struct AutoFillPicks {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for AutoFillPicks {
    fn command_type(&self) -> &'static str {
        "picks.auto_fill_picks"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
