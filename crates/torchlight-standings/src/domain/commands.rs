//! Commands for the Standings context.

use torchlight_core::command::Command;
use uuid::Uuid;

/// Command to recompute totals and ranks for every active league of a
/// season.
#[derive(Debug, Clone)]
pub struct RecalculateStandings {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The season to recompute.
    pub season_id: Uuid,
}

impl Command for RecalculateStandings {
    fn command_type(&self) -> &'static str {
        "standings.recalculate_standings"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
