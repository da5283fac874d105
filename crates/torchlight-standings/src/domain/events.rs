//! Domain events for the Standings context.

use serde::{Deserialize, Serialize};
use torchlight_core::event::{DomainEvent, EventMetadata};
use uuid::Uuid;

/// Emitted when a league's standings have been rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueStandingsRecalculated {
    /// The league identifier.
    pub league_id: Uuid,
    /// Number of ranked members.
    pub member_count: usize,
    /// Participant ranked first, if the league has members.
    pub leader_id: Option<Uuid>,
}

/// Event type identifier for [`LeagueStandingsRecalculated`].
pub const LEAGUE_STANDINGS_RECALCULATED_EVENT_TYPE: &str =
    "standings.league_standings_recalculated";

/// Event payload variants for the Standings context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StandingsEventKind {
    /// A league's standings were rewritten.
    LeagueStandingsRecalculated(LeagueStandingsRecalculated),
}

/// Domain event envelope for the Standings context.
#[derive(Debug, Clone)]
pub struct StandingsEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: StandingsEventKind,
}

impl DomainEvent for StandingsEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            StandingsEventKind::LeagueStandingsRecalculated(_) => {
                LEAGUE_STANDINGS_RECALCULATED_EVENT_TYPE
            }
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("StandingsEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
