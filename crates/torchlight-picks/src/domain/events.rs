//! Domain events for the Weekly Picks context.

use serde::{Deserialize, Serialize};
use torchlight_core::event::{DomainEvent, EventMetadata};
use uuid::Uuid;

/// Emitted when a participant submits or replaces a pending pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickSubmitted {
    /// The pick identifier.
    pub pick_id: Uuid,
    /// The league identifier.
    pub league_id: Uuid,
    /// The participant identifier.
    pub participant_id: Uuid,
    /// The episode identifier.
    pub episode_id: Uuid,
    /// The selected contestant.
    pub contestant_id: Uuid,
}

/// Emitted when the lock sweep freezes an episode's pending picks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PicksLocked {
    /// The episode identifier.
    pub episode_id: Uuid,
    /// How many picks moved from pending to locked.
    pub locked_count: u64,
}

/// Emitted when the auto-fill resolver assigns a fallback pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickAutoAssigned {
    /// The pick identifier.
    pub pick_id: Uuid,
    /// The league identifier.
    pub league_id: Uuid,
    /// The participant identifier.
    pub participant_id: Uuid,
    /// The episode identifier.
    pub episode_id: Uuid,
    /// The assigned contestant.
    pub contestant_id: Uuid,
}

/// Event type identifier for [`PickSubmitted`].
pub const PICK_SUBMITTED_EVENT_TYPE: &str = "picks.pick_submitted";

/// Event type identifier for [`PicksLocked`].
pub const PICKS_LOCKED_EVENT_TYPE: &str = "picks.picks_locked";

/// Event type identifier for [`PickAutoAssigned`].
pub const PICK_AUTO_ASSIGNED_EVENT_TYPE: &str = "picks.pick_auto_assigned";

/// Event payload variants for the Weekly Picks context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickEventKind {
    /// A pick was submitted.
    PickSubmitted(PickSubmitted),
    /// Pending picks were locked.
    PicksLocked(PicksLocked),
    /// A fallback pick was assigned.
    PickAutoAssigned(PickAutoAssigned),
}

/// Domain event envelope for the Weekly Picks context.
#[derive(Debug, Clone)]
pub struct PickEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: PickEventKind,
}

impl DomainEvent for PickEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            PickEventKind::PickSubmitted(_) => PICK_SUBMITTED_EVENT_TYPE,
            PickEventKind::PicksLocked(_) => PICKS_LOCKED_EVENT_TYPE,
            PickEventKind::PickAutoAssigned(_) => PICK_AUTO_ASSIGNED_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("PickEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
