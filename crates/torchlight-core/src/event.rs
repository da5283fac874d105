//! Domain event abstractions.
//!
//! Events describe what a command changed. They are returned from command
//! handlers, logged, and drive follow-up work such as the elimination
//! cascade; they are not the source of truth for entity state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::Clock;

/// Metadata attached to every domain event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Type name, e.g. `picks.pick_submitted`.
    pub event_type: String,
    /// The entity this event is about (episode, league, contestant...).
    pub subject_id: Uuid,
    /// Correlation ID of the command that produced the event.
    pub correlation_id: Uuid,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
}

impl EventMetadata {
    /// Builds metadata for a new event stamped with the clock's current time.
    #[must_use]
    pub fn new(
        event_type: &'static str,
        subject_id: Uuid,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type: event_type.to_owned(),
            subject_id,
            correlation_id,
            occurred_at: clock.now(),
        }
    }
}

/// Trait that all domain events implement.
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Returns the event type name.
    fn event_type(&self) -> &'static str;

    /// Serializes the event payload to JSON.
    fn to_payload(&self) -> serde_json::Value;

    /// Returns the metadata for this event.
    fn metadata(&self) -> &EventMetadata;
}
