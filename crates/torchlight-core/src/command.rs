//! Command abstractions.

use uuid::Uuid;

/// Trait that all pipeline commands implement.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// The type name for this command (for logging/routing).
    fn command_type(&self) -> &'static str;

    /// Correlation ID to trace this command through the system.
    fn correlation_id(&self) -> Uuid;

    /// The identity that issued the command, when one exists. Scheduled
    /// jobs have no actor.
    fn actor_id(&self) -> Option<Uuid> {
        None
    }
}
