//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type shared by every pipeline operation.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity that was looked up.
        entity: &'static str,
        /// The identifier that was looked up.
        id: Uuid,
    },

    /// The actor is not allowed to perform the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The selection or entry references something ineligible.
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    /// The episode's pick deadline has passed or the episode is scored.
    #[error("picks are locked for episode {episode_id}")]
    DeadlinePassed {
        /// The locked episode.
        episode_id: Uuid,
    },

    /// The episode's scoring session has already been finalized.
    #[error("scoring already finalized for episode {episode_id}")]
    AlreadyFinalized {
        /// The finalized episode.
        episode_id: Uuid,
    },

    /// A status change not listed in the entity's transition table.
    #[error("invalid {entity} transition from {from} to {to}")]
    InvalidTransition {
        /// The entity whose status was changed.
        entity: &'static str,
        /// The current status.
        from: &'static str,
        /// The requested status.
        to: &'static str,
    },

    /// The persistent store could not complete the request.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl DomainError {
    /// Shorthand for [`DomainError::NotFound`].
    #[must_use]
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }

    /// Returns `true` for errors a caller may retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}
