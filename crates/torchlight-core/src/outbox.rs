//! Outbound notification contract.
//!
//! Handlers never await delivery. They hand a [`Notification`] to a
//! [`NotificationOutbox`], which either accepts it for later dispatch or
//! reports immediately that it could not. Either way the domain write that
//! triggered the notification has already been committed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

/// Template families the pipeline sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Confirms a submitted weekly pick.
    PickConfirmation,
    /// Tells a participant a pick was assigned for them.
    AutoPickAlert,
    /// One contestant left on the roster.
    EliminationAlert,
    /// Every contestant on the roster is eliminated.
    TorchSnuffed,
}

impl NotificationKind {
    /// Kinds whose subject and preview must not reveal episode results.
    #[must_use]
    pub fn is_spoiler_sensitive(self) -> bool {
        matches!(self, Self::EliminationAlert | Self::TorchSnuffed)
    }

    /// Template name used by transports.
    #[must_use]
    pub fn template_name(self) -> &'static str {
        match self {
            Self::PickConfirmation => "pick_confirmation",
            Self::AutoPickAlert => "auto_pick_alert",
            Self::EliminationAlert => "elimination_alert",
            Self::TorchSnuffed => "torch_snuffed",
        }
    }
}

/// Delivery guarantee requested by the sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// One attempt; failures are only logged.
    BestEffort,
    /// Retried by the dispatcher until delivered or attempts run out.
    Guaranteed,
}

/// A notification waiting to be rendered and delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Participant to notify.
    pub recipient: Uuid,
    /// Template family.
    pub kind: NotificationKind,
    /// Template variables.
    pub variables: BTreeMap<String, String>,
    /// Delivery guarantee.
    pub priority: Priority,
    /// Correlation ID of the command that caused the notification.
    pub correlation_id: Uuid,
}

impl Notification {
    /// Creates a notification with no variables.
    #[must_use]
    pub fn new(
        recipient: Uuid,
        kind: NotificationKind,
        priority: Priority,
        correlation_id: Uuid,
    ) -> Self {
        Self {
            recipient,
            kind,
            variables: BTreeMap::new(),
            priority,
            correlation_id,
        }
    }

    /// Adds a template variable.
    #[must_use]
    pub fn with_var(mut self, key: &str, value: impl Into<String>) -> Self {
        self.variables.insert(key.to_owned(), value.into());
        self
    }
}

/// Why the outbox refused a notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The outbound queue is at capacity.
    #[error("notification queue is full")]
    QueueFull,
    /// The dispatcher has shut down.
    #[error("notification dispatcher is closed")]
    Closed,
}

/// Non-blocking submission point for outbound notifications.
pub trait NotificationOutbox: Send + Sync {
    /// Queues a notification for dispatch without waiting for delivery.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError` if the notification could not be queued.
    fn submit(&self, notification: Notification) -> Result<(), SubmitError>;
}

/// Submits a notification and logs, rather than returns, any refusal.
pub fn submit_or_log(outbox: &dyn NotificationOutbox, notification: Notification) {
    let kind = notification.kind;
    let recipient = notification.recipient;
    let correlation_id = notification.correlation_id;
    if let Err(err) = outbox.submit(notification) {
        warn!(
            %recipient,
            %correlation_id,
            kind = kind.template_name(),
            error = %err,
            "notification dropped"
        );
    }
}
