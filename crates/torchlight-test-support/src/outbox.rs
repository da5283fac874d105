//! Test outboxes: `NotificationOutbox` doubles.

use std::sync::Mutex;

use torchlight_core::outbox::{Notification, NotificationKind, NotificationOutbox, SubmitError};

/// An outbox that accepts and records every notification.
#[derive(Debug, Default)]
pub struct RecordingOutbox {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingOutbox {
    /// Creates an empty recording outbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every submitted notification.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    /// Returns the submitted notifications of one kind.
    pub fn sent_of_kind(&self, kind: NotificationKind) -> Vec<Notification> {
        self.sent().into_iter().filter(|n| n.kind == kind).collect()
    }
}

impl NotificationOutbox for RecordingOutbox {
    fn submit(&self, notification: Notification) -> Result<(), SubmitError> {
        self.sent.lock().unwrap().push(notification);
        Ok(())
    }
}

/// An outbox whose dispatcher has gone away. Useful for proving that
/// notification failures never fail the triggering operation.
#[derive(Debug)]
pub struct FailingOutbox;

impl NotificationOutbox for FailingOutbox {
    fn submit(&self, _notification: Notification) -> Result<(), SubmitError> {
        Err(SubmitError::Closed)
    }
}
