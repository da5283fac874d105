//! Delivery transports.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::templates::RenderedMessage;

/// Why a transport could not deliver a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The recipient has no reachable address or device.
    #[error("recipient {0} has no delivery address")]
    NoRecipient(Uuid),
    /// The provider refused the message; retrying will not help.
    #[error("message rejected: {0}")]
    Rejected(String),
    /// The provider could not be reached.
    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

impl TransportError {
    /// Returns `true` if a later attempt may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Delivers a rendered message to one participant.
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    /// Attempts delivery once.
    async fn deliver(&self, recipient: Uuid, message: &RenderedMessage)
    -> Result<(), TransportError>;
}

/// Writes every message to the log. Used when no provider is configured.
#[derive(Debug, Default)]
pub struct LogTransport;

#[async_trait]
impl NotificationTransport for LogTransport {
    async fn deliver(
        &self,
        recipient: Uuid,
        message: &RenderedMessage,
    ) -> Result<(), TransportError> {
        info!(
            %recipient,
            subject = %message.subject,
            preview = %message.preview,
            "notification delivered to log"
        );
        Ok(())
    }
}
