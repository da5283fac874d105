//! Outbound queue and dispatcher worker.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::{JoinHandle, JoinSet};
use torchlight_core::outbox::{Notification, NotificationOutbox, Priority, SubmitError};
use tracing::{debug, error, info, warn};

use crate::retry::RetryPolicy;
use crate::templates::render;
use crate::transport::{NotificationTransport, TransportError};

/// Outcome of dispatching one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryReport {
    /// Delivered after `attempts` tries.
    Delivered {
        /// Attempts used.
        attempts: u32,
    },
    /// The recipient has nowhere to receive messages.
    NoRecipients,
    /// A guaranteed notification failed on every allowed attempt.
    Exhausted {
        /// Attempts used.
        attempts: u32,
        /// The last failure.
        last_error: TransportError,
    },
    /// Delivery failed and was not retried.
    Failed(TransportError),
}

/// The producer half of the notification queue. Submitting never waits.
///
/// Best-effort notifications share a bounded queue and are refused when it
/// is full. Guaranteed notifications go on an unbounded queue and are only
/// refused once the dispatcher is gone.
#[derive(Debug, Clone)]
pub struct ChannelOutbox {
    best_effort: mpsc::Sender<Notification>,
    guaranteed: mpsc::UnboundedSender<Notification>,
}

impl NotificationOutbox for ChannelOutbox {
    fn submit(&self, notification: Notification) -> Result<(), SubmitError> {
        match notification.priority {
            Priority::BestEffort => {
                self.best_effort
                    .try_send(notification)
                    .map_err(|err| match err {
                        TrySendError::Full(_) => SubmitError::QueueFull,
                        TrySendError::Closed(_) => SubmitError::Closed,
                    })
            }
            Priority::Guaranteed => self
                .guaranteed
                .send(notification)
                .map_err(|_| SubmitError::Closed),
        }
    }
}

/// The consumer half of the notification queue.
#[derive(Debug)]
pub struct NotificationQueue {
    best_effort: mpsc::Receiver<Notification>,
    guaranteed: mpsc::UnboundedReceiver<Notification>,
}

/// Creates a notification queue. `capacity` bounds best-effort traffic only.
#[must_use]
pub fn channel(capacity: usize) -> (ChannelOutbox, NotificationQueue) {
    let (best_effort, best_effort_rx) = mpsc::channel(capacity.max(1));
    let (guaranteed, guaranteed_rx) = mpsc::unbounded_channel();
    (
        ChannelOutbox {
            best_effort,
            guaranteed,
        },
        NotificationQueue {
            best_effort: best_effort_rx,
            guaranteed: guaranteed_rx,
        },
    )
}

/// Renders queued notifications and hands them to the transport.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn NotificationTransport>,
    policy: RetryPolicy,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Creates a dispatcher. `policy` applies to guaranteed notifications;
    /// best-effort ones get a single attempt.
    #[must_use]
    pub fn new(transport: Arc<dyn NotificationTransport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Delivers one notification, retrying as its priority allows.
    pub async fn deliver(&self, notification: &Notification) -> DeliveryReport {
        let message = render(notification.kind, &notification.variables);
        let max_attempts = match notification.priority {
            Priority::BestEffort => 1,
            Priority::Guaranteed => self.policy.max_attempts.max(1),
        };

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self
                .transport
                .deliver(notification.recipient, &message)
                .await
            {
                Ok(()) => return DeliveryReport::Delivered { attempts: attempt },
                Err(TransportError::NoRecipient(_)) => return DeliveryReport::NoRecipients,
                Err(err) if !err.is_retryable() => return DeliveryReport::Failed(err),
                Err(err) if attempt >= max_attempts => {
                    return if notification.priority == Priority::Guaranteed {
                        DeliveryReport::Exhausted {
                            attempts: attempt,
                            last_error: err,
                        }
                    } else {
                        DeliveryReport::Failed(err)
                    };
                }
                Err(err) => {
                    let delay = self.policy.delay_after(attempt);
                    debug!(
                        recipient = %notification.recipient,
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "delivery failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Drains the queue until every producer is dropped.
    ///
    /// Best-effort notifications are delivered in order on this task. Each
    /// guaranteed notification gets its own task so its backoff never holds
    /// up the rest of the queue; `run` returns once those tasks finish.
    pub async fn run(self, queue: NotificationQueue) {
        let NotificationQueue {
            mut best_effort,
            mut guaranteed,
        } = queue;
        let mut retries = JoinSet::new();
        let mut best_effort_open = true;
        let mut guaranteed_open = true;

        info!("notification dispatcher started");
        while best_effort_open || guaranteed_open {
            tokio::select! {
                biased;
                received = guaranteed.recv(), if guaranteed_open => match received {
                    Some(notification) => {
                        let dispatcher = self.clone();
                        retries.spawn(async move {
                            let report = dispatcher.deliver(&notification).await;
                            log_report(&notification, report);
                        });
                    }
                    None => guaranteed_open = false,
                },
                received = best_effort.recv(), if best_effort_open => match received {
                    Some(notification) => {
                        let report = self.deliver(&notification).await;
                        log_report(&notification, report);
                    }
                    None => best_effort_open = false,
                },
                Some(joined) = retries.join_next(), if !retries.is_empty() => {
                    log_join(joined);
                }
            }
        }
        while let Some(joined) = retries.join_next().await {
            log_join(joined);
        }
        info!("notification dispatcher stopped");
    }

    /// Spawns [`Dispatcher::run`] on the current runtime.
    #[must_use]
    pub fn spawn(self, queue: NotificationQueue) -> JoinHandle<()> {
        tokio::spawn(self.run(queue))
    }
}

fn log_report(notification: &Notification, report: DeliveryReport) {
    let kind = notification.kind.template_name();
    let recipient = notification.recipient;
    let correlation_id = notification.correlation_id;
    match report {
        DeliveryReport::Delivered { attempts } => {
            debug!(%recipient, kind, attempts, "notification delivered");
        }
        DeliveryReport::NoRecipients => {
            warn!(%recipient, %correlation_id, kind, "notification has no recipients");
        }
        DeliveryReport::Exhausted {
            attempts,
            last_error,
        } => {
            error!(
                %recipient,
                %correlation_id,
                kind,
                attempts,
                error = %last_error,
                "guaranteed notification exhausted its retries"
            );
        }
        DeliveryReport::Failed(err) => {
            warn!(%recipient, %correlation_id, kind, error = %err, "notification failed");
        }
    }
}

fn log_join(joined: Result<(), tokio::task::JoinError>) {
    if let Err(err) = joined {
        error!(error = %err, "guaranteed delivery task did not finish");
    }
}
