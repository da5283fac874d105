//! Dispatcher and outbox behaviour against scripted transports.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use torchlight_core::outbox::{
    Notification, NotificationKind, NotificationOutbox, Priority, SubmitError,
};
use torchlight_notifications::{
    DeliveryReport, Dispatcher, NotificationTransport, RenderedMessage, RetryPolicy,
    TransportError, channel,
};
use uuid::Uuid;

/// Plays back a fixed sequence of results, then succeeds.
#[derive(Default)]
struct ScriptedTransport {
    script: Mutex<VecDeque<Result<(), TransportError>>>,
    delivered: Mutex<Vec<(Uuid, RenderedMessage)>>,
    calls: Mutex<u32>,
}

impl ScriptedTransport {
    fn with(script: Vec<Result<(), TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            ..Self::default()
        })
    }

    fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl NotificationTransport for ScriptedTransport {
    async fn deliver(
        &self,
        recipient: Uuid,
        message: &RenderedMessage,
    ) -> Result<(), TransportError> {
        *self.calls.lock().unwrap() += 1;
        let next = self.script.lock().unwrap().pop_front().unwrap_or(Ok(()));
        if next.is_ok() {
            self.delivered
                .lock()
                .unwrap()
                .push((recipient, message.clone()));
        }
        next
    }
}

fn policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::new(max_attempts, Duration::from_millis(1))
}

fn notification(kind: NotificationKind, priority: Priority) -> Notification {
    Notification::new(Uuid::new_v4(), kind, priority, Uuid::new_v4())
        .with_var("league_name", "Heroes")
}

fn subjects(transport: &ScriptedTransport) -> Vec<String> {
    transport
        .delivered
        .lock()
        .unwrap()
        .iter()
        .map(|(_, message)| message.subject.clone())
        .collect()
}

fn down() -> Result<(), TransportError> {
    Err(TransportError::Unavailable("smtp timeout".to_owned()))
}

#[tokio::test]
async fn test_guaranteed_notification_is_retried_until_delivered() {
    // Arrange
    let transport = ScriptedTransport::with(vec![down(), down()]);
    let dispatcher = Dispatcher::new(transport.clone(), policy(5));

    // Act
    let report = dispatcher
        .deliver(&notification(NotificationKind::TorchSnuffed, Priority::Guaranteed))
        .await;

    // Assert
    assert_eq!(report, DeliveryReport::Delivered { attempts: 3 });
    assert_eq!(transport.calls(), 3);
}

#[tokio::test]
async fn test_guaranteed_notification_reports_exhaustion() {
    let transport = ScriptedTransport::with(vec![down(), down(), down()]);
    let dispatcher = Dispatcher::new(transport.clone(), policy(3));

    let report = dispatcher
        .deliver(&notification(NotificationKind::TorchSnuffed, Priority::Guaranteed))
        .await;

    assert!(matches!(report, DeliveryReport::Exhausted { attempts: 3, .. }));
    assert_eq!(transport.calls(), 3);
}

#[tokio::test]
async fn test_best_effort_notification_gets_one_attempt() {
    let transport = ScriptedTransport::with(vec![down()]);
    let dispatcher = Dispatcher::new(transport.clone(), policy(5));

    let report = dispatcher
        .deliver(&notification(NotificationKind::EliminationAlert, Priority::BestEffort))
        .await;

    assert!(matches!(report, DeliveryReport::Failed(TransportError::Unavailable(_))));
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_missing_recipient_is_not_an_exhausted_retry() {
    let recipient = Uuid::new_v4();
    let transport = ScriptedTransport::with(vec![Err(TransportError::NoRecipient(recipient))]);
    let dispatcher = Dispatcher::new(transport.clone(), policy(5));

    let report = dispatcher
        .deliver(&notification(NotificationKind::TorchSnuffed, Priority::Guaranteed))
        .await;

    assert_eq!(report, DeliveryReport::NoRecipients);
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_full_queue_refuses_without_waiting() {
    // Arrange
    let (outbox, _queue) = channel(1);
    outbox
        .submit(notification(NotificationKind::PickConfirmation, Priority::BestEffort))
        .unwrap();

    // Act
    let result = outbox.submit(notification(NotificationKind::PickConfirmation, Priority::BestEffort));

    // Assert
    assert_eq!(result, Err(SubmitError::QueueFull));
}

#[tokio::test]
async fn test_closed_queue_is_reported() {
    let (outbox, queue) = channel(4);
    drop(queue);

    let best_effort = outbox.submit(notification(NotificationKind::PickConfirmation, Priority::BestEffort));
    let guaranteed = outbox.submit(notification(NotificationKind::TorchSnuffed, Priority::Guaranteed));

    assert_eq!(best_effort, Err(SubmitError::Closed));
    assert_eq!(guaranteed, Err(SubmitError::Closed));
}

#[tokio::test]
async fn test_dispatcher_drains_queue_and_stops_when_producers_drop() {
    // Arrange
    let transport = ScriptedTransport::with(Vec::new());
    let (outbox, queue) = channel(8);
    let handle = Dispatcher::new(transport.clone(), policy(2)).spawn(queue);

    // Act
    outbox
        .submit(notification(NotificationKind::EliminationAlert, Priority::BestEffort))
        .unwrap();
    outbox
        .submit(notification(NotificationKind::TorchSnuffed, Priority::Guaranteed))
        .unwrap();
    drop(outbox);
    handle.await.unwrap();

    // Assert
    let mut subjects = subjects(&transport);
    subjects.sort();
    assert_eq!(
        subjects,
        vec![
            "There's news about your league".to_owned(),
            "There's news about your roster".to_owned(),
        ]
    );
}

#[tokio::test]
async fn test_guaranteed_notification_is_accepted_and_delivered_when_queue_is_full() {
    // Arrange
    let transport = ScriptedTransport::with(Vec::new());
    let (outbox, queue) = channel(1);
    outbox
        .submit(notification(NotificationKind::EliminationAlert, Priority::BestEffort))
        .unwrap();
    let crowded_out =
        outbox.submit(notification(NotificationKind::PickConfirmation, Priority::BestEffort));

    // Act
    let accepted = outbox.submit(notification(NotificationKind::TorchSnuffed, Priority::Guaranteed));
    let handle = Dispatcher::new(transport.clone(), policy(3)).spawn(queue);
    drop(outbox);
    handle.await.unwrap();

    // Assert
    assert_eq!(crowded_out, Err(SubmitError::QueueFull));
    assert_eq!(accepted, Ok(()));
    let subjects = subjects(&transport);
    assert_eq!(subjects.len(), 2);
    assert!(subjects.contains(&"There's news about your league".to_owned()));
}

#[tokio::test]
async fn test_guaranteed_backoff_does_not_hold_up_the_queue() {
    // Arrange
    let transport = ScriptedTransport::with(vec![down()]);
    let (outbox, queue) = channel(4);
    let slow_policy = RetryPolicy::new(3, Duration::from_secs(60));
    let handle = Dispatcher::new(transport.clone(), slow_policy).spawn(queue);

    // Act
    outbox
        .submit(notification(NotificationKind::TorchSnuffed, Priority::Guaranteed))
        .unwrap();
    while transport.calls() == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    outbox
        .submit(notification(NotificationKind::EliminationAlert, Priority::BestEffort))
        .unwrap();
    tokio::time::timeout(Duration::from_secs(5), async {
        while transport.calls() < 2 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();

    // Assert
    assert_eq!(subjects(&transport), vec!["There's news about your roster".to_owned()]);
    handle.abort();
}
