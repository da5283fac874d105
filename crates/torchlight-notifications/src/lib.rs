//! Torchlight: outbound notifications.
//!
//! Handlers submit to a [`ChannelOutbox`]; a [`Dispatcher`] task
//! drains the queue, renders each notification and hands it to a
//! [`NotificationTransport`], retrying guaranteed ones with backoff.

pub mod dispatcher;
pub mod retry;
pub mod templates;
pub mod transport;

pub use dispatcher::{ChannelOutbox, DeliveryReport, Dispatcher, NotificationQueue, channel};
pub use retry::RetryPolicy;
pub use templates::{RenderedMessage, render};
pub use transport::{LogTransport, NotificationTransport, TransportError};
