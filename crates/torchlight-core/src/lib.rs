//! Torchlight Core: shared domain model and abstractions.
//!
//! This crate defines the entities, status machines, error taxonomy and the
//! store/outbox traits that every pipeline context depends on. It contains
//! no infrastructure code.

pub mod cache;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod model;
pub mod outbox;
pub mod status;
pub mod store;
