//! Domain layer for the Scoring context.

pub mod cascade;
pub mod commands;
pub mod entries;
pub mod events;
