//! Application layer for the Scoring context.

pub mod command_handlers;
pub mod query_handlers;
