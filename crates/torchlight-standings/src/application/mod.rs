//! Application layer for the Standings context.

pub mod command_handlers;
pub mod query_handlers;
