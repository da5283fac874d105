//! Application layer for the Weekly Picks context.

pub mod command_handlers;
pub mod query_handlers;
