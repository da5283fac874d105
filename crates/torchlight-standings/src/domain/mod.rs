//! Domain layer for the Standings context.

pub mod commands;
pub mod events;
pub mod ranking;
pub mod weighted;
