//! Domain layer for the Weekly Picks context.

pub mod commands;
pub mod eligibility;
pub mod events;
