//! Torchlight: Standings context.
//!
//! Responsible for recomputing per-league totals and ranks after an episode
//! is finalized, and for the cross-league leaderboard that shrinks each
//! participant's average toward the season mean.

pub mod application;
pub mod domain;
