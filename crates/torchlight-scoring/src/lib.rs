//! Torchlight: Scoring context.
//!
//! Responsible for the per-episode scoring workspace, the one-way
//! finalization that credits weekly picks and eliminates contestants, and
//! the cascade that tells participants when their roster runs thin.

pub mod application;
pub mod domain;
