//! Torchlight: Weekly Picks context.
//!
//! Responsible for recording each participant's weekly active-contestant
//! selection, freezing picks once an episode's deadline passes, and
//! assigning fallback picks to anyone who missed it.

pub mod application;
pub mod domain;
