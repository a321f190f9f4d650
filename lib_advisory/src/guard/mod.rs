//! # Rate-Limit Guard
//!
//! Process-wide cooldown shared by every AI-backed fetch. One 429 from
//! any endpoint suppresses all of them for the window. Single counter,
//! not per-endpoint tracking.

pub mod cooldown;

pub use cooldown::{Clock, CooldownGuard, SystemClock};
