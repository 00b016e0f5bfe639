//! Domain logic for the VibeLearning leaderboard.
//!
//! This crate has no I/O. It owns the rules (token shape, name sanitizing,
//! score bounds, rate-limit windows, session expiry) so both the store
//! backends and the HTTP layer share a single definition of them.

pub mod clock;
pub mod error;
pub mod leaderboard;
pub mod player_name;
pub mod rate_limit;
pub mod score;
pub mod session;
pub mod types;
