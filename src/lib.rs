//! Duel Arena - real-time two-fighter duel simulation
//!
//! The `game` module holds the authoritative simulation: fighters, combat,
//! opponent AI, round and match progression, and an async driver that runs
//! a match on a frame clock.

pub mod app;
pub mod config;
pub mod game;
pub mod store;
pub mod util;
