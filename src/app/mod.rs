//! Application state for the binary

pub mod state;

pub use state::AppState;
