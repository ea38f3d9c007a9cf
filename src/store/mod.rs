//! Clients for external services

pub mod profiles;

pub use profiles::{ProfileClient, ProfileError, XpAward};
