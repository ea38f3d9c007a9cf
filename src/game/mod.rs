//! Game simulation modules

pub mod ai;
pub mod combat;
pub mod content;
pub mod cooldown;
pub mod fighter;
pub mod input;
pub mod r#match;
pub mod physics;
pub mod round;
pub mod simulation;
pub mod snapshot;
pub mod sparring;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use fighter::{Fighter, Loadout, Side};
pub use input::InputSnapshot;
pub use r#match::{GameMatch, MatchCommand, MatchHandle, MatchRegistry};
pub use simulation::{MatchSetup, Simulation};
pub use snapshot::{MatchMsg, MatchReport, MatchSnapshot};

/// Opponent flavour selected before the match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Regular opponent
    #[default]
    Standard,
    /// Tougher opponent that also casts abilities
    Boss,
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" | "bot" => Ok(GameMode::Standard),
            "boss" => Ok(GameMode::Boss),
            other => Err(format!("unknown game mode '{}'", other)),
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::Standard => write!(f, "standard"),
            GameMode::Boss => write!(f, "boss"),
        }
    }
}
