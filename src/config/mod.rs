//! Configuration module - environment variable parsing

use std::env;
use std::str::FromStr;

use crate::game::fighter::{Loadout, LoadoutError};
use crate::game::physics::Arena;
use crate::game::{GameMode, MatchSetup};
use crate::util::time::{DEFAULT_SNAPSHOT_EVERY, DEFAULT_TICK_RATE, MAX_TICK_RATE};

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Seed for the match random source
    pub seed: u64,
    pub mode: GameMode,
    pub player_name: String,
    pub player: Loadout,
    pub opponent: Loadout,
    pub arena: Arena,

    /// Driver frames per second
    pub tick_rate: u32,
    /// Ticks per broadcast snapshot
    pub snapshot_every: u32,

    /// Base URL of the profile service; XP is not awarded when unset
    pub profile_service_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let style = var("PLAYER_STYLE").unwrap_or_else(|| "taijutsu".to_string());
        let player_abilities = split_ids(var("PLAYER_ABILITIES"));
        let opponent_abilities = split_ids(var("OPPONENT_ABILITIES"));

        let player = Loadout::from_ids(&style, &player_abilities)?;
        // The opponent mirrors the player's style
        let opponent = Loadout::from_ids(&style, &opponent_abilities)?;

        let width = parse_or("ARENA_WIDTH", var("ARENA_WIDTH"), 1920.0_f32)?;
        let height = parse_or("ARENA_HEIGHT", var("ARENA_HEIGHT"), 1080.0_f32)?;
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(ConfigError::Invalid {
                var: "ARENA_WIDTH/ARENA_HEIGHT",
                value: format!("{}x{}", width, height),
            });
        }

        let tick_rate = parse_or("TICK_RATE", var("TICK_RATE"), DEFAULT_TICK_RATE)?;
        if !(1..=MAX_TICK_RATE).contains(&tick_rate) {
            return Err(ConfigError::Invalid {
                var: "TICK_RATE",
                value: tick_rate.to_string(),
            });
        }

        Ok(Self {
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),

            seed: match var("MATCH_SEED") {
                Some(seed) => parse("MATCH_SEED", &seed)?,
                None => rand::random(),
            },
            mode: match var("GAME_MODE") {
                Some(mode) => mode.parse().map_err(|_| ConfigError::Invalid {
                    var: "GAME_MODE",
                    value: mode,
                })?,
                None => GameMode::default(),
            },
            player_name: var("PLAYER_NAME").unwrap_or_else(|| "Player".to_string()),
            player,
            opponent,
            arena: Arena::new(width, height),

            tick_rate,
            snapshot_every: parse_or("SNAPSHOT_EVERY", var("SNAPSHOT_EVERY"), DEFAULT_SNAPSHOT_EVERY)?
                .max(1),

            profile_service_url: var("PROFILE_SERVICE_URL")
                .map(|url| url.trim_end_matches('/').to_string()),
        })
    }

    /// Everything the simulation needs before its first tick
    pub fn match_setup(&self) -> MatchSetup {
        MatchSetup {
            player_name: self.player_name.clone(),
            player: self.player.clone(),
            opponent: self.opponent.clone(),
            mode: self.mode,
            arena: self.arena,
        }
    }
}

fn split_ids(raw: Option<String>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn parse<T: FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        var,
        value: value.to_string(),
    })
}

fn parse_or<T: FromStr>(var: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        Some(value) => parse(var, &value),
        None => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },

    #[error(transparent)]
    Loadout(#[from] LoadoutError),
}
