//! Round and match progression

use serde::{Deserialize, Serialize};
use tracing::info;

use super::fighter::Side;

/// Seconds the arena stays frozen after a knockout
pub const ROUND_END_GRACE: f32 = 2.0;
/// Round wins needed before a match can end
pub const ROUNDS_TO_WIN: u32 = 2;
/// Lead in round wins needed to end the match
pub const WIN_MARGIN: u32 = 2;

/// Observable match phase.
///
/// The between-round reset happens inside a single tick as the grace period
/// runs out, so no snapshot ever shows a separate transition phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    /// Fighting
    InRound,
    /// Knockout grace period, everything but the delay timer is frozen
    RoundEnding,
    /// Terminal
    MatchEnded,
}

/// What the grace timer decided on this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraceStep {
    /// Still inside the grace period
    Waiting,
    /// Next round begins; fighters must be reset
    NextRound,
    /// Match over with this winner
    MatchOver(Side),
}

/// Winner of the match if the score decides it.
///
/// The leader needs at least two wins and a two-win lead, so 2-0 and 3-1 end
/// the match while 2-1 does not.
pub fn match_winner(player_wins: u32, enemy_wins: u32) -> Option<Side> {
    let leader = player_wins.max(enemy_wins);
    if leader >= ROUNDS_TO_WIN && player_wins.abs_diff(enemy_wins) >= WIN_MARGIN {
        Some(if player_wins > enemy_wins {
            Side::Player
        } else {
            Side::Enemy
        })
    } else {
        None
    }
}

/// Round counters and phase (owned by the simulation)
#[derive(Debug, Clone, PartialEq)]
pub struct RoundState {
    pub phase: RoundPhase,
    pub round_number: u32,
    pub player_wins: u32,
    pub enemy_wins: u32,
    /// Side that lost the round currently ending
    pub round_loser: Option<Side>,
    /// Time spent in the current grace period
    pub end_delay: f32,
    pub winner: Option<Side>,
}

impl RoundState {
    pub fn new() -> Self {
        Self {
            phase: RoundPhase::InRound,
            round_number: 1,
            player_wins: 0,
            enemy_wins: 0,
            round_loser: None,
            end_delay: 0.0,
            winner: None,
        }
    }

    pub fn match_ended(&self) -> bool {
        self.phase == RoundPhase::MatchEnded
    }

    pub fn wins(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player_wins,
            Side::Enemy => self.enemy_wins,
        }
    }

    /// Knockout: credit the other side and start the grace period
    pub fn record_knockout(&mut self, loser: Side) {
        if self.phase != RoundPhase::InRound {
            return;
        }

        match loser.opponent() {
            Side::Player => self.player_wins += 1,
            Side::Enemy => self.enemy_wins += 1,
        }
        self.round_loser = Some(loser);
        self.end_delay = 0.0;
        self.phase = RoundPhase::RoundEnding;

        info!(
            round = self.round_number,
            loser = ?loser,
            player_wins = self.player_wins,
            enemy_wins = self.enemy_wins,
            "Round ended"
        );
    }

    /// Run the grace timer; once it elapses either end the match or open the
    /// next round
    pub fn advance_grace(&mut self, dt: f32) -> GraceStep {
        if self.phase != RoundPhase::RoundEnding {
            return GraceStep::Waiting;
        }

        self.end_delay += dt;
        if self.end_delay < ROUND_END_GRACE {
            return GraceStep::Waiting;
        }

        if let Some(winner) = match_winner(self.player_wins, self.enemy_wins) {
            self.phase = RoundPhase::MatchEnded;
            self.winner = Some(winner);
            info!(
                winner = ?winner,
                player_wins = self.player_wins,
                enemy_wins = self.enemy_wins,
                rounds = self.round_number,
                "Match ended"
            );
            return GraceStep::MatchOver(winner);
        }

        self.round_loser = None;
        self.round_number += 1;
        self.end_delay = 0.0;
        self.phase = RoundPhase::InRound;
        info!(round = self.round_number, "Round started");
        GraceStep::NextRound
    }
}

impl Default for RoundState {
    fn default() -> Self {
        Self::new()
    }
}
