//! The per-tick simulation loop

use chrono::Utc;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use super::ai::update_ai;
use super::cooldown::update_cooldowns;
use super::fighter::{Fighter, Loadout, Side, BASE_MAX_HEALTH, BOSS_HEALTH_BONUS};
use super::input::{handle_player_input, InputSnapshot};
use super::physics::{Arena, PhysicsSystem};
use super::round::{GraceStep, RoundPhase, RoundState};
use super::snapshot::{CombatEvent, MatchReport, MatchSnapshot};
use super::GameMode;

/// Everything chosen before the first tick
#[derive(Debug, Clone)]
pub struct MatchSetup {
    pub player_name: String,
    pub player: Loadout,
    pub opponent: Loadout,
    pub mode: GameMode,
    pub arena: Arena,
}

impl MatchSetup {
    /// Opponent mirrors the player's style and carries no abilities
    pub fn mirror(player: Loadout, mode: GameMode) -> Self {
        let opponent = Loadout {
            style: player.style.clone(),
            abilities: Vec::new(),
        };
        Self {
            player_name: "Player".to_string(),
            player,
            opponent,
            mode,
            arena: Arena::default(),
        }
    }
}

/// Authoritative state of one match.
///
/// Owns both fighters, the round state and the random source. Nothing else
/// mutates them; callers drive it with [`Simulation::tick`] and read the
/// returned snapshot.
pub struct Simulation<R = ChaCha8Rng> {
    player: Fighter,
    enemy: Fighter,
    round: RoundState,
    mode: GameMode,
    arena: Arena,
    rng: R,
    tick: u64,
    stopped: bool,
}

impl Simulation<ChaCha8Rng> {
    /// Create a match with a seeded random source
    pub fn new(setup: &MatchSetup, seed: u64) -> Self {
        Self::with_rng(setup, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Simulation<R> {
    pub fn with_rng(setup: &MatchSetup, rng: R) -> Self {
        let arena = setup.arena;
        let player = Fighter::new(
            setup.player_name.clone(),
            Side::Player,
            &setup.player,
            arena.spawn_point(Side::Player),
        );

        let enemy = match setup.mode {
            GameMode::Standard => {
                Fighter::new("Opponent", Side::Enemy, &setup.opponent, arena.spawn_point(Side::Enemy))
            }
            GameMode::Boss => {
                Fighter::new("Boss", Side::Enemy, &setup.opponent, arena.spawn_point(Side::Enemy))
                    .with_max_health(BASE_MAX_HEALTH + BOSS_HEALTH_BONUS)
            }
        };

        Self {
            player,
            enemy,
            round: RoundState::new(),
            mode: setup.mode,
            arena,
            rng,
            tick: 0,
            stopped: false,
        }
    }

    pub fn player(&self) -> &Fighter {
        &self.player
    }

    pub fn enemy(&self) -> &Fighter {
        &self.enemy
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Refuse all further ticks
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Current state without advancing
    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot::capture(self.tick, &self.player, &self.enemy, &self.round, Vec::new())
    }

    /// Advance the match by `dt` seconds of wall-clock time.
    ///
    /// A stopped or finished match, and a `dt` that is not a positive finite
    /// number, leave every field untouched.
    pub fn tick(&mut self, dt: f32, input: &InputSnapshot) -> MatchSnapshot {
        if self.stopped || self.round.match_ended() {
            return self.snapshot();
        }
        if !(dt.is_finite() && dt > 0.0) {
            if dt != 0.0 {
                warn!(dt, "Ignoring malformed frame delta");
            }
            return self.snapshot();
        }

        self.tick += 1;
        let mut events = Vec::new();

        match self.round.phase {
            RoundPhase::InRound => self.run_round_tick(dt, input, &mut events),
            RoundPhase::RoundEnding => self.run_grace_tick(dt, &mut events),
            RoundPhase::MatchEnded => {}
        }

        MatchSnapshot::capture(self.tick, &self.player, &self.enemy, &self.round, events)
    }

    /// Cooldowns, player input, AI, physics, then the knockout check
    fn run_round_tick(&mut self, dt: f32, input: &InputSnapshot, events: &mut Vec<CombatEvent>) {
        update_cooldowns(&mut self.player, dt);
        update_cooldowns(&mut self.enemy, dt);

        handle_player_input(&mut self.player, &mut self.enemy, input, &mut self.rng, events);
        update_ai(&mut self.enemy, &mut self.player, self.mode, &mut self.rng, events);

        PhysicsSystem::update_fighter(&mut self.player, &self.arena, dt);
        PhysicsSystem::update_fighter(&mut self.enemy, &self.arena, dt);

        // A double knockout goes against the player
        let loser = if self.player.is_defeated() {
            Some(Side::Player)
        } else if self.enemy.is_defeated() {
            Some(Side::Enemy)
        } else {
            None
        };

        if let Some(loser) = loser {
            let round = self.round.round_number;
            self.round.record_knockout(loser);
            events.push(CombatEvent::RoundEnded { round, loser });
        }
    }

    /// Frozen arena; only the grace timer moves
    fn run_grace_tick(&mut self, dt: f32, events: &mut Vec<CombatEvent>) {
        match self.round.advance_grace(dt) {
            GraceStep::Waiting => {}
            GraceStep::NextRound => {
                self.player.reset_for_round(self.arena.spawn_point(Side::Player));
                self.enemy.reset_for_round(self.arena.spawn_point(Side::Enemy));
                debug!(round = self.round.round_number, "Fighters reset");
            }
            GraceStep::MatchOver(winner) => {
                events.push(CombatEvent::MatchEnded { winner });
            }
        }
    }

    /// Final result, once the match has ended
    pub fn report(&self) -> Option<MatchReport> {
        let winner = self.round.winner?;
        Some(MatchReport {
            did_win: winner == Side::Player,
            winner,
            player_rounds: self.round.player_wins,
            enemy_rounds: self.round.enemy_wins,
            total_rounds: self.round.round_number,
            finished_at: Utc::now(),
        })
    }
}
