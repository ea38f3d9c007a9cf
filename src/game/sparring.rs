//! Scripted input for headless matches

use super::ai::AI_CLOSE_RANGE;
use super::combat::MELEE_RANGE_SCALE;
use super::input::InputSnapshot;
use super::round::RoundPhase;
use super::snapshot::MatchSnapshot;

/// Fraction of melee reach the partner closes to before swinging
const REACH_MARGIN: f32 = 0.9;
/// Vertical misalignment tolerated before stepping up or down
const LANE_TOLERANCE: f32 = 10.0;

/// Plays the player side from snapshots alone
#[derive(Debug, Clone, Default)]
pub struct SparringPartner;

impl SparringPartner {
    pub fn new() -> Self {
        Self
    }

    /// Held input for the next tick given the latest snapshot
    pub fn next_input(&self, snapshot: &MatchSnapshot) -> InputSnapshot {
        let mut input = InputSnapshot::default();
        if snapshot.phase != RoundPhase::InRound {
            return input;
        }

        let me = &snapshot.player;
        let foe = &snapshot.enemy;
        let dx = foe.x - me.x;
        let reach = me.style.range * MELEE_RANGE_SCALE * REACH_MARGIN;

        if dx.abs() > reach {
            input.move_right = dx > 0.0;
            input.move_left = dx < 0.0;
        } else {
            input.attack = true;
        }
        input.block = dx.abs() < AI_CLOSE_RANGE && me.attack_cooldown > 0.0;

        let dy = foe.y - me.y;
        input.move_down = dy > LANE_TOLERANCE;
        input.move_up = dy < -LANE_TOLERANCE;

        if let Some(slot) = me.abilities.iter().position(|a| a.is_ready()) {
            input.set_ability(slot, true);
        }

        input.special_mode = me.health < me.max_health / 2.0 && me.special.can_activate();
        input
    }
}
