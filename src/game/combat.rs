//! Combat resolution - melee, abilities, special mode

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::content::AbilityEffect;
use super::fighter::Fighter;

/// Melee reach per point of style range
pub const MELEE_RANGE_SCALE: f32 = 20.0;
/// Melee damage per point of style damage
pub const MELEE_DAMAGE_SCALE: f32 = 5.0;
/// Flat damage added while the attacker's special mode is active
pub const SPECIAL_DAMAGE_BONUS: f32 = 10.0;
/// Damage kept when a melee hit is blocked
pub const MELEE_BLOCK_FACTOR: f32 = 0.3;
/// Damage kept when an ability hit is blocked
pub const ABILITY_BLOCK_FACTOR: f32 = 0.5;
/// Chance that a defender in special mode shrugs off a melee hit
pub const AUTO_DODGE_CHANCE: f32 = 0.5;
/// Health restored by a restore ability
pub const RESTORE_AMOUNT: f32 = 30.0;
/// Max health gained (and healed) on every special mode activation
pub const SPECIAL_HEALTH_BONUS: f32 = 20.0;

/// Result of a melee swing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MeleeOutcome {
    /// Defender was beyond reach; nothing happened
    OutOfRange,
    /// Landed for `damage` (after block mitigation)
    Hit { damage: f32 },
    /// In range but fully negated by the defender's special mode
    Negated,
}

/// Result of an ability cast
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AbilityOutcome {
    /// Slot empty or still cooling down
    Unavailable,
    Restored { amount: f32 },
    Hit { damage: f32 },
    /// Cooldown consumed, nothing else (shield-type abilities)
    NoEffect,
}

/// Combat system for attacks and ability effects
pub struct CombatSystem;

impl CombatSystem {
    /// Reach of an attacker's melee swing
    pub fn melee_range(attacker: &Fighter) -> f32 {
        attacker.style.range * MELEE_RANGE_SCALE
    }

    /// Base damage plus the special-mode bonus
    fn with_special_bonus(attacker: &Fighter, base: f32) -> f32 {
        if attacker.special.is_active {
            base + SPECIAL_DAMAGE_BONUS
        } else {
            base
        }
    }

    /// Resolve a melee attack against the defender.
    ///
    /// The auto-dodge roll is only taken once the range gate has passed and the
    /// defender's special mode is active.
    pub fn melee_attack<R: Rng + ?Sized>(
        attacker: &Fighter,
        defender: &mut Fighter,
        rng: &mut R,
    ) -> MeleeOutcome {
        if attacker.distance_to(defender) > Self::melee_range(attacker) {
            return MeleeOutcome::OutOfRange;
        }

        let mut damage = Self::with_special_bonus(attacker, attacker.style.damage * MELEE_DAMAGE_SCALE);
        if defender.blocking {
            damage *= MELEE_BLOCK_FACTOR;
        }

        if defender.special.is_active && rng.gen::<f32>() < AUTO_DODGE_CHANCE {
            return MeleeOutcome::Negated;
        }

        defender.take_damage(damage);
        MeleeOutcome::Hit { damage }
    }

    /// Cast the ability in `slot` from `user` at `target`.
    pub fn use_ability(user: &mut Fighter, target: &mut Fighter, slot: usize) -> AbilityOutcome {
        let Some(ability) = user.abilities.get_mut(slot) else {
            return AbilityOutcome::Unavailable;
        };
        if ability.is_empty() || ability.current_cooldown > 0.0 {
            return AbilityOutcome::Unavailable;
        }

        ability.current_cooldown = ability.cooldown;
        let effect = ability.effect;
        let base_damage = ability.damage;

        if effect == Some(AbilityEffect::Restore) {
            let amount = user.heal(RESTORE_AMOUNT);
            return AbilityOutcome::Restored { amount };
        }

        if base_damage > 0.0 {
            let mut damage = Self::with_special_bonus(user, base_damage);
            if target.blocking {
                damage *= ABILITY_BLOCK_FACTOR;
            }
            target.take_damage(damage);
            return AbilityOutcome::Hit { damage };
        }

        // TODO: shield abilities need a mitigation window before they can do anything here
        AbilityOutcome::NoEffect
    }

    /// Switch special mode on. Every activation permanently raises max health,
    /// so repeated activations over a match keep stacking.
    pub fn activate_special(fighter: &mut Fighter) {
        fighter.special.is_active = true;
        fighter.special.current_duration = fighter.special.duration;
        fighter.max_health += SPECIAL_HEALTH_BONUS;
        fighter.heal(SPECIAL_HEALTH_BONUS);
    }
}
