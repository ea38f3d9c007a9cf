//! Per-tick cooldown and special-mode timers

use super::fighter::Fighter;

/// Advance every timer on one fighter by `dt` seconds.
///
/// Ability cooldowns stop at zero. The attack cooldown only counts down while
/// positive and may dip below zero, which still reads as ready. An active
/// special mode burns its duration and starts its cooldown on expiry; an
/// inactive one winds its cooldown down to zero.
pub fn update_cooldowns(fighter: &mut Fighter, dt: f32) {
    for ability in fighter.abilities.iter_mut() {
        if ability.current_cooldown > 0.0 {
            ability.current_cooldown = (ability.current_cooldown - dt).max(0.0);
        }
    }

    let special = &mut fighter.special;
    if special.is_active {
        special.current_duration -= dt;
        if special.current_duration <= 0.0 {
            special.is_active = false;
            special.current_duration = 0.0;
            special.current_cooldown = special.cooldown;
        }
    } else if special.current_cooldown > 0.0 {
        special.current_cooldown = (special.current_cooldown - dt).max(0.0);
    }

    if fighter.attack_cooldown > 0.0 {
        fighter.attack_cooldown -= dt;
    }
}
