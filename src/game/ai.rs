//! Opponent policy - memoryless, reactive, random-gated

use rand::Rng;
use tracing::debug;

use super::combat::CombatSystem;
use super::fighter::{Fighter, ABILITY_SLOTS};
use super::snapshot::CombatEvent;
use super::GameMode;

/// Opponent movement per point of style speed
pub const AI_SPEED_SCALE: f32 = 80.0;
/// Beyond this distance the opponent walks in, inside it stands and swings
pub const AI_CLOSE_RANGE: f32 = 150.0;
/// Per-tick chance of swinging when close and ready
pub const AI_ATTACK_CHANCE: f32 = 0.02;
/// Seconds between opponent melee swings
pub const AI_ATTACK_COOLDOWN: f32 = 1.0;
/// Per-tick chance that a boss tries a random ability slot
pub const BOSS_CAST_CHANCE: f32 = 0.005;

/// Decide and apply the opponent's actions for one tick.
///
/// Probabilities are per tick, so behaviour depends on frame rate. A boss
/// rolls a slot uniformly in `0..6`; landing on an empty or cooling slot is a
/// no-op.
pub fn update_ai<R: Rng + ?Sized>(
    enemy: &mut Fighter,
    player: &mut Fighter,
    mode: GameMode,
    rng: &mut R,
    events: &mut Vec<CombatEvent>,
) {
    let distance = enemy.distance_to(player);
    let speed = enemy.style.speed * AI_SPEED_SCALE;

    enemy.vel_y = 0.0;
    if distance > AI_CLOSE_RANGE {
        if player.x < enemy.x {
            enemy.vel_x = -speed;
            enemy.facing_right = false;
        } else {
            enemy.vel_x = speed;
            enemy.facing_right = true;
        }
    } else {
        enemy.vel_x = 0.0;
        if enemy.attack_ready() && rng.gen::<f32>() < AI_ATTACK_CHANCE {
            let outcome = CombatSystem::melee_attack(enemy, player, rng);
            enemy.attack_cooldown = AI_ATTACK_COOLDOWN;
            debug!(attacker = %enemy.name, ?outcome, "Melee attack");
            events.push(CombatEvent::Melee {
                attacker: enemy.side,
                outcome,
            });
        }
    }

    if mode == GameMode::Boss && rng.gen::<f32>() < BOSS_CAST_CHANCE {
        let slot = rng.gen_range(0..ABILITY_SLOTS);
        if enemy.abilities[slot].is_ready() {
            let ability_id = enemy.abilities[slot].id.clone();
            let outcome = CombatSystem::use_ability(enemy, player, slot);
            debug!(caster = %enemy.name, slot, ability = %ability_id, ?outcome, "Ability used");
            events.push(CombatEvent::Ability {
                caster: enemy.side,
                slot,
                ability_id,
                outcome,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::fighter::{Loadout, Side};
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn pair(enemy_x: f32, enemy_abilities: &[&str]) -> (Fighter, Fighter) {
        let player = Fighter::new(
            "Player",
            Side::Player,
            &Loadout::from_ids("taijutsu", &[] as &[&str]).unwrap(),
            (500.0, 540.0),
        );
        let enemy = Fighter::new(
            "Boss",
            Side::Enemy,
            &Loadout::from_ids("taijutsu", enemy_abilities).unwrap(),
            (enemy_x, 540.0),
        );
        (player, enemy)
    }

    fn step(enemy: &mut Fighter, player: &mut Fighter, mode: GameMode, rng: &mut impl Rng) -> Vec<CombatEvent> {
        let mut events = Vec::new();
        update_ai(enemy, player, mode, rng, &mut events);
        events
    }

    #[test]
    fn test_walks_toward_distant_player() {
        let (mut player, mut enemy) = pair(1200.0, &[]);
        let events = step(&mut enemy, &mut player, GameMode::Standard, &mut StepRng::new(0, 0));
        assert_eq!(enemy.vel_x, -560.0);
        assert!(!enemy.facing_right);
        assert!(events.is_empty());

        let (mut player, mut enemy) = pair(100.0, &[]);
        player.x = 900.0;
        step(&mut enemy, &mut player, GameMode::Standard, &mut StepRng::new(0, 0));
        assert_eq!(enemy.vel_x, 560.0);
        assert!(enemy.facing_right);
    }

    #[test]
    fn test_halts_and_attacks_when_close() {
        let (mut player, mut enemy) = pair(580.0, &[]);
        enemy.vel_x = -560.0;

        // Roll of 0.0 passes the 2% gate
        let events = step(&mut enemy, &mut player, GameMode::Standard, &mut StepRng::new(0, 0));

        assert_eq!(enemy.vel_x, 0.0);
        assert_eq!(player.health, 65.0);
        assert_eq!(enemy.attack_cooldown, AI_ATTACK_COOLDOWN);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_attack_gate_fails_on_high_roll() {
        let (mut player, mut enemy) = pair(580.0, &[]);
        let events = step(&mut enemy, &mut player, GameMode::Standard, &mut StepRng::new(u64::MAX, 0));
        assert!(events.is_empty());
        assert_eq!(player.health, 100.0);
    }

    #[test]
    fn test_no_attack_while_cooling_down() {
        let (mut player, mut enemy) = pair(580.0, &[]);
        enemy.attack_cooldown = 0.4;
        step(&mut enemy, &mut player, GameMode::Standard, &mut StepRng::new(0, 0));
        assert_eq!(player.health, 100.0);
    }

    #[test]
    fn test_standard_mode_never_casts() {
        let (mut player, mut enemy) = pair(1500.0, &["thunder-strike"; 6]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..5000 {
            step(&mut enemy, &mut player, GameMode::Standard, &mut rng);
            enemy.x = 1500.0;
        }
        assert!(enemy.abilities.iter().all(|a| a.current_cooldown == 0.0));
        assert_eq!(player.health, 100.0);
    }

    #[test]
    fn test_boss_casts_abilities() {
        // 0.0 rolls pass the cast gate and pick slot 0
        let (mut player, mut enemy) = pair(1500.0, &["fireball"]);
        let events = step(&mut enemy, &mut player, GameMode::Boss, &mut StepRng::new(0, 0));

        assert_eq!(player.health, 75.0);
        assert_eq!(enemy.abilities[0].current_cooldown, 5.0);
        assert!(matches!(events[..], [CombatEvent::Ability { caster: Side::Enemy, slot: 0, .. }]));
    }

    #[test]
    fn test_boss_without_abilities_is_noop() {
        let (mut player, mut enemy) = pair(1500.0, &[]);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..5000 {
            assert!(step(&mut enemy, &mut player, GameMode::Boss, &mut rng).is_empty());
            enemy.x = 1500.0;
        }
        assert_eq!(player.health, 100.0);
    }
}
