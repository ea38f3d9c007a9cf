//! Player input: per-tick action snapshot, device adapter, and input handling

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::combat::CombatSystem;
use super::fighter::{Fighter, ABILITY_SLOTS};
use super::snapshot::CombatEvent;

/// Player movement per point of style speed
pub const PLAYER_SPEED_SCALE: f32 = 100.0;
/// Movement multiplier while special mode is active
pub const SPECIAL_SPEED_MULTIPLIER: f32 = 1.5;
/// Seconds between player melee swings
pub const PLAYER_ATTACK_COOLDOWN: f32 = 0.5;
/// Analog stick deflection that counts as a direction press
pub const STICK_THRESHOLD: f32 = 0.5;

/// Actions held during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub move_left: bool,
    pub move_right: bool,
    pub move_up: bool,
    pub move_down: bool,
    pub attack: bool,
    pub block: bool,
    pub ability1: bool,
    pub ability2: bool,
    pub ability3: bool,
    pub ability4: bool,
    pub ability5: bool,
    pub ability6: bool,
    pub special_mode: bool,
}

impl InputSnapshot {
    /// Ability triggers in slot order
    pub fn abilities(&self) -> [bool; ABILITY_SLOTS] {
        [
            self.ability1,
            self.ability2,
            self.ability3,
            self.ability4,
            self.ability5,
            self.ability6,
        ]
    }

    pub fn set_ability(&mut self, slot: usize, pressed: bool) {
        match slot {
            0 => self.ability1 = pressed,
            1 => self.ability2 = pressed,
            2 => self.ability3 = pressed,
            3 => self.ability4 = pressed,
            4 => self.ability5 = pressed,
            5 => self.ability6 = pressed,
            _ => {}
        }
    }
}

/// Connected gamepad state
#[derive(Debug, Clone, Default)]
pub struct GamepadState {
    /// Left stick is axes 0 (x) and 1 (y)
    pub axes: Vec<f32>,
    /// Button 0 attacks, 1 blocks, 2 triggers special mode
    pub buttons: Vec<bool>,
}

/// Raw device state as captured by the host
#[derive(Debug, Clone, Default)]
pub struct DeviceState {
    keys: HashSet<String>,
    mouse_buttons: HashSet<u8>,
    pub gamepad: Option<GamepadState>,
}

impl DeviceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key names are case-insensitive ("a", "ArrowLeft", "1", ...)
    pub fn set_key(&mut self, key: &str, pressed: bool) {
        let key = key.to_lowercase();
        if pressed {
            self.keys.insert(key);
        } else {
            self.keys.remove(&key);
        }
    }

    /// 0 = primary, 2 = secondary
    pub fn set_mouse_button(&mut self, button: u8, pressed: bool) {
        if pressed {
            self.mouse_buttons.insert(button);
        } else {
            self.mouse_buttons.remove(&button);
        }
    }

    /// Drop every held key and button
    pub fn clear(&mut self) {
        self.keys.clear();
        self.mouse_buttons.clear();
    }

    fn key(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Sample the held state into an action snapshot
    pub fn snapshot(&self) -> InputSnapshot {
        let mut input = InputSnapshot {
            move_left: self.key("a") || self.key("arrowleft"),
            move_right: self.key("d") || self.key("arrowright"),
            move_up: self.key("w") || self.key("arrowup"),
            move_down: self.key("s") || self.key("arrowdown"),
            attack: self.mouse_buttons.contains(&0),
            block: self.mouse_buttons.contains(&2),
            special_mode: self.key("c"),
            ..Default::default()
        };
        for slot in 0..ABILITY_SLOTS {
            input.set_ability(slot, self.key(&(slot + 1).to_string()));
        }

        if let Some(pad) = &self.gamepad {
            let axis = |i: usize| pad.axes.get(i).copied().unwrap_or(0.0);
            let button = |i: usize| pad.buttons.get(i).copied().unwrap_or(false);

            input.move_left |= axis(0) < -STICK_THRESHOLD;
            input.move_right |= axis(0) > STICK_THRESHOLD;
            input.move_up |= axis(1) < -STICK_THRESHOLD;
            input.move_down |= axis(1) > STICK_THRESHOLD;
            input.attack |= button(0);
            input.block |= button(1);
            input.special_mode |= button(2);
        }

        input
    }
}

/// Apply one tick of player input to the player fighter.
///
/// Velocity is rebuilt from scratch; right wins over left and down over up
/// when both are held. Every pressed ability slot is tried in order.
pub fn handle_player_input<R: Rng + ?Sized>(
    player: &mut Fighter,
    enemy: &mut Fighter,
    input: &InputSnapshot,
    rng: &mut R,
    events: &mut Vec<CombatEvent>,
) {
    let multiplier = if player.special.is_active {
        SPECIAL_SPEED_MULTIPLIER
    } else {
        1.0
    };
    let speed = player.style.speed * PLAYER_SPEED_SCALE * multiplier;

    player.vel_x = 0.0;
    player.vel_y = 0.0;

    if input.move_left {
        player.vel_x = -speed;
        player.facing_right = false;
    }
    if input.move_right {
        player.vel_x = speed;
        player.facing_right = true;
    }
    if input.move_up {
        player.vel_y = -speed;
    }
    if input.move_down {
        player.vel_y = speed;
    }

    player.blocking = input.block;

    if input.attack && player.attack_ready() {
        let outcome = CombatSystem::melee_attack(player, enemy, rng);
        player.attack_cooldown = PLAYER_ATTACK_COOLDOWN;
        debug!(attacker = %player.name, ?outcome, "Melee attack");
        events.push(CombatEvent::Melee {
            attacker: player.side,
            outcome,
        });
    }

    for (slot, pressed) in input.abilities().into_iter().enumerate() {
        if pressed && player.abilities[slot].is_ready() {
            let ability_id = player.abilities[slot].id.clone();
            let outcome = CombatSystem::use_ability(player, enemy, slot);
            debug!(caster = %player.name, slot, ability = %ability_id, ?outcome, "Ability used");
            events.push(CombatEvent::Ability {
                caster: player.side,
                slot,
                ability_id,
                outcome,
            });
        }
    }

    if input.special_mode && player.special.can_activate() {
        CombatSystem::activate_special(player);
        debug!(fighter = %player.name, max_health = player.max_health, "Special mode activated");
        events.push(CombatEvent::SpecialActivated {
            side: player.side,
            max_health: player.max_health,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::combat::{AbilityOutcome, MeleeOutcome};
    use crate::game::fighter::{Loadout, Side};
    use rand::rngs::mock::StepRng;

    fn pair() -> (Fighter, Fighter) {
        let loadout =
            Loadout::from_ids("taijutsu", &["fireball", "healing-rain", "lightning-dash"]).unwrap();
        let player = Fighter::new("Player", Side::Player, &loadout, (500.0, 540.0));
        let enemy = Fighter::new("Opponent", Side::Enemy, &Loadout::from_ids("taijutsu", &[] as &[&str]).unwrap(), (560.0, 540.0));
        (player, enemy)
    }

    fn run(player: &mut Fighter, enemy: &mut Fighter, input: InputSnapshot) -> Vec<CombatEvent> {
        let mut events = Vec::new();
        handle_player_input(player, enemy, &input, &mut StepRng::new(0, 0), &mut events);
        events
    }

    #[test]
    fn test_device_keyboard_and_mouse() {
        let mut devices = DeviceState::new();
        devices.set_key("ArrowLeft", true);
        devices.set_key("3", true);
        devices.set_key("C", true);
        devices.set_mouse_button(2, true);

        let input = devices.snapshot();
        assert!(input.move_left);
        assert!(!input.move_right);
        assert!(input.ability3);
        assert!(input.special_mode);
        assert!(input.block);
        assert!(!input.attack);

        devices.set_key("arrowleft", false);
        assert!(!devices.snapshot().move_left);

        devices.clear();
        assert_eq!(devices.snapshot(), InputSnapshot::default());
    }

    #[test]
    fn test_device_gamepad() {
        let mut devices = DeviceState::new();
        devices.gamepad = Some(GamepadState {
            axes: vec![0.8, -0.9],
            buttons: vec![true, false, true],
        });

        let input = devices.snapshot();
        assert!(input.move_right);
        assert!(input.move_up);
        assert!(input.attack);
        assert!(!input.block);
        assert!(input.special_mode);

        devices.gamepad = Some(GamepadState {
            axes: vec![0.3],
            buttons: vec![],
        });
        assert_eq!(devices.snapshot(), InputSnapshot::default());
    }

    #[test]
    fn test_movement_velocity() {
        let (mut player, mut enemy) = pair();
        run(
            &mut player,
            &mut enemy,
            InputSnapshot {
                move_left: true,
                move_down: true,
                ..Default::default()
            },
        );
        assert_eq!((player.vel_x, player.vel_y), (-700.0, 700.0));
        assert!(!player.facing_right);

        player.special.is_active = true;
        run(
            &mut player,
            &mut enemy,
            InputSnapshot {
                move_left: true,
                move_right: true,
                ..Default::default()
            },
        );
        assert_eq!((player.vel_x, player.vel_y), (1050.0, 0.0));
        assert!(player.facing_right);

        run(&mut player, &mut enemy, InputSnapshot::default());
        assert_eq!((player.vel_x, player.vel_y), (0.0, 0.0));
    }

    #[test]
    fn test_block_follows_input() {
        let (mut player, mut enemy) = pair();
        run(&mut player, &mut enemy, InputSnapshot { block: true, ..Default::default() });
        assert!(player.blocking);
        run(&mut player, &mut enemy, InputSnapshot::default());
        assert!(!player.blocking);
    }

    #[test]
    fn test_attack_respects_cooldown() {
        let (mut player, mut enemy) = pair();
        let attack = InputSnapshot { attack: true, ..Default::default() };

        let events = run(&mut player, &mut enemy, attack);
        assert_eq!(enemy.health, 65.0);
        assert_eq!(player.attack_cooldown, PLAYER_ATTACK_COOLDOWN);
        assert!(matches!(
            events[..],
            [CombatEvent::Melee { attacker: Side::Player, outcome: MeleeOutcome::Hit { .. } }]
        ));

        let events = run(&mut player, &mut enemy, attack);
        assert!(events.is_empty());
        assert_eq!(enemy.health, 65.0);
    }

    #[test]
    fn test_simultaneous_ability_triggers() {
        let (mut player, mut enemy) = pair();
        player.health = 50.0;
        let input = InputSnapshot {
            ability1: true,
            ability2: true,
            ability3: true,
            ability4: true,
            ..Default::default()
        };

        let events = run(&mut player, &mut enemy, input);

        // fireball 25 + lightning dash 15, healing rain +30, slot 4 empty
        assert_eq!(events.len(), 3);
        assert_eq!(enemy.health, 60.0);
        assert_eq!(player.health, 80.0);
        assert!(matches!(
            events[1],
            CombatEvent::Ability { slot: 1, outcome: AbilityOutcome::Restored { .. }, .. }
        ));

        // All on cooldown now
        assert!(run(&mut player, &mut enemy, input).is_empty());
    }

    #[test]
    fn test_special_mode_trigger() {
        let (mut player, mut enemy) = pair();
        let input = InputSnapshot { special_mode: true, ..Default::default() };

        let events = run(&mut player, &mut enemy, input);
        assert!(player.special.is_active);
        assert_eq!(player.max_health, 120.0);
        assert_eq!(events.len(), 1);

        // Already active: ignored
        assert!(run(&mut player, &mut enemy, input).is_empty());
        assert_eq!(player.max_health, 120.0);

        // Cooling down: ignored
        player.special.is_active = false;
        player.special.current_cooldown = 12.0;
        assert!(run(&mut player, &mut enemy, input).is_empty());
    }
}
