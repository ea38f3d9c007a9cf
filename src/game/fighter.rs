//! Fighter state, ability slots and loadouts

use serde::{Deserialize, Serialize};

use super::content::{
    find_ability, find_style, AbilityEffect, Element, ElementalAbility, FightingStyle, StyleStats,
};

/// Number of ability slots every fighter carries
pub const ABILITY_SLOTS: usize = 6;

/// Max health of a freshly created fighter
pub const BASE_MAX_HEALTH: f32 = 100.0;

/// Extra max health granted to the boss opponent
pub const BOSS_HEALTH_BONUS: f32 = 50.0;

/// Which combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

/// One of the six equipment slots of a fighter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilitySlot {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub element: Element,
    /// Base cooldown in seconds
    pub cooldown: f32,
    /// Remaining cooldown (0 = ready)
    pub current_cooldown: f32,
    pub damage: f32,
    /// `None` only for empty slots
    pub effect: Option<AbilityEffect>,
}

impl AbilitySlot {
    /// Placeholder for an unused slot
    pub fn empty(index: usize) -> Self {
        Self {
            id: format!("empty-{}", index),
            name: "Empty".to_string(),
            icon: "⚫".to_string(),
            element: Element::None,
            cooldown: 0.0,
            current_cooldown: 0.0,
            damage: 0.0,
            effect: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.element == Element::None
    }

    /// Off cooldown and holding a real ability
    pub fn is_ready(&self) -> bool {
        !self.is_empty() && self.current_cooldown == 0.0
    }
}

impl From<&ElementalAbility> for AbilitySlot {
    fn from(ability: &ElementalAbility) -> Self {
        Self {
            id: ability.id.clone(),
            name: ability.name.clone(),
            icon: ability.icon.clone(),
            element: ability.element,
            cooldown: ability.cooldown,
            current_cooldown: 0.0,
            damage: ability.damage,
            effect: Some(ability.effect),
        }
    }
}

/// Timed buff state ("ultimate")
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpecialMode {
    pub is_active: bool,
    /// Full active duration in seconds
    pub duration: f32,
    /// Remaining active time
    pub current_duration: f32,
    /// Full cooldown in seconds, started when the mode expires
    pub cooldown: f32,
    /// Remaining cooldown (0 = can activate)
    pub current_cooldown: f32,
}

impl SpecialMode {
    pub fn can_activate(&self) -> bool {
        !self.is_active && self.current_cooldown == 0.0
    }
}

impl Default for SpecialMode {
    fn default() -> Self {
        Self {
            is_active: false,
            duration: 10.0,
            current_duration: 0.0,
            cooldown: 30.0,
            current_cooldown: 0.0,
        }
    }
}

/// A style plus up to six abilities chosen before the match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loadout {
    pub style: FightingStyle,
    pub abilities: Vec<ElementalAbility>,
}

impl Loadout {
    pub fn new(
        style: FightingStyle,
        abilities: Vec<ElementalAbility>,
    ) -> Result<Self, LoadoutError> {
        if abilities.len() > ABILITY_SLOTS {
            return Err(LoadoutError::TooManyAbilities(abilities.len()));
        }
        Ok(Self { style, abilities })
    }

    /// Build a loadout from catalog ids
    pub fn from_ids<S: AsRef<str>>(style_id: &str, ability_ids: &[S]) -> Result<Self, LoadoutError> {
        let style =
            find_style(style_id).ok_or_else(|| LoadoutError::UnknownStyle(style_id.to_string()))?;
        let abilities = ability_ids
            .iter()
            .map(|id| {
                let id = id.as_ref();
                find_ability(id).ok_or_else(|| LoadoutError::UnknownAbility(id.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(style, abilities)
    }
}

/// Loadout validation errors
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LoadoutError {
    #[error("A loadout holds at most 6 abilities, got {0}")]
    TooManyAbilities(usize),

    #[error("Unknown fighting style: {0}")]
    UnknownStyle(String),

    #[error("Unknown ability: {0}")]
    UnknownAbility(String),
}

/// One combatant (authoritative)
#[derive(Debug, Clone, PartialEq)]
pub struct Fighter {
    pub name: String,
    pub side: Side,

    // Position and movement
    pub x: f32,
    pub y: f32,
    pub vel_x: f32,
    pub vel_y: f32,
    pub facing_right: bool,

    // Combat
    pub health: f32,
    pub max_health: f32,
    pub blocking: bool,
    pub attack_cooldown: f32,

    pub style: StyleStats,
    pub abilities: [AbilitySlot; ABILITY_SLOTS],
    pub special: SpecialMode,
}

impl Fighter {
    pub fn new(name: impl Into<String>, side: Side, loadout: &Loadout, spawn: (f32, f32)) -> Self {
        let abilities = std::array::from_fn(|i| {
            loadout
                .abilities
                .get(i)
                .map(AbilitySlot::from)
                .unwrap_or_else(|| AbilitySlot::empty(i))
        });

        Self {
            name: name.into(),
            side,
            x: spawn.0,
            y: spawn.1,
            vel_x: 0.0,
            vel_y: 0.0,
            facing_right: side == Side::Player,
            health: BASE_MAX_HEALTH,
            max_health: BASE_MAX_HEALTH,
            blocking: false,
            attack_cooldown: 0.0,
            style: loadout.style.stats,
            abilities,
            special: SpecialMode::default(),
        }
    }

    /// Set max health and fill up to it
    pub fn with_max_health(mut self, max_health: f32) -> Self {
        self.max_health = max_health.max(0.0);
        self.health = self.max_health;
        self
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0.0
    }

    /// Horizontal distance used by every range check
    pub fn distance_to(&self, other: &Fighter) -> f32 {
        (self.x - other.x).abs()
    }

    pub fn attack_ready(&self) -> bool {
        self.attack_cooldown <= 0.0
    }

    /// Subtract damage, clamped at 0. Returns the health actually lost.
    pub fn take_damage(&mut self, damage: f32) -> f32 {
        let before = self.health;
        self.health = (self.health - damage.max(0.0)).clamp(0.0, self.max_health);
        before - self.health
    }

    /// Add health, clamped at max. Returns the health actually gained.
    pub fn heal(&mut self, amount: f32) -> f32 {
        let before = self.health;
        self.health = (self.health + amount.max(0.0)).clamp(0.0, self.max_health);
        self.health - before
    }

    /// Between-round reset: full health, back to the starting lane, special mode off
    pub fn reset_for_round(&mut self, spawn: (f32, f32)) {
        self.health = self.max_health;
        self.x = spawn.0;
        self.y = spawn.1;
        self.vel_x = 0.0;
        self.vel_y = 0.0;
        self.special.is_active = false;
        self.special.current_duration = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loadout(abilities: &[&str]) -> Loadout {
        Loadout::from_ids("taijutsu", abilities).unwrap()
    }

    #[test]
    fn test_empty_loadout_pads_six_slots() {
        let fighter = Fighter::new("Player", Side::Player, &loadout(&[]), (200.0, 540.0));
        assert_eq!(fighter.abilities.len(), ABILITY_SLOTS);
        for (i, slot) in fighter.abilities.iter().enumerate() {
            assert!(slot.is_empty());
            assert_eq!(slot.element, Element::None);
            assert_eq!(slot.cooldown, 0.0);
            assert_eq!(slot.damage, 0.0);
            assert_eq!(slot.id, format!("empty-{}", i));
            assert!(!slot.is_ready());
        }
    }

    #[test]
    fn test_partial_loadout_keeps_order() {
        let fighter = Fighter::new(
            "Player",
            Side::Player,
            &loadout(&["fireball", "healing-rain"]),
            (200.0, 540.0),
        );
        assert_eq!(fighter.abilities[0].id, "fireball");
        assert_eq!(fighter.abilities[1].id, "healing-rain");
        assert!(fighter.abilities[1].is_ready());
        assert!(fighter.abilities[2..].iter().all(AbilitySlot::is_empty));
    }

    #[test]
    fn test_loadout_rejects_seven_abilities() {
        let ids = [
            "fireball",
            "flame-burst",
            "water-wave",
            "healing-rain",
            "earth-spike",
            "stone-wall",
            "thunder-strike",
        ];
        assert_eq!(
            Loadout::from_ids("taijutsu", &ids),
            Err(LoadoutError::TooManyAbilities(7))
        );
        assert_eq!(
            Loadout::from_ids("taijutsu", &["ice-shard"]),
            Err(LoadoutError::UnknownAbility("ice-shard".to_string()))
        );
        assert!(matches!(
            Loadout::from_ids("sumo", &[] as &[&str]),
            Err(LoadoutError::UnknownStyle(_))
        ));
    }

    #[test]
    fn test_health_is_clamped() {
        let mut fighter = Fighter::new("Enemy", Side::Enemy, &loadout(&[]), (1720.0, 540.0));
        assert_eq!(fighter.take_damage(30.0), 30.0);
        assert_eq!(fighter.heal(500.0), 30.0);
        assert_eq!(fighter.health, fighter.max_health);
        assert_eq!(fighter.take_damage(250.0), 100.0);
        assert_eq!(fighter.health, 0.0);
        assert!(fighter.is_defeated());
        assert_eq!(fighter.take_damage(-5.0), 0.0);
    }

    #[test]
    fn test_boss_health() {
        let boss = Fighter::new("Boss", Side::Enemy, &loadout(&[]), (1720.0, 540.0))
            .with_max_health(BASE_MAX_HEALTH + BOSS_HEALTH_BONUS);
        assert_eq!(boss.max_health, 150.0);
        assert_eq!(boss.health, 150.0);
        assert!(!boss.facing_right);
    }

    #[test]
    fn test_reset_for_round() {
        let mut fighter = Fighter::new("Player", Side::Player, &loadout(&[]), (200.0, 540.0));
        fighter.x = 900.0;
        fighter.vel_x = 700.0;
        fighter.take_damage(60.0);
        fighter.special.is_active = true;
        fighter.special.current_duration = 4.0;

        fighter.reset_for_round((200.0, 540.0));

        assert_eq!(fighter.health, fighter.max_health);
        assert_eq!((fighter.x, fighter.y), (200.0, 540.0));
        assert_eq!(fighter.vel_x, 0.0);
        assert!(!fighter.special.is_active);
        assert_eq!(fighter.special.current_duration, 0.0);
    }
}
