//! Fighting styles and elemental abilities available at loadout time

use serde::{Deserialize, Serialize};

/// Numeric stat block of a fighting style, fixed for the whole match
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StyleStats {
    /// Movement speed multiplier
    pub speed: f32,
    /// Melee damage multiplier
    pub damage: f32,
    /// Carried for display, has no combat effect
    pub defense: f32,
    /// Melee reach multiplier
    pub range: f32,
}

/// A selectable fighting style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FightingStyle {
    pub id: String,
    pub name: String,
    pub description: String,
    pub stats: StyleStats,
}

/// Element tag of an ability slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Fire,
    Water,
    Earth,
    Lightning,
    /// Sentinel for an empty slot
    None,
}

/// What an ability does when it resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityEffect {
    /// Deals its base damage to the target
    Damage,
    /// Heals the caster
    Restore,
    /// Utility shield; consumes the cooldown only
    Shield,
}

/// A selectable elemental ability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementalAbility {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub element: Element,
    /// Cooldown in seconds
    pub cooldown: f32,
    pub damage: f32,
    pub effect: AbilityEffect,
    /// Human readable effect text
    pub description: String,
}

const STYLES: &[(&str, &str, &str, [f32; 4])] = &[
    ("taijutsu", "Taijutsu", "Balanced hand-to-hand combat", [7.0, 7.0, 7.0, 5.0]),
    ("speed", "Swift Strike", "Lightning-fast attacks", [10.0, 5.0, 5.0, 6.0]),
    ("power", "Iron Fist", "Devastating power", [4.0, 10.0, 6.0, 5.0]),
    ("defense", "Stone Wall", "Impenetrable defense", [5.0, 6.0, 10.0, 4.0]),
    ("range", "Long Reach", "Extended attack range", [6.0, 7.0, 5.0, 10.0]),
    ("agile", "Shadow Step", "Evasive and quick", [9.0, 6.0, 6.0, 7.0]),
    ("berserker", "Berserker", "High risk, high reward", [7.0, 9.0, 4.0, 6.0]),
    ("counter", "Counter Master", "Punish enemy attacks", [6.0, 8.0, 8.0, 5.0]),
    ("hybrid", "Hybrid Arts", "Mix of all styles", [7.0, 7.0, 7.0, 7.0]),
    ("assassin", "Assassin", "Critical strike specialist", [8.0, 8.0, 5.0, 6.0]),
];

#[rustfmt::skip]
const ABILITIES: &[(&str, &str, &str, Element, f32, f32, AbilityEffect, &str)] = &[
    ("fireball", "Fireball", "🔥", Element::Fire, 5.0, 25.0, AbilityEffect::Damage, "Launches a fireball projectile"),
    ("flame-burst", "Flame Burst", "💥", Element::Fire, 8.0, 40.0, AbilityEffect::Damage, "Area damage around player"),
    ("water-wave", "Water Wave", "🌊", Element::Water, 6.0, 20.0, AbilityEffect::Damage, "Pushes enemies back"),
    ("healing-rain", "Healing Rain", "💧", Element::Water, 12.0, 0.0, AbilityEffect::Restore, "Restores 30 HP"),
    ("earth-spike", "Earth Spike", "🪨", Element::Earth, 7.0, 30.0, AbilityEffect::Damage, "Ground-based attack"),
    ("stone-wall", "Stone Wall", "🧱", Element::Earth, 10.0, 0.0, AbilityEffect::Shield, "Temporary shield"),
    ("lightning-dash", "Lightning Dash", "⚡", Element::Lightning, 4.0, 15.0, AbilityEffect::Damage, "Quick dash attack"),
    ("thunder-strike", "Thunder Strike", "🌩️", Element::Lightning, 9.0, 45.0, AbilityEffect::Damage, "Powerful lightning attack"),
];

/// All fighting styles
pub fn fighting_styles() -> Vec<FightingStyle> {
    STYLES
        .iter()
        .map(|&(id, name, description, [speed, damage, defense, range])| FightingStyle {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            stats: StyleStats {
                speed,
                damage,
                defense,
                range,
            },
        })
        .collect()
}

/// All elemental abilities
pub fn elemental_abilities() -> Vec<ElementalAbility> {
    ABILITIES
        .iter()
        .map(
            |&(id, name, icon, element, cooldown, damage, effect, description)| ElementalAbility {
                id: id.to_string(),
                name: name.to_string(),
                icon: icon.to_string(),
                element,
                cooldown,
                damage,
                effect,
                description: description.to_string(),
            },
        )
        .collect()
}

pub fn find_style(id: &str) -> Option<FightingStyle> {
    fighting_styles().into_iter().find(|s| s.id == id)
}

pub fn find_ability(id: &str) -> Option<ElementalAbility> {
    elemental_abilities().into_iter().find(|a| a.id == id)
}
