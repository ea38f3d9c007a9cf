//! Per-tick state snapshots, combat events, and snapshot batching

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::combat::{AbilityOutcome, MeleeOutcome};
use super::content::{Element, StyleStats};
use super::fighter::{AbilitySlot, Fighter, Side, SpecialMode};
use super::round::{RoundPhase, RoundState};

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum CombatEvent {
    /// A melee swing was taken
    Melee {
        attacker: Side,
        outcome: MeleeOutcome,
    },

    /// An ability left cooldown and resolved
    Ability {
        caster: Side,
        slot: usize,
        ability_id: String,
        outcome: AbilityOutcome,
    },

    SpecialActivated {
        side: Side,
        /// Max health after the activation bonus
        max_health: f32,
    },

    RoundEnded {
        round: u32,
        loser: Side,
    },

    MatchEnded {
        winner: Side,
    },
}

impl CombatEvent {
    /// Round and match transitions, which consumers should never miss
    pub fn is_milestone(&self) -> bool {
        matches!(
            self,
            CombatEvent::RoundEnded { .. } | CombatEvent::MatchEnded { .. }
        )
    }
}

/// Ability slot state in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilitySnapshot {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub element: Element,
    pub cooldown: f32,
    /// Remaining cooldown (0 = ready)
    pub current_cooldown: f32,
    pub damage: f32,
}

impl AbilitySnapshot {
    pub fn is_ready(&self) -> bool {
        self.element != Element::None && self.current_cooldown == 0.0
    }
}

impl From<&AbilitySlot> for AbilitySnapshot {
    fn from(slot: &AbilitySlot) -> Self {
        Self {
            id: slot.id.clone(),
            name: slot.name.clone(),
            icon: slot.icon.clone(),
            element: slot.element,
            cooldown: slot.cooldown,
            current_cooldown: slot.current_cooldown,
            damage: slot.damage,
        }
    }
}

/// Fighter state in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterSnapshot {
    pub name: String,
    pub side: Side,
    pub x: f32,
    pub y: f32,
    pub vel_x: f32,
    pub vel_y: f32,
    pub facing_right: bool,
    pub health: f32,
    pub max_health: f32,
    pub blocking: bool,
    /// Melee cooldown remaining (<= 0 = can swing)
    pub attack_cooldown: f32,
    pub style: StyleStats,
    /// Always six entries, empty slots included
    pub abilities: Vec<AbilitySnapshot>,
    pub special: SpecialMode,
}

impl From<&Fighter> for FighterSnapshot {
    fn from(f: &Fighter) -> Self {
        Self {
            name: f.name.clone(),
            side: f.side,
            x: f.x,
            y: f.y,
            vel_x: f.vel_x,
            vel_y: f.vel_y,
            facing_right: f.facing_right,
            health: f.health,
            max_health: f.max_health,
            blocking: f.blocking,
            attack_cooldown: f.attack_cooldown,
            style: f.style,
            abilities: f.abilities.iter().map(AbilitySnapshot::from).collect(),
            special: f.special,
        }
    }
}

/// Read-only view of the whole match after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    /// Simulation tick number
    pub tick: u64,
    pub phase: RoundPhase,
    pub player: FighterSnapshot,
    pub enemy: FighterSnapshot,
    pub player_rounds: u32,
    pub enemy_rounds: u32,
    pub round_number: u32,
    /// Side that lost the round now ending, if any
    pub round_loser: Option<Side>,
    pub match_ended: bool,
    pub winner: Option<Side>,
    /// Events raised since the previous snapshot
    pub events: Vec<CombatEvent>,
}

impl MatchSnapshot {
    pub fn capture(
        tick: u64,
        player: &Fighter,
        enemy: &Fighter,
        round: &RoundState,
        events: Vec<CombatEvent>,
    ) -> Self {
        Self {
            tick,
            phase: round.phase,
            player: player.into(),
            enemy: enemy.into(),
            player_rounds: round.player_wins,
            enemy_rounds: round.enemy_wins,
            round_number: round.round_number,
            round_loser: round.round_loser,
            match_ended: round.match_ended(),
            winner: round.winner,
            events,
        }
    }
}

/// Final result handed to the profile service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub did_win: bool,
    pub winner: Side,
    pub player_rounds: u32,
    pub enemy_rounds: u32,
    pub total_rounds: u32,
    pub finished_at: DateTime<Utc>,
}

/// Messages broadcast by a running match
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchMsg {
    /// State after a tick
    Snapshot(MatchSnapshot),

    /// Match reached its win condition
    MatchEnd { report: MatchReport },

    /// Match stopped before a winner was decided
    Aborted { tick: u64 },
}

/// Batches per-tick snapshots for broadcast
pub struct SnapshotBuilder {
    /// Tick counter since last snapshot
    ticks_since_snapshot: u32,
    /// Snapshot interval in ticks
    snapshot_interval: u32,
    /// Events from ticks whose snapshot was not sent
    pending_events: Vec<CombatEvent>,
}

impl SnapshotBuilder {
    pub fn new(snapshot_interval: u32) -> Self {
        Self {
            ticks_since_snapshot: 0,
            snapshot_interval: snapshot_interval.max(1),
            pending_events: Vec::new(),
        }
    }

    /// Check if it's time to send a snapshot
    pub fn should_send(&mut self) -> bool {
        self.ticks_since_snapshot += 1;
        if self.ticks_since_snapshot >= self.snapshot_interval {
            self.ticks_since_snapshot = 0;
            true
        } else {
            false
        }
    }

    /// Force snapshot on next check (used for round/match transitions)
    pub fn force_next(&mut self) {
        self.ticks_since_snapshot = self.snapshot_interval;
    }

    /// Feed one tick's snapshot; returns a message when one is due.
    /// Events of skipped ticks are carried into the next sent snapshot.
    pub fn push(&mut self, mut snapshot: MatchSnapshot) -> Option<MatchMsg> {
        if snapshot.events.iter().any(CombatEvent::is_milestone) || snapshot.match_ended {
            self.force_next();
        }
        self.pending_events.append(&mut snapshot.events);

        if !self.should_send() {
            return None;
        }

        snapshot.events = std::mem::take(&mut self.pending_events);
        Some(MatchMsg::Snapshot(snapshot))
    }

    /// Send whatever is still buffered on top of the final state.
    /// Returns `None` when nothing is pending.
    pub fn flush(&mut self, mut snapshot: MatchSnapshot) -> Option<MatchMsg> {
        if self.pending_events.is_empty() {
            return None;
        }
        self.ticks_since_snapshot = 0;
        snapshot.events = std::mem::take(&mut self.pending_events);
        Some(MatchMsg::Snapshot(snapshot))
    }
}
