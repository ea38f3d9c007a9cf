//! Fighter movement and arena bounds

use serde::{Deserialize, Serialize};

use super::fighter::{Fighter, Side};

/// Horizontal margin kept between a fighter and the arena walls
pub const WALL_MARGIN: f32 = 50.0;
/// Vertical margin kept between a fighter and the floor/ceiling
pub const FLOOR_MARGIN: f32 = 100.0;
/// Distance of each starting lane from its wall
pub const START_LANE_OFFSET: f32 = 200.0;

/// Arena dimensions in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Starting position of a side
    pub fn spawn_point(&self, side: Side) -> (f32, f32) {
        let x = match side {
            Side::Player => START_LANE_OFFSET,
            Side::Enemy => self.width - START_LANE_OFFSET,
        };
        (x, self.height / 2.0)
    }

    /// Clamp a position into the playable area
    pub fn clamp(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x.max(WALL_MARGIN).min(self.width - WALL_MARGIN),
            y.max(FLOOR_MARGIN).min(self.height - FLOOR_MARGIN),
        )
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(1920.0, 1080.0)
    }
}

/// Physics system for fighter positions
pub struct PhysicsSystem;

impl PhysicsSystem {
    /// Move a fighter by its velocity and keep it inside the arena.
    /// Velocity is left untouched; input and AI re-derive it every tick.
    pub fn update_fighter(fighter: &mut Fighter, arena: &Arena, dt: f32) {
        let x = fighter.x + fighter.vel_x * dt;
        let y = fighter.y + fighter.vel_y * dt;
        let (x, y) = arena.clamp(x, y);
        fighter.x = x;
        fighter.y = y;
    }
}
