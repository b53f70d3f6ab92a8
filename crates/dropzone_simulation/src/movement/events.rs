//! Movement events

use bevy::prelude::*;

/// Desired movement direction on the ground plane (x → world X, y → world Z).
/// `Vec2::ZERO` stops the player.
#[derive(Event, Clone, Debug)]
pub struct MoveIntent {
    pub player: Entity,
    pub direction: Vec2,
}
