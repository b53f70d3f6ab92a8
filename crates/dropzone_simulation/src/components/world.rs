//! World-side components: item pickups and projectiles

use bevy::prelude::*;

use crate::item_system::{DamageType, Item};

/// Item lying in the world (loot spawn, drop, overflow, displaced equipment)
#[derive(Component, Debug)]
pub struct WorldItem {
    pub item: Item,
    /// Dropped by a player: must be picked up explicitly
    pub allow_auto_loot: bool,
}

/// Linear velocity with ground friction (drop impulses)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Velocity {
    pub linear: Vec3,
}

impl Velocity {
    /// Fraction of velocity lost per second
    pub const DAMPING: f32 = 4.0;
}

/// Pooled projectile. Inactive projectiles are parked in `ProjectilePool`.
#[derive(Component, Debug, Clone)]
pub struct Projectile {
    pub shooter: Entity,
    pub direction: Vec3,
    pub speed: f32,
    pub damage: f32,
    pub damage_type: DamageType,
    /// Distance left before the projectile is recycled
    pub remaining_range: f32,
    pub active: bool,
}
