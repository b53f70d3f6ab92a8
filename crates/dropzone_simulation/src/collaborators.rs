//! External collaborator interfaces
//!
//! The player core never touches the world directly. Side effects leave
//! through these traits; the ECS layer (`ecs_world::EcsWorld`) implements them
//! over Bevy, tests implement them with recorders.

use bevy::math::Vec3;
use std::fmt::Debug;

use crate::item_system::{DamageType, Item, ItemId};

/// Spawns item pickups into the world.
pub trait ItemSpawner {
    /// Handle of the spawned pickup (engine-specific)
    type Handle;

    /// `None` if the world refused the spawn; the item is gone either way.
    fn spawn_dropped_item(&mut self, item: Item, position: Vec3) -> Option<Self::Handle>;
}

/// Anything that can receive damage (`T` identifies the target).
pub trait DamageSink<T> {
    fn take_damage(&mut self, target: T, amount: f32, damage_type: DamageType);
}

/// Ray query against damageable objects.
pub trait SpatialQuery {
    type Target: Copy + PartialEq + Debug;

    /// First damageable target hit within `max_distance`.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<Self::Target>;
}

/// Ranged shot parameters handed to the launcher.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileShot {
    pub damage: f32,
    pub damage_type: DamageType,
    pub speed: f32,
    pub max_range: f32,
    pub ammo: Option<ItemId>,
}

pub trait ProjectileLauncher {
    fn launch_projectile(&mut self, origin: Vec3, direction: Vec3, shot: ProjectileShot);
}

/// Fire-and-forget notices for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InventoryNotice {
    InventoryChanged,
    QuickBarChanged,
    EquipmentChanged,
}

pub trait InventoryNotifier {
    fn notify(&mut self, notice: InventoryNotice);
}
