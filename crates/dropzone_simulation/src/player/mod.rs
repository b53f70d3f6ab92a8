//! Player aggregate
//!
//! # Architecture
//!
//! `Player` owns everything a player carries: the item container, the quick
//! bar, the equipment slots and the running consumption. It is a plain
//! component with methods. Every side effect that leaves the player (world
//! pickups, damage, projectiles, UI notices) goes through the collaborator
//! traits in `crate::collaborators`, so the same code runs under the ECS
//! adapter (`crate::ecs_world::EcsWorld`) and under test recorders.
//!
//! ```text
//! loot_item ──► empty equip slot? ──► equip
//!           └─► container.add_item ──► remainder back to the caller
//! drop_items_at_slot ──► container.subtract ──► ItemSpawner
//! use_item_* ──► consumable  ──► ConsumptionProcess ──tick──► Vitals
//!            └─► equippable ──► equip_from_container
//! attack_to ──► melee sweep (SpatialQuery + DamageSink)
//!           └─► ranged shot (ammo + ProjectileLauncher)
//! ```
//!
//! Remote players (`NetworkRole::Remote`) are read-only projections: every
//! mutating operation returns `InventoryError::RemoteEntity`.

mod attack;
mod consumption;
mod equip;

#[cfg(test)]
pub(crate) mod test_world;

pub use attack::{AttackKind, AttackReport};
pub use consumption::{CancelReason, ConsumptionOutcome, ConsumptionProcess, ConsumptionState};
pub use equip::EquipRejected;

use bevy::prelude::*;

use crate::collaborators::{InventoryNotice, InventoryNotifier, ItemSpawner};
use crate::components::{EquipSlot, Equipment, ItemContainer, QuickBar};
use crate::config::PlayerConfig;
use crate::error::InventoryError;
use crate::item_system::{Item, ItemKind};
use crate::logger::{log, log_warning};
use crate::replication::NetworkRole;

/// Collaborators every inventory mutation needs.
pub trait InventoryWorld: ItemSpawner + InventoryNotifier {}

impl<W: ItemSpawner + InventoryNotifier> InventoryWorld for W {}

/// Result of using an item from the quick bar or the container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UseOutcome {
    /// A consumable started channeling; completes at `ends_at`.
    Consuming { ends_at: f64 },
    /// An equippable item went into its slot.
    Equipped(EquipSlot),
}

#[derive(Component, Debug)]
pub struct Player {
    config: PlayerConfig,
    role: NetworkRole,
    container: ItemContainer,
    quick_bar: QuickBar,
    equipment: Equipment,
    consumption: Option<ConsumptionProcess>,
    position: Vec3,
    /// Horizontal unit vector
    facing: Vec3,
    movement_direction: Vec2,
    /// Simulation time (seconds) of the next allowed attack
    next_attack_at: f64,
}

impl Player {
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            config: config.clone(),
            role: NetworkRole::Owner,
            container: ItemContainer::new(config.default_container_capacity),
            quick_bar: QuickBar::new(config.quick_bar_capacity),
            equipment: Equipment::default(),
            consumption: None,
            position: Vec3::ZERO,
            facing: Vec3::NEG_Z,
            movement_direction: Vec2::ZERO,
            next_attack_at: 0.0,
        }
    }

    /// Read-only projection of a player owned by another peer.
    pub fn remote(config: &PlayerConfig) -> Self {
        Self {
            role: NetworkRole::Remote,
            ..Self::new(config)
        }
    }

    pub fn role(&self) -> NetworkRole {
        self.role
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn container(&self) -> &ItemContainer {
        &self.container
    }

    pub fn quick_bar(&self) -> &QuickBar {
        &self.quick_bar
    }

    pub fn equipment(&self) -> &Equipment {
        &self.equipment
    }

    /// Container capacity without a backpack
    pub fn base_capacity(&self) -> usize {
        self.config.default_container_capacity
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn facing(&self) -> Vec3 {
        self.facing
    }

    /// Mirror the entity transform. A degenerate facing keeps the previous one.
    pub fn set_pose(&mut self, position: Vec3, facing: Vec3) {
        self.position = position;
        if let Some(facing) = Vec3::new(facing.x, 0.0, facing.z).try_normalize() {
            self.facing = facing;
        }
    }

    // ========================================================================
    // Movement
    // ========================================================================

    /// Store the desired movement direction (x, z plane). Longer than unit
    /// length is clamped.
    pub fn move_to(&mut self, direction: Vec2) {
        self.movement_direction = direction.clamp_length_max(1.0);
    }

    pub fn movement_direction(&self) -> Vec2 {
        self.movement_direction
    }

    /// 1.0 normally, reduced while a consumable is channeling.
    pub fn speed_multiplier(&self) -> f32 {
        if self.is_consuming() {
            self.config.speed_multiplier_while_consuming
        } else {
            1.0
        }
    }

    /// World-space velocity the movement system integrates.
    pub fn movement_velocity(&self) -> Vec3 {
        let direction = Vec3::new(self.movement_direction.x, 0.0, self.movement_direction.y);
        direction * self.config.move_speed * self.speed_multiplier()
    }

    // ========================================================================
    // Loot / drop
    // ========================================================================

    /// Pick up a world item. Equipment goes into a matching empty slot,
    /// everything else into the container. Returns what did not fit.
    pub fn loot_item<W: InventoryWorld>(&mut self, item: Item, world: &mut W) -> Item {
        if item.is_empty() {
            return item;
        }
        if self.ensure_owner().is_err() {
            log_warning("loot_item ignored on a remote player");
            return item;
        }

        let free_slot = item
            .data()
            .and_then(|data| EquipSlot::for_kind(&data.kind))
            .filter(|slot| self.equipment.get(*slot).is_empty());

        if let Some(slot) = free_slot {
            return match self.equip(slot, item, world) {
                Ok(()) => Item::empty(),
                Err(rejected) => rejected.item,
            };
        }

        let before = item.stack();
        let name = item.name().to_string();
        let remainder = self.container.add_item(item);
        if remainder.stack() < before {
            log(&format!(
                "🎒 Looted {} x{}",
                name,
                before - remainder.stack()
            ));
            self.after_container_change(world);
        }
        remainder
    }

    /// Drop up to `count` units from a container slot into the world.
    pub fn drop_items_at_slot<W: InventoryWorld>(
        &mut self,
        slot: usize,
        count: u32,
        world: &mut W,
    ) -> Result<Option<W::Handle>, InventoryError> {
        self.ensure_owner()?;
        slot_item(&self.container, slot)?;

        let dropped = self.container.subtract_items_at_slot(slot, count);
        if dropped.is_empty() {
            return Err(InventoryError::EmptyOperand);
        }

        self.after_container_change(world);
        Ok(self.drop_to_world(dropped, world))
    }

    // ========================================================================
    // Quick bar
    // ========================================================================

    /// Bind the item in `container_slot` to quick bar `slot`.
    pub fn assign_item_to_quick_bar<W: InventoryNotifier>(
        &mut self,
        slot: usize,
        container_slot: usize,
        world: &mut W,
    ) -> Result<(), InventoryError> {
        self.ensure_owner()?;
        let item = slot_item(&self.container, container_slot)?;

        if let Err(err) = self.quick_bar.assign(slot, item) {
            log_warning(&format!("QuickBar assign rejected: {}", err));
            return Err(err);
        }

        world.notify(InventoryNotice::QuickBarChanged);
        Ok(())
    }

    pub fn clear_quick_bar_slot<W: InventoryNotifier>(
        &mut self,
        slot: usize,
        world: &mut W,
    ) -> Result<(), InventoryError> {
        self.ensure_owner()?;
        self.quick_bar.clear(slot)?;
        world.notify(InventoryNotice::QuickBarChanged);
        Ok(())
    }

    // ========================================================================
    // Use
    // ========================================================================

    /// Use the item bound to quick bar `slot`.
    pub fn use_item_at_quick_bar<W: InventoryWorld>(
        &mut self,
        slot: usize,
        now: f64,
        world: &mut W,
    ) -> Result<UseOutcome, InventoryError> {
        self.ensure_owner()?;
        if slot >= self.quick_bar.capacity() {
            return Err(InventoryError::InvalidSlotIndex {
                slot,
                len: self.quick_bar.capacity(),
            });
        }

        let uid = self.quick_bar.get(slot).ok_or(InventoryError::EmptyOperand)?;
        let Some(container_slot) = self.container.slot_of(uid) else {
            // Stale binding (should have been pruned already)
            self.prune_quick_bar(world);
            return Err(InventoryError::EmptyOperand);
        };

        self.use_item_at_container(container_slot, now, world)
    }

    /// Use the item in a container slot: consumables start channeling,
    /// equipment is equipped.
    pub fn use_item_at_container<W: InventoryWorld>(
        &mut self,
        slot: usize,
        now: f64,
        world: &mut W,
    ) -> Result<UseOutcome, InventoryError> {
        self.ensure_owner()?;
        let data = slot_item(&self.container, slot)?
            .data()
            .cloned()
            .ok_or(InventoryError::EmptyOperand)?;

        match &data.kind {
            ItemKind::Consumable(_) => {
                let ends_at = self.start_consumption(slot, now)?;
                Ok(UseOutcome::Consuming { ends_at })
            }
            ItemKind::Weapon(_) | ItemKind::Armor(_) | ItemKind::Backpack(_) => {
                let equipped = self.equip_from_container(slot, world)?;
                Ok(UseOutcome::Equipped(equipped))
            }
            ItemKind::Ammo => Err(InventoryError::TypeMismatch {
                item: data.id.clone(),
                expected: "usable item",
            }),
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn ensure_owner(&self) -> Result<(), InventoryError> {
        match self.role {
            NetworkRole::Owner => Ok(()),
            NetworkRole::Remote => Err(InventoryError::RemoteEntity),
        }
    }

    /// Spawn `item` as a pickup above the player.
    fn drop_to_world<W: ItemSpawner>(&self, item: Item, world: &mut W) -> Option<W::Handle> {
        if item.is_empty() {
            return None;
        }

        log(&format!("📦 Dropping {} x{}", item.name(), item.stack()));
        let position = self.position + Vec3::Y * self.config.drop_height;
        let handle = world.spawn_dropped_item(item, position);
        if handle.is_none() {
            log_warning("World refused to spawn a dropped item");
        }
        handle
    }

    /// Notify and drop quick bar bindings whose item left the container.
    fn after_container_change<W: InventoryNotifier>(&mut self, world: &mut W) {
        world.notify(InventoryNotice::InventoryChanged);
        self.prune_quick_bar(world);
    }

    fn prune_quick_bar<W: InventoryNotifier>(&mut self, world: &mut W) {
        let container = &self.container;
        if self.quick_bar.retain(|uid| container.contains_uid(uid)) {
            world.notify(InventoryNotice::QuickBarChanged);
        }
    }
}

/// Bounds-checked container access.
fn slot_item(container: &ItemContainer, slot: usize) -> Result<&Item, InventoryError> {
    container.get(slot).ok_or(InventoryError::InvalidSlotIndex {
        slot,
        len: container.capacity(),
    })
}
