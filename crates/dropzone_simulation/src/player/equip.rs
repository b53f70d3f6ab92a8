//! Equip / unequip on the player aggregate
//!
//! A different item already in the target slot is dropped to the world before
//! the new one is installed. The backpack slot also drives the container
//! capacity (`base_capacity + bonus_capacity`); shrink overflow is dropped.

use thiserror::Error;

use crate::collaborators::InventoryNotice;
use crate::components::EquipSlot;
use crate::error::InventoryError;
use crate::item_system::Item;
use crate::logger::{log, log_warning};

use super::{slot_item, InventoryWorld, Player};

/// Equip rejected; the item is handed back untouched.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct EquipRejected {
    pub error: InventoryError,
    pub item: Item,
}

impl Player {
    pub fn equip_weapon<W: InventoryWorld>(&mut self, item: Item, world: &mut W) -> Result<(), EquipRejected> {
        self.equip(EquipSlot::Weapon, item, world)
    }

    pub fn equip_armor<W: InventoryWorld>(&mut self, item: Item, world: &mut W) -> Result<(), EquipRejected> {
        self.equip(EquipSlot::Armor, item, world)
    }

    pub fn equip_backpack<W: InventoryWorld>(&mut self, item: Item, world: &mut W) -> Result<(), EquipRejected> {
        self.equip(EquipSlot::Backpack, item, world)
    }

    /// Validate, displace the previous occupant, install.
    pub fn equip<W: InventoryWorld>(
        &mut self,
        slot: EquipSlot,
        item: Item,
        world: &mut W,
    ) -> Result<(), EquipRejected> {
        let checked = self.ensure_owner().and_then(|()| slot.validate(&item));
        if let Err(error) = checked {
            log_warning(&format!("Equip {} rejected: {}", slot.as_str(), error));
            return Err(EquipRejected { error, item });
        }

        let previous = self.equipment.take(slot);
        self.drop_to_world(previous, world);

        if slot == EquipSlot::Backpack {
            let bonus = item
                .data()
                .and_then(|data| data.as_backpack())
                .map_or(0, |backpack| backpack.bonus_capacity);
            self.resize_container(self.base_capacity() + bonus, world);
        }

        log(&format!("🛡️ Equipped {} ({})", item.name(), slot.as_str()));
        if let Err((error, item)) = self.equipment.install(slot, item) {
            // validate() passed above; only reachable if validation rules diverge
            log_warning(&format!("Equip {} failed after validation: {}", slot.as_str(), error));
            self.drop_to_world(item, world);
        }
        world.notify(InventoryNotice::EquipmentChanged);
        Ok(())
    }

    /// Move one unit of the equippable item in container `slot` into its
    /// equipment slot.
    pub fn equip_from_container<W: InventoryWorld>(
        &mut self,
        slot: usize,
        world: &mut W,
    ) -> Result<EquipSlot, InventoryError> {
        self.ensure_owner()?;
        let item = slot_item(&self.container, slot)?;
        let data = item.data().ok_or(InventoryError::EmptyOperand)?;
        let target = EquipSlot::for_kind(&data.kind).ok_or_else(|| InventoryError::TypeMismatch {
            item: data.id.clone(),
            expected: "equipment",
        })?;

        target.validate(item)?;

        let unit = self.container.subtract_items_at_slot(slot, 1);
        if let Err(rejected) = self.equip(target, unit, world) {
            self.return_to_slot(slot, rejected.item, world);
            return Err(rejected.error);
        }
        self.after_container_change(world);
        Ok(target)
    }

    /// Give a unit taken from `slot` back to the container; whatever no longer
    /// fits goes to the world.
    pub(super) fn return_to_slot<W: InventoryWorld>(&mut self, slot: usize, item: Item, world: &mut W) {
        let leftover = self.container.put_back(slot, item);
        let leftover = self.container.add_item(leftover);
        self.drop_to_world(leftover, world);
    }

    pub fn drop_weapon<W: InventoryWorld>(&mut self, world: &mut W) -> Result<Option<W::Handle>, InventoryError> {
        self.drop_equipped(EquipSlot::Weapon, world)
    }

    pub fn drop_armor<W: InventoryWorld>(&mut self, world: &mut W) -> Result<Option<W::Handle>, InventoryError> {
        self.drop_equipped(EquipSlot::Armor, world)
    }

    pub fn drop_backpack<W: InventoryWorld>(&mut self, world: &mut W) -> Result<Option<W::Handle>, InventoryError> {
        self.drop_equipped(EquipSlot::Backpack, world)
    }

    /// Empty an equipment slot into the world.
    pub fn drop_equipped<W: InventoryWorld>(
        &mut self,
        slot: EquipSlot,
        world: &mut W,
    ) -> Result<Option<W::Handle>, InventoryError> {
        self.ensure_owner()?;
        if self.equipment.get(slot).is_empty() {
            return Err(InventoryError::EmptyOperand);
        }

        let previous = self.equipment.take(slot);
        if slot == EquipSlot::Backpack {
            self.resize_container(self.base_capacity(), world);
        }

        world.notify(InventoryNotice::EquipmentChanged);
        Ok(self.drop_to_world(previous, world))
    }

    /// Resize the container, dropping whatever no longer fits.
    fn resize_container<W: InventoryWorld>(&mut self, capacity: usize, world: &mut W) {
        if capacity == self.container.capacity() {
            return;
        }

        let overflow = self.container.resize_capacity(capacity);
        if !overflow.is_empty() {
            log_warning(&format!(
                "Container shrunk to {} slots, dropping {} overflow item(s)",
                capacity,
                overflow.len()
            ));
        }
        for item in overflow {
            self.drop_to_world(item, world);
        }
        self.after_container_change(world);
    }
}
