//! Equipment slots
//!
//! # Architecture
//!
//! Three independent slots, each holding one `Item` or the empty sentinel:
//! - **Weapon**: drives the attack dispatch (melee sweep / ranged shot)
//! - **Armor**: flat damage reduction
//! - **Backpack**: extra container capacity while worn
//!
//! Slot assignment is type-checked against the item kind; displacement of the
//! previous occupant (drop to the world) is handled by the `Player` aggregate,
//! which owns the container the backpack resizes.

use crate::error::InventoryError;
use crate::item_system::{ArmorData, BackpackData, Item, ItemKind, WeaponData};

/// Equipment slot identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EquipSlot {
    Weapon,
    Armor,
    Backpack,
}

impl EquipSlot {
    pub const ALL: [EquipSlot; 3] = [EquipSlot::Weapon, EquipSlot::Armor, EquipSlot::Backpack];

    pub fn as_str(self) -> &'static str {
        match self {
            EquipSlot::Weapon => "weapon",
            EquipSlot::Armor => "armor",
            EquipSlot::Backpack => "backpack",
        }
    }

    /// Slot an item kind belongs to (`None` for consumables / ammo)
    pub fn for_kind(kind: &ItemKind) -> Option<EquipSlot> {
        match kind {
            ItemKind::Weapon(_) => Some(EquipSlot::Weapon),
            ItemKind::Armor(_) => Some(EquipSlot::Armor),
            ItemKind::Backpack(_) => Some(EquipSlot::Backpack),
            ItemKind::Consumable(_) | ItemKind::Ammo => None,
        }
    }

    /// Check that `item` may go into this slot.
    pub fn validate(self, item: &Item) -> Result<(), InventoryError> {
        let Some(data) = item.data() else {
            return Err(InventoryError::EmptyOperand);
        };

        if EquipSlot::for_kind(&data.kind) == Some(self) {
            Ok(())
        } else {
            Err(InventoryError::TypeMismatch {
                item: data.id.clone(),
                expected: self.as_str(),
            })
        }
    }
}

#[derive(Debug, Default)]
pub struct Equipment {
    weapon: Item,
    armor: Item,
    backpack: Item,
}

impl Equipment {
    pub fn get(&self, slot: EquipSlot) -> &Item {
        match slot {
            EquipSlot::Weapon => &self.weapon,
            EquipSlot::Armor => &self.armor,
            EquipSlot::Backpack => &self.backpack,
        }
    }

    fn get_mut(&mut self, slot: EquipSlot) -> &mut Item {
        match slot {
            EquipSlot::Weapon => &mut self.weapon,
            EquipSlot::Armor => &mut self.armor,
            EquipSlot::Backpack => &mut self.backpack,
        }
    }

    /// Install a validated item, returning the previous occupant (possibly
    /// the empty sentinel). Mismatched items are rejected untouched.
    pub fn install(&mut self, slot: EquipSlot, item: Item) -> Result<Item, (InventoryError, Item)> {
        if let Err(err) = slot.validate(&item) {
            return Err((err, item));
        }
        Ok(std::mem::replace(self.get_mut(slot), item))
    }

    /// Empty the slot, returning its contents.
    pub fn take(&mut self, slot: EquipSlot) -> Item {
        self.get_mut(slot).take()
    }

    pub fn weapon(&self) -> Option<&WeaponData> {
        self.weapon.data().and_then(|data| data.as_weapon())
    }

    pub fn armor(&self) -> Option<&ArmorData> {
        self.armor.data().and_then(|data| data.as_armor())
    }

    pub fn backpack(&self) -> Option<&BackpackData> {
        self.backpack.data().and_then(|data| data.as_backpack())
    }

    /// Extra container slots granted by the worn backpack
    pub fn bonus_capacity(&self) -> usize {
        self.backpack().map_or(0, |backpack| backpack.bonus_capacity)
    }

    /// Flat damage reduction granted by the worn armor
    pub fn defense(&self) -> f32 {
        self.armor().map_or(0.0, |armor| armor.defense)
    }
}
