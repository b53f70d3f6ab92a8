//! Equipment events
//!
//! # Architecture
//!
//! - `EquipFromSlotIntent` → move a container item into its equip slot
//!   (the displaced item drops to the world)
//! - `DropEquipmentIntent` → drop the item of an equip slot to the world
//!   (dropping the backpack shrinks the container, overflow drops too)
//! - `EquipmentChanged` → notice for the presentation layer

use bevy::prelude::*;

use crate::components::EquipSlot;

/// Equip the item in container slot `slot`
#[derive(Event, Clone, Debug)]
pub struct EquipFromSlotIntent {
    pub player: Entity,
    pub slot: usize,
}

#[derive(Event, Clone, Debug)]
pub struct DropEquipmentIntent {
    pub player: Entity,
    pub slot: EquipSlot,
}

#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct EquipmentChanged {
    pub player: Entity,
}
