//! Equipment module: weapon, armor and backpack slots
//!
//! # Architecture
//!
//! **Events → Systems flow:**
//! - Input layer emits intent events
//! - Systems run `Player::equip_from_container` / `Player::drop_equipped`
//! - `EquipmentChanged` notifies the presentation layer
//!
//! **Backpack lifecycle:**
//! - Equip → container grows to base + bonus
//! - Drop / swap → container shrinks (compaction first, overflow drops)

use bevy::prelude::*;

pub mod events;
pub mod systems;

// Re-exports
pub use events::*;
pub use systems::*;

/// Equipment plugin
pub struct EquipmentPlugin;

impl Plugin for EquipmentPlugin {
    fn build(&self, app: &mut App) {
        app
            // Events
            .add_event::<EquipFromSlotIntent>()
            .add_event::<DropEquipmentIntent>()
            .add_event::<EquipmentChanged>()
            // Systems (after the inventory intents of the same frame)
            .add_systems(
                Update,
                (process_equip_intents, process_drop_equipment_intents)
                    .chain()
                    .after(crate::inventory::process_cancel_consumption)
                    .in_set(crate::SimulationSet::Inventory),
            );
    }
}
