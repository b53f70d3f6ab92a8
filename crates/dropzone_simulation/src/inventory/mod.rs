//! Inventory module: loot, drops, quick bar, item use, consumption
//!
//! # Architecture
//!
//! **Events → Systems flow:**
//! - Input layer emits intent events (`LootIntent`, `UseQuickBarIntent`, ...)
//! - Systems run the matching `Player` operation through `EcsWorld`
//! - Notices (`InventoryChanged`, `QuickBarChanged`, `ConsumptionFinished`,
//!   `ActionRejected`) go back to the presentation layer
//!
//! **Consumption lifecycle:**
//! ```text
//! UseQuickBarIntent → Channeling ──tick_consumption──► Completed (Vitals restored)
//!                          │
//!                          ├─ CancelConsumptionIntent ─► Cancelled(Explicit)
//!                          ├─ DamageDealt ─────────────► Cancelled(Damaged)
//!                          └─ AttackIntent ────────────► Cancelled(Attacked)
//! ```

use bevy::prelude::*;

pub mod events;
pub mod systems;

// Re-exports
pub use events::*;
pub use systems::*;

/// Inventory plugin
pub struct InventoryPlugin;

impl Plugin for InventoryPlugin {
    fn build(&self, app: &mut App) {
        app
            // Intents
            .add_event::<LootIntent>()
            .add_event::<DropItemsIntent>()
            .add_event::<AssignQuickBarIntent>()
            .add_event::<ClearQuickBarIntent>()
            .add_event::<UseQuickBarIntent>()
            .add_event::<UseContainerSlotIntent>()
            .add_event::<CancelConsumptionIntent>()
            // Notices
            .add_event::<InventoryChanged>()
            .add_event::<QuickBarChanged>()
            .add_event::<ConsumptionFinished>()
            .add_event::<ActionRejected>()
            .add_systems(
                Update,
                (
                    process_loot_intents,
                    auto_loot_pickups,
                    process_drop_intents,
                    process_quick_bar_intents,
                    process_use_intents,
                    process_cancel_consumption,
                )
                    .chain()
                    .in_set(crate::SimulationSet::Inventory),
            )
            .add_systems(Update, tick_consumption.in_set(crate::SimulationSet::Consumption));
    }
}
