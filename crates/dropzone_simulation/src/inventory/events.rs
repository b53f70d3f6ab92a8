//! Inventory events
//!
//! # Architecture
//!
//! **Intents** (input layer → ECS):
//! - `LootIntent` → pick up a world item
//! - `DropItemsIntent` → drop units from a container slot
//! - `AssignQuickBarIntent` / `ClearQuickBarIntent` → quick bar bindings
//! - `UseQuickBarIntent` / `UseContainerSlotIntent` → consume or equip
//! - `CancelConsumptionIntent` → abort the running channel
//!
//! **Notices** (ECS → presentation layer):
//! - `InventoryChanged`, `QuickBarChanged`
//! - `ConsumptionFinished` (completed or cancelled)
//! - `ActionRejected` (recoverable error for the UI)

use bevy::prelude::*;

use crate::error::InventoryError;
use crate::player::ConsumptionOutcome;

// ============================================================================
// Intents
// ============================================================================

/// Pick up `pickup` (an entity with `WorldItem`)
#[derive(Event, Clone, Debug)]
pub struct LootIntent {
    pub player: Entity,
    pub pickup: Entity,
}

#[derive(Event, Clone, Debug)]
pub struct DropItemsIntent {
    pub player: Entity,
    pub slot: usize,
    pub count: u32,
}

/// Bind container slot `container_slot` to quick bar slot `slot`
#[derive(Event, Clone, Debug)]
pub struct AssignQuickBarIntent {
    pub player: Entity,
    pub slot: usize,
    pub container_slot: usize,
}

#[derive(Event, Clone, Debug)]
pub struct ClearQuickBarIntent {
    pub player: Entity,
    pub slot: usize,
}

/// Quick bar hotkey pressed
#[derive(Event, Clone, Debug)]
pub struct UseQuickBarIntent {
    pub player: Entity,
    pub slot: usize,
}

/// Item used straight from the container (inventory UI)
#[derive(Event, Clone, Debug)]
pub struct UseContainerSlotIntent {
    pub player: Entity,
    pub slot: usize,
}

#[derive(Event, Clone, Debug)]
pub struct CancelConsumptionIntent {
    pub player: Entity,
}

// ============================================================================
// Notices
// ============================================================================

#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct InventoryChanged {
    pub player: Entity,
}

#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuickBarChanged {
    pub player: Entity,
}

/// Channel ended (completed or cancelled)
#[derive(Event, Clone, Debug)]
pub struct ConsumptionFinished {
    pub player: Entity,
    pub outcome: ConsumptionOutcome,
}

/// Player action refused; nothing was mutated
#[derive(Event, Clone, Debug)]
pub struct ActionRejected {
    pub player: Entity,
    pub error: InventoryError,
}
