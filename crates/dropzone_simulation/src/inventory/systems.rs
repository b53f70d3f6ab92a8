//! Inventory system implementations
//!
//! # Systems
//!
//! **Pickups:**
//! - `process_loot_intents`: explicit loot within `loot_radius`
//! - `auto_loot_pickups`: walk-over loot (loot spawns only)
//!
//! **Container / quick bar:**
//! - `process_drop_intents`
//! - `process_quick_bar_intents`: assign / clear bindings
//! - `process_use_intents`: quick bar hotkeys and container clicks
//!
//! **Consumption:**
//! - `process_cancel_consumption`
//! - `tick_consumption`: completes channels, applies the effect to `Vitals`

use bevy::prelude::*;

use crate::combat::Dead;
use crate::components::{Vitals, WorldItem};
use crate::ecs_world::WorldOutput;
use crate::error::InventoryError;
use crate::inventory::events::*;
use crate::logger::{log, log_error, log_warning};
use crate::player::{CancelReason, Player, UseOutcome};
use crate::replication::NetworkRole;

// ============================================================================
// Loot
// ============================================================================

/// Process explicit loot intents
pub fn process_loot_intents(
    mut commands: Commands,
    mut intents: EventReader<LootIntent>,
    mut players: Query<&mut Player, Without<Dead>>,
    mut pickups: Query<(&mut WorldItem, &Transform)>,
    mut output: WorldOutput,
) {
    for intent in intents.read() {
        let Ok(mut player) = players.get_mut(intent.player) else {
            log_error(&format!("LootIntent: {:?} is not a living player", intent.player));
            continue;
        };
        let Ok((mut pickup, transform)) = pickups.get_mut(intent.pickup) else {
            log_warning(&format!("LootIntent: pickup {:?} is gone", intent.pickup));
            continue;
        };

        if player.role() == NetworkRole::Remote {
            output.reject(intent.player, InventoryError::RemoteEntity);
            continue;
        }

        let distance = horizontal_distance(player.position(), transform.translation);
        if distance > player.config().loot_radius {
            output.reject(intent.player, InventoryError::OutOfReach { distance });
            continue;
        }

        loot_pickup(&mut commands, &mut output, intent.player, &mut player, intent.pickup, &mut pickup);
    }
}

/// Collect auto-loot pickups the owned players stand on
pub fn auto_loot_pickups(
    mut commands: Commands,
    mut players: Query<(Entity, &mut Player), Without<Dead>>,
    mut pickups: Query<(Entity, &mut WorldItem, &Transform)>,
    mut output: WorldOutput,
) {
    for (entity, mut player) in players.iter_mut() {
        if player.role() != NetworkRole::Owner {
            continue;
        }
        let radius = player.config().auto_loot_radius;

        for (pickup_entity, mut pickup, transform) in pickups.iter_mut() {
            if !pickup.allow_auto_loot || pickup.item.is_empty() {
                continue;
            }
            if horizontal_distance(player.position(), transform.translation) > radius {
                continue;
            }

            loot_pickup(&mut commands, &mut output, entity, &mut player, pickup_entity, &mut pickup);
        }
    }
}

/// Move a pickup's item into the player. The pickup keeps what did not fit
/// and is despawned once empty.
fn loot_pickup(
    commands: &mut Commands,
    output: &mut WorldOutput,
    entity: Entity,
    player: &mut Player,
    pickup_entity: Entity,
    pickup: &mut WorldItem,
) {
    let item = pickup.item.take();
    let before = item.stack();

    let Some(remainder) = output.run(commands, entity, player, |player, world| Ok(player.loot_item(item, world)))
    else {
        return;
    };

    if remainder.is_empty() {
        commands.entity(pickup_entity).despawn();
        return;
    }

    if remainder.stack() == before {
        log(&format!("🎒 {:?}: no room for {}", entity, remainder.name()));
    }
    pickup.item = remainder;
}

fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}

// ============================================================================
// Drop
// ============================================================================

/// Process drop intents (container slot → world pickup)
pub fn process_drop_intents(
    mut commands: Commands,
    mut intents: EventReader<DropItemsIntent>,
    mut players: Query<&mut Player, Without<Dead>>,
    mut output: WorldOutput,
) {
    for intent in intents.read() {
        let Ok(mut player) = players.get_mut(intent.player) else {
            log_error(&format!("DropItemsIntent: {:?} is not a living player", intent.player));
            continue;
        };

        output.run(&mut commands, intent.player, &mut player, |player, world| {
            player.drop_items_at_slot(intent.slot, intent.count, world)
        });
    }
}

// ============================================================================
// Quick bar
// ============================================================================

/// Process quick bar assign / clear intents
pub fn process_quick_bar_intents(
    mut commands: Commands,
    mut assigns: EventReader<AssignQuickBarIntent>,
    mut clears: EventReader<ClearQuickBarIntent>,
    mut players: Query<&mut Player>,
    mut output: WorldOutput,
) {
    for intent in assigns.read() {
        let Ok(mut player) = players.get_mut(intent.player) else {
            log_error(&format!("AssignQuickBarIntent: {:?} has no Player", intent.player));
            continue;
        };

        output.run(&mut commands, intent.player, &mut player, |player, world| {
            player.assign_item_to_quick_bar(intent.slot, intent.container_slot, world)
        });
    }

    for intent in clears.read() {
        let Ok(mut player) = players.get_mut(intent.player) else {
            log_error(&format!("ClearQuickBarIntent: {:?} has no Player", intent.player));
            continue;
        };

        output.run(&mut commands, intent.player, &mut player, |player, world| {
            player.clear_quick_bar_slot(intent.slot, world)
        });
    }
}

// ============================================================================
// Use
// ============================================================================

/// Process item use (quick bar hotkeys first, then container clicks)
pub fn process_use_intents(
    mut commands: Commands,
    time: Res<Time>,
    mut hotkeys: EventReader<UseQuickBarIntent>,
    mut clicks: EventReader<UseContainerSlotIntent>,
    mut players: Query<&mut Player, Without<Dead>>,
    mut output: WorldOutput,
) {
    let now = time.elapsed_secs_f64();

    for intent in hotkeys.read() {
        let Ok(mut player) = players.get_mut(intent.player) else {
            log_error(&format!("UseQuickBarIntent: {:?} is not a living player", intent.player));
            continue;
        };

        let outcome = output.run(&mut commands, intent.player, &mut player, |player, world| {
            player.use_item_at_quick_bar(intent.slot, now, world)
        });
        log_use(intent.player, outcome);
    }

    for intent in clicks.read() {
        let Ok(mut player) = players.get_mut(intent.player) else {
            log_error(&format!("UseContainerSlotIntent: {:?} is not a living player", intent.player));
            continue;
        };

        let outcome = output.run(&mut commands, intent.player, &mut player, |player, world| {
            player.use_item_at_container(intent.slot, now, world)
        });
        log_use(intent.player, outcome);
    }
}

fn log_use(player: Entity, outcome: Option<UseOutcome>) {
    match outcome {
        Some(UseOutcome::Consuming { ends_at }) => {
            log(&format!("🧪 {:?} consuming until t={:.2}", player, ends_at));
        }
        Some(UseOutcome::Equipped(slot)) => {
            log(&format!("✅ {:?} equipped {:?}", player, slot));
        }
        None => {}
    }
}

// ============================================================================
// Consumption
// ============================================================================

/// Process explicit cancel requests
pub fn process_cancel_consumption(
    mut intents: EventReader<CancelConsumptionIntent>,
    mut players: Query<&mut Player>,
    mut output: WorldOutput,
) {
    for intent in intents.read() {
        let Ok(mut player) = players.get_mut(intent.player) else {
            log_error(&format!("CancelConsumptionIntent: {:?} has no Player", intent.player));
            continue;
        };

        match player.cancel_consumption(CancelReason::Explicit) {
            Some(outcome) => output.consumption_finished(intent.player, outcome),
            None => log(&format!("{:?}: nothing to cancel", intent.player)),
        }
    }
}

/// Advance running consumptions; completed ones restore `Vitals`
pub fn tick_consumption(
    mut commands: Commands,
    time: Res<Time>,
    mut players: Query<(Entity, &mut Player, &mut Vitals), Without<Dead>>,
    mut output: WorldOutput,
) {
    let now = time.elapsed_secs_f64();

    for (entity, mut player, mut vitals) in players.iter_mut() {
        if !player.is_consuming() {
            continue;
        }

        let finished = output
            .run(&mut commands, entity, &mut player, |player, world| {
                Ok(player.tick_consumption(now, &mut vitals, world))
            })
            .flatten();

        if let Some(outcome) = finished {
            output.consumption_finished(entity, outcome);
        }
    }
}
