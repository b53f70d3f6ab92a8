//! Equipment system implementations
//!
//! # Systems
//!
//! - `process_equip_intents`: container slot → equip slot
//! - `process_drop_equipment_intents`: equip slot → world pickup

use bevy::prelude::*;

use crate::combat::Dead;
use crate::ecs_world::WorldOutput;
use crate::equipment::events::*;
use crate::logger::{log, log_error};
use crate::player::Player;

/// Process equip intents
pub fn process_equip_intents(
    mut commands: Commands,
    mut intents: EventReader<EquipFromSlotIntent>,
    mut players: Query<&mut Player, Without<Dead>>,
    mut output: WorldOutput,
) {
    for intent in intents.read() {
        let Ok(mut player) = players.get_mut(intent.player) else {
            log_error(&format!("EquipFromSlotIntent: {:?} is not a living player", intent.player));
            continue;
        };

        let equipped = output.run(&mut commands, intent.player, &mut player, |player, world| {
            player.equip_from_container(intent.slot, world)
        });
        if let Some(slot) = equipped {
            log(&format!("✅ {:?} equipped {} slot", intent.player, slot.as_str()));
        }
    }
}

/// Process drop-equipment intents
pub fn process_drop_equipment_intents(
    mut commands: Commands,
    mut intents: EventReader<DropEquipmentIntent>,
    mut players: Query<&mut Player, Without<Dead>>,
    mut output: WorldOutput,
) {
    for intent in intents.read() {
        let Ok(mut player) = players.get_mut(intent.player) else {
            log_error(&format!("DropEquipmentIntent: {:?} is not a living player", intent.player));
            continue;
        };

        output.run(&mut commands, intent.player, &mut player, |player, world| {
            player.drop_equipped(intent.slot, world)
        });
    }
}
