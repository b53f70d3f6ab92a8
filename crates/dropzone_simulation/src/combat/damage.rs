//! Damage application
//!
//! `DamageDealt` is a request (melee hit, projectile hit). `apply_damage`
//! resolves it against the target's `Vitals`:
//! - armor defense is subtracted first (flat reduction)
//! - the shield absorbs before health
//! - a channeling consumable is interrupted (player config)
//! - lethal hits mark the target `Dead` and emit `EntityDied`

use bevy::prelude::*;

use crate::components::{DamageOutcome, Vitals};
use crate::inventory::ConsumptionFinished;
use crate::item_system::DamageType;
use crate::logger::{log, log_info};
use crate::player::Player;
use crate::replication::NetworkRole;

/// Damage request
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DamageDealt {
    pub attacker: Option<Entity>,
    pub target: Entity,
    pub amount: f32,
    pub damage_type: DamageType,
}

/// Damage actually applied (UI, sounds, effects)
#[derive(Event, Debug, Clone)]
pub struct DamageApplied {
    pub attacker: Option<Entity>,
    pub target: Entity,
    pub outcome: DamageOutcome,
}

/// Entity died (health reached 0)
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Marker: entity is dead. Corpses stay in place.
#[derive(Component, Debug)]
pub struct Dead;

/// System: apply incoming damage requests.
pub fn apply_damage(
    mut commands: Commands,
    mut incoming: EventReader<DamageDealt>,
    mut targets: Query<(&mut Vitals, Option<&mut Player>), Without<Dead>>,
    mut applied: EventWriter<DamageApplied>,
    mut died: EventWriter<EntityDied>,
    mut consumption: EventWriter<ConsumptionFinished>,
) {
    for hit in incoming.read() {
        let Ok((mut vitals, player)) = targets.get_mut(hit.target) else {
            // Dead or not damageable
            continue;
        };

        let mut defense = 0.0;
        if let Some(mut player) = player {
            // Remote vitals come from the owner's snapshots
            if player.role() == NetworkRole::Remote {
                continue;
            }
            defense = player.equipment().defense();
            if let Some(outcome) = player.on_damaged() {
                consumption.write(ConsumptionFinished {
                    player: hit.target,
                    outcome,
                });
            }
        }

        let outcome = vitals.take_damage(hit.amount, defense);
        log(&format!(
            "💥 {:?} → {:?}: {:.0} {:?} (shield -{:.0}, health -{:.0})",
            hit.attacker, hit.target, hit.amount, hit.damage_type, outcome.shield_lost, outcome.health_lost
        ));

        applied.write(DamageApplied {
            attacker: hit.attacker,
            target: hit.target,
            outcome,
        });

        if outcome.died {
            commands.entity(hit.target).insert(Dead);
            died.write(EntityDied {
                entity: hit.target,
                killer: hit.attacker,
            });
            log_info(&format!("☠️ Entity {:?} killed by {:?}", hit.target, hit.attacker));
        }
    }
}
