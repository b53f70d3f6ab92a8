//! ECS realization of the player collaborators
//!
//! # Architecture
//!
//! `EcsWorld` is built per intent inside a system and handed to the `Player`
//! methods. It spawns pickups through `Commands` right away (so the caller gets
//! an `Entity` handle) and buffers every other effect in `WorldEffects`.
//! After the call the system flushes the buffer through `WorldOutput`:
//!
//! ```text
//! intent → EcsWorld (Commands + hurtbox snapshot)
//!        → Player::op(..., &mut world)
//!        → world.finish() → WorldOutput::flush
//!             dropped  → Velocity impulse (DeterministicRng)
//!             damage   → DamageDealt
//!             shots    → ProjectilePool::fire
//!             notices  → InventoryChanged / QuickBarChanged / EquipmentChanged
//! ```

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::collaborators::{
    DamageSink, InventoryNotice, InventoryNotifier, ItemSpawner, ProjectileLauncher, ProjectileShot, SpatialQuery,
};
use crate::combat::melee::ray_sphere_distance;
use crate::combat::projectile::{ProjectilePool, ShotRequest};
use crate::combat::DamageDealt;
use crate::components::{Hurtbox, Velocity, Vitals, WorldItem};
use crate::config::PlayerConfig;
use crate::equipment::EquipmentChanged;
use crate::error::InventoryError;
use crate::inventory::{ActionRejected, ConsumptionFinished, InventoryChanged, QuickBarChanged};
use crate::item_system::{DamageType, Item};
use crate::logger::log_warning;
use crate::player::{ConsumptionOutcome, Player};
use crate::DeterministicRng;

// ============================================================================
// Hurtbox snapshot
// ============================================================================

/// Damageable sphere captured for ray queries
#[derive(Debug, Clone, Copy)]
pub struct HurtboxTarget {
    pub entity: Entity,
    pub center: Vec3,
    pub radius: f32,
}

/// Capture every hurtbox in the world.
pub fn snapshot_hurtboxes<'a>(
    hurtboxes: impl Iterator<Item = (Entity, &'a Transform, &'a Hurtbox)>,
) -> Vec<HurtboxTarget> {
    hurtboxes
        .map(|(entity, transform, hurtbox)| HurtboxTarget {
            entity,
            center: hurtbox.center(transform.translation),
            radius: hurtbox.radius,
        })
        .collect()
}

/// Nearest hurtbox hit by a ray, never `ignore` itself.
pub fn nearest_hurtbox(
    targets: &[HurtboxTarget],
    ignore: Entity,
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
) -> Option<(Entity, f32)> {
    targets
        .iter()
        .filter(|target| target.entity != ignore)
        .filter_map(|target| {
            ray_sphere_distance(origin, direction, target.center, target.radius, max_distance)
                .map(|distance| (target.entity, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

// ============================================================================
// EcsWorld
// ============================================================================

/// Effects buffered during one player operation
#[derive(Debug, Default)]
pub struct WorldEffects {
    pub dropped: Vec<Entity>,
    pub damage: Vec<DamageDealt>,
    pub shots: Vec<ShotRequest>,
    pub notices: Vec<InventoryNotice>,
}

pub struct EcsWorld<'a, 'w, 's> {
    owner: Entity,
    commands: &'a mut Commands<'w, 's>,
    hurtboxes: &'a [HurtboxTarget],
    effects: WorldEffects,
}

impl<'a, 'w, 's> EcsWorld<'a, 'w, 's> {
    pub fn new(owner: Entity, commands: &'a mut Commands<'w, 's>, hurtboxes: &'a [HurtboxTarget]) -> Self {
        Self {
            owner,
            commands,
            hurtboxes,
            effects: WorldEffects::default(),
        }
    }

    pub fn finish(self) -> WorldEffects {
        self.effects
    }
}

impl ItemSpawner for EcsWorld<'_, '_, '_> {
    type Handle = Entity;

    fn spawn_dropped_item(&mut self, item: Item, position: Vec3) -> Option<Entity> {
        if item.is_empty() {
            return None;
        }
        let entity = spawn_world_item(self.commands, item, position, false);
        self.effects.dropped.push(entity);
        Some(entity)
    }
}

impl DamageSink<Entity> for EcsWorld<'_, '_, '_> {
    fn take_damage(&mut self, target: Entity, amount: f32, damage_type: DamageType) {
        self.effects.damage.push(DamageDealt {
            attacker: Some(self.owner),
            target,
            amount,
            damage_type,
        });
    }
}

impl SpatialQuery for EcsWorld<'_, '_, '_> {
    type Target = Entity;

    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<Entity> {
        nearest_hurtbox(self.hurtboxes, self.owner, origin, direction, max_distance).map(|(entity, _)| entity)
    }
}

impl ProjectileLauncher for EcsWorld<'_, '_, '_> {
    fn launch_projectile(&mut self, origin: Vec3, direction: Vec3, shot: ProjectileShot) {
        self.effects.shots.push(ShotRequest {
            shooter: self.owner,
            origin,
            direction,
            shot,
        });
    }
}

impl InventoryNotifier for EcsWorld<'_, '_, '_> {
    fn notify(&mut self, notice: InventoryNotice) {
        if !self.effects.notices.contains(&notice) {
            self.effects.notices.push(notice);
        }
    }
}

// ============================================================================
// WorldOutput
// ============================================================================

/// Writers the buffered effects end up in
#[derive(SystemParam)]
pub struct WorldOutput<'w> {
    rng: ResMut<'w, DeterministicRng>,
    pool: ResMut<'w, ProjectilePool>,
    damage: EventWriter<'w, DamageDealt>,
    inventory_changed: EventWriter<'w, InventoryChanged>,
    quick_bar_changed: EventWriter<'w, QuickBarChanged>,
    equipment_changed: EventWriter<'w, EquipmentChanged>,
    consumption: EventWriter<'w, ConsumptionFinished>,
    rejected: EventWriter<'w, ActionRejected>,
}

impl WorldOutput<'_> {
    /// Simulation RNG (unarmed damage rolls, drop impulses)
    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng.rng
    }

    pub fn flush(&mut self, commands: &mut Commands, player: Entity, drop_force: f32, effects: WorldEffects) {
        for entity in effects.dropped {
            let impulse = drop_impulse(&mut self.rng.rng, drop_force);
            commands.entity(entity).insert(Velocity { linear: impulse });
        }

        for damage in effects.damage {
            self.damage.write(damage);
        }

        for request in effects.shots {
            self.pool.fire(commands, request);
        }

        for notice in effects.notices {
            match notice {
                InventoryNotice::InventoryChanged => {
                    self.inventory_changed.write(InventoryChanged { player });
                }
                InventoryNotice::QuickBarChanged => {
                    self.quick_bar_changed.write(QuickBarChanged { player });
                }
                InventoryNotice::EquipmentChanged => {
                    self.equipment_changed.write(EquipmentChanged { player });
                }
            }
        }
    }

    /// Run one player operation against a fresh `EcsWorld`, flush its
    /// effects and surface a failure as `ActionRejected`.
    pub fn run<T>(
        &mut self,
        commands: &mut Commands,
        entity: Entity,
        player: &mut Player,
        op: impl FnOnce(&mut Player, &mut EcsWorld<'_, '_, '_>) -> Result<T, InventoryError>,
    ) -> Option<T> {
        let mut world = EcsWorld::new(entity, commands, &[]);
        let result = op(player, &mut world);
        let effects = world.finish();
        self.flush(commands, entity, player.config().drop_force, effects);

        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.reject(entity, error);
                None
            }
        }
    }

    pub fn consumption_finished(&mut self, player: Entity, outcome: ConsumptionOutcome) {
        self.consumption.write(ConsumptionFinished { player, outcome });
    }

    /// Surface a recoverable failure to the presentation layer.
    pub fn reject(&mut self, player: Entity, error: InventoryError) {
        log_warning(&format!("Player {:?}: {}", player, error));
        self.rejected.write(ActionRejected { player, error });
    }
}

/// Push of `force` magnitude in a random horizontal direction, tilted up
/// (rise 0.5 per unit of horizontal run before normalization).
pub fn drop_impulse(rng: &mut impl Rng, force: f32) -> Vec3 {
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    Vec3::new(angle.cos(), DROP_LIFT, angle.sin()).normalize() * force
}

const DROP_LIFT: f32 = 0.5;

// ============================================================================
// Spawning
// ============================================================================

/// Spawn a pickup. Loot spawns allow auto-loot, player drops do not.
pub fn spawn_world_item(commands: &mut Commands, item: Item, position: Vec3, allow_auto_loot: bool) -> Entity {
    commands
        .spawn((
            WorldItem { item, allow_auto_loot },
            Transform::from_translation(position),
            Velocity::default(),
        ))
        .id()
}

/// Spawn an owned player with full health and the configured starting shield.
pub fn spawn_player(commands: &mut Commands, config: &PlayerConfig, position: Vec3) -> Entity {
    commands
        .spawn((
            Player::new(config),
            Vitals::new(config.max_health, config.max_shield).with_shield(config.starting_shield),
            Hurtbox::default(),
            Transform::from_translation(position),
        ))
        .id()
}

/// Spawn a read-only projection of a player owned elsewhere.
pub fn spawn_remote_player(commands: &mut Commands, config: &PlayerConfig, position: Vec3) -> Entity {
    commands
        .spawn((
            Player::remote(config),
            Vitals::new(config.max_health, config.max_shield),
            Hurtbox::default(),
            Transform::from_translation(position),
        ))
        .id()
}
