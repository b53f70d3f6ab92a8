//! Dropzone Simulation Core
//!
//! Headless player-state simulation on Bevy 0.16: inventory, quick bar,
//! equipment, consumables and combat dispatch for a drop-in arena shooter.
//!
//! # Architecture
//!
//! - `player::Player` is the aggregate (pure component + methods); its side
//!   effects go through the traits in `collaborators`
//! - `ecs_world::EcsWorld` realizes those traits on top of Bevy
//! - Plugins translate intent events into `Player` operations
//!
//! ```text
//! Update:
//!   SimulationSet::Movement     MoveIntent, kinematics, pose sync, pickup settling
//!   SimulationSet::Inventory    loot / drop / quick bar / use / equip intents
//!   SimulationSet::Combat       AttackIntent, projectiles, damage
//!   SimulationSet::Consumption  channel completion → Vitals
//!   SimulationSet::Replication  vitals snapshots (owner → remote)
//! ```

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Public modules
pub mod collaborators;
pub mod combat;
pub mod components;
pub mod config;
pub mod ecs_world;
pub mod equipment;
pub mod error;
pub mod inventory;
pub mod item_system;
pub mod logger;
pub mod movement;
pub mod player;
pub mod replication;

// Re-exports
pub use combat::{AttackIntent, CombatPlugin, DamageApplied, DamageDealt, Dead, EntityDied, ProjectilePool};
pub use components::*;
pub use config::{MeleeSweepConfig, PlayerConfig};
pub use ecs_world::{spawn_player, spawn_remote_player, spawn_world_item, EcsWorld, WorldOutput};
pub use equipment::{DropEquipmentIntent, EquipFromSlotIntent, EquipmentChanged, EquipmentPlugin};
pub use error::{ConfigError, InventoryError};
pub use inventory::{
    ActionRejected, AssignQuickBarIntent, CancelConsumptionIntent, ClearQuickBarIntent, ConsumptionFinished,
    DropItemsIntent, InventoryChanged, InventoryPlugin, LootIntent, QuickBarChanged, UseContainerSlotIntent,
    UseQuickBarIntent,
};
pub use item_system::{DamageType, Item, ItemCatalog, ItemData, ItemId, ItemKind, ItemUid};
pub use logger::{
    init_logger, log, log_error, log_info, log_level, log_warning, log_with_level, set_log_level, set_logger,
    set_logger_if_needed, LogLevel, LogPrinter,
};
pub use movement::{MoveIntent, MovementPlugin};
pub use player::{CancelReason, ConsumptionOutcome, ConsumptionState, Player, UseOutcome};
pub use replication::{NetworkRole, ReplicationPlugin, VitalsSnapshot};

/// Frame phases, configured in this order
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Movement,
    Inventory,
    Combat,
    Consumption,
    Replication,
}

/// Main simulation plugin (all subsystems)
///
/// Resources default unless inserted beforehand: `ItemCatalog`,
/// `PlayerConfig`, `DeterministicRng` (seed 42).
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.init_resource::<ItemCatalog>()
            .init_resource::<PlayerConfig>()
            .configure_sets(
                Update,
                (
                    SimulationSet::Movement,
                    SimulationSet::Inventory,
                    SimulationSet::Combat,
                    SimulationSet::Consumption,
                    SimulationSet::Replication,
                )
                    .chain(),
            )
            .add_plugins((
                MovementPlugin,
                InventoryPlugin,
                EquipmentPlugin,
                CombatPlugin,
                ReplicationPlugin,
            ));
    }
}

/// Deterministic RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Minimal Bevy App for headless simulation (add `SimulationPlugin` on top)
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins).insert_resource(DeterministicRng::new(seed));

    app
}

/// Snapshot of every `T` for determinism comparisons (entity order, Debug text)
pub fn world_snapshot<T: Component + std::fmt::Debug>(world: &mut World) -> Vec<u8> {
    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();
    entities.sort_by_key(|(entity, _)| entity.index());

    let mut snapshot = Vec::new();
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }
    snapshot
}
