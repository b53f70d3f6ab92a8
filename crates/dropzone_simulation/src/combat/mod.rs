//! Combat module
//!
//! # Architecture
//!
//! The attack decision lives on the `Player` aggregate (`Player::attack_to`);
//! this module is the ECS side around it:
//! - `attack`: `AttackIntent` → `Player::attack_to` through `EcsWorld`
//! - `melee`: cone sweep geometry, ray vs hurtbox spheres
//! - `projectile`: pooled projectiles, flight and hits
//! - `damage`: `DamageDealt` → `Vitals` (armor, shield, death)
//!
//! ```text
//! AttackIntent → process_attack_intents ─┬─ melee hits ──────────────┐
//!                                        └─ ProjectilePool::fire      │
//!                                             ↓                       │
//!                                        advance_projectiles → DamageDealt
//!                                                                     ↓
//!                                                        apply_damage → DamageApplied / EntityDied
//! ```

use bevy::prelude::*;

pub mod attack;
pub mod damage;
pub mod melee;
pub mod projectile;

// Re-exports
pub use attack::{process_attack_intents, AttackIntent};
pub use damage::{apply_damage, DamageApplied, DamageDealt, Dead, EntityDied};
pub use projectile::{advance_projectiles, ProjectilePool, ShotRequest};

/// Combat plugin
///
/// Execution order (chained, `SimulationSet::Combat`):
/// 1. process_attack_intents: melee sweeps, shots fired
/// 2. advance_projectiles: flight + hits
/// 3. apply_damage: all DamageDealt of this frame
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AttackIntent>()
            .add_event::<DamageDealt>()
            .add_event::<DamageApplied>()
            .add_event::<EntityDied>()
            .init_resource::<ProjectilePool>()
            .add_systems(
                Update,
                (process_attack_intents, advance_projectiles, apply_damage)
                    .chain()
                    .in_set(crate::SimulationSet::Combat),
            );
    }
}
