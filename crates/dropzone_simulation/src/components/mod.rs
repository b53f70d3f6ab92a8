//! ECS Components for game entities
//!
//! Organized by domain:
//! - actor: vitals and hurtbox (Vitals, Hurtbox)
//! - container: slot-based item storage (ItemContainer)
//! - quick_bar: rapid-use bindings into the container (QuickBar)
//! - equipment: weapon / armor / backpack slots (Equipment, EquipSlot)
//! - world: pickups and projectiles living in the world (WorldItem, Projectile)

pub mod actor;
pub mod container;
pub mod equipment;
pub mod quick_bar;
pub mod world;

#[cfg(test)]
mod container_tests;

// Re-exports for convenient imports
pub use actor::*;
pub use container::*;
pub use equipment::*;
pub use quick_bar::*;
pub use world::*;
