//! Error taxonomy for player-state operations
//!
//! Every variant is local and recoverable: the operation that returns it has
//! not mutated anything. Surfacing the condition is up to the caller (UI).

use thiserror::Error;

use crate::item_system::ItemId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InventoryError {
    /// Slot index outside `0..len` (container and quick bar alike).
    #[error("slot {slot} is out of range (len {len})")]
    InvalidSlotIndex { slot: usize, len: usize },

    /// Item kind does not fit the requested slot / operation.
    #[error("item {item} cannot be used as {expected}")]
    TypeMismatch { item: ItemId, expected: &'static str },

    /// Required resource (ammo) is missing from the container.
    #[error("missing required item {item}")]
    InsufficientResource { item: ItemId },

    /// Consumable effect the completion step does not handle.
    #[error("consumable {item} has an unsupported effect")]
    UnsupportedItemVariant { item: ItemId },

    /// Weapon class the attack dispatch does not handle.
    #[error("weapon {item} has an unsupported class")]
    UnsupportedWeaponVariant { item: ItemId },

    /// Operand is the empty sentinel (or the slot is empty).
    #[error("operation on an empty item")]
    EmptyOperand,

    #[error("another consumable is already being used")]
    ConsumptionInProgress,

    #[error("weapon is on cooldown")]
    AttackOnCooldown,

    /// Pickup is farther than the loot radius.
    #[error("pickup is {distance:.1}m away")]
    OutOfReach { distance: f32 },

    /// Remote projections are read-only.
    #[error("entity is a remote projection")]
    RemoteEntity,
}

/// Catalog / config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse RON: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{field} = {value} is out of range {range}")]
    OutOfRange {
        field: &'static str,
        value: String,
        range: &'static str,
    },

    #[error("duplicate item id {0}")]
    DuplicateItem(ItemId),

    #[error("item {item} references unknown ammo {ammo}")]
    UnknownAmmo { item: ItemId, ammo: ItemId },
}
