//! Consumable channeling
//!
//! `Idle -> Channeling -> {Completed | Cancelled}`. The channel is a stored
//! deadline advanced by `Player::tick_consumption(now)`; other actions keep
//! running while it is pending.

use std::sync::Arc;

use crate::collaborators::InventoryNotifier;
use crate::components::Vitals;
use crate::error::InventoryError;
use crate::item_system::{ConsumableEffect, Item, ItemData, ItemId, ItemUid};
use crate::logger::{log, log_error};

use super::{slot_item, Player};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumptionState {
    Idle,
    Channeling,
    Completed,
    Cancelled,
}

/// Why a channel ended without effect
#[derive(Debug, Clone, PartialEq)]
pub enum CancelReason {
    Explicit,
    Damaged,
    Attacked,
    /// The originating item left the container before completion.
    ItemLost,
    /// Completion failed (unsupported effect); nothing was applied.
    Failed(InventoryError),
}

/// What happened when a channel ended
#[derive(Debug, Clone, PartialEq)]
pub enum ConsumptionOutcome {
    Completed {
        item: ItemId,
        health_restored: f32,
        shield_restored: f32,
    },
    Cancelled {
        item: ItemId,
        reason: CancelReason,
    },
}

impl ConsumptionOutcome {
    /// Terminal state this outcome represents
    pub fn state(&self) -> ConsumptionState {
        match self {
            ConsumptionOutcome::Completed { .. } => ConsumptionState::Completed,
            ConsumptionOutcome::Cancelled { .. } => ConsumptionState::Cancelled,
        }
    }

    pub fn item(&self) -> &ItemId {
        match self {
            ConsumptionOutcome::Completed { item, .. } | ConsumptionOutcome::Cancelled { item, .. } => item,
        }
    }
}

/// One pending consumption
#[derive(Debug, Clone)]
pub struct ConsumptionProcess {
    item: ItemUid,
    data: Arc<ItemData>,
    started_at: f64,
    ends_at: f64,
    progress: f32,
}

impl ConsumptionProcess {
    /// Start channeling `item`. Fails with `TypeMismatch` for non-consumables.
    pub fn start(item: &Item, now: f64) -> Result<Self, InventoryError> {
        let data = item.data().ok_or(InventoryError::EmptyOperand)?;
        let consumable = data.as_consumable().ok_or_else(|| InventoryError::TypeMismatch {
            item: data.id.clone(),
            expected: "consumable",
        })?;

        Ok(Self {
            item: item.uid(),
            data: Arc::clone(data),
            started_at: now,
            ends_at: now + consumable.time_to_use.max(0.0) as f64,
            progress: 0.0,
        })
    }

    pub fn item(&self) -> ItemUid {
        self.item
    }

    pub fn item_id(&self) -> &ItemId {
        &self.data.id
    }

    pub fn started_at(&self) -> f64 {
        self.started_at
    }

    pub fn ends_at(&self) -> f64 {
        self.ends_at
    }

    /// Last progress computed by `advance`, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Recompute progress. Returns `true` once the deadline is reached
    /// (`now >= ends_at`, so a tick landing exactly on it completes).
    pub fn advance(&mut self, now: f64) -> bool {
        let duration = self.ends_at - self.started_at;
        self.progress = if duration <= 0.0 {
            1.0
        } else {
            ((now - self.started_at) / duration).clamp(0.0, 1.0) as f32
        };
        now >= self.ends_at
    }

    fn cancel(self, reason: CancelReason) -> ConsumptionOutcome {
        log(&format!("⛔ Consumption of {} cancelled ({:?})", self.data.id, reason));
        ConsumptionOutcome::Cancelled {
            item: self.data.id.clone(),
            reason,
        }
    }
}

impl Player {
    pub fn is_consuming(&self) -> bool {
        self.consumption.is_some()
    }

    pub fn consumption(&self) -> Option<&ConsumptionProcess> {
        self.consumption.as_ref()
    }

    pub fn consumption_state(&self) -> ConsumptionState {
        if self.consumption.is_some() {
            ConsumptionState::Channeling
        } else {
            ConsumptionState::Idle
        }
    }

    /// Start channeling the consumable in `slot`. Returns the completion time.
    pub(super) fn start_consumption(&mut self, slot: usize, now: f64) -> Result<f64, InventoryError> {
        if self.consumption.is_some() {
            return Err(InventoryError::ConsumptionInProgress);
        }

        let process = ConsumptionProcess::start(slot_item(&self.container, slot)?, now)?;
        let ends_at = process.ends_at();
        log(&format!(
            "⏳ Consuming {} (done at {:.2}s)",
            process.item_id(),
            ends_at
        ));
        self.consumption = Some(process);
        Ok(ends_at)
    }

    /// Abort the running channel without effect.
    pub fn cancel_consumption(&mut self, reason: CancelReason) -> Option<ConsumptionOutcome> {
        self.consumption.take().map(|process| process.cancel(reason))
    }

    /// Called when the player was hit.
    pub fn on_damaged(&mut self) -> Option<ConsumptionOutcome> {
        if self.config.cancel_consumption_on_damage {
            self.cancel_consumption(CancelReason::Damaged)
        } else {
            None
        }
    }

    /// Advance the channel. Returns the outcome once it ends.
    ///
    /// Completion applies the effect to `vitals` and removes one unit of the
    /// originating item (by identity, not by type).
    pub fn tick_consumption<W: InventoryNotifier>(
        &mut self,
        now: f64,
        vitals: &mut Vitals,
        world: &mut W,
    ) -> Option<ConsumptionOutcome> {
        let process = self.consumption.as_mut()?;
        if !process.advance(now) {
            return None;
        }

        let process = self.consumption.take()?;
        if !self.container.contains_uid(process.item()) {
            return Some(process.cancel(CancelReason::ItemLost));
        }

        let effect = process
            .data
            .as_consumable()
            .map(|consumable| consumable.effect.clone());
        let Some(effect) = effect else {
            return Some(process.cancel(CancelReason::ItemLost));
        };

        let (health, shield) = match effect {
            ConsumableEffect::HealingKit {
                health_restore,
                shield_restore,
            } => (health_restore, shield_restore),
            ConsumableEffect::Throwable { .. } => {
                let err = InventoryError::UnsupportedItemVariant {
                    item: process.item_id().clone(),
                };
                log_error(&format!("Consumption failed: {}", err));
                return Some(process.cancel(CancelReason::Failed(err)));
            }
        };

        let health_restored = vitals.heal(health);
        let shield_restored = vitals.restore_shield(shield);
        self.container.consume_one_of(process.item());

        log(&format!(
            "💊 Consumed {}: +{:.0} health, +{:.0} shield",
            process.item_id(),
            health_restored,
            shield_restored
        ));
        self.after_container_change(world);

        Some(ConsumptionOutcome::Completed {
            item: process.item_id().clone(),
            health_restored,
            shield_restored,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item_system::ItemCatalog;

    #[test]
    fn test_progress_is_clamped() {
        let catalog = ItemCatalog::default();
        let kit = catalog.instantiate(&"healing_kit".into(), 1).unwrap();
        let mut process = ConsumptionProcess::start(&kit, 10.0).unwrap();

        assert_eq!(process.ends_at(), 13.0);
        assert!(!process.advance(9.0));
        assert_eq!(process.progress(), 0.0);
        assert!(!process.advance(11.5));
        assert!((process.progress() - 0.5).abs() < 1e-6);
        assert!(process.advance(20.0));
        assert_eq!(process.progress(), 1.0);
    }

    #[test]
    fn test_completes_exactly_at_deadline() {
        let catalog = ItemCatalog::default();
        let kit = catalog.instantiate(&"healing_kit".into(), 1).unwrap();
        let mut process = ConsumptionProcess::start(&kit, 10.0).unwrap();

        assert!(!process.advance(12.999));
        assert!(process.advance(13.0));
        assert_eq!(process.progress(), 1.0);
    }

    #[test]
    fn test_start_rejects_non_consumable() {
        let catalog = ItemCatalog::default();
        let vest = catalog.instantiate(&"vest_light".into(), 1).unwrap();

        let err = ConsumptionProcess::start(&vest, 0.0).unwrap_err();
        assert!(matches!(err, InventoryError::TypeMismatch { expected: "consumable", .. }));
        assert_eq!(
            ConsumptionProcess::start(&Item::empty(), 0.0).unwrap_err(),
            InventoryError::EmptyOperand
        );
    }
}
