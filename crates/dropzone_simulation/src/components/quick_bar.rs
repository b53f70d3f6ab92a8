//! QuickBar: rapid-use bindings to container items
//!
//! Slots hold item identities (`ItemUid`), not copies: the bound item lives in
//! the container and is resolved when the slot is used. An identity appears in
//! at most one slot.

use crate::error::InventoryError;
use crate::item_system::{Item, ItemUid};

#[derive(Debug, Clone)]
pub struct QuickBar {
    slots: Vec<Option<ItemUid>>,
}

impl QuickBar {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, slot: usize) -> Option<ItemUid> {
        self.slots.get(slot).copied().flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<ItemUid>> + '_ {
        self.slots.iter().copied()
    }

    /// Bind `item` to `slot`, clearing any other slot bound to the same item.
    ///
    /// Out-of-range slots are rejected like container slots are.
    pub fn assign(&mut self, slot: usize, item: &Item) -> Result<(), InventoryError> {
        if item.is_empty() {
            return Err(InventoryError::EmptyOperand);
        }
        if slot >= self.slots.len() {
            return Err(InventoryError::InvalidSlotIndex {
                slot,
                len: self.slots.len(),
            });
        }

        let uid = item.uid();
        for bound in self.slots.iter_mut() {
            if *bound == Some(uid) {
                *bound = None;
            }
        }
        self.slots[slot] = Some(uid);
        Ok(())
    }

    pub fn clear(&mut self, slot: usize) -> Result<(), InventoryError> {
        let len = self.slots.len();
        let bound = self
            .slots
            .get_mut(slot)
            .ok_or(InventoryError::InvalidSlotIndex { slot, len })?;
        *bound = None;
        Ok(())
    }

    /// Drop bindings whose item no longer satisfies `alive`.
    ///
    /// Returns `true` if any slot was cleared.
    pub fn retain(&mut self, mut alive: impl FnMut(ItemUid) -> bool) -> bool {
        let mut changed = false;
        for bound in self.slots.iter_mut() {
            if let Some(uid) = *bound {
                if !alive(uid) {
                    *bound = None;
                    changed = true;
                }
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item_system::ItemCatalog;

    fn kit(catalog: &ItemCatalog) -> Item {
        catalog.instantiate(&"healing_kit".into(), 1).unwrap()
    }

    #[test]
    fn test_assign_deduplicates() {
        let catalog = ItemCatalog::default();
        let item = kit(&catalog);
        let mut bar = QuickBar::new(4);

        bar.assign(0, &item).unwrap();
        bar.assign(2, &item).unwrap();

        assert_eq!(bar.get(0), None);
        assert_eq!(bar.get(2), Some(item.uid()));
        assert_eq!(bar.iter().flatten().count(), 1);
    }

    #[test]
    fn test_assign_rejects_empty() {
        let mut bar = QuickBar::new(4);
        assert_eq!(
            bar.assign(0, &Item::empty()),
            Err(InventoryError::EmptyOperand)
        );
    }

    #[test]
    fn test_assign_rejects_out_of_range() {
        let catalog = ItemCatalog::default();
        let item = kit(&catalog);
        let mut bar = QuickBar::new(4);

        assert_eq!(
            bar.assign(4, &item),
            Err(InventoryError::InvalidSlotIndex { slot: 4, len: 4 })
        );
        assert!(bar.iter().all(|slot| slot.is_none()));
    }

    #[test]
    fn test_uniqueness_after_many_assignments() {
        let catalog = ItemCatalog::default();
        let items: Vec<Item> = (0..3).map(|_| kit(&catalog)).collect();
        let mut bar = QuickBar::new(4);

        for (step, slot) in [0usize, 1, 2, 3, 1, 0, 2].into_iter().enumerate() {
            let item = &items[step % items.len()];
            bar.assign(slot, item).unwrap();

            let mut bound: Vec<_> = bar.iter().flatten().collect();
            let before = bound.len();
            bound.sort();
            bound.dedup();
            assert_eq!(bound.len(), before);
        }
    }

    #[test]
    fn test_retain_prunes_stale_bindings() {
        let catalog = ItemCatalog::default();
        let kept = kit(&catalog);
        let gone = kit(&catalog);
        let mut bar = QuickBar::new(2);
        bar.assign(0, &kept).unwrap();
        bar.assign(1, &gone).unwrap();

        let changed = bar.retain(|uid| uid == kept.uid());
        assert!(changed);
        assert_eq!(bar.get(0), Some(kept.uid()));
        assert_eq!(bar.get(1), None);
    }
}
