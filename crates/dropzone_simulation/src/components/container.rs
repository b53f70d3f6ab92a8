//! ItemContainer: slot-based player inventory
//!
//! # Invariants
//! - `slots.len() == capacity` at all times (empty slots hold the sentinel)
//! - every stack stays within `0..=max_stack`
//! - shrinking never destroys items: whatever does not fit is handed back
//!
//! Out-of-range slot indices (stale UI indices) are logged and ignored.

use crate::item_system::{Item, ItemId, ItemUid};
use crate::logger::log_warning;

#[derive(Debug)]
pub struct ItemContainer {
    slots: Vec<Item>,
}

impl ItemContainer {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: std::iter::repeat_with(Item::empty).take(capacity).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, slot: usize) -> Option<&Item> {
        self.slots.get(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.slots.iter()
    }

    /// Number of occupied slots
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|item| !item.is_empty()).count()
    }

    /// Sum of stacks of `id` across all slots
    pub fn count_of(&self, id: &ItemId) -> u32 {
        self.slots
            .iter()
            .filter(|item| item.is_kind_of(id))
            .map(Item::stack)
            .sum()
    }

    pub fn slot_of(&self, uid: ItemUid) -> Option<usize> {
        if uid == ItemUid::EMPTY {
            return None;
        }
        self.slots.iter().position(|item| item.uid() == uid)
    }

    pub fn contains_uid(&self, uid: ItemUid) -> bool {
        self.slot_of(uid).is_some()
    }

    /// Add a stack: fill partial stacks of the same type first (ascending
    /// slot order), then empty slots. Returns what did not fit (the empty
    /// sentinel when everything was stored).
    pub fn add_item(&mut self, mut item: Item) -> Item {
        if item.is_empty() {
            return item;
        }

        for slot in self.slots.iter_mut() {
            if item.is_empty() {
                break;
            }
            if slot.is_same_kind(&item) && slot.space_left() > 0 {
                slot.absorb(&mut item);
            }
        }

        while !item.is_empty() {
            let Some(slot) = self.slots.iter_mut().find(|slot| slot.is_empty()) else {
                break;
            };

            // Whole stack fits → keep its identity; otherwise split off a full stack.
            let max = item.max_stack();
            *slot = if item.stack() <= max {
                item.take()
            } else {
                item.split(max)
            };
        }

        item
    }

    /// Remove up to `count` units from `slot`.
    ///
    /// Out-of-range slots and empty slots yield the empty sentinel.
    pub fn subtract_items_at_slot(&mut self, slot: usize, count: u32) -> Item {
        let capacity = self.capacity();
        let Some(item) = self.slots.get_mut(slot) else {
            log_warning(&format!(
                "ItemContainer: slot {} out of range (capacity {})",
                slot, capacity
            ));
            return Item::empty();
        };

        item.split(count)
    }

    /// Undo a `subtract_items_at_slot`: refill `slot` (identity kept when the
    /// slot was emptied), returning what did not fit there.
    pub fn put_back(&mut self, slot: usize, mut item: Item) -> Item {
        let Some(target) = self.slots.get_mut(slot) else {
            return item;
        };

        if target.is_empty() {
            *target = item;
            return Item::empty();
        }
        target.absorb(&mut item);
        item
    }

    /// Remove one unit from the first slot holding `id`.
    pub fn consume_one(&mut self, id: &ItemId) -> Item {
        match self.slots.iter().position(|item| item.is_kind_of(id)) {
            Some(slot) => self.slots[slot].split(1),
            None => Item::empty(),
        }
    }

    /// Remove one unit from the item with identity `uid`.
    pub fn consume_one_of(&mut self, uid: ItemUid) -> Item {
        match self.slot_of(uid) {
            Some(slot) => self.slots[slot].split(1),
            None => Item::empty(),
        }
    }

    /// Change the number of slots.
    ///
    /// Growing appends empty slots. Shrinking first moves items out of the
    /// truncated tail into free slots below `new_capacity`, then returns
    /// whatever is left as overflow (in slot order) for the caller to drop.
    pub fn resize_capacity(&mut self, new_capacity: usize) -> Vec<Item> {
        let old_capacity = self.capacity();
        if new_capacity >= old_capacity {
            self.slots.resize_with(new_capacity, Item::empty);
            return Vec::new();
        }

        let mut overflow = Vec::new();
        let tail: Vec<Item> = self.slots.drain(new_capacity..).collect();

        for item in tail {
            if item.is_empty() {
                continue;
            }

            match self.slots.iter_mut().find(|slot| slot.is_empty()) {
                Some(free) => *free = item,
                None => overflow.push(item),
            }
        }

        overflow
    }

    /// First non-empty stack of `id`, or the sentinel.
    pub fn try_get_item(&self, id: &ItemId) -> &Item {
        static EMPTY: Item = Item::empty();
        self.slots
            .iter()
            .find(|item| item.is_kind_of(id))
            .unwrap_or(&EMPTY)
    }

    pub fn has_item(&self, id: &ItemId) -> bool {
        self.slots.iter().any(|item| item.is_kind_of(id))
    }
}
