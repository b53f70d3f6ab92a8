//! Tests for ItemContainer.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::components::container::ItemContainer;
    use crate::item_system::{Item, ItemData, ItemKind};

    fn stackable(id: &str, max_stack: u32) -> Arc<ItemData> {
        Arc::new(ItemData {
            id: id.into(),
            name: id.to_string(),
            rarity: Default::default(),
            max_stack,
            kind: ItemKind::Ammo,
        })
    }

    fn total_stack(container: &ItemContainer) -> u32 {
        container.iter().map(Item::stack).sum()
    }

    #[test]
    fn test_new_container_is_empty() {
        let container = ItemContainer::new(6);
        assert_eq!(container.capacity(), 6);
        assert_eq!(container.occupied(), 0);
        assert!(container.iter().all(Item::is_empty));
    }

    #[test]
    fn test_add_item_fills_partial_stack_first() {
        let type_a = stackable("a", 5);
        let mut container = ItemContainer::new(6);

        let rest = container.add_item(Item::new(Arc::clone(&type_a), 3));
        assert!(rest.is_empty());

        let rest = container.add_item(Item::new(type_a, 4));
        assert!(rest.is_empty());

        // 3 + 4 with max 5 → [5, 2]
        assert_eq!(container.get(0).unwrap().stack(), 5);
        assert_eq!(container.get(1).unwrap().stack(), 2);
        assert_eq!(container.occupied(), 2);
    }

    #[test]
    fn test_add_item_returns_remainder_when_full() {
        let type_a = stackable("a", 5);
        let mut container = ItemContainer::new(1);

        container.add_item(Item::new(Arc::clone(&type_a), 3));
        let rest = container.add_item(Item::new(type_a, 4));

        assert_eq!(container.get(0).unwrap().stack(), 5);
        assert_eq!(rest.stack(), 2);
    }

    #[test]
    fn test_add_item_never_mixes_kinds() {
        let mut container = ItemContainer::new(2);
        container.add_item(Item::new(stackable("a", 5), 1));
        container.add_item(Item::new(stackable("b", 5), 1));

        assert!(container.get(0).unwrap().is_kind_of(&"a".into()));
        assert!(container.get(1).unwrap().is_kind_of(&"b".into()));
    }

    #[test]
    fn test_add_item_keeps_identity_when_placed_whole() {
        let mut container = ItemContainer::new(2);
        let item = Item::new(stackable("a", 5), 2);
        let uid = item.uid();

        container.add_item(item);
        assert_eq!(container.slot_of(uid), Some(0));
    }

    #[test]
    fn test_stack_invariant_holds() {
        let type_a = stackable("a", 4);
        let mut container = ItemContainer::new(4);

        for stack in [1, 3, 4, 2, 4] {
            container.add_item(Item::new(Arc::clone(&type_a), stack));
        }

        for item in container.iter() {
            assert!(item.stack() <= 4);
        }
        assert_eq!(total_stack(&container), 14);
    }

    #[test]
    fn test_subtract_clamps_and_empties_slot() {
        let mut container = ItemContainer::new(2);
        container.add_item(Item::new(stackable("a", 5), 3));

        let removed = container.subtract_items_at_slot(0, 2);
        assert_eq!(removed.stack(), 2);
        assert_eq!(container.get(0).unwrap().stack(), 1);

        let removed = container.subtract_items_at_slot(0, 10);
        assert_eq!(removed.stack(), 1);
        assert!(container.get(0).unwrap().is_empty());
    }

    #[test]
    fn test_subtract_out_of_range_is_noop() {
        let mut container = ItemContainer::new(2);
        container.add_item(Item::new(stackable("a", 5), 3));

        let removed = container.subtract_items_at_slot(7, 1);
        assert!(removed.is_empty());
        assert_eq!(total_stack(&container), 3);
    }

    #[test]
    fn test_resize_grow_appends_empty_slots() {
        let mut container = ItemContainer::new(6);
        container.add_item(Item::new(stackable("a", 5), 3));

        let overflow = container.resize_capacity(8);
        assert!(overflow.is_empty());
        assert_eq!(container.capacity(), 8);
        assert_eq!(container.get(0).unwrap().stack(), 3);
    }

    #[test]
    fn test_resize_shrink_compacts_before_overflowing() {
        let mut container = ItemContainer::new(8);
        for id in ["a", "b", "c", "d", "e", "f", "g"] {
            container.add_item(Item::new(stackable(id, 1), 1));
        }
        // Free slot 2 so the tail item can move in
        container.subtract_items_at_slot(2, 1);
        assert_eq!(container.occupied(), 6);

        let overflow = container.resize_capacity(6);
        assert_eq!(container.capacity(), 6);
        assert!(overflow.is_empty());
        assert!(container.get(2).unwrap().is_kind_of(&"g".into()));
    }

    #[test]
    fn test_resize_shrink_returns_count_minus_capacity() {
        let mut container = ItemContainer::new(8);
        for id in ["a", "b", "c", "d", "e", "f", "g", "h"] {
            container.add_item(Item::new(stackable(id, 3), 2));
        }
        let before = total_stack(&container);

        let overflow = container.resize_capacity(6);
        assert_eq!(container.capacity(), 6);
        assert_eq!(overflow.len(), 2);
        assert!(overflow[0].is_kind_of(&"g".into()));
        assert!(overflow[1].is_kind_of(&"h".into()));

        let dropped: u32 = overflow.iter().map(Item::stack).sum();
        assert_eq!(dropped + total_stack(&container), before);
    }

    #[test]
    fn test_try_get_and_has_item() {
        let mut container = ItemContainer::new(3);
        container.add_item(Item::new(stackable("a", 5), 1));

        assert!(container.has_item(&"a".into()));
        assert!(!container.has_item(&"b".into()));
        assert_eq!(container.try_get_item(&"a".into()).stack(), 1);
        assert!(container.try_get_item(&"b".into()).is_empty());
    }

    #[test]
    fn test_consume_one_uses_first_matching_slot() {
        let ammo = stackable("ammo", 2);
        let mut container = ItemContainer::new(3);
        container.add_item(Item::new(Arc::clone(&ammo), 2));
        container.add_item(Item::new(ammo, 2));

        let used = container.consume_one(&"ammo".into());
        assert_eq!(used.stack(), 1);
        assert_eq!(container.get(0).unwrap().stack(), 1);
        assert_eq!(container.get(1).unwrap().stack(), 2);
        assert_eq!(container.count_of(&"ammo".into()), 3);
    }
}
