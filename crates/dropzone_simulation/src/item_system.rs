//! Item System: catalog definitions and runtime stacks
//!
//! # Architecture
//!
//! **ItemData**: immutable catalog entry (id + kind + stats):
//! - Stored in the `ItemCatalog` resource behind `Arc` (shared by every stack)
//! - Hardcoded defaults in `ItemCatalog::default()`, or loaded from RON
//!
//! **Item**: runtime stack:
//! - Holds an `Arc<ItemData>` + current stack count
//! - Identity is the `ItemUid`, never the contents: two stacks of the same
//!   item type are still two different items
//! - `stack == 0` is the empty sentinel (`Item::empty()`), there is no `None`
//!
//! **ItemKind**: closed set of variants, dispatched with exhaustive `match`:
//! - Weapon (Melee / Ranged / Hybrid) → weapon slot
//! - Armor → armor slot
//! - Backpack → backpack slot (+container capacity)
//! - Consumable (HealingKit / Throwable) → ConsumptionProcess
//! - Ammo → consumed by ranged weapons
//!
//! # Example
//!
//! ```
//! use dropzone_simulation::item_system::{ItemCatalog, ItemId};
//!
//! let catalog = ItemCatalog::default();
//! let kit = catalog.instantiate(&ItemId::from("healing_kit"), 3).unwrap();
//! assert_eq!(kit.stack(), 3);
//! assert!(kit.data().unwrap().as_consumable().is_some());
//! ```

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::ConfigError;

// ============================================================================
// ItemId / ItemUid
// ============================================================================

/// Item type identifier (catalog key)
///
/// # Examples
/// - "katana"
/// - "pistol"
/// - "healing_kit"
/// - "backpack_small"
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of one `Item` instance.
///
/// Allocated from a process-wide counter; 0 is reserved for empty sentinels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemUid(u64);

static NEXT_UID: AtomicU64 = AtomicU64::new(1);

impl ItemUid {
    pub const EMPTY: ItemUid = ItemUid(0);

    fn next() -> Self {
        Self(NEXT_UID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

// ============================================================================
// ItemData (static catalog entry)
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemRarity {
    #[default]
    Common,
    Rare,
    Epic,
    Legendary,
}

/// Damage flavour forwarded to damage sinks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageType {
    #[default]
    Normal,
    Piercing,
    Explosive,
}

/// Static item definition
///
/// Immutable, shared by every `Item` of this type through `Arc`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemData {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub rarity: ItemRarity,
    /// Maximum units per stack (>= 1)
    #[serde(default = "default_max_stack")]
    pub max_stack: u32,
    pub kind: ItemKind,
}

fn default_max_stack() -> u32 {
    1
}

/// Item category with its kind-specific stats.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ItemKind {
    Weapon(WeaponData),
    Armor(ArmorData),
    Backpack(BackpackData),
    Consumable(ConsumableData),
    Ammo,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeaponData {
    pub class: WeaponClass,
    /// Damage per hit
    pub damage: f32,
    #[serde(default)]
    pub damage_type: DamageType,
    /// Attacks per second (cooldown = 1 / attack_speed)
    pub attack_speed: f32,
    /// Melee sweep range / projectile max range (meters)
    pub attack_range: f32,
    #[serde(default)]
    pub knockback_power: f32,
}

impl WeaponData {
    /// Seconds between two attacks.
    pub fn cooldown(&self) -> f32 {
        if self.attack_speed > 0.0 {
            1.0 / self.attack_speed
        } else {
            0.0
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum WeaponClass {
    /// Cone sweep in front of the attacker
    Melee,
    /// Projectile, optionally gated by an ammo item
    Ranged {
        #[serde(default)]
        required_ammo: Option<ItemId>,
        projectile_speed: f32,
    },
    /// Bayonet-style weapon; not wired into the attack dispatch yet
    Hybrid,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArmorData {
    /// Flat damage reduction per hit
    pub defense: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackpackData {
    /// Extra container slots while equipped
    pub bonus_capacity: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsumableData {
    /// Channel duration in seconds
    pub time_to_use: f32,
    pub effect: ConsumableEffect,
}

/// Effect applied when a consumption channel completes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ConsumableEffect {
    HealingKit {
        #[serde(default)]
        health_restore: f32,
        #[serde(default)]
        shield_restore: f32,
    },
    /// Grenade-like item; completion is not supported yet
    Throwable { damage: f32 },
}

impl ItemData {
    /// Human-readable category (used in diagnostics and `TypeMismatch`)
    pub fn category(&self) -> &'static str {
        match &self.kind {
            ItemKind::Weapon(_) => "weapon",
            ItemKind::Armor(_) => "armor",
            ItemKind::Backpack(_) => "backpack",
            ItemKind::Consumable(_) => "consumable",
            ItemKind::Ammo => "ammo",
        }
    }

    pub fn as_weapon(&self) -> Option<&WeaponData> {
        match &self.kind {
            ItemKind::Weapon(weapon) => Some(weapon),
            _ => None,
        }
    }

    pub fn as_armor(&self) -> Option<&ArmorData> {
        match &self.kind {
            ItemKind::Armor(armor) => Some(armor),
            _ => None,
        }
    }

    pub fn as_backpack(&self) -> Option<&BackpackData> {
        match &self.kind {
            ItemKind::Backpack(backpack) => Some(backpack),
            _ => None,
        }
    }

    pub fn as_consumable(&self) -> Option<&ConsumableData> {
        match &self.kind {
            ItemKind::Consumable(consumable) => Some(consumable),
            _ => None,
        }
    }
}

// ============================================================================
// Item (runtime stack)
// ============================================================================

/// Runtime item stack
///
/// Invariant: `0 <= stack <= max_stack`. A zero stack is always normalized to
/// the empty sentinel (no data, `ItemUid::EMPTY`).
///
/// Not `Clone`: copying a stack would duplicate its identity.
#[derive(Debug)]
pub struct Item {
    uid: ItemUid,
    data: Option<Arc<ItemData>>,
    stack: u32,
}

impl Default for Item {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Item {
    /// Identity comparison
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid
    }
}

impl Item {
    /// Empty sentinel
    pub const fn empty() -> Self {
        Self {
            uid: ItemUid::EMPTY,
            data: None,
            stack: 0,
        }
    }

    /// New stack with a fresh identity (stack clamped to `max_stack`).
    pub fn new(data: Arc<ItemData>, stack: u32) -> Self {
        let stack = stack.min(data.max_stack.max(1));
        if stack == 0 {
            return Self::empty();
        }

        Self {
            uid: ItemUid::next(),
            data: Some(data),
            stack,
        }
    }

    pub fn uid(&self) -> ItemUid {
        self.uid
    }

    pub fn data(&self) -> Option<&Arc<ItemData>> {
        self.data.as_ref()
    }

    pub fn id(&self) -> Option<&ItemId> {
        self.data.as_ref().map(|data| &data.id)
    }

    pub fn name(&self) -> &str {
        self.data.as_ref().map_or("<empty>", |data| data.name.as_str())
    }

    pub fn stack(&self) -> u32 {
        self.stack
    }

    pub fn max_stack(&self) -> u32 {
        self.data.as_ref().map_or(0, |data| data.max_stack.max(1))
    }

    pub fn is_empty(&self) -> bool {
        self.stack == 0
    }

    /// Units this stack can still absorb.
    pub fn space_left(&self) -> u32 {
        self.max_stack() - self.stack
    }

    /// Same item type (both non-empty).
    pub fn is_same_kind(&self, other: &Item) -> bool {
        match (self.id(), other.id()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    pub fn is_kind_of(&self, id: &ItemId) -> bool {
        self.id() == Some(id)
    }

    /// Move as many units as fit from `other` into `self`.
    ///
    /// `other` keeps the overflow (or becomes the empty sentinel). Returns the
    /// number of units moved. Different kinds never merge.
    pub fn absorb(&mut self, other: &mut Item) -> u32 {
        if !self.is_same_kind(other) {
            return 0;
        }

        let moved = self.space_left().min(other.stack);
        self.stack += moved;
        other.stack -= moved;
        if other.stack == 0 {
            *other = Item::empty();
        }
        moved
    }

    /// Take up to `count` units into a separate Item.
    ///
    /// Taking the whole stack hands over this very item (identity kept) and
    /// leaves the empty sentinel behind; a partial take creates a new identity.
    pub fn split(&mut self, count: u32) -> Item {
        if count == 0 || self.is_empty() {
            return Item::empty();
        }

        if count >= self.stack {
            return self.take();
        }

        self.stack -= count;
        Item {
            uid: ItemUid::next(),
            data: self.data.clone(),
            stack: count,
        }
    }

    /// Replace with the empty sentinel, returning the previous contents.
    pub fn take(&mut self) -> Item {
        std::mem::take(self)
    }
}

// ============================================================================
// ItemCatalog (Resource)
// ============================================================================

/// RON layout of a catalog file: `(items: [ ... ])`
#[derive(Debug, Deserialize, Serialize)]
struct CatalogFile {
    items: Vec<ItemData>,
}

/// Item catalog (process-wide read-only reference data)
#[derive(Resource, Clone, Debug)]
pub struct ItemCatalog {
    definitions: HashMap<ItemId, Arc<ItemData>>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self {
            definitions: HashMap::new(),
        }
    }

    pub fn get(&self, id: &ItemId) -> Option<&Arc<ItemData>> {
        self.definitions.get(id)
    }

    /// Add (or replace) a definition
    pub fn add(&mut self, definition: ItemData) {
        self.definitions
            .insert(definition.id.clone(), Arc::new(definition));
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Sorted ids (stable order for listings)
    pub fn ids(&self) -> Vec<&ItemId> {
        let mut ids: Vec<_> = self.definitions.keys().collect();
        ids.sort();
        ids
    }

    /// Create a fresh stack of `id`, `None` for unknown ids.
    pub fn instantiate(&self, id: &ItemId, stack: u32) -> Option<Item> {
        self.get(id).map(|data| Item::new(Arc::clone(data), stack))
    }

    /// Parse and validate a catalog from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let file: CatalogFile = ron::de::from_str(text)?;
        let mut catalog = Self::new();

        for definition in file.items {
            if catalog.get(&definition.id).is_some() {
                return Err(ConfigError::DuplicateItem(definition.id));
            }
            if definition.max_stack == 0 {
                return Err(ConfigError::OutOfRange {
                    field: "max_stack",
                    value: format!("{} ({})", definition.max_stack, definition.id),
                    range: ">= 1",
                });
            }
            catalog.add(definition);
        }

        catalog.validate_ammo_references()?;
        Ok(catalog)
    }

    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&text)
    }

    fn validate_ammo_references(&self) -> Result<(), ConfigError> {
        for data in self.definitions.values() {
            let Some(weapon) = data.as_weapon() else {
                continue;
            };
            let WeaponClass::Ranged {
                required_ammo: Some(ammo),
                ..
            } = &weapon.class
            else {
                continue;
            };

            if !matches!(self.get(ammo).map(|a| &a.kind), Some(ItemKind::Ammo)) {
                return Err(ConfigError::UnknownAmmo {
                    item: data.id.clone(),
                    ammo: ammo.clone(),
                });
            }
        }
        Ok(())
    }
}

impl Default for ItemCatalog {
    /// Hardcoded definitions (base loot table)
    fn default() -> Self {
        let mut catalog = Self::new();

        // === WEAPONS ===

        catalog.add(ItemData {
            id: "katana".into(),
            name: "Katana".to_string(),
            rarity: ItemRarity::Rare,
            max_stack: 1,
            kind: ItemKind::Weapon(WeaponData {
                class: WeaponClass::Melee,
                damage: 35.0,
                damage_type: DamageType::Normal,
                attack_speed: 1.5,
                attack_range: 2.0,
                knockback_power: 2.0,
            }),
        });

        catalog.add(ItemData {
            id: "pistol".into(),
            name: "Pistol".to_string(),
            rarity: ItemRarity::Common,
            max_stack: 1,
            kind: ItemKind::Weapon(WeaponData {
                class: WeaponClass::Ranged {
                    required_ammo: Some("ammo_9mm".into()),
                    projectile_speed: 40.0,
                },
                damage: 15.0,
                damage_type: DamageType::Piercing,
                attack_speed: 3.0,
                attack_range: 30.0,
                knockback_power: 0.0,
            }),
        });

        catalog.add(ItemData {
            id: "slingshot".into(),
            name: "Slingshot".to_string(),
            rarity: ItemRarity::Common,
            max_stack: 1,
            kind: ItemKind::Weapon(WeaponData {
                class: WeaponClass::Ranged {
                    required_ammo: None,
                    projectile_speed: 20.0,
                },
                damage: 5.0,
                damage_type: DamageType::Normal,
                attack_speed: 2.0,
                attack_range: 15.0,
                knockback_power: 0.5,
            }),
        });

        catalog.add(ItemData {
            id: "bayonet_rifle".into(),
            name: "Bayonet Rifle".to_string(),
            rarity: ItemRarity::Epic,
            max_stack: 1,
            kind: ItemKind::Weapon(WeaponData {
                class: WeaponClass::Hybrid,
                damage: 40.0,
                damage_type: DamageType::Piercing,
                attack_speed: 1.0,
                attack_range: 50.0,
                knockback_power: 1.0,
            }),
        });

        // === AMMO ===

        catalog.add(ItemData {
            id: "ammo_9mm".into(),
            name: "9mm Rounds".to_string(),
            rarity: ItemRarity::Common,
            max_stack: 60,
            kind: ItemKind::Ammo,
        });

        // === ARMOR ===

        catalog.add(ItemData {
            id: "vest_light".into(),
            name: "Light Vest".to_string(),
            rarity: ItemRarity::Common,
            max_stack: 1,
            kind: ItemKind::Armor(ArmorData { defense: 5.0 }),
        });

        catalog.add(ItemData {
            id: "vest_military".into(),
            name: "Military Vest".to_string(),
            rarity: ItemRarity::Epic,
            max_stack: 1,
            kind: ItemKind::Armor(ArmorData { defense: 15.0 }),
        });

        // === BACKPACKS ===

        catalog.add(ItemData {
            id: "backpack_small".into(),
            name: "Small Backpack".to_string(),
            rarity: ItemRarity::Common,
            max_stack: 1,
            kind: ItemKind::Backpack(BackpackData { bonus_capacity: 2 }),
        });

        catalog.add(ItemData {
            id: "backpack_large".into(),
            name: "Large Backpack".to_string(),
            rarity: ItemRarity::Rare,
            max_stack: 1,
            kind: ItemKind::Backpack(BackpackData { bonus_capacity: 4 }),
        });

        // === CONSUMABLES ===

        catalog.add(ItemData {
            id: "healing_kit".into(),
            name: "Healing Kit".to_string(),
            rarity: ItemRarity::Common,
            max_stack: 5,
            kind: ItemKind::Consumable(ConsumableData {
                time_to_use: 3.0,
                effect: ConsumableEffect::HealingKit {
                    health_restore: 50.0,
                    shield_restore: 0.0,
                },
            }),
        });

        catalog.add(ItemData {
            id: "shield_battery".into(),
            name: "Shield Battery".to_string(),
            rarity: ItemRarity::Rare,
            max_stack: 10,
            kind: ItemKind::Consumable(ConsumableData {
                time_to_use: 2.0,
                effect: ConsumableEffect::HealingKit {
                    health_restore: 0.0,
                    shield_restore: 25.0,
                },
            }),
        });

        catalog.add(ItemData {
            id: "grenade".into(),
            name: "Frag Grenade".to_string(),
            rarity: ItemRarity::Rare,
            max_stack: 3,
            kind: ItemKind::Consumable(ConsumableData {
                time_to_use: 0.5,
                effect: ConsumableEffect::Throwable { damage: 80.0 },
            }),
        });

        catalog
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn kit_data(max_stack: u32) -> Arc<ItemData> {
        Arc::new(ItemData {
            id: "kit".into(),
            name: "Kit".to_string(),
            rarity: ItemRarity::Common,
            max_stack,
            kind: ItemKind::Consumable(ConsumableData {
                time_to_use: 1.0,
                effect: ConsumableEffect::HealingKit {
                    health_restore: 10.0,
                    shield_restore: 0.0,
                },
            }),
        })
    }

    #[test]
    fn test_catalog_default() {
        let catalog = ItemCatalog::default();

        for id in [
            "katana",
            "pistol",
            "slingshot",
            "bayonet_rifle",
            "ammo_9mm",
            "vest_light",
            "vest_military",
            "backpack_small",
            "backpack_large",
            "healing_kit",
            "shield_battery",
            "grenade",
        ] {
            assert!(catalog.get(&id.into()).is_some(), "missing {}", id);
        }
        assert!(catalog.validate_ammo_references().is_ok());
    }

    #[test]
    fn test_new_item_clamps_stack() {
        let item = Item::new(kit_data(5), 9);
        assert_eq!(item.stack(), 5);
        assert!(!item.is_empty());
        assert_ne!(item.uid(), ItemUid::EMPTY);
    }

    #[test]
    fn test_zero_stack_is_empty_sentinel() {
        let item = Item::new(kit_data(5), 0);
        assert!(item.is_empty());
        assert!(item.data().is_none());
        assert_eq!(item.uid(), ItemUid::EMPTY);
    }

    #[test]
    fn test_identity_equality() {
        let data = kit_data(5);
        let a = Item::new(Arc::clone(&data), 2);
        let b = Item::new(data, 2);
        assert!(a.is_same_kind(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_absorb_leaves_remainder() {
        let data = kit_data(5);
        let mut a = Item::new(Arc::clone(&data), 3);
        let mut b = Item::new(data, 4);

        let moved = a.absorb(&mut b);
        assert_eq!(moved, 2);
        assert_eq!(a.stack(), 5);
        assert_eq!(b.stack(), 2);
    }

    #[test]
    fn test_split_partial_and_whole() {
        let mut item = Item::new(kit_data(5), 4);
        let uid = item.uid();

        let part = item.split(1);
        assert_eq!(part.stack(), 1);
        assert_ne!(part.uid(), uid);
        assert_eq!(item.stack(), 3);

        let rest = item.split(10);
        assert_eq!(rest.uid(), uid);
        assert_eq!(rest.stack(), 3);
        assert!(item.is_empty());
    }

    #[test]
    fn test_catalog_from_ron() {
        let text = r#"(
            items: [
                (
                    id: "ammo_arrow",
                    name: "Arrow",
                    max_stack: 30,
                    kind: Ammo,
                ),
                (
                    id: "bow",
                    name: "Bow",
                    rarity: Rare,
                    kind: Weapon((
                        class: Ranged(required_ammo: Some("ammo_arrow"), projectile_speed: 25.0),
                        damage: 20.0,
                        attack_speed: 1.0,
                        attack_range: 25.0,
                    )),
                ),
                (
                    id: "bandage",
                    name: "Bandage",
                    max_stack: 10,
                    kind: Consumable((
                        time_to_use: 2.0,
                        effect: HealingKit(health_restore: 15.0),
                    )),
                ),
            ],
        )"#;

        let catalog = ItemCatalog::from_ron_str(text).unwrap();
        assert_eq!(catalog.len(), 3);

        let bow = catalog.get(&"bow".into()).unwrap();
        assert_eq!(bow.max_stack, 1);
        assert_eq!(bow.rarity, ItemRarity::Rare);

        let bandage = catalog.get(&"bandage".into()).unwrap();
        let consumable = bandage.as_consumable().unwrap();
        assert_eq!(
            consumable.effect,
            ConsumableEffect::HealingKit {
                health_restore: 15.0,
                shield_restore: 0.0
            }
        );
    }

    #[test]
    fn test_catalog_rejects_unknown_ammo() {
        let text = r#"(
            items: [
                (
                    id: "bow",
                    name: "Bow",
                    kind: Weapon((
                        class: Ranged(required_ammo: Some("ammo_arrow"), projectile_speed: 25.0),
                        damage: 20.0,
                        attack_speed: 1.0,
                        attack_range: 25.0,
                    )),
                ),
            ],
        )"#;

        let err = ItemCatalog::from_ron_str(text).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownAmmo { .. }));
    }

    #[test]
    fn test_catalog_rejects_duplicates() {
        let text = r#"(
            items: [
                (id: "ammo", name: "A", kind: Ammo),
                (id: "ammo", name: "B", kind: Ammo),
            ],
        )"#;

        let err = ItemCatalog::from_ron_str(text).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateItem(_)));
    }
}
