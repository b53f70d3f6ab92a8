//! Recording collaborators for aggregate tests.

use bevy::math::Vec3;

use crate::collaborators::{
    DamageSink, InventoryNotice, InventoryNotifier, ItemSpawner, ProjectileLauncher, ProjectileShot, SpatialQuery,
};
use crate::combat::melee::ray_sphere_distance;
use crate::item_system::{DamageType, Item};

/// Target sphere in the test world
pub(crate) struct Dummy {
    pub id: u32,
    pub center: Vec3,
    pub radius: f32,
}

#[derive(Default)]
pub(crate) struct TestWorld {
    pub dummies: Vec<Dummy>,
    pub dropped: Vec<(Item, Vec3)>,
    pub damage: Vec<(u32, f32, DamageType)>,
    pub shots: Vec<(Vec3, Vec3, ProjectileShot)>,
    pub notices: Vec<InventoryNotice>,
    /// Every spawn fails when set
    pub refuse_spawns: bool,
}

impl TestWorld {
    pub fn with_dummy(mut self, id: u32, center: Vec3, radius: f32) -> Self {
        self.dummies.push(Dummy { id, center, radius });
        self
    }

    pub fn dropped_total(&self) -> u32 {
        self.dropped.iter().map(|(item, _)| item.stack()).sum()
    }

    pub fn saw(&self, notice: InventoryNotice) -> bool {
        self.notices.contains(&notice)
    }
}

impl ItemSpawner for TestWorld {
    type Handle = usize;

    fn spawn_dropped_item(&mut self, item: Item, position: Vec3) -> Option<usize> {
        if self.refuse_spawns {
            return None;
        }
        self.dropped.push((item, position));
        Some(self.dropped.len() - 1)
    }
}

impl DamageSink<u32> for TestWorld {
    fn take_damage(&mut self, target: u32, amount: f32, damage_type: DamageType) {
        self.damage.push((target, amount, damage_type));
    }
}

impl SpatialQuery for TestWorld {
    type Target = u32;

    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<u32> {
        self.dummies
            .iter()
            .filter_map(|dummy| {
                ray_sphere_distance(origin, direction, dummy.center, dummy.radius, max_distance)
                    .map(|distance| (distance, dummy.id))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, id)| id)
    }
}

impl ProjectileLauncher for TestWorld {
    fn launch_projectile(&mut self, origin: Vec3, direction: Vec3, shot: ProjectileShot) {
        self.shots.push((origin, direction, shot));
    }
}

impl InventoryNotifier for TestWorld {
    fn notify(&mut self, notice: InventoryNotice) {
        self.notices.push(notice);
    }
}
