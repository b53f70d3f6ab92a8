//! Pooled projectiles
//!
//! Ranged shots reuse parked projectile entities instead of spawning a new one
//! per shot. A projectile flies along its direction each frame, sweeping the
//! travelled segment against hurtboxes; the first hit (never the shooter)
//! produces a `DamageDealt` and parks the projectile again.

use bevy::prelude::*;

use crate::collaborators::ProjectileShot;
use crate::combat::{DamageDealt, Dead};
use crate::components::{Hurtbox, Projectile};
use crate::ecs_world::{nearest_hurtbox, snapshot_hurtboxes};

/// Shot waiting to be fired by the pool
#[derive(Debug, Clone, PartialEq)]
pub struct ShotRequest {
    pub shooter: Entity,
    pub origin: Vec3,
    pub direction: Vec3,
    pub shot: ProjectileShot,
}

/// Inactive projectile entities ready for reuse
#[derive(Resource, Debug, Default)]
pub struct ProjectilePool {
    free: Vec<Entity>,
    spawned: usize,
}

impl ProjectilePool {
    /// Total projectile entities ever spawned
    pub fn spawned(&self) -> usize {
        self.spawned
    }

    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// Activate a parked projectile (or spawn one) for `request`.
    pub fn fire(&mut self, commands: &mut Commands, request: ShotRequest) -> Entity {
        let projectile = Projectile {
            shooter: request.shooter,
            direction: request.direction.normalize_or_zero(),
            speed: request.shot.speed,
            damage: request.shot.damage,
            damage_type: request.shot.damage_type,
            remaining_range: request.shot.max_range,
            active: true,
        };
        let transform = Transform::from_translation(request.origin);

        match self.free.pop() {
            Some(entity) => {
                commands.entity(entity).insert((projectile, transform));
                entity
            }
            None => {
                self.spawned += 1;
                commands.spawn((projectile, transform)).id()
            }
        }
    }

    fn release(&mut self, entity: Entity, projectile: &mut Projectile) {
        if projectile.active {
            projectile.active = false;
            self.free.push(entity);
        }
    }
}

/// System: move active projectiles, resolve hits, park spent ones.
pub fn advance_projectiles(
    time: Res<Time>,
    mut pool: ResMut<ProjectilePool>,
    mut projectiles: Query<(Entity, &mut Projectile, &mut Transform)>,
    targets: Query<(Entity, &Transform, &Hurtbox), (Without<Projectile>, Without<Dead>)>,
    mut damage: EventWriter<DamageDealt>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }

    let hurtboxes = snapshot_hurtboxes(targets.iter());

    for (entity, mut projectile, mut transform) in projectiles.iter_mut() {
        if !projectile.active {
            continue;
        }

        let step = (projectile.speed * dt).min(projectile.remaining_range);
        let origin = transform.translation;

        if let Some((target, _)) = nearest_hurtbox(&hurtboxes, projectile.shooter, origin, projectile.direction, step) {
            damage.write(DamageDealt {
                attacker: Some(projectile.shooter),
                target,
                amount: projectile.damage,
                damage_type: projectile.damage_type,
            });
            pool.release(entity, &mut projectile);
            continue;
        }

        transform.translation += projectile.direction * step;
        projectile.remaining_range -= step;
        if projectile.remaining_range <= 0.0 {
            pool.release(entity, &mut projectile);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item_system::DamageType;
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    fn shot(speed: f32, max_range: f32) -> ProjectileShot {
        ProjectileShot {
            damage: 15.0,
            damage_type: DamageType::Piercing,
            speed,
            max_range,
            ammo: None,
        }
    }

    #[derive(Resource, Default)]
    struct Hits(Vec<Entity>);

    fn record_hits(mut events: EventReader<DamageDealt>, mut hits: ResMut<Hits>) {
        hits.0.extend(events.read().map(|event| event.target));
    }

    fn projectile_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .init_resource::<ProjectilePool>()
            .init_resource::<Hits>()
            .add_event::<DamageDealt>()
            .add_systems(Update, (advance_projectiles, record_hits).chain());
        app
    }

    fn fire(app: &mut App, request: ShotRequest) -> Entity {
        app.world_mut()
            .resource_scope(|world, mut pool: Mut<ProjectilePool>| {
                let entity = {
                    let mut commands = world.commands();
                    pool.fire(&mut commands, request)
                };
                world.flush();
                entity
            })
    }

    #[test]
    fn test_projectile_hits_target_and_is_reused() {
        let mut app = projectile_app();
        let shooter = app.world_mut().spawn((Transform::default(), Hurtbox::default())).id();
        let target = app
            .world_mut()
            .spawn((Transform::from_xyz(0.0, 0.0, 5.0), Hurtbox::default()))
            .id();

        let request = ShotRequest {
            shooter,
            origin: Vec3::new(0.0, 1.0, 0.0),
            direction: Vec3::Z,
            shot: shot(20.0, 30.0),
        };
        let first = fire(&mut app, request.clone());

        // 20 m/s * 0.1 s = 2 m per frame; first update has no delta
        for _ in 0..5 {
            app.update();
        }

        let hits = &app.world().resource::<Hits>().0;
        assert_eq!(hits, &vec![target]);
        assert!(!hits.contains(&shooter));

        assert_eq!(app.world().resource::<ProjectilePool>().available(), 1);
        let second = fire(&mut app, request);
        assert_eq!(first, second);
        assert_eq!(app.world().resource::<ProjectilePool>().spawned(), 1);
    }

    #[test]
    fn test_projectile_passes_through_corpses() {
        let mut app = projectile_app();
        let shooter = app.world_mut().spawn((Transform::default(), Hurtbox::default())).id();
        let corpse = app
            .world_mut()
            .spawn((Transform::from_xyz(0.0, 0.0, -4.0), Hurtbox::default(), Dead))
            .id();
        let target = app
            .world_mut()
            .spawn((Transform::from_xyz(0.0, 0.0, -10.0), Hurtbox::default()))
            .id();

        fire(
            &mut app,
            ShotRequest {
                shooter,
                origin: Vec3::new(0.0, 1.0, 0.0),
                direction: Vec3::NEG_Z,
                shot: shot(20.0, 30.0),
            },
        );

        for _ in 0..10 {
            app.update();
        }

        let hits = &app.world().resource::<Hits>().0;
        assert_eq!(hits, &vec![target]);
        assert!(!hits.contains(&corpse));
    }

    #[test]
    fn test_projectile_parks_after_max_range() {
        let mut app = projectile_app();
        let shooter = app.world_mut().spawn(Transform::default()).id();

        fire(
            &mut app,
            ShotRequest {
                shooter,
                origin: Vec3::ZERO,
                direction: Vec3::X,
                shot: shot(10.0, 2.5),
            },
        );

        for _ in 0..6 {
            app.update();
        }

        let pool = app.world().resource::<ProjectilePool>();
        assert_eq!(pool.available(), 1);
        let mut query = app.world_mut().query::<&Projectile>();
        let projectile = query.single(app.world()).unwrap();
        assert!(!projectile.active);
        assert!(projectile.remaining_range <= 0.0);
    }
}
