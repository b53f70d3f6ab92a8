//! Movement module: headless kinematics
//!
//! # Architecture
//!
//! No physics engine: players move kinematically on the ground plane and
//! pickups fall under gravity, sliding out with their drop impulse.
//!
//! ```text
//! MoveIntent → process_move_intents → Player::move_to
//!           → move_players (Transform += velocity * dt, face the direction)
//!           → sync_player_pose (Transform → Player position / facing)
//! settle_pickups: gravity + ground clamp + horizontal damping
//! ```
//!
//! Movement never cancels a consumable; `Player::speed_multiplier` slows the
//! player down while channeling.

use bevy::prelude::*;

pub mod events;

pub use events::*;

use crate::combat::Dead;
use crate::components::{Velocity, WorldItem};
use crate::logger::log_error;
use crate::player::Player;
use crate::replication::NetworkRole;

/// Gravity for settling pickups (m/s²)
pub const GRAVITY: f32 = -9.81;

/// Ground plane height
pub const GROUND_Y: f32 = 0.0;

/// Process movement intents
pub fn process_move_intents(mut intents: EventReader<MoveIntent>, mut players: Query<&mut Player, Without<Dead>>) {
    for intent in intents.read() {
        let Ok(mut player) = players.get_mut(intent.player) else {
            log_error(&format!("MoveIntent: {:?} is not a living player", intent.player));
            continue;
        };

        // Remote transforms come from the network layer
        if player.role() == NetworkRole::Remote {
            continue;
        }
        player.move_to(intent.direction);
    }
}

/// Integrate owned player movement into `Transform`
pub fn move_players(time: Res<Time>, mut players: Query<(&Player, &mut Transform), Without<Dead>>) {
    let dt = time.delta_secs();

    for (player, mut transform) in players.iter_mut() {
        if player.role() == NetworkRole::Remote {
            continue;
        }

        let velocity = player.movement_velocity();
        if velocity.length_squared() <= f32::EPSILON {
            continue;
        }

        transform.translation += velocity * dt;
        let target = transform.translation + velocity;
        transform.look_at(target, Vec3::Y);
    }
}

/// Mirror `Transform` into the player aggregate (drop origin, attack origin)
pub fn sync_player_pose(mut players: Query<(&mut Player, &Transform), Changed<Transform>>) {
    for (mut player, transform) in players.iter_mut() {
        player.set_pose(transform.translation, *transform.forward());
    }
}

/// Let dropped pickups fall to the ground and slide to a stop
pub fn settle_pickups(
    time: Res<Time>,
    mut pickups: Query<(&mut Transform, &mut Velocity), With<WorldItem>>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }

    for (mut transform, mut velocity) in pickups.iter_mut() {
        if transform.translation.y <= GROUND_Y && velocity.linear.length_squared() <= f32::EPSILON {
            continue;
        }

        velocity.linear.y += GRAVITY * dt;
        transform.translation += velocity.linear * dt;

        if transform.translation.y <= GROUND_Y {
            transform.translation.y = GROUND_Y;
            velocity.linear.y = 0.0;

            // Ground friction
            let damping = (1.0 - Velocity::DAMPING * dt).max(0.0);
            velocity.linear.x *= damping;
            velocity.linear.z *= damping;
            if velocity.linear.length_squared() < 1e-4 {
                velocity.linear = Vec3::ZERO;
            }
        }
    }
}

/// Movement plugin
///
/// Execution order (chained, `SimulationSet::Movement`):
/// 1. process_move_intents
/// 2. move_players
/// 3. sync_player_pose
/// 4. settle_pickups
pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<MoveIntent>().add_systems(
            Update,
            (process_move_intents, move_players, sync_player_pose, settle_pickups)
                .chain()
                .in_set(crate::SimulationSet::Movement),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerConfig;
    use crate::item_system::{Item, ItemCatalog};
    use crate::player::test_world::TestWorld;
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    fn movement_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .add_event::<MoveIntent>()
            .add_systems(
                Update,
                (process_move_intents, move_players, sync_player_pose, settle_pickups).chain(),
            );
        app
    }

    #[test]
    fn test_player_moves_and_faces_direction() {
        let mut app = movement_app();
        let player = app
            .world_mut()
            .spawn((Player::new(&PlayerConfig::default()), Transform::default()))
            .id();

        app.update();
        app.world_mut().send_event(MoveIntent {
            player,
            direction: Vec2::new(1.0, 0.0),
        });
        app.update();

        // 5 m/s * 0.1 s
        let transform = app.world().get::<Transform>(player).unwrap();
        assert!((transform.translation.x - 0.5).abs() < 1e-4);

        let pose = app.world().get::<Player>(player).unwrap();
        assert!((pose.position().x - 0.5).abs() < 1e-4);
        assert!(pose.facing().abs_diff_eq(Vec3::X, 1e-4));
    }

    #[test]
    fn test_consuming_player_moves_at_half_speed() {
        let mut app = movement_app();
        let catalog = ItemCatalog::default();
        let mut world = TestWorld::default();
        let mut state = Player::new(&PlayerConfig::default());
        state.loot_item(catalog.instantiate(&"healing_kit".into(), 1).unwrap(), &mut world);
        state.use_item_at_container(0, 0.0, &mut world).unwrap();
        state.move_to(Vec2::new(0.0, 1.0));

        let player = app.world_mut().spawn((state, Transform::default())).id();
        app.update();
        app.update();

        let transform = app.world().get::<Transform>(player).unwrap();
        assert!((transform.translation.z - 0.25).abs() < 1e-4);
        assert!(app.world().get::<Player>(player).unwrap().is_consuming());
    }

    #[test]
    fn test_pickup_settles_on_ground() {
        let mut app = movement_app();
        let pickup = app
            .world_mut()
            .spawn((
                WorldItem {
                    item: Item::empty(),
                    allow_auto_loot: false,
                },
                Transform::from_xyz(0.0, 1.5, 0.0),
                Velocity {
                    linear: Vec3::new(6.0, 0.0, 0.0),
                },
            ))
            .id();

        for _ in 0..40 {
            app.update();
        }

        let transform = app.world().get::<Transform>(pickup).unwrap();
        let velocity = app.world().get::<Velocity>(pickup).unwrap();
        assert_eq!(transform.translation.y, GROUND_Y);
        assert!(transform.translation.x > 0.0);
        assert_eq!(velocity.linear, Vec3::ZERO);
    }
}
