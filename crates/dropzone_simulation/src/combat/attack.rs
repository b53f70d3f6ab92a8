//! Attack intents → `Player::attack_to`

use bevy::prelude::*;

use crate::combat::Dead;
use crate::components::Hurtbox;
use crate::ecs_world::{snapshot_hurtboxes, EcsWorld, WorldOutput};
use crate::logger::log_error;
use crate::player::Player;

/// Player wants to attack towards `direction` (ground plane x, y).
///
/// `Vec2::ZERO` attacks along the current facing.
#[derive(Event, Debug, Clone)]
pub struct AttackIntent {
    pub player: Entity,
    pub direction: Vec2,
}

/// Process attack intents
pub fn process_attack_intents(
    mut commands: Commands,
    time: Res<Time>,
    mut intents: EventReader<AttackIntent>,
    mut players: Query<&mut Player, Without<Dead>>,
    hurtboxes: Query<(Entity, &Transform, &Hurtbox), Without<Dead>>,
    mut output: WorldOutput,
) {
    if intents.is_empty() {
        return;
    }

    let now = time.elapsed_secs_f64();
    let targets = snapshot_hurtboxes(hurtboxes.iter());

    for intent in intents.read() {
        let Ok(mut player) = players.get_mut(intent.player) else {
            log_error(&format!("AttackIntent: {:?} is not a living player", intent.player));
            continue;
        };

        let mut world = EcsWorld::new(intent.player, &mut commands, &targets);
        let result = player.attack_to(intent.direction, now, output.rng(), &mut world);
        let effects = world.finish();
        output.flush(&mut commands, intent.player, player.config().drop_force, effects);

        match result {
            Ok(report) => {
                if let Some(outcome) = report.interrupted {
                    output.consumption_finished(intent.player, outcome);
                }
            }
            Err(error) => output.reject(intent.player, error),
        }
    }
}
