//! Headless Dropzone simulation
//!
//! Runs a short scripted match without rendering:
//! `dropzone_simulation [player_config.ron] [item_catalog.ron]`

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use dropzone_simulation::*;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => PlayerConfig::load(Path::new(&path)).with_context(|| format!("loading player config {path}"))?,
        None => PlayerConfig::default(),
    };
    let catalog = match args.next() {
        Some(path) => ItemCatalog::load(Path::new(&path)).with_context(|| format!("loading item catalog {path}"))?,
        None => ItemCatalog::default(),
    };

    let seed = 42;
    log_info(&format!("🚀 Starting Dropzone headless simulation (seed: {seed}, {} items)", catalog.len()));

    let mut app = create_headless_app(seed);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / 60.0)))
        .insert_resource(config.clone())
        .insert_resource(catalog)
        .add_plugins(SimulationPlugin);

    let (alice, bob) = spawn_match(&mut app, &config)?;

    for tick in 0..600u32 {
        script(&mut app, tick, alice, bob);
        app.update();

        if tick % 120 == 0 {
            report(&mut app, tick, &[alice, bob]);
        }
    }

    report(&mut app, 600, &[alice, bob]);
    log_info("✅ Simulation complete");
    Ok(())
}

/// Two players facing each other and a few loot spawns at their feet.
fn spawn_match(app: &mut App, config: &PlayerConfig) -> Result<(Entity, Entity)> {
    let loot = {
        let catalog = app.world().resource::<ItemCatalog>();
        [("pistol", 1), ("ammo_9mm", 30), ("healing_kit", 2), ("vest_light", 1)]
            .into_iter()
            .map(|(id, stack)| {
                catalog
                    .instantiate(&id.into(), stack)
                    .with_context(|| format!("catalog has no {id}"))
            })
            .collect::<Result<Vec<_>>>()?
    };

    let world = app.world_mut();
    let (alice, bob) = {
        let mut commands = world.commands();
        let alice = spawn_player(&mut commands, config, Vec3::ZERO);
        let bob = spawn_player(&mut commands, config, Vec3::new(0.0, 0.0, -6.0));
        for item in loot {
            spawn_world_item(&mut commands, item, Vec3::ZERO, true);
        }
        (alice, bob)
    };
    world.flush();

    Ok((alice, bob))
}

/// Input for the scripted match
fn script(app: &mut App, tick: u32, alice: Entity, bob: Entity) {
    let world = app.world_mut();
    match tick {
        // Auto-loot has run; alice binds the healing kit to hotkey 1
        10 => {
            world.send_event(AssignQuickBarIntent {
                player: alice,
                slot: 0,
                container_slot: 1,
            });
        }
        20..=200 if tick % 20 == 0 => {
            world.send_event(AttackIntent {
                player: alice,
                direction: Vec2::new(0.0, -1.0),
            });
        }
        240 => {
            world.send_event(MoveIntent {
                player: bob,
                direction: Vec2::new(1.0, 0.0),
            });
        }
        300 => {
            world.send_event(UseQuickBarIntent { player: alice, slot: 0 });
        }
        _ => {}
    }
}

fn report(app: &mut App, tick: u32, players: &[Entity]) {
    for &entity in players {
        let Ok(entity_ref) = app.world().get_entity(entity) else {
            continue;
        };
        let (Some(player), Some(vitals)) = (entity_ref.get::<Player>(), entity_ref.get::<Vitals>()) else {
            continue;
        };

        log(&format!(
            "Tick {tick}: {entity:?} hp {:.0} shield {:.0} items {} consumption {:?}",
            vitals.health,
            vitals.shield,
            player.container().occupied(),
            player.consumption_state(),
        ));
    }
}
