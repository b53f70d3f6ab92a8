//! Authority model for networked players
//!
//! # Architecture
//!
//! Only the owning peer mutates a player. Everyone else holds a read-only
//! projection (`NetworkRole::Remote`) whose vitals are overwritten by
//! `VitalsSnapshot`s coming from the transport layer. Inventory and
//! equipment are not replicated.
//!
//! ```text
//! owner:  Changed<Vitals> → publish_vitals → VitalsSnapshotPublished → transport
//! remote: transport → VitalsSnapshotReceived → apply_vitals_snapshots → Vitals
//! ```

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::Vitals;
use crate::logger::log_warning;
use crate::player::Player;

/// Who may mutate a player
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkRole {
    #[default]
    Owner,
    Remote,
}

/// Coarse replicated state (health / shield only)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VitalsSnapshot {
    /// Owner-side simulation tick; older snapshots are ignored
    pub tick: u64,
    pub health: f32,
    pub shield: f32,
}

impl VitalsSnapshot {
    pub fn capture(vitals: &Vitals, tick: u64) -> Self {
        Self {
            tick,
            health: vitals.health,
            shield: vitals.shield,
        }
    }

    /// Overwrite `vitals`, clamped to its maxima.
    pub fn apply(&self, vitals: &mut Vitals) {
        vitals.health = self.health.clamp(0.0, vitals.max_health);
        vitals.shield = self.shield.clamp(0.0, vitals.max_shield);
    }

    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::to_string(self)
    }

    pub fn from_ron(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }
}

/// Last applied snapshot tick on a remote projection
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct ReplicatedTick(pub u64);

/// Snapshot produced for an owned player
#[derive(Event, Debug, Clone)]
pub struct VitalsSnapshotPublished {
    pub player: Entity,
    pub snapshot: VitalsSnapshot,
}

/// Snapshot received for a remote player
#[derive(Event, Debug, Clone)]
pub struct VitalsSnapshotReceived {
    pub player: Entity,
    pub snapshot: VitalsSnapshot,
}

/// Publish vitals of owned players whenever they change.
pub fn publish_vitals(
    mut tick: Local<u64>,
    players: Query<(Entity, &Player, &Vitals), Changed<Vitals>>,
    mut published: EventWriter<VitalsSnapshotPublished>,
) {
    *tick += 1;
    for (entity, player, vitals) in players.iter() {
        if player.role() != NetworkRole::Owner {
            continue;
        }
        published.write(VitalsSnapshotPublished {
            player: entity,
            snapshot: VitalsSnapshot::capture(vitals, *tick),
        });
    }
}

/// Apply received snapshots to remote projections (last writer wins by tick).
pub fn apply_vitals_snapshots(
    mut commands: Commands,
    mut received: EventReader<VitalsSnapshotReceived>,
    mut players: Query<(&Player, &mut Vitals, Option<&mut ReplicatedTick>)>,
) {
    for event in received.read() {
        let Ok((player, mut vitals, last_tick)) = players.get_mut(event.player) else {
            log_warning(&format!("Vitals snapshot for unknown player {:?}", event.player));
            continue;
        };
        if player.role() != NetworkRole::Remote {
            log_warning(&format!("Ignoring vitals snapshot for owned player {:?}", event.player));
            continue;
        }

        match last_tick {
            Some(mut last) => {
                if event.snapshot.tick <= last.0 {
                    continue;
                }
                last.0 = event.snapshot.tick;
            }
            None => {
                commands
                    .entity(event.player)
                    .insert(ReplicatedTick(event.snapshot.tick));
            }
        }
        event.snapshot.apply(&mut vitals);
    }
}

/// Replication plugin
pub struct ReplicationPlugin;

impl Plugin for ReplicationPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<VitalsSnapshotPublished>()
            .add_event::<VitalsSnapshotReceived>()
            .add_systems(
                Update,
                (apply_vitals_snapshots, publish_vitals)
                    .chain()
                    .in_set(crate::SimulationSet::Replication),
            );
    }
}
