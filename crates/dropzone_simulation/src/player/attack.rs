//! Attack dispatch on the equipped weapon
//!
//! - No weapon / `Melee` → cone sweep, each distinct target damaged once
//! - `Ranged` → ammo check, one unit consumed, projectile launched
//! - `Hybrid` → `UnsupportedWeaponVariant`

use bevy::prelude::*;
use rand::Rng;

use crate::collaborators::{DamageSink, ProjectileLauncher, ProjectileShot, SpatialQuery};
use crate::components::EquipSlot;
use crate::combat::melee::{melee_sweep, sweep_directions};
use crate::error::InventoryError;
use crate::item_system::{DamageType, WeaponClass};
use crate::logger::{log, log_error};

use super::{CancelReason, ConsumptionOutcome, InventoryWorld, Player};

/// What an attack did
#[derive(Debug, Clone, PartialEq)]
pub enum AttackKind<T> {
    Melee {
        /// Distinct targets, in first-hit order
        targets: Vec<T>,
        damage: f32,
        damage_type: DamageType,
    },
    Ranged {
        direction: Vec3,
        shot: ProjectileShot,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttackReport<T> {
    pub kind: AttackKind<T>,
    /// Consumption interrupted by this attack
    pub interrupted: Option<ConsumptionOutcome>,
}

impl Player {
    /// Attack towards `direction` (x, y on the ground plane). A zero
    /// direction attacks along the current facing.
    pub fn attack_to<W, R>(
        &mut self,
        direction: Vec2,
        now: f64,
        rng: &mut R,
        world: &mut W,
    ) -> Result<AttackReport<W::Target>, InventoryError>
    where
        W: SpatialQuery + DamageSink<<W as SpatialQuery>::Target> + ProjectileLauncher + InventoryWorld,
        R: Rng,
    {
        self.ensure_owner()?;
        if now < self.next_attack_at {
            return Err(InventoryError::AttackOnCooldown);
        }

        let direction = Vec3::new(direction.x, 0.0, direction.y)
            .try_normalize()
            .unwrap_or(self.facing);
        let origin = self.position + Vec3::Y * self.config.melee.origin_height;
        let weapon_id = self.equipment.get(EquipSlot::Weapon).id().cloned();
        let weapon = self.equipment.weapon().cloned();

        let (kind, cooldown) = match weapon {
            None => {
                let melee = &self.config.melee;
                let (range, cooldown) = (melee.range, melee.unarmed_cooldown);
                let damage = rng.gen_range(0.0..melee.unarmed_damage_max.max(f32::EPSILON));
                let targets = self.swing(origin, direction, range, damage, DamageType::Normal, world);
                let kind = AttackKind::Melee {
                    targets,
                    damage,
                    damage_type: DamageType::Normal,
                };
                (kind, cooldown)
            }
            Some(weapon) => {
                let kind = match &weapon.class {
                    WeaponClass::Melee => {
                        let targets = self.swing(
                            origin,
                            direction,
                            weapon.attack_range,
                            weapon.damage,
                            weapon.damage_type,
                            world,
                        );
                        AttackKind::Melee {
                            targets,
                            damage: weapon.damage,
                            damage_type: weapon.damage_type,
                        }
                    }
                    WeaponClass::Ranged {
                        required_ammo,
                        projectile_speed,
                    } => {
                        if let Some(ammo) = required_ammo {
                            if self.container.consume_one(ammo).is_empty() {
                                log(&format!("🔫 Out of {}", ammo));
                                return Err(InventoryError::InsufficientResource { item: ammo.clone() });
                            }
                            self.after_container_change(world);
                        }

                        let shot = ProjectileShot {
                            damage: weapon.damage,
                            damage_type: weapon.damage_type,
                            speed: *projectile_speed,
                            max_range: weapon.attack_range,
                            ammo: required_ammo.clone(),
                        };
                        world.launch_projectile(origin, direction, shot.clone());
                        AttackKind::Ranged { direction, shot }
                    }
                    WeaponClass::Hybrid => {
                        let err = InventoryError::UnsupportedWeaponVariant {
                            item: weapon_id.unwrap_or_else(|| "unknown".into()),
                        };
                        log_error(&format!("attack_to: {}", err));
                        return Err(err);
                    }
                };
                (kind, weapon.cooldown())
            }
        };

        self.next_attack_at = now + cooldown as f64;
        let interrupted = self.interrupt_consumption();
        Ok(AttackReport { kind, interrupted })
    }

    /// Sweep and damage each distinct target once.
    fn swing<W>(
        &self,
        origin: Vec3,
        direction: Vec3,
        range: f32,
        damage: f32,
        damage_type: DamageType,
        world: &mut W,
    ) -> Vec<W::Target>
    where
        W: SpatialQuery + DamageSink<<W as SpatialQuery>::Target>,
    {
        let melee = &self.config.melee;
        let directions = sweep_directions(direction, melee.arc_degrees, melee.rays);
        let targets = melee_sweep(&*world, origin, &directions, range);

        for target in &targets {
            world.take_damage(*target, damage, damage_type);
        }
        if !targets.is_empty() {
            log(&format!("⚔️ Melee hit {} target(s) for {:.0}", targets.len(), damage));
        }
        targets
    }

    fn interrupt_consumption(&mut self) -> Option<ConsumptionOutcome> {
        if self.config.cancel_consumption_on_attack {
            self.cancel_consumption(CancelReason::Attacked)
        } else {
            None
        }
    }
}
