//! Player / combat tuning
//!
//! Defaults are the reference values of the game; a RON file can override any
//! field (missing fields keep their default).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Melee cone sweep parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeleeSweepConfig {
    /// Number of rays cast across the arc
    pub rays: usize,
    /// Full arc width (degrees)
    pub arc_degrees: f32,
    /// Reach when unarmed (armed melee uses the weapon's attack_range)
    pub range: f32,
    /// Ray origin height above the entity position
    pub origin_height: f32,
    /// Unarmed damage is rolled in `[0, unarmed_damage_max)`
    pub unarmed_damage_max: f32,
    /// Seconds between unarmed swings
    pub unarmed_cooldown: f32,
}

impl Default for MeleeSweepConfig {
    fn default() -> Self {
        Self {
            rays: 10,
            arc_degrees: 90.0,
            range: 2.0,
            origin_height: 1.0,
            unarmed_damage_max: 100.0,
            unarmed_cooldown: 0.5,
        }
    }
}

/// Per-player tuning (resource, copied into each `Player` on spawn)
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Container slots without a backpack (2..=8)
    pub default_container_capacity: usize,
    /// Quick bar slots (1..=6)
    pub quick_bar_capacity: usize,
    /// Movement multiplier while a consumable is channeling (0.1..=1.0)
    pub speed_multiplier_while_consuming: f32,
    /// Meters per second
    pub move_speed: f32,
    pub max_health: f32,
    pub max_shield: f32,
    /// Shield on spawn
    pub starting_shield: f32,
    /// Dropped pickups spawn this high above the player
    pub drop_height: f32,
    /// Impulse applied to dropped pickups
    pub drop_force: f32,
    /// Max distance for an explicit loot
    pub loot_radius: f32,
    /// Pickups allowing auto-loot are collected within this distance
    pub auto_loot_radius: f32,
    pub cancel_consumption_on_damage: bool,
    pub cancel_consumption_on_attack: bool,
    pub melee: MeleeSweepConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            default_container_capacity: 6,
            quick_bar_capacity: 4,
            speed_multiplier_while_consuming: 0.5,
            move_speed: 5.0,
            max_health: 100.0,
            max_shield: 100.0,
            starting_shield: 50.0,
            drop_height: 1.5,
            drop_force: 6.0,
            loot_radius: 2.0,
            auto_loot_radius: 1.0,
            cancel_consumption_on_damage: true,
            cancel_consumption_on_attack: true,
            melee: MeleeSweepConfig::default(),
        }
    }
}

impl PlayerConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: PlayerConfig = ron::de::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=8).contains(&self.default_container_capacity) {
            return Err(out_of_range(
                "default_container_capacity",
                self.default_container_capacity,
                "2..=8",
            ));
        }
        if !(1..=6).contains(&self.quick_bar_capacity) {
            return Err(out_of_range(
                "quick_bar_capacity",
                self.quick_bar_capacity,
                "1..=6",
            ));
        }
        if !(0.1..=1.0).contains(&self.speed_multiplier_while_consuming) {
            return Err(out_of_range(
                "speed_multiplier_while_consuming",
                self.speed_multiplier_while_consuming,
                "0.1..=1.0",
            ));
        }
        if !(0.0..=self.max_shield).contains(&self.starting_shield) {
            return Err(out_of_range(
                "starting_shield",
                self.starting_shield,
                "0..=max_shield",
            ));
        }
        if self.max_health <= 0.0 {
            return Err(out_of_range("max_health", self.max_health, "> 0"));
        }
        if self.loot_radius <= 0.0 {
            return Err(out_of_range("loot_radius", self.loot_radius, "> 0"));
        }
        if !(0.0..=self.loot_radius).contains(&self.auto_loot_radius) {
            return Err(out_of_range(
                "auto_loot_radius",
                self.auto_loot_radius,
                "0..=loot_radius",
            ));
        }
        if self.melee.rays == 0 {
            return Err(out_of_range("melee.rays", self.melee.rays, ">= 1"));
        }
        if !(0.0..=360.0).contains(&self.melee.arc_degrees) {
            return Err(out_of_range(
                "melee.arc_degrees",
                self.melee.arc_degrees,
                "0..=360",
            ));
        }
        Ok(())
    }
}

fn out_of_range(field: &'static str, value: impl ToString, range: &'static str) -> ConfigError {
    ConfigError::OutOfRange {
        field,
        value: value.to_string(),
        range,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(PlayerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config = PlayerConfig::from_ron_str(
            "(quick_bar_capacity: 6, melee: (rays: 5))",
        )
        .unwrap();

        assert_eq!(config.quick_bar_capacity, 6);
        assert_eq!(config.melee.rays, 5);
        assert_eq!(config.melee.arc_degrees, 90.0);
        assert_eq!(config.default_container_capacity, 6);
    }

    #[test]
    fn test_rejects_out_of_range_capacity() {
        let err = PlayerConfig::from_ron_str("(default_container_capacity: 12)").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "default_container_capacity",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_zero_rays() {
        let err = PlayerConfig::from_ron_str("(melee: (rays: 0))").unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "melee.rays", .. }));
    }
}
