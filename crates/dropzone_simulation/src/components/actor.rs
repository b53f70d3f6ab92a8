//! Actor components: Vitals, Hurtbox

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Health + shield
///
/// Invariants: 0 ≤ health ≤ max_health, 0 ≤ shield ≤ max_shield.
/// Incoming damage is absorbed by the shield first.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub health: f32,
    pub max_health: f32,
    pub shield: f32,
    pub max_shield: f32,
}

impl Default for Vitals {
    fn default() -> Self {
        Self::new(100.0, 100.0)
    }
}

/// What a hit actually removed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DamageOutcome {
    pub shield_lost: f32,
    pub health_lost: f32,
    pub died: bool,
}

impl DamageOutcome {
    pub fn total(&self) -> f32 {
        self.shield_lost + self.health_lost
    }
}

impl Vitals {
    /// Full health, no shield
    pub fn new(max_health: f32, max_shield: f32) -> Self {
        Self {
            health: max_health,
            max_health,
            shield: 0.0,
            max_shield,
        }
    }

    pub fn with_shield(mut self, shield: f32) -> Self {
        self.shield = shield.clamp(0.0, self.max_shield);
        self
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Apply a hit after flat `defense` reduction.
    pub fn take_damage(&mut self, amount: f32, defense: f32) -> DamageOutcome {
        if !self.is_alive() {
            return DamageOutcome::default();
        }

        let mut remaining = (amount - defense).max(0.0);

        let shield_lost = remaining.min(self.shield);
        self.shield -= shield_lost;
        remaining -= shield_lost;

        let health_lost = remaining.min(self.health);
        self.health -= health_lost;

        DamageOutcome {
            shield_lost,
            health_lost,
            died: !self.is_alive(),
        }
    }

    /// Returns the amount actually restored.
    pub fn heal(&mut self, amount: f32) -> f32 {
        let before = self.health;
        self.health = (self.health + amount.max(0.0)).min(self.max_health);
        self.health - before
    }

    /// Returns the amount actually restored.
    pub fn restore_shield(&mut self, amount: f32) -> f32 {
        let before = self.shield;
        self.shield = (self.shield + amount.max(0.0)).min(self.max_shield);
        self.shield - before
    }
}

/// Sphere that melee rays and projectiles can hit
#[derive(Component, Debug, Clone, Copy)]
pub struct Hurtbox {
    pub radius: f32,
    /// Sphere center above the entity origin
    pub height: f32,
}

impl Default for Hurtbox {
    fn default() -> Self {
        Self {
            radius: 0.5,
            height: 1.0,
        }
    }
}

impl Hurtbox {
    pub fn center(&self, position: Vec3) -> Vec3 {
        position + Vec3::Y * self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shield_absorbs_first() {
        let mut vitals = Vitals::new(100.0, 100.0).with_shield(30.0);

        let outcome = vitals.take_damage(50.0, 0.0);
        assert_eq!(outcome.shield_lost, 30.0);
        assert_eq!(outcome.health_lost, 20.0);
        assert_eq!(vitals.shield, 0.0);
        assert_eq!(vitals.health, 80.0);
    }

    #[test]
    fn test_defense_reduces_damage() {
        let mut vitals = Vitals::new(100.0, 100.0);

        let outcome = vitals.take_damage(10.0, 15.0);
        assert_eq!(outcome.total(), 0.0);
        assert_eq!(vitals.health, 100.0);
    }

    #[test]
    fn test_lethal_damage_clamps() {
        let mut vitals = Vitals::new(100.0, 100.0);

        let outcome = vitals.take_damage(250.0, 0.0);
        assert!(outcome.died);
        assert_eq!(vitals.health, 0.0);

        // Dead actors take nothing
        let outcome = vitals.take_damage(10.0, 0.0);
        assert_eq!(outcome.total(), 0.0);
    }

    #[test]
    fn test_restore_clamped_to_max() {
        let mut vitals = Vitals::new(100.0, 50.0);
        vitals.take_damage(30.0, 0.0);

        assert_eq!(vitals.heal(50.0), 30.0);
        assert_eq!(vitals.restore_shield(80.0), 50.0);
        assert_eq!(vitals.health, 100.0);
        assert_eq!(vitals.shield, 50.0);
    }
}
