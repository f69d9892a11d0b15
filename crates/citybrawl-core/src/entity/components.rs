//! Component structs for entity types.
//!
//! [`CombatStats`] is the combatant shape shared by players and enemies.
//! [`EnemyComponents`] and [`ObstacleComponents`] hold everything a live
//! enemy or obstacle carries on the playfield.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Combat stats shared by players and enemies.
///
/// All values are non-negative by construction. Health never drops below 0;
/// use [`CombatStats::take_damage`] to subtract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatStats {
    /// Remaining health. 0 means defeated.
    pub health: u32,
    /// Attack strength.
    pub attack: u32,
    /// Defense strength.
    pub defense: u32,
    /// Movement speed (informational for the host's input mapping).
    pub speed: u32,
}

impl CombatStats {
    /// Creates a stat block.
    #[must_use]
    pub const fn new(health: u32, attack: u32, defense: u32, speed: u32) -> Self {
        Self {
            health,
            attack,
            defense,
            speed,
        }
    }

    /// Starting stats of a player: 100 health, 10 attack, 5 defense, 5 speed.
    #[must_use]
    pub const fn default_player() -> Self {
        Self::new(100, 10, 5, 5)
    }

    /// Returns true once health has reached 0.
    #[must_use]
    pub const fn is_defeated(&self) -> bool {
        self.health == 0
    }

    /// Subtracts `amount` from health, clamping at 0.
    pub fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }
}

/// Components for enemy entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyComponents {
    /// Display name, used in combat messages.
    pub name: String,
    /// Sprite reference for the presentation layer.
    pub sprite: String,
    /// Position on the playfield.
    pub position: Vec2,
    /// Combat stats.
    pub stats: CombatStats,
}

impl EnemyComponents {
    /// Creates an enemy at `position`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        sprite: impl Into<String>,
        position: Vec2,
        stats: CombatStats,
    ) -> Self {
        Self {
            name: name.into(),
            sprite: sprite.into(),
            position,
            stats,
        }
    }
}

/// Components for obstacle entities.
///
/// Obstacles have no combat stats; colliding with one deals flat damage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleComponents {
    /// Display name.
    pub name: String,
    /// Sprite reference for the presentation layer.
    pub sprite: String,
    /// Position on the playfield.
    pub position: Vec2,
}

impl ObstacleComponents {
    /// Creates an obstacle at `position`.
    #[must_use]
    pub fn new(name: impl Into<String>, sprite: impl Into<String>, position: Vec2) -> Self {
        Self {
            name: name.into(),
            sprite: sprite.into(),
            position,
        }
    }
}
