//! Session configuration.
//!
//! [`SessionConfig`] gathers every tunable of a session: the playfield, the
//! enemy capacity, the collision radius, timer periods, combat rewards and the
//! roster of players. The defaults reproduce the single-player game; use
//! [`SessionConfig::two_player`] for the two-player layout.
//!
//! # Example
//!
//! ```
//! use citybrawl_core::config::SessionConfig;
//!
//! let config = SessionConfig::two_player().with_seed(7);
//! assert_eq!(config.players.len(), 2);
//! assert!(config.validate().is_ok());
//! ```

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::components::CombatStats;
use crate::error::ConfigError;

/// Default enemy capacity of a session.
pub const MAX_ENEMIES: usize = 15;

/// Default collision distance between a player and an entity.
pub const PROXIMITY_RADIUS: f32 = 50.0;

/// Default flat damage dealt by colliding with an obstacle.
pub const OBSTACLE_DAMAGE: u32 = 10;

// =============================================================================
// Playfield
// =============================================================================

/// Axis-aligned rectangle every position is clamped to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    /// Minimum corner (inclusive).
    pub min: Vec2,
    /// Maximum corner (inclusive).
    pub max: Vec2,
}

impl Playfield {
    /// Creates a playfield from its corners.
    #[must_use]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Creates the playfield of a `width` x `height` canvas with a `margin`
    /// kept free on every side for sprites.
    #[must_use]
    pub fn from_canvas(width: f32, height: f32, margin: f32) -> Self {
        Self {
            min: Vec2::splat(margin),
            max: Vec2::new(width - margin, height - margin),
        }
    }

    /// Clamps a point into the playfield.
    ///
    /// Never panics: on an inverted playfield the `max` corner wins.
    #[must_use]
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.max(self.min.x).min(self.max.x),
            point.y.max(self.min.y).min(self.max.y),
        )
    }

    /// Returns true if the point lies inside the playfield (edges included).
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Returns true if `min <= max` on both axes and all corners are finite.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min.x <= self.max.x
            && self.min.y <= self.max.y
    }
}

impl Default for Playfield {
    /// The 800 x 600 canvas with a 30 unit sprite margin.
    fn default() -> Self {
        Self::from_canvas(800.0, 600.0, 30.0)
    }
}

// =============================================================================
// Players
// =============================================================================

/// Starting position and base stats for one player slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerTemplate {
    /// Where the player appears when the session starts or resets.
    pub start: Vec2,
    /// Base combat stats.
    pub stats: CombatStats,
}

impl PlayerTemplate {
    /// Creates a player slot with the default stats at `start`.
    #[must_use]
    pub fn at(start: Vec2) -> Self {
        Self {
            start,
            stats: CombatStats::default_player(),
        }
    }
}

impl Default for PlayerTemplate {
    fn default() -> Self {
        Self::at(Vec2::new(400.0, 300.0))
    }
}

// =============================================================================
// Combat tuning
// =============================================================================

/// How fleeing from combat resolves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FleePolicy {
    /// The player always escapes after taking the flee penalty.
    Penalty,
    /// The player escapes unharmed with probability `success`; otherwise the
    /// penalty applies and combat continues.
    Chance {
        /// Escape probability in `[0, 1]`.
        success: f64,
    },
}

impl Default for FleePolicy {
    fn default() -> Self {
        Self::Penalty
    }
}

/// Progression rewards granted for defeating an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewards {
    /// Score added to the victorious player.
    pub score: u32,
    /// Experience added to the victorious player.
    pub experience: u32,
}

impl Default for Rewards {
    fn default() -> Self {
        Self {
            score: 100,
            experience: 50,
        }
    }
}

// =============================================================================
// SessionConfig
// =============================================================================

/// Configuration for a [`Session`](crate::session::Session).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Master seed for every random stream of the session.
    pub seed: u64,
    /// Bounds for player movement and entity spawns.
    pub playfield: Playfield,
    /// Maximum number of live enemies.
    pub max_enemies: usize,
    /// Distance under which a player collides with an entity.
    pub proximity_radius: f32,
    /// Flat damage dealt by an obstacle collision.
    pub obstacle_damage: u32,
    /// Period of the spawn timer.
    pub spawn_period: Duration,
    /// Period of the collision timer.
    pub collision_period: Duration,
    /// Probability that a spawn produces an enemy rather than an obstacle.
    pub enemy_spawn_chance: f64,
    /// Flee resolution.
    pub flee: FleePolicy,
    /// Rewards for a defeated enemy.
    pub rewards: Rewards,
    /// Experience needed per level.
    pub experience_per_level: u32,
    /// Highest reachable level.
    pub max_level: u32,
    /// Player slots, in id order.
    pub players: Vec<PlayerTemplate>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            playfield: Playfield::default(),
            max_enemies: MAX_ENEMIES,
            proximity_radius: PROXIMITY_RADIUS,
            obstacle_damage: OBSTACLE_DAMAGE,
            spawn_period: Duration::from_millis(2000),
            collision_period: Duration::from_millis(100),
            enemy_spawn_chance: 0.7,
            flee: FleePolicy::default(),
            rewards: Rewards::default(),
            experience_per_level: 100,
            max_level: 3,
            players: vec![PlayerTemplate::default()],
        }
    }
}

impl SessionConfig {
    /// The single-player configuration.
    #[must_use]
    pub fn single_player() -> Self {
        Self::default()
    }

    /// Two players starting side by side.
    #[must_use]
    pub fn two_player() -> Self {
        Self {
            players: vec![
                PlayerTemplate::at(Vec2::new(300.0, 300.0)),
                PlayerTemplate::at(Vec2::new(500.0, 300.0)),
            ],
            ..Self::default()
        }
    }

    /// Returns this config with a different seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns this config with a different flee policy.
    #[must_use]
    pub fn with_flee(mut self, flee: FleePolicy) -> Self {
        self.flee = flee;
        self
    }

    /// Checks the config for values the session cannot run with.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players.is_empty() {
            return Err(ConfigError::NoPlayers);
        }
        if self.max_enemies == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !self.playfield.is_valid() {
            return Err(ConfigError::InvalidPlayfield);
        }
        if self.spawn_period.is_zero() {
            return Err(ConfigError::ZeroPeriod { timer: "spawn" });
        }
        if self.collision_period.is_zero() {
            return Err(ConfigError::ZeroPeriod { timer: "collision" });
        }
        check_probability("enemy_spawn_chance", self.enemy_spawn_chance)?;
        if let FleePolicy::Chance { success } = self.flee {
            check_probability("flee.success", success)?;
        }
        if !(self.proximity_radius.is_finite() && self.proximity_radius >= 0.0) {
            return Err(ConfigError::InvalidRadius(self.proximity_radius));
        }
        if self.experience_per_level == 0 || self.max_level == 0 {
            return Err(ConfigError::InvalidLeveling);
        }
        Ok(())
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_playfield_matches_canvas_margin() {
        let field = Playfield::default();
        assert_eq!(field.min, Vec2::new(30.0, 30.0));
        assert_eq!(field.max, Vec2::new(770.0, 570.0));
    }

    #[test]
    fn clamp_keeps_points_inside() {
        let field = Playfield::default();
        assert_eq!(field.clamp(Vec2::new(-10.0, 900.0)), Vec2::new(30.0, 570.0));
        assert_eq!(field.clamp(Vec2::new(400.0, 300.0)), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn clamp_on_inverted_playfield_does_not_panic() {
        let field = Playfield::new(Vec2::new(500.0, 500.0), Vec2::new(100.0, 100.0));
        assert!(!field.is_valid());
        assert_eq!(field.clamp(Vec2::new(300.0, 800.0)), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn defaults_are_valid() {
        assert!(SessionConfig::default().validate().is_ok());
        assert!(SessionConfig::two_player().validate().is_ok());
    }

    #[test]
    fn rejects_empty_roster() {
        let config = SessionConfig {
            players: Vec::new(),
            ..SessionConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoPlayers)));
    }

    #[test]
    fn rejects_bad_probability() {
        let config = SessionConfig::default().with_flee(FleePolicy::Chance { success: 1.5 });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidProbability { name: "flee.success", .. })
        ));
    }

    #[test]
    fn rejects_zero_period() {
        let config = SessionConfig {
            collision_period: Duration::ZERO,
            ..SessionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroPeriod { timer: "collision" })
        ));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: SessionConfig = serde_json::from_str(r#"{"seed": 9, "max_enemies": 4}"#).unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.max_enemies, 4);
        assert_eq!(config.players.len(), 1);
    }

    #[test]
    fn flee_policy_serializes_tagged() {
        let json = serde_json::to_string(&FleePolicy::Chance { success: 0.5 }).unwrap();
        assert_eq!(json, r#"{"kind":"chance","success":0.5}"#);
    }
}
