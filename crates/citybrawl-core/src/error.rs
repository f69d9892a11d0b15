//! Error types.
//!
//! Only construction can fail: a catalog that breaks the data contract or a
//! config the session cannot run with is rejected up front. Once a
//! [`Session`](crate::session::Session) exists, every action is total.

use thiserror::Error;

/// A world catalog that violates the data contract.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog has no locations at all.
    #[error("catalog has no locations")]
    NoLocations,

    /// A location has nothing to spawn as an enemy.
    #[error("location `{location}` has an empty enemy pool")]
    EmptyEnemyPool {
        /// Name of the offending location.
        location: String,
    },

    /// A location has nothing to spawn as an obstacle.
    #[error("location `{location}` has an empty obstacle pool")]
    EmptyObstaclePool {
        /// Name of the offending location.
        location: String,
    },

    /// A progression threshold is lower than an earlier one.
    #[error("location `{location}` requires fewer defeated enemies than an earlier location")]
    ThresholdsNotAscending {
        /// Name of the offending location.
        location: String,
    },

    /// The catalog JSON could not be parsed.
    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A session config the simulation cannot run with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The roster is empty.
    #[error("at least one player is required")]
    NoPlayers,

    /// `max_enemies` is zero.
    #[error("enemy capacity must be positive")]
    ZeroCapacity,

    /// A timer would fire continuously.
    #[error("{timer} timer period must be positive")]
    ZeroPeriod {
        /// Which timer.
        timer: &'static str,
    },

    /// A probability outside `[0, 1]`.
    #[error("{name} must be within [0, 1], got {value}")]
    InvalidProbability {
        /// Name of the setting.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },

    /// Playfield corners are inverted or not finite.
    #[error("playfield min corner must not exceed max corner")]
    InvalidPlayfield,

    /// Collision radius is negative or not finite.
    #[error("proximity radius must be finite and non-negative, got {0}")]
    InvalidRadius(f32),

    /// Zero experience per level or zero max level.
    #[error("leveling requires positive experience per level and max level")]
    InvalidLeveling,
}

/// Any error raised while building a session.
#[derive(Debug, Error)]
pub enum Error {
    /// The catalog was rejected.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The config was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result alias for session construction.
pub type Result<T> = std::result::Result<T, Error>;
