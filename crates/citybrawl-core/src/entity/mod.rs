//! Entity module.
//!
//! Enemies and obstacles live in a single collection as one tagged variant:
//! - [`EntityId`]: Unique identifier, monotonically assigned per session
//! - [`EntityTag`]: Discriminant (enemy or obstacle)
//! - [`EntityInner`]: Type-safe storage for the variant's components
//! - [`Entity`]: The complete entity container
//!
//! Keeping both kinds in one collection means collision and removal are
//! written once.
//!
//! # Example
//!
//! ```
//! use citybrawl_core::entity::{Entity, EntityId, EntityInner, EntityTag};
//! use citybrawl_core::entity::components::ObstacleComponents;
//! use glam::Vec2;
//!
//! let hydrant = Entity::new(
//!     EntityId::new(3),
//!     EntityInner::Obstacle(ObstacleComponents::new("Hydrant", "obstacles/hydrant.png", Vec2::ZERO)),
//! );
//!
//! assert_eq!(hydrant.tag(), EntityTag::Obstacle);
//! assert!(hydrant.as_enemy().is_none());
//! ```

pub mod components;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use components::{CombatStats, EnemyComponents, ObstacleComponents};

/// Unique identifier for an entity.
///
/// IDs are handed out in increasing order, so ordering by ID is spawn order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Entity kind discriminant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    /// A combatant that starts combat on contact.
    Enemy,
    /// A hazard that deals flat damage on contact.
    Obstacle,
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enemy => write!(f, "Enemy"),
            Self::Obstacle => write!(f, "Obstacle"),
        }
    }
}

/// Type-safe storage for entity-specific components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityInner {
    /// Enemy components (name, sprite, position, stats)
    Enemy(EnemyComponents),
    /// Obstacle components (name, sprite, position)
    Obstacle(ObstacleComponents),
}

impl EntityInner {
    /// Returns the tag matching this variant.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        match self {
            Self::Enemy(_) => EntityTag::Enemy,
            Self::Obstacle(_) => EntityTag::Obstacle,
        }
    }

    /// Position of the entity, whatever its kind.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        match self {
            Self::Enemy(enemy) => enemy.position,
            Self::Obstacle(obstacle) => obstacle.position,
        }
    }

    /// Display name of the entity.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Enemy(enemy) => &enemy.name,
            Self::Obstacle(obstacle) => &obstacle.name,
        }
    }

    /// Returns the enemy components, if this is an enemy.
    #[must_use]
    pub const fn as_enemy(&self) -> Option<&EnemyComponents> {
        match self {
            Self::Enemy(components) => Some(components),
            Self::Obstacle(_) => None,
        }
    }

    /// Returns mutable enemy components, if this is an enemy.
    #[must_use]
    pub fn as_enemy_mut(&mut self) -> Option<&mut EnemyComponents> {
        match self {
            Self::Enemy(components) => Some(components),
            Self::Obstacle(_) => None,
        }
    }

    /// Returns the obstacle components, if this is an obstacle.
    #[must_use]
    pub const fn as_obstacle(&self) -> Option<&ObstacleComponents> {
        match self {
            Self::Obstacle(components) => Some(components),
            Self::Enemy(_) => None,
        }
    }
}

impl From<EnemyComponents> for EntityInner {
    fn from(enemy: EnemyComponents) -> Self {
        Self::Enemy(enemy)
    }
}

impl From<ObstacleComponents> for EntityInner {
    fn from(obstacle: ObstacleComponents) -> Self {
        Self::Obstacle(obstacle)
    }
}

/// A live entity on the playfield.
///
/// The tag is derived from the inner variant, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    inner: EntityInner,
}

impl Entity {
    /// Creates a new entity.
    #[must_use]
    pub const fn new(id: EntityId, inner: EntityInner) -> Self {
        Self { id, inner }
    }

    /// Returns the entity's unique identifier.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the entity's type tag.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        self.inner.tag()
    }

    /// Returns the entity's position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.inner.position()
    }

    /// Returns a reference to the entity's inner component storage.
    #[must_use]
    pub const fn inner(&self) -> &EntityInner {
        &self.inner
    }

    /// Consumes the entity, returning its components.
    #[must_use]
    pub fn into_inner(self) -> EntityInner {
        self.inner
    }

    /// Returns `true` if this entity is an enemy.
    #[must_use]
    pub const fn is_enemy(&self) -> bool {
        matches!(self.inner, EntityInner::Enemy(_))
    }

    /// Returns `true` if this entity is an obstacle.
    #[must_use]
    pub const fn is_obstacle(&self) -> bool {
        matches!(self.inner, EntityInner::Obstacle(_))
    }

    /// Returns the enemy components if this is an enemy, `None` otherwise.
    #[must_use]
    pub const fn as_enemy(&self) -> Option<&EnemyComponents> {
        self.inner.as_enemy()
    }

    /// Returns mutable enemy components if this is an enemy, `None` otherwise.
    #[must_use]
    pub fn as_enemy_mut(&mut self) -> Option<&mut EnemyComponents> {
        self.inner.as_enemy_mut()
    }

    /// Returns the obstacle components if this is an obstacle, `None` otherwise.
    #[must_use]
    pub const fn as_obstacle(&self) -> Option<&ObstacleComponents> {
        self.inner.as_obstacle()
    }
}
