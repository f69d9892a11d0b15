//! Arena: the live entity collection of a session.
//!
//! Enemies and obstacles share one collection keyed by [`EntityId`]. IDs are
//! monotonically increasing and the `BTreeMap` iterates in key order, so
//! iteration order is spawn order. Collision tie-breaks and the "last in is
//! fought" rule both rely on that.
//!
//! The arena enforces no capacity; the spawn resolver does.
//!
//! # Example
//!
//! ```
//! use citybrawl_core::arena::Arena;
//! use citybrawl_core::entity::{EntityInner, ObstacleComponents};
//! use glam::Vec2;
//!
//! let mut arena = Arena::new();
//! let first = arena.spawn(EntityInner::Obstacle(ObstacleComponents::new("Hydrant", "h.png", Vec2::ZERO)));
//! let second = arena.spawn(EntityInner::Obstacle(ObstacleComponents::new("Bench", "b.png", Vec2::ONE)));
//!
//! let ids: Vec<_> = arena.entities_sorted().map(|e| e.id()).collect();
//! assert_eq!(ids, vec![first, second]);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::{EnemyComponents, Entity, EntityId, EntityInner, ObstacleComponents};

/// Live entities of a session, in spawn order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    /// Monotonically increasing entity ID counter.
    next_id: u64,
    /// Entity storage with deterministic iteration order.
    entities: BTreeMap<EntityId, Entity>,
}

impl Arena {
    /// Creates a new empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out the next entity ID without storing anything.
    ///
    /// Used for enemies that enter combat directly and never sit in the
    /// collection.
    pub fn allocate_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// The ID the next spawn or allocation will receive.
    #[must_use]
    pub const fn next_id(&self) -> EntityId {
        EntityId::new(self.next_id)
    }

    /// Adds an entity and returns its new ID.
    pub fn spawn(&mut self, inner: EntityInner) -> EntityId {
        let id = self.allocate_id();
        self.entities.insert(id, Entity::new(id, inner));
        id
    }

    /// Removes an entity, returning it if it existed.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    /// Removes every entity. IDs keep counting up.
    pub fn clear(&mut self) {
        self.entities.clear();
    }

    /// Returns a reference to an entity by ID.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Returns a mutable reference to an entity by ID.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Returns an iterator over entities in spawn order.
    pub fn entities_sorted(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    /// Enemies in spawn order.
    pub fn enemies(&self) -> impl Iterator<Item = (EntityId, &EnemyComponents)> + '_ {
        self.entities
            .values()
            .filter_map(|entity| entity.as_enemy().map(|enemy| (entity.id(), enemy)))
    }

    /// Obstacles in spawn order.
    pub fn obstacles(&self) -> impl Iterator<Item = (EntityId, &ObstacleComponents)> + '_ {
        self.entities
            .values()
            .filter_map(|entity| entity.as_obstacle().map(|obstacle| (entity.id(), obstacle)))
    }

    /// Number of live enemies.
    #[must_use]
    pub fn enemy_count(&self) -> usize {
        self.entities.values().filter(|e| e.is_enemy()).count()
    }

    /// Number of live obstacles.
    #[must_use]
    pub fn obstacle_count(&self) -> usize {
        self.entities.values().filter(|e| e.is_obstacle()).count()
    }

    /// Returns the number of entities in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if the arena has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
