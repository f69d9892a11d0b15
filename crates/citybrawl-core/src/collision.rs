//! Collision detection.
//!
//! A plain O(n) scan: the first entity within the radius, in collection
//! order, wins. Nearest-first would make the result depend on float ties;
//! collection order does not.

use glam::Vec2;

use crate::entity::{Entity, EntityId, EntityTag};
use crate::player::PlayerId;

/// A player touching an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionHit {
    /// The player that touched the entity.
    pub player: PlayerId,
    /// The entity touched.
    pub entity: EntityId,
    /// Kind of the entity touched.
    pub tag: EntityTag,
}

/// Returns the first entity strictly closer than `radius` to `point`.
pub fn first_within<'a, I>(point: Vec2, entities: I, radius: f32) -> Option<&'a Entity>
where
    I: IntoIterator<Item = &'a Entity>,
{
    entities
        .into_iter()
        .find(|entity| entity.position().distance(point) < radius)
}
