//! Entity factory: turns catalog templates into live entities.
//!
//! Templates are picked uniformly from the location's pool and cloned, so a
//! spawned entity never aliases catalog data. Positions are uniform over the
//! playfield, edges included.

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::Location;
use crate::config::Playfield;
use crate::entity::{EnemyComponents, EntityInner, EntityTag, ObstacleComponents};

/// Stateless spawner over a location's template pools.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityFactory;

impl EntityFactory {
    /// Spawns an entity of `kind` from `location`.
    ///
    /// Returns `None` only when the matching pool is empty, which a validated
    /// [`Catalog`](crate::catalog::Catalog) rules out.
    pub fn spawn<R: Rng + ?Sized>(
        location: &Location,
        kind: EntityTag,
        playfield: &Playfield,
        rng: &mut R,
    ) -> Option<EntityInner> {
        match kind {
            EntityTag::Enemy => Self::spawn_enemy(location, playfield, rng).map(EntityInner::Enemy),
            EntityTag::Obstacle => {
                Self::spawn_obstacle(location, playfield, rng).map(EntityInner::Obstacle)
            }
        }
    }

    /// Spawns a random enemy from the location's pool.
    pub fn spawn_enemy<R: Rng + ?Sized>(
        location: &Location,
        playfield: &Playfield,
        rng: &mut R,
    ) -> Option<EnemyComponents> {
        let template = location.enemy_templates.choose(rng)?;
        let position = random_position(playfield, rng);
        Some(EnemyComponents::new(
            template.name.clone(),
            template.sprite.clone(),
            position,
            template.stats,
        ))
    }

    /// Spawns a random obstacle from the location's pool.
    pub fn spawn_obstacle<R: Rng + ?Sized>(
        location: &Location,
        playfield: &Playfield,
        rng: &mut R,
    ) -> Option<ObstacleComponents> {
        let template = location.obstacle_templates.choose(rng)?;
        let position = random_position(playfield, rng);
        Some(ObstacleComponents::new(
            template.name.clone(),
            template.sprite.clone(),
            position,
        ))
    }
}

/// Uniform point inside the playfield. An inverted playfield collapses to
/// its `max` corner instead of panicking.
pub fn random_position<R: Rng + ?Sized>(playfield: &Playfield, rng: &mut R) -> Vec2 {
    let t = Vec2::new(rng.gen::<f32>(), rng.gen::<f32>());
    playfield.clamp(playfield.min + (playfield.max - playfield.min) * t)
}
