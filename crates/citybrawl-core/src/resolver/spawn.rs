//! Spawn resolver.
//!
//! Handles `SpawnEnemy` and `SpawnObstacle`. Enemies are capped at
//! `max_enemies`; obstacles are unbounded. Spawn positions are clamped to the
//! playfield so a host cannot place entities outside it.

use crate::action::{Action, ActionKind};
use crate::entity::EntityInner;
use crate::state::SessionState;

use super::{ResolveContext, Resolver};

/// Message set when an enemy spawn is refused.
pub const CAPACITY_MESSAGE: &str = "Enemy spawn limit reached!";

/// Resolver for entity spawns.
#[derive(Debug, Clone, Default)]
pub struct SpawnResolver;

impl SpawnResolver {
    /// Creates a new spawn resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Resolver for SpawnResolver {
    fn handles(&self) -> &[ActionKind] {
        &[ActionKind::SpawnEnemy, ActionKind::SpawnObstacle]
    }

    fn resolve(
        &self,
        action: &Action,
        ctx: &ResolveContext<'_>,
        current: &SessionState,
        next: &mut SessionState,
    ) {
        let playfield = &ctx.config.playfield;
        match action {
            Action::SpawnEnemy(enemy) => {
                if current.arena.enemy_count() >= ctx.config.max_enemies {
                    next.message = CAPACITY_MESSAGE.to_string();
                    return;
                }
                let mut enemy = enemy.clone();
                enemy.position = playfield.clamp(enemy.position);
                let id = next.arena.spawn(EntityInner::Enemy(enemy));
                tracing::trace!(target: "citybrawl::reducer", %id, "enemy.spawned");
            }
            Action::SpawnObstacle(obstacle) => {
                let mut obstacle = obstacle.clone();
                obstacle.position = playfield.clamp(obstacle.position);
                let id = next.arena.spawn(EntityInner::Obstacle(obstacle));
                tracing::trace!(target: "citybrawl::reducer", %id, "obstacle.spawned");
            }
            _ => {}
        }
    }
}
