//! Collision resolver.
//!
//! Handles `CheckCollision`. At most one contact is processed per check:
//! enemies are tested before obstacles, players in roster order, entities in
//! spawn order.
//!
//! - Enemy contact: the enemy leaves the arena and becomes the player's
//!   opponent.
//! - Obstacle contact: the obstacle is destroyed and the player takes flat
//!   damage without entering combat.

use crate::action::{Action, ActionKind};
use crate::collision::{first_within, CollisionHit};
use crate::entity::{EntityInner, EntityTag};
use crate::state::{Engagement, SessionState};

use super::{check_defeat, ResolveContext, Resolver};

/// Resolver for player/entity contact.
#[derive(Debug, Clone, Default)]
pub struct CollisionResolver;

impl CollisionResolver {
    /// Creates a new collision resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Finds the contact a check would process, if any.
    #[must_use]
    pub fn find_hit(state: &SessionState, radius: f32) -> Option<CollisionHit> {
        [EntityTag::Enemy, EntityTag::Obstacle]
            .into_iter()
            .find_map(|tag| {
                state
                    .players
                    .iter()
                    .filter(|player| !player.is_defeated())
                    .find_map(|player| {
                        let candidates = state.arena.entities_sorted().filter(|e| e.tag() == tag);
                        first_within(player.position, candidates, radius).map(|entity| {
                            CollisionHit {
                                player: player.id,
                                entity: entity.id(),
                                tag,
                            }
                        })
                    })
            })
    }
}

impl Resolver for CollisionResolver {
    fn handles(&self) -> &[ActionKind] {
        &[ActionKind::CheckCollision]
    }

    fn resolve(
        &self,
        action: &Action,
        ctx: &ResolveContext<'_>,
        current: &SessionState,
        next: &mut SessionState,
    ) {
        if !matches!(action, Action::CheckCollision) || current.is_in_combat() {
            return;
        }
        let Some(hit) = Self::find_hit(current, ctx.config.proximity_radius) else {
            return;
        };
        let Some(entity) = next.arena.despawn(hit.entity) else {
            return;
        };

        match entity.into_inner() {
            EntityInner::Enemy(enemy) => {
                tracing::debug!(
                    target: "citybrawl::reducer",
                    player = %hit.player,
                    enemy = %enemy.name,
                    "combat.started"
                );
                next.combat = Some(Engagement {
                    player: hit.player,
                    enemy_id: hit.entity,
                    enemy,
                });
            }
            EntityInner::Obstacle(obstacle) => {
                let damage = ctx.config.obstacle_damage;
                if let Some(player) = next.player_mut(hit.player) {
                    player.stats.take_damage(damage);
                }
                next.message = format!("You ran into {} and took {damage} damage!", obstacle.name);
                check_defeat(next, hit.player);
            }
        }
    }
}
