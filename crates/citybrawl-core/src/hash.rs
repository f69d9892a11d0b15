//! State hashing for determinism verification.
//!
//! Two sessions fed the same seed and the same inputs must produce the same
//! hash after every step. Floats are hashed by bit pattern.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use glam::Vec2;

use crate::arena::Arena;
use crate::entity::{CombatStats, EnemyComponents, EntityInner};
use crate::player::Player;
use crate::state::SessionState;

/// Compute a deterministic hash of session state.
///
/// This hash includes:
/// - Location, flags and message
/// - Every player, every live entity and the arena's ID counter
/// - The current fight
/// - The position of the combat RNG stream
#[must_use]
pub fn hash_state(state: &SessionState) -> u64 {
    let mut hasher = DefaultHasher::new();

    state.location_index.hash(&mut hasher);
    state.is_game_over.hash(&mut hasher);
    state.message.hash(&mut hasher);

    state.players.len().hash(&mut hasher);
    for player in &state.players {
        hash_player(player, &mut hasher);
    }

    hash_arena(&state.arena, &mut hasher);

    match &state.combat {
        Some(engagement) => {
            true.hash(&mut hasher);
            engagement.player.hash(&mut hasher);
            engagement.enemy_id.hash(&mut hasher);
            hash_enemy(&engagement.enemy, &mut hasher);
        }
        None => false.hash(&mut hasher),
    }

    state.rng.get_seed().hash(&mut hasher);
    state.rng.get_stream().hash(&mut hasher);
    state.rng.get_word_pos().hash(&mut hasher);

    hasher.finish()
}

fn hash_player<H: Hasher>(player: &Player, hasher: &mut H) {
    player.id.hash(hasher);
    hash_vec2(player.position, hasher);
    hash_stats(&player.stats, hasher);
    player.score.hash(hasher);
    player.level.hash(hasher);
    player.experience.hash(hasher);
    player.enemies_defeated.hash(hasher);
    player.is_defending.hash(hasher);
}

fn hash_arena<H: Hasher>(arena: &Arena, hasher: &mut H) {
    arena.next_id().hash(hasher);
    arena.len().hash(hasher);
    for entity in arena.entities_sorted() {
        entity.id().hash(hasher);
        match entity.inner() {
            EntityInner::Enemy(enemy) => {
                0u8.hash(hasher);
                hash_enemy(enemy, hasher);
            }
            EntityInner::Obstacle(obstacle) => {
                1u8.hash(hasher);
                obstacle.name.hash(hasher);
                obstacle.sprite.hash(hasher);
                hash_vec2(obstacle.position, hasher);
            }
        }
    }
}

fn hash_enemy<H: Hasher>(enemy: &EnemyComponents, hasher: &mut H) {
    enemy.name.hash(hasher);
    enemy.sprite.hash(hasher);
    hash_vec2(enemy.position, hasher);
    hash_stats(&enemy.stats, hasher);
}

fn hash_stats<H: Hasher>(stats: &CombatStats, hasher: &mut H) {
    stats.hash(hasher);
}

fn hash_vec2<H: Hasher>(v: Vec2, hasher: &mut H) {
    v.x.to_bits().hash(hasher);
    v.y.to_bits().hash(hasher);
}
