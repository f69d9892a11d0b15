//! Test helper functions for setting up sessions and fights.
//!
//! Factory functions that keep the scenario tests short and consistent.

use std::sync::Arc;
use std::time::Duration;

use glam::Vec2;

use crate::action::Action;
use crate::catalog::Catalog;
use crate::config::SessionConfig;
use crate::entity::{CombatStats, EnemyComponents, EntityId, EntityInner, ObstacleComponents};
use crate::player::PlayerId;
use crate::reducer::Reducer;
use crate::session::Session;
use crate::state::{Engagement, SessionState};

// =============================================================================
// Reducer Setup
// =============================================================================

/// A reducer over the built-in catalog plus the initial state for `config`.
pub fn reducer_with(config: SessionConfig) -> (Reducer, SessionState) {
    let config = Arc::new(config);
    let state = SessionState::initial(&config);
    (Reducer::new(Arc::new(Catalog::san_francisco()), config), state)
}

/// Folds `actions` through `reducer`, starting at `state`.
pub fn reduce_all(reducer: &Reducer, state: &SessionState, actions: &[Action]) -> SessionState {
    actions
        .iter()
        .fold(state.clone(), |state, action| reducer.reduce(&state, action))
}

// =============================================================================
// Entities
// =============================================================================

/// An enemy with the given stats at `position`.
pub fn enemy(name: &str, stats: CombatStats, position: Vec2) -> EnemyComponents {
    EnemyComponents::new(name, format!("enemies/{}.png", name.to_lowercase()), position, stats)
}

/// An obstacle at `position`.
pub fn obstacle(name: &str, position: Vec2) -> ObstacleComponents {
    ObstacleComponents::new(name, "obstacles/test.png", position)
}

/// Puts `state` in combat between `who` and `foe`.
pub fn engage(state: &mut SessionState, who: PlayerId, foe: EnemyComponents) -> EntityId {
    let enemy_id = state.arena.allocate_id();
    state.combat = Some(Engagement {
        player: who,
        enemy_id,
        enemy: foe,
    });
    enemy_id
}

/// Fills the arena with `count` enemies far from the default player.
pub fn fill_enemies(state: &mut SessionState, count: usize) {
    for i in 0..count {
        state.arena.spawn(EntityInner::Enemy(enemy(
            &format!("Filler{i}"),
            CombatStats::new(10, 1, 1, 1),
            Vec2::new(40.0, 40.0),
        )));
    }
}

// =============================================================================
// Session Driving
// =============================================================================

/// Runs `session` for `steps` ticks of `dt`, attacking whenever in combat.
#[allow(clippy::cast_precision_loss)]
pub fn play(session: &mut Session, steps: usize, dt: Duration) {
    for step in 0..steps {
        if session.state().is_game_over {
            break;
        }
        if session.state().is_in_combat() {
            let who = session.state().active_combatant().unwrap_or_default();
            session.dispatch(Action::AttackEnemy { who });
        } else {
            let delta = match step % 4 {
                0 => Vec2::new(25.0, 0.0),
                1 => Vec2::new(0.0, 25.0),
                2 => Vec2::new(-25.0, 0.0),
                _ => Vec2::new(0.0, -25.0),
            };
            for player in 0..session.state().players.len() {
                let who = PlayerId::new(u8::try_from(player).unwrap_or(u8::MAX));
                session.dispatch(Action::move_by(who, delta * (player as f32 + 1.0)));
            }
        }
        session.on_tick(dt);
    }
}
