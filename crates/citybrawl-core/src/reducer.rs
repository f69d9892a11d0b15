//! The session reducer: `reduce(state, action) -> state'`.
//!
//! Reduction runs in two phases:
//!
//! 1. **GATE**: After game over only `ResetGame` and `SetMessage` pass; every
//!    other action returns the state unchanged.
//! 2. **RESOLUTION**: The current state is cloned into `next` and every
//!    resolver that handles the action's kind writes into it.
//!
//! The input state is never touched. An action no resolver handles returns an
//! unchanged clone.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use citybrawl_core::action::Action;
//! use citybrawl_core::catalog::Catalog;
//! use citybrawl_core::config::SessionConfig;
//! use citybrawl_core::player::PlayerId;
//! use citybrawl_core::reducer::Reducer;
//! use citybrawl_core::state::SessionState;
//! use glam::Vec2;
//!
//! let config = Arc::new(SessionConfig::default());
//! let reducer = Reducer::new(Arc::new(Catalog::san_francisco()), Arc::clone(&config));
//!
//! let state = SessionState::initial(&config);
//! let moved = reducer.reduce(&state, &Action::move_by(PlayerId::PRIMARY, Vec2::new(5.0, 0.0)));
//!
//! assert_eq!(moved.players[0].position.x, 405.0);
//! assert_eq!(state.players[0].position.x, 400.0);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::action::Action;
use crate::catalog::Catalog;
use crate::config::SessionConfig;
use crate::resolver::{default_resolvers, ResolveContext, Resolver};
use crate::state::SessionState;

// =============================================================================
// Reducer
// =============================================================================

/// Pure state-transition function over [`SessionState`].
///
/// `Reducer` manages:
/// - The resolvers that implement each action family
/// - The catalog and config every reduction reads
///
/// # Determinism
///
/// Given the same state and action, `reduce` returns the same state. All
/// randomness comes from the RNG carried inside the state.
pub struct Reducer {
    /// Resolvers, run in insertion order.
    resolvers: Vec<Box<dyn Resolver>>,
    /// World catalog.
    catalog: Arc<Catalog>,
    /// Session tuning.
    config: Arc<SessionConfig>,
}

impl fmt::Debug for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reducer")
            .field("resolvers", &format!("[{} resolvers]", self.resolvers.len()))
            .field("catalog", &format!("[{} locations]", self.catalog.len()))
            .field("config", &self.config)
            .finish()
    }
}

impl Reducer {
    /// Creates a reducer with the default resolvers.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, config: Arc<SessionConfig>) -> Self {
        Self::with_resolvers(catalog, config, default_resolvers())
    }

    /// Creates a reducer with an explicit resolver set.
    #[must_use]
    pub fn with_resolvers(
        catalog: Arc<Catalog>,
        config: Arc<SessionConfig>,
        resolvers: Vec<Box<dyn Resolver>>,
    ) -> Self {
        Self {
            resolvers,
            catalog,
            config,
        }
    }

    /// Returns the state that follows `state` after `action`.
    #[must_use]
    pub fn reduce(&self, state: &SessionState, action: &Action) -> SessionState {
        let kind = action.kind();

        // PHASE 1: GATE
        if state.is_game_over && !kind.allowed_after_game_over() {
            tracing::trace!(target: "citybrawl::reducer", %kind, reason = "game_over", "action.ignored");
            return state.clone();
        }

        // PHASE 2: RESOLUTION
        let ctx = ResolveContext {
            catalog: &self.catalog,
            config: &self.config,
        };
        let mut next = state.clone();
        let mut handled = false;
        for resolver in &self.resolvers {
            if resolver.handles().contains(&kind) {
                resolver.resolve(action, &ctx, state, &mut next);
                handled = true;
            }
        }

        if !handled {
            tracing::trace!(target: "citybrawl::reducer", %kind, reason = "unhandled", "action.ignored");
        } else if next == *state {
            tracing::trace!(target: "citybrawl::reducer", %kind, reason = "precondition", "action.ignored");
        } else {
            tracing::debug!(
                target: "citybrawl::reducer",
                %kind,
                location = next.location_index,
                in_combat = next.is_in_combat(),
                game_over = next.is_game_over,
                "action.applied"
            );
        }
        next
    }

    /// The catalog this reducer reads.
    #[must_use]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// The config this reducer reads.
    #[must_use]
    pub fn config(&self) -> &Arc<SessionConfig> {
        &self.config
    }

    /// Replaces the config, e.g. to reseed before a reset.
    pub fn set_config(&mut self, config: Arc<SessionConfig>) {
        self.config = config;
    }

    /// Adds a custom resolver.
    ///
    /// Resolvers run in the order they are added, after the defaults.
    pub fn add_resolver(&mut self, resolver: Box<dyn Resolver>) {
        self.resolvers.push(resolver);
    }

    /// Returns the number of resolvers.
    #[must_use]
    pub fn resolver_count(&self) -> usize {
        self.resolvers.len()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;
    use crate::entity::{CombatStats, EnemyComponents};
    use crate::player::PlayerId;
    use glam::Vec2;

    fn reducer() -> (Reducer, SessionState) {
        let config = Arc::new(SessionConfig::default());
        let state = SessionState::initial(&config);
        (Reducer::new(Arc::new(Catalog::san_francisco()), config), state)
    }

    // Tags every message it sees, to observe resolver order.
    struct Tagger(&'static str);

    impl Resolver for Tagger {
        fn handles(&self) -> &[ActionKind] {
            &[ActionKind::SetMessage]
        }

        fn resolve(
            &self,
            _action: &Action,
            _ctx: &ResolveContext<'_>,
            _current: &SessionState,
            next: &mut SessionState,
        ) {
            next.message.push_str(self.0);
        }
    }

    mod gate_tests {
        use super::*;

        #[test]
        fn game_over_blocks_play() {
            let (reducer, mut state) = reducer();
            state.is_game_over = true;
            let moved = reducer.reduce(&state, &Action::move_by(PlayerId::PRIMARY, Vec2::ONE));
            assert_eq!(moved, state);
            let spawned = reducer.reduce(
                &state,
                &Action::SpawnEnemy(EnemyComponents::new("Deo", "d.png", Vec2::ZERO, CombatStats::new(40, 4, 1, 4))),
            );
            assert_eq!(spawned, state);
        }

        #[test]
        fn game_over_allows_reset_and_message() {
            let (reducer, mut state) = reducer();
            state.is_game_over = true;
            let messaged = reducer.reduce(&state, &Action::message("Game over"));
            assert_eq!(messaged.message, "Game over");
            let reset = reducer.reduce(&state, &Action::ResetGame);
            assert!(!reset.is_game_over);
        }
    }

    mod resolution_tests {
        use super::*;

        #[test]
        fn input_state_is_untouched() {
            let (reducer, state) = reducer();
            let before = state.clone();
            let _ = reducer.reduce(&state, &Action::move_by(PlayerId::PRIMARY, Vec2::new(5.0, 5.0)));
            assert_eq!(state, before);
        }

        #[test]
        fn unhandled_action_returns_state() {
            let config = Arc::new(SessionConfig::default());
            let reducer = Reducer::with_resolvers(Arc::new(Catalog::default()), Arc::clone(&config), Vec::new());
            let state = SessionState::initial(&config);
            assert_eq!(reducer.reduce(&state, &Action::ResetGame), state);
            assert_eq!(reducer.reduce(&state, &Action::CheckCollision), state);
        }

        #[test]
        fn inverted_playfield_is_total() {
            let config = Arc::new(SessionConfig {
                playfield: crate::config::Playfield::new(Vec2::new(500.0, 500.0), Vec2::new(100.0, 100.0)),
                ..SessionConfig::default()
            });
            let reducer = Reducer::new(Arc::new(Catalog::san_francisco()), Arc::clone(&config));
            let state = SessionState::initial(&config);

            let moved = reducer.reduce(&state, &Action::move_by(PlayerId::PRIMARY, Vec2::new(5.0, 5.0)));
            assert_eq!(moved.players[0].position, Vec2::new(100.0, 100.0));
            let spawned = reducer.reduce(
                &state,
                &Action::SpawnEnemy(EnemyComponents::new("Deo", "d.png", Vec2::ZERO, CombatStats::new(40, 4, 1, 4))),
            );
            assert_eq!(spawned.arena.enemy_count(), 1);
        }

        #[test]
        fn custom_resolvers_run_in_order() {
            let (mut reducer, state) = reducer();
            reducer.add_resolver(Box::new(Tagger("-a")));
            reducer.add_resolver(Box::new(Tagger("-b")));
            assert_eq!(reducer.resolver_count(), 8);

            let next = reducer.reduce(&state, &Action::message("hi"));
            assert_eq!(next.message, "hi-a-b");
        }
    }

    #[test]
    fn debug_summarizes_resolvers() {
        let (reducer, _) = reducer();
        let debug = format!("{reducer:?}");
        assert!(debug.contains("[6 resolvers]"));
    }
}
