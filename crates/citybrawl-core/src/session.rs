//! Session: the owner object a host drives.
//!
//! A [`Session`] ties together the catalog, the config, the [`Reducer`], the
//! [`Scheduler`] and the current [`SessionState`]. Hosts interact with it
//! through two calls:
//!
//! - [`Session::dispatch`] for user input
//! - [`Session::on_tick`] to let time pass
//!
//! Every state change goes through the reducer, one action at a time.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use citybrawl_core::action::Action;
//! use citybrawl_core::player::PlayerId;
//! use citybrawl_core::session::Session;
//! use glam::Vec2;
//!
//! let mut session = Session::with_defaults(42);
//! session.dispatch(Action::move_by(PlayerId::PRIMARY, Vec2::new(0.0, -5.0)));
//! session.on_tick(Duration::from_secs(10));
//!
//! let state = session.state();
//! assert!(state.arena.enemy_count() <= 15);
//! assert_eq!(state.players[0].position.y, 295.0);
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::action::{Action, ActionKind};
use crate::catalog::Catalog;
use crate::config::SessionConfig;
use crate::error::Result;
use crate::hash::hash_state;
use crate::reducer::Reducer;
use crate::scheduler::Scheduler;
use crate::state::SessionState;

/// One game in progress.
#[derive(Debug)]
pub struct Session {
    reducer: Reducer,
    scheduler: Scheduler,
    state: SessionState,
}

impl Session {
    /// Creates a session over `catalog` with `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::error::Error::Config) if the config
    /// does not validate.
    pub fn new(catalog: Catalog, config: SessionConfig) -> Result<Self> {
        if let Err(err) = config.validate() {
            tracing::warn!(target: "citybrawl::session", error = %err, "session.rejected");
            return Err(err.into());
        }
        tracing::debug!(
            target: "citybrawl::session",
            seed = config.seed,
            players = config.players.len(),
            locations = catalog.len(),
            "session.created"
        );
        Ok(Self::build(catalog, config))
    }

    /// Creates a session over a catalog given as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Catalog`](crate::error::Error::Catalog) if the catalog
    /// does not parse or validate, otherwise as [`Session::new`].
    pub fn from_catalog_json(json: &str, config: SessionConfig) -> Result<Self> {
        let catalog = Catalog::from_json(json)?;
        Self::new(catalog, config)
    }

    /// Single-player session over the built-in catalog.
    #[must_use]
    pub fn with_defaults(seed: u64) -> Self {
        Self::build(Catalog::san_francisco(), SessionConfig::default().with_seed(seed))
    }

    fn build(catalog: Catalog, config: SessionConfig) -> Self {
        let state = SessionState::initial(&config);
        let mut scheduler = Scheduler::new(&config);
        scheduler.sync(&state);
        Self {
            reducer: Reducer::new(Arc::new(catalog), Arc::new(config)),
            scheduler,
            state,
        }
    }

    /// Applies one action.
    pub fn dispatch(&mut self, action: Action) -> &SessionState {
        self.state = self.reducer.reduce(&self.state, &action);
        if action.kind() == ActionKind::ResetGame {
            self.scheduler.reset(self.reducer.config().seed);
        }
        self.scheduler.sync(&self.state);
        &self.state
    }

    /// Lets `dt` of simulated time pass.
    ///
    /// Timers fire in chronological order and each resulting action is
    /// dispatched before the next timer is considered, so a collision that
    /// starts combat stops the timers for the rest of `dt`.
    pub fn on_tick(&mut self, dt: Duration) -> &SessionState {
        let mut budget = dt;
        loop {
            self.scheduler.sync(&self.state);
            if !Scheduler::is_running(&self.state) {
                break;
            }
            let Some((trigger, wait)) = self.scheduler.next_due(budget) else {
                self.scheduler.advance(budget);
                break;
            };
            self.scheduler.advance(wait);
            budget -= wait;

            let fired = self
                .scheduler
                .fire(trigger, &self.state, self.reducer.catalog());
            if let Some(action) = fired {
                self.state = self.reducer.reduce(&self.state, &action);
            }
        }
        &self.state
    }

    /// Returns to the initial state, optionally under a new seed.
    pub fn reset(&mut self, seed: Option<u64>) -> &SessionState {
        if let Some(seed) = seed {
            let config = SessionConfig::clone(self.reducer.config()).with_seed(seed);
            self.reducer.set_config(Arc::new(config));
        }
        tracing::debug!(target: "citybrawl::session", seed = self.reducer.config().seed, "session.reset");
        self.dispatch(Action::ResetGame)
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Hash of the current state, for replay comparison.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        hash_state(&self.state)
    }

    /// The catalog this session plays through.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        self.reducer.catalog()
    }

    /// The session config.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        self.reducer.config()
    }

    /// The scheduler, for inspecting timers.
    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// The reducer, e.g. to add custom resolvers.
    pub fn reducer_mut(&mut self) -> &mut Reducer {
        &mut self.reducer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, Error};
    use crate::player::PlayerId;
    use glam::Vec2;

    #[test]
    fn invalid_config_is_rejected() {
        let config = SessionConfig {
            players: Vec::new(),
            ..SessionConfig::default()
        };
        let err = Session::new(Catalog::san_francisco(), config).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::NoPlayers)));
    }

    #[test]
    fn short_tick_fires_nothing() {
        let mut session = Session::with_defaults(1);
        let before = session.state().clone();
        session.on_tick(Duration::from_millis(99));
        assert_eq!(session.state(), &before);
        assert_eq!(session.scheduler().collision_timer().remaining(), Duration::from_millis(1));
    }

    #[test]
    fn spawn_timer_fills_arena() {
        let mut session = Session::with_defaults(2);
        session.dispatch(Action::move_by(PlayerId::PRIMARY, Vec2::new(-1_000.0, -1_000.0)));
        session.on_tick(Duration::from_millis(2_000));
        let state = session.state();
        assert!(state.arena.len() == 1 || state.is_in_combat() || state.players[0].stats.health < 100);
    }

    #[test]
    fn reset_with_seed_changes_config() {
        let mut session = Session::with_defaults(1);
        session.reset(Some(9));
        assert_eq!(session.config().seed, 9);
        assert_eq!(session.state(), &SessionState::initial(session.config()));
    }
}
