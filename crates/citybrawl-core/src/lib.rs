//! # City Brawl Core
//!
//! Deterministic session core for City Brawl, a small exploration and combat
//! game set in San Francisco.
//!
//! This crate owns all game state and every rule that changes it. Rendering,
//! input mapping and menus belong to the host, which reads [`SessionState`]
//! and sends [`Action`]s.
//!
//! ## Architecture
//!
//! - **Catalog**: locations and the enemy/obstacle templates spawned in them
//! - **Reducer**: `reduce(state, action) -> state'`, routed to resolvers
//! - **Scheduler**: spawn and collision timers advanced by explicit deltas
//! - **Session**: owner object tying the three together
//!
//! ## Usage
//!
//! ```
//! use std::time::Duration;
//!
//! use citybrawl_core::{Action, Session};
//!
//! let mut session = Session::with_defaults(7);
//! session.on_tick(Duration::from_secs(4));
//! if session.state().is_in_combat() {
//!     session.dispatch(Action::attack());
//! }
//! let replay_check = session.state_hash();
//! # let _ = replay_check;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod action;
pub mod arena;
pub mod catalog;
pub mod collision;
pub mod config;
pub mod entity;
pub mod error;
pub mod factory;
pub mod hash;
pub mod player;
pub mod reducer;
pub mod resolver;
pub mod scheduler;
pub mod session;
pub mod state;

#[cfg(test)]
mod tests;

pub use action::{Action, ActionKind};
pub use catalog::Catalog;
pub use config::SessionConfig;
pub use error::{Error, Result};
pub use session::Session;
pub use state::SessionState;
