//! Resolvers: the write phase of the reducer.
//!
//! Each resolver declares which action kinds it handles via
//! [`Resolver::handles()`]. The reducer clones the current state into `next`
//! and hands the action to every resolver that claims its kind.
//!
//! # Invariants
//!
//! - Preconditions are checked against `current`; changes are written to `next`
//! - Resolvers MUST be deterministic given the same state and action
//! - A precondition that does not hold makes the action a silent no-op,
//!   optionally with a message; resolvers never fail
//!
//! # Available Resolvers
//!
//! - [`MovementResolver`]: player movement
//! - [`SpawnResolver`]: adding enemies and obstacles, capacity enforcement
//! - [`CollisionResolver`]: contact between players and entities
//! - [`CombatResolver`]: combat entry, attack, defend, flee, exit
//! - [`ProgressionResolver`]: location changes on request
//! - [`ControlResolver`]: reset and messages

mod collision;
mod combat;
mod control;
mod movement;
mod progression;
mod spawn;

pub use collision::CollisionResolver;
pub use combat::{attack_damage, counter_damage, flee_penalty, CombatResolver, DEFEND_MESSAGE};
pub use control::ControlResolver;
pub use movement::MovementResolver;
pub use progression::{level_description, level_for, ProgressionResolver};
pub use spawn::{SpawnResolver, CAPACITY_MESSAGE};

use crate::action::{Action, ActionKind};
use crate::catalog::Catalog;
use crate::config::SessionConfig;
use crate::player::{Player, PlayerId};
use crate::state::SessionState;

/// Read-only session data every resolver may consult.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    /// World catalog.
    pub catalog: &'a Catalog,
    /// Session tuning.
    pub config: &'a SessionConfig,
}

/// Resolver applies one action to the next state.
///
/// # Example
///
/// ```
/// use citybrawl_core::action::{Action, ActionKind};
/// use citybrawl_core::resolver::{ResolveContext, Resolver};
/// use citybrawl_core::state::SessionState;
///
/// struct Shout;
///
/// impl Resolver for Shout {
///     fn handles(&self) -> &[ActionKind] {
///         &[ActionKind::SetMessage]
///     }
///
///     fn resolve(
///         &self,
///         action: &Action,
///         _ctx: &ResolveContext<'_>,
///         _current: &SessionState,
///         next: &mut SessionState,
///     ) {
///         if let Action::SetMessage(text) = action {
///             next.message = text.to_uppercase();
///         }
///     }
/// }
/// ```
pub trait Resolver: Send + Sync {
    /// Returns the action kinds this resolver handles.
    fn handles(&self) -> &[ActionKind];

    /// Applies `action` by mutating `next`.
    ///
    /// `next` starts as a clone of `current`.
    fn resolve(
        &self,
        action: &Action,
        ctx: &ResolveContext<'_>,
        current: &SessionState,
        next: &mut SessionState,
    );
}

/// The resolvers a session runs with, one per action family.
#[must_use]
pub fn default_resolvers() -> Vec<Box<dyn Resolver>> {
    vec![
        Box::new(MovementResolver::new()),
        Box::new(SpawnResolver::new()),
        Box::new(CollisionResolver::new()),
        Box::new(CombatResolver::new()),
        Box::new(ProgressionResolver::new()),
        Box::new(ControlResolver::new()),
    ]
}

/// Appends a line to the session message.
pub(crate) fn append_line(message: &mut String, line: &str) {
    if !message.is_empty() {
        message.push('\n');
    }
    message.push_str(line);
}

/// Sets game over if `player`'s health is gone.
pub(crate) fn check_defeat(next: &mut SessionState, player: PlayerId) {
    if next.player(player).is_some_and(Player::is_defeated) {
        next.is_game_over = true;
        tracing::debug!(target: "citybrawl::reducer", %player, "session.game_over");
    }
}
