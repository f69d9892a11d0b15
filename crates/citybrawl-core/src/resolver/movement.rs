//! Movement resolver.
//!
//! Handles `MovePlayer`: the new position is the old one plus the delta,
//! clamped to the playfield. Nobody moves during combat.

use crate::action::{Action, ActionKind};
use crate::state::SessionState;

use super::{ResolveContext, Resolver};

/// Resolver for player movement.
///
/// # Example
///
/// ```
/// use citybrawl_core::action::ActionKind;
/// use citybrawl_core::resolver::{MovementResolver, Resolver};
///
/// let resolver = MovementResolver::new();
/// assert_eq!(resolver.handles(), &[ActionKind::MovePlayer]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MovementResolver;

impl MovementResolver {
    /// Creates a new movement resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Resolver for MovementResolver {
    fn handles(&self) -> &[ActionKind] {
        &[ActionKind::MovePlayer]
    }

    fn resolve(
        &self,
        action: &Action,
        ctx: &ResolveContext<'_>,
        current: &SessionState,
        next: &mut SessionState,
    ) {
        let Action::MovePlayer { who, delta } = action else {
            return;
        };
        // NaN would slip through clamp.
        if current.is_in_combat() || !delta.is_finite() {
            return;
        }
        let Some(origin) = current.position_of(*who) else {
            return;
        };
        if let Some(player) = next.player_mut(*who) {
            player.position = ctx.config.playfield.clamp(origin + *delta);
        }
    }
}
