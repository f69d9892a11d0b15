//! Control resolver: `ResetGame` and `SetMessage`.
//!
//! Both are accepted after game over.

use crate::action::{Action, ActionKind};
use crate::state::SessionState;

use super::{ResolveContext, Resolver};

/// Resolver for session control actions.
#[derive(Debug, Clone, Default)]
pub struct ControlResolver;

impl ControlResolver {
    /// Creates a new control resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Resolver for ControlResolver {
    fn handles(&self) -> &[ActionKind] {
        &[ActionKind::ResetGame, ActionKind::SetMessage]
    }

    fn resolve(
        &self,
        action: &Action,
        ctx: &ResolveContext<'_>,
        _current: &SessionState,
        next: &mut SessionState,
    ) {
        match action {
            Action::ResetGame => *next = SessionState::initial(ctx.config),
            Action::SetMessage(text) => next.message.clone_from(text),
            _ => {}
        }
    }
}
