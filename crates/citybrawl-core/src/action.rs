//! Actions: the input vocabulary of the reducer.
//!
//! Both the presentation layer and the [`Scheduler`](crate::scheduler::Scheduler)
//! talk to a session only through [`Action`] values. Each action maps to an
//! [`ActionKind`], which the reducer uses to route it to a resolver.
//!
//! # Example
//!
//! ```
//! use citybrawl_core::action::{Action, ActionKind};
//! use citybrawl_core::player::PlayerId;
//! use glam::Vec2;
//!
//! let step = Action::move_by(PlayerId::SECONDARY, Vec2::new(5.0, 0.0));
//! assert_eq!(step.kind(), ActionKind::MovePlayer);
//! assert_eq!(step.actor(), Some(PlayerId::SECONDARY));
//! assert!(!step.kind().allowed_after_game_over());
//! ```

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::{EnemyComponents, ObstacleComponents};
use crate::player::PlayerId;

/// Discriminant of an [`Action`], used for resolver routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Move a player by a delta.
    MovePlayer,
    /// Add an enemy to the arena.
    SpawnEnemy,
    /// Add an obstacle to the arena.
    SpawnObstacle,
    /// Test players against live entities.
    CheckCollision,
    /// Enter combat with a given enemy.
    StartCombat,
    /// Strike the current enemy.
    AttackEnemy,
    /// Brace for the next counterattack.
    Defend,
    /// Try to leave combat with a penalty.
    Flee,
    /// Leave combat without reward or penalty.
    EndCombat,
    /// Move to the next location if its gate allows.
    AdvanceLocation,
    /// Return to the initial state.
    ResetGame,
    /// Replace the user-facing message.
    SetMessage,
}

impl ActionKind {
    /// Kinds the reducer still accepts once the game is over.
    #[must_use]
    pub const fn allowed_after_game_over(self) -> bool {
        matches!(self, Self::ResetGame | Self::SetMessage)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MovePlayer => "MovePlayer",
            Self::SpawnEnemy => "SpawnEnemy",
            Self::SpawnObstacle => "SpawnObstacle",
            Self::CheckCollision => "CheckCollision",
            Self::StartCombat => "StartCombat",
            Self::AttackEnemy => "AttackEnemy",
            Self::Defend => "Defend",
            Self::Flee => "Flee",
            Self::EndCombat => "EndCombat",
            Self::AdvanceLocation => "AdvanceLocation",
            Self::ResetGame => "ResetGame",
            Self::SetMessage => "SetMessage",
        };
        f.write_str(name)
    }
}

/// A request to change the session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Move `who` by `delta`, clamped to the playfield.
    MovePlayer {
        /// Acting player.
        who: PlayerId,
        /// Displacement.
        delta: Vec2,
    },
    /// Add an enemy unless the arena is at capacity.
    SpawnEnemy(EnemyComponents),
    /// Add an obstacle. Obstacles are unbounded.
    SpawnObstacle(ObstacleComponents),
    /// Resolve at most one player/entity contact.
    CheckCollision,
    /// Engage `enemy` directly, bypassing collision.
    StartCombat {
        /// Player entering combat.
        who: PlayerId,
        /// The opponent.
        enemy: EnemyComponents,
    },
    /// Attack the current enemy.
    AttackEnemy {
        /// Acting player.
        who: PlayerId,
    },
    /// Defend against the next counterattack.
    Defend {
        /// Acting player.
        who: PlayerId,
    },
    /// Run from combat.
    Flee {
        /// Acting player.
        who: PlayerId,
    },
    /// Leave combat, discarding the enemy.
    EndCombat {
        /// Acting player.
        who: PlayerId,
    },
    /// Move on to the next location if `who` qualifies.
    AdvanceLocation {
        /// Player whose progress is checked.
        who: PlayerId,
    },
    /// Discard all progress.
    ResetGame,
    /// Replace the message shown to the user.
    SetMessage(String),
}

impl Action {
    /// Returns the kind of this action for resolver routing.
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::MovePlayer { .. } => ActionKind::MovePlayer,
            Self::SpawnEnemy(_) => ActionKind::SpawnEnemy,
            Self::SpawnObstacle(_) => ActionKind::SpawnObstacle,
            Self::CheckCollision => ActionKind::CheckCollision,
            Self::StartCombat { .. } => ActionKind::StartCombat,
            Self::AttackEnemy { .. } => ActionKind::AttackEnemy,
            Self::Defend { .. } => ActionKind::Defend,
            Self::Flee { .. } => ActionKind::Flee,
            Self::EndCombat { .. } => ActionKind::EndCombat,
            Self::AdvanceLocation { .. } => ActionKind::AdvanceLocation,
            Self::ResetGame => ActionKind::ResetGame,
            Self::SetMessage(_) => ActionKind::SetMessage,
        }
    }

    /// The player an action is issued for, if it names one.
    #[must_use]
    pub const fn actor(&self) -> Option<PlayerId> {
        match self {
            Self::MovePlayer { who, .. }
            | Self::StartCombat { who, .. }
            | Self::AttackEnemy { who }
            | Self::Defend { who }
            | Self::Flee { who }
            | Self::EndCombat { who }
            | Self::AdvanceLocation { who } => Some(*who),
            Self::SpawnEnemy(_)
            | Self::SpawnObstacle(_)
            | Self::CheckCollision
            | Self::ResetGame
            | Self::SetMessage(_) => None,
        }
    }

    /// `MovePlayer` for `who`.
    #[must_use]
    pub const fn move_by(who: PlayerId, delta: Vec2) -> Self {
        Self::MovePlayer { who, delta }
    }

    /// `AttackEnemy` for the primary player.
    #[must_use]
    pub const fn attack() -> Self {
        Self::AttackEnemy {
            who: PlayerId::PRIMARY,
        }
    }

    /// `Defend` for the primary player.
    #[must_use]
    pub const fn defend() -> Self {
        Self::Defend {
            who: PlayerId::PRIMARY,
        }
    }

    /// `Flee` for the primary player.
    #[must_use]
    pub const fn flee() -> Self {
        Self::Flee {
            who: PlayerId::PRIMARY,
        }
    }

    /// `SetMessage` from anything string-like.
    #[must_use]
    pub fn message(text: impl Into<String>) -> Self {
        Self::SetMessage(text.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_reset_and_message_survive_game_over() {
        let allowed: Vec<_> = [
            ActionKind::MovePlayer,
            ActionKind::SpawnEnemy,
            ActionKind::SpawnObstacle,
            ActionKind::CheckCollision,
            ActionKind::StartCombat,
            ActionKind::AttackEnemy,
            ActionKind::Defend,
            ActionKind::Flee,
            ActionKind::EndCombat,
            ActionKind::AdvanceLocation,
            ActionKind::ResetGame,
            ActionKind::SetMessage,
        ]
        .into_iter()
        .filter(|kind| kind.allowed_after_game_over())
        .collect();
        assert_eq!(allowed, vec![ActionKind::ResetGame, ActionKind::SetMessage]);
    }

    #[test]
    fn shorthands_target_primary() {
        assert_eq!(Action::attack().actor(), Some(PlayerId::PRIMARY));
        assert_eq!(Action::defend().kind(), ActionKind::Defend);
        assert_eq!(Action::flee().kind(), ActionKind::Flee);
        assert_eq!(Action::CheckCollision.actor(), None);
    }

    #[test]
    fn serializes_with_variant_names() {
        let json = serde_json::to_string(&Action::message("hi")).unwrap();
        assert_eq!(json, r#"{"SetMessage":"hi"}"#);
        let back: Action = serde_json::from_str(r#"{"AttackEnemy":{"who":1}}"#).unwrap();
        assert_eq!(back.actor(), Some(PlayerId::SECONDARY));
    }
}
