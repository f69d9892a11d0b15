//! Players.
//!
//! A session holds an ordered roster of 1..N players. Each has its own
//! position, stats and progression, and is addressed by [`PlayerId`], which is
//! its index in the roster.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::PlayerTemplate;
use crate::entity::components::CombatStats;

/// Identifier of a player slot.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(u8);

impl PlayerId {
    /// The first (and in single-player, only) player.
    pub const PRIMARY: Self = Self(0);
    /// The second player in two-player sessions.
    pub const SECONDARY: Self = Self(1);

    /// Creates a player id from a roster index.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Roster index of this player.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlayerId({})", self.0)
    }
}

impl fmt::Display for PlayerId {
    /// Players are shown as letters: A, B, C, ...
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            n @ 0..=25 => write!(f, "{}", char::from(b'A' + n)),
            n => write!(f, "P{n}"),
        }
    }
}

/// A player on the playfield.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Roster slot.
    pub id: PlayerId,
    /// Position on the playfield.
    pub position: Vec2,
    /// Combat stats.
    pub stats: CombatStats,
    /// Accumulated score.
    pub score: u32,
    /// Current level, starting at 1.
    pub level: u32,
    /// Accumulated experience.
    pub experience: u32,
    /// Number of enemies this player has defeated.
    pub enemies_defeated: u32,
    /// Halves incoming counterattack damage for the next exchange.
    pub is_defending: bool,
}

impl Player {
    /// Creates a fresh player from its slot template.
    #[must_use]
    pub fn from_template(id: PlayerId, template: &PlayerTemplate) -> Self {
        Self {
            id,
            position: template.start,
            stats: template.stats,
            score: 0,
            level: 1,
            experience: 0,
            enemies_defeated: 0,
            is_defending: false,
        }
    }

    /// Returns true once health has reached 0.
    #[must_use]
    pub const fn is_defeated(&self) -> bool {
        self.stats.is_defeated()
    }
}
