//! Session state: the aggregate root every action transforms.
//!
//! A [`SessionState`] is a value. The reducer never edits one in place; it
//! clones the current state and writes the changes into the clone.
//!
//! Combat is modelled as an optional [`Engagement`]. While one is present the
//! session is in combat and the engaged enemy lives in the engagement, not in
//! the arena, so the arena holds only enemies nobody is fighting.

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::config::SessionConfig;
use crate::entity::{EnemyComponents, EntityId, ObstacleComponents};
use crate::player::{Player, PlayerId};

/// Stream index of the combat RNG (the scheduler uses stream 0).
pub(crate) const COMBAT_STREAM: u64 = 1;

/// A player locked in combat with one enemy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Engagement {
    /// The active combatant.
    pub player: PlayerId,
    /// ID the enemy had (or was given) when combat started.
    pub enemy_id: EntityId,
    /// The enemy being fought, with its current health.
    pub enemy: EnemyComponents,
}

/// Complete snapshot of one game in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Index into the catalog's locations.
    pub location_index: usize,
    /// Player roster, indexed by [`PlayerId`].
    pub players: Vec<Player>,
    /// Enemies and obstacles on the playfield.
    pub arena: Arena,
    /// Current fight, if any.
    pub combat: Option<Engagement>,
    /// Set once a player's health reaches 0. Cleared only by a reset.
    pub is_game_over: bool,
    /// Last user-facing message. Lines are separated by `\n`.
    pub message: String,
    /// Random stream for probabilistic combat outcomes.
    pub rng: ChaCha8Rng,
}

impl SessionState {
    /// The canonical initial state for `config`.
    ///
    /// Depends only on `config`, so resetting to it is idempotent.
    #[must_use]
    pub fn initial(config: &SessionConfig) -> Self {
        let players = config
            .players
            .iter()
            .enumerate()
            .map(|(index, template)| {
                let id = PlayerId::new(u8::try_from(index).unwrap_or(u8::MAX));
                Player::from_template(id, template)
            })
            .collect();

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        rng.set_stream(COMBAT_STREAM);

        Self {
            location_index: 0,
            players,
            arena: Arena::new(),
            combat: None,
            is_game_over: false,
            message: String::new(),
            rng,
        }
    }

    /// Returns true while a fight is in progress.
    #[must_use]
    pub const fn is_in_combat(&self) -> bool {
        self.combat.is_some()
    }

    /// The player currently fighting, if any.
    #[must_use]
    pub fn active_combatant(&self) -> Option<PlayerId> {
        self.combat.as_ref().map(|engagement| engagement.player)
    }

    /// The enemy currently being fought, if any.
    #[must_use]
    pub fn current_enemy(&self) -> Option<&EnemyComponents> {
        self.combat.as_ref().map(|engagement| &engagement.enemy)
    }

    /// Returns a player by id.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.index())
    }

    /// Returns a mutable player by id.
    #[must_use]
    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id.index())
    }

    /// Position of a player, if it exists.
    #[must_use]
    pub fn position_of(&self, id: PlayerId) -> Option<Vec2> {
        self.player(id).map(|player| player.position)
    }

    /// Enemies waiting on the playfield, in spawn order.
    pub fn enemies(&self) -> impl Iterator<Item = &EnemyComponents> + '_ {
        self.arena.enemies().map(|(_, enemy)| enemy)
    }

    /// Obstacles on the playfield, in spawn order.
    pub fn obstacles(&self) -> impl Iterator<Item = &ObstacleComponents> + '_ {
        self.arena.obstacles().map(|(_, obstacle)| obstacle)
    }

    /// Combined score of all players.
    #[must_use]
    pub fn total_score(&self) -> u32 {
        self.players.iter().map(|player| player.score).sum()
    }
}
