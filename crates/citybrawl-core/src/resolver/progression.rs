//! Progression: rewards, levels and location changes.
//!
//! Location changes happen in two ways. Defeating an enemy runs the check
//! implicitly, and `AdvanceLocation` runs it on request. Either way the
//! session moves at most one location forward per check and the arena is
//! cleared so the new area starts fresh.

use crate::action::{Action, ActionKind};
use crate::config::SessionConfig;
use crate::player::{Player, PlayerId};
use crate::state::SessionState;

use super::{append_line, ResolveContext, Resolver};

/// Level reached with `experience` points, capped at the configured maximum.
#[must_use]
pub fn level_for(experience: u32, config: &SessionConfig) -> u32 {
    let per_level = config.experience_per_level.max(1);
    (1 + experience / per_level).min(config.max_level)
}

/// Flavor text shown for a level.
#[must_use]
pub const fn level_description(level: u32) -> Option<&'static str> {
    match level {
        1 => Some("Welcome to San Francisco! Explore the city and defeat enemies to gain XP."),
        2 => Some("The city is getting more dangerous. Watch out for stronger enemies!"),
        3 => Some("You've reached the final level. Defeat the boss to win!"),
        _ => None,
    }
}

/// Credits `player` with a defeated enemy. Returns the new level if it went up.
pub(crate) fn award_victory(player: &mut Player, config: &SessionConfig) -> Option<u32> {
    player.score = player.score.saturating_add(config.rewards.score);
    player.experience = player.experience.saturating_add(config.rewards.experience);
    player.enemies_defeated = player.enemies_defeated.saturating_add(1);

    let level = level_for(player.experience, config);
    if level > player.level {
        player.level = level;
        Some(level)
    } else {
        None
    }
}

/// Moves the session to the next location if `who` meets its gate.
///
/// Reads the progress of `who` from `next`, since a victory earlier in the
/// same action may have just changed it. Returns true on a location change.
pub(crate) fn advance_if_qualified(
    ctx: &ResolveContext<'_>,
    next: &mut SessionState,
    who: PlayerId,
) -> bool {
    let Some(defeated) = next.player(who).map(|player| player.enemies_defeated) else {
        return false;
    };
    let target = next.location_index + 1;
    let Some(location) = ctx.catalog.get(target) else {
        return false;
    };
    if !location.admits(defeated) {
        return false;
    }

    next.location_index = target;
    next.arena.clear();
    append_line(&mut next.message, &format!("Entering {}...", location.name));
    tracing::debug!(
        target: "citybrawl::reducer",
        player = %who,
        location = %location.name,
        index = target,
        "location.changed"
    );
    true
}

/// Resolver for explicit location changes.
#[derive(Debug, Clone, Default)]
pub struct ProgressionResolver;

impl ProgressionResolver {
    /// Creates a new progression resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Resolver for ProgressionResolver {
    fn handles(&self) -> &[ActionKind] {
        &[ActionKind::AdvanceLocation]
    }

    fn resolve(
        &self,
        action: &Action,
        ctx: &ResolveContext<'_>,
        current: &SessionState,
        next: &mut SessionState,
    ) {
        let Action::AdvanceLocation { who } = action else {
            return;
        };
        if current.is_in_combat() || current.player(*who).is_none() {
            return;
        }
        next.message.clear();
        if advance_if_qualified(ctx, next, *who) {
            return;
        }

        // Explain the refusal when there is a gate to explain.
        let target = ctx.catalog.get(current.location_index + 1);
        let defeated = current.player(*who).map_or(0, |player| player.enemies_defeated);
        next.message = match target.and_then(|l| l.required_enemies_defeated.map(|r| (l, r))) {
            Some((location, required)) => format!(
                "Defeat {} more enemies to enter {}.",
                required.saturating_sub(defeated),
                location.name
            ),
            None => current.message.clone(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::entity::{EntityInner, ObstacleComponents};
    use glam::Vec2;

    fn advance(catalog: &Catalog, config: &SessionConfig, state: &SessionState) -> SessionState {
        let ctx = ResolveContext { catalog, config };
        let mut next = state.clone();
        ProgressionResolver::new().resolve(
            &Action::AdvanceLocation {
                who: PlayerId::PRIMARY,
            },
            &ctx,
            state,
            &mut next,
        );
        next
    }

    mod level_tests {
        use super::*;

        #[test]
        fn level_follows_experience() {
            let config = SessionConfig::default();
            assert_eq!(level_for(0, &config), 1);
            assert_eq!(level_for(99, &config), 1);
            assert_eq!(level_for(100, &config), 2);
            assert_eq!(level_for(10_000, &config), 3);
        }

        #[test]
        fn victory_grants_rewards_and_levels() {
            let config = SessionConfig::default();
            let mut state = SessionState::initial(&config);
            let player = &mut state.players[0];

            assert_eq!(award_victory(player, &config), None);
            assert_eq!(award_victory(player, &config), Some(2));
            assert_eq!(player.score, 200);
            assert_eq!(player.experience, 100);
            assert_eq!(player.enemies_defeated, 2);
        }

        #[test]
        fn descriptions_cover_reachable_levels() {
            let config = SessionConfig::default();
            for level in 1..=config.max_level {
                assert!(level_description(level).is_some());
            }
            assert!(level_description(0).is_none());
        }
    }

    mod advance_tests {
        use super::*;

        #[test]
        fn qualified_player_advances_and_clears_arena() {
            let catalog = Catalog::san_francisco();
            let config = SessionConfig::default();
            let mut state = SessionState::initial(&config);
            state.players[0].enemies_defeated = 3;
            state.arena.spawn(EntityInner::Obstacle(ObstacleComponents::new("Lantern", "l.png", Vec2::ONE)));

            let next = advance(&catalog, &config, &state);
            assert_eq!(next.location_index, 1);
            assert!(next.arena.is_empty());
            assert_eq!(next.message, "Entering Fisherman's Wharf...");
        }

        #[test]
        fn unqualified_player_stays() {
            let catalog = Catalog::san_francisco();
            let config = SessionConfig::default();
            let mut state = SessionState::initial(&config);
            state.players[0].enemies_defeated = 1;

            let next = advance(&catalog, &config, &state);
            assert_eq!(next.location_index, 0);
            assert_eq!(next.message, "Defeat 2 more enemies to enter Fisherman's Wharf.");
        }

        #[test]
        fn last_location_is_terminal() {
            let catalog = Catalog::san_francisco();
            let config = SessionConfig::default();
            let mut state = SessionState::initial(&config);
            state.location_index = catalog.len() - 1;
            state.players[0].enemies_defeated = 100;

            let next = advance(&catalog, &config, &state);
            assert_eq!(next, state);
        }

        #[test]
        fn advances_one_location_at_a_time() {
            let catalog = Catalog::san_francisco();
            let config = SessionConfig::default();
            let mut state = SessionState::initial(&config);
            state.players[0].enemies_defeated = 20;

            let once = advance(&catalog, &config, &state);
            let twice = advance(&catalog, &config, &once);
            assert_eq!(once.location_index, 1);
            assert_eq!(twice.location_index, 2);
        }
    }
}
