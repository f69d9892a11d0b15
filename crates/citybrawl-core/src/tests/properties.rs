//! Property-based tests over generated action sequences.
//!
//! Sequences mix movement, spawns, collision checks and combat for both
//! players of a two-player session, then check the state invariants after
//! every step.

use glam::Vec2;
use proptest::prelude::*;

use crate::action::Action;
use crate::config::SessionConfig;
use crate::entity::CombatStats;
use crate::player::PlayerId;
use crate::resolver::{attack_damage, counter_damage, flee_penalty};
use crate::state::SessionState;

use super::helpers::{enemy, obstacle, reduce_all, reducer_with};

fn player_id() -> impl Strategy<Value = PlayerId> {
    prop_oneof![Just(PlayerId::PRIMARY), Just(PlayerId::SECONDARY)]
}

fn point() -> impl Strategy<Value = Vec2> {
    (-200.0f32..1000.0, -200.0f32..800.0).prop_map(|(x, y)| Vec2::new(x, y))
}

fn stats() -> impl Strategy<Value = CombatStats> {
    (1u32..80, 0u32..20, 0u32..12).prop_map(|(health, attack, defense)| CombatStats::new(health, attack, defense, 2))
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => (player_id(), -150.0f32..150.0, -150.0f32..150.0)
            .prop_map(|(who, dx, dy)| Action::move_by(who, Vec2::new(dx, dy))),
        3 => (point(), stats()).prop_map(|(at, stats)| Action::SpawnEnemy(enemy("Matt", stats, at))),
        1 => point().prop_map(|at| Action::SpawnObstacle(obstacle("Fire Hydrant", at))),
        3 => Just(Action::CheckCollision),
        3 => player_id().prop_map(|who| Action::AttackEnemy { who }),
        1 => player_id().prop_map(|who| Action::Defend { who }),
        1 => player_id().prop_map(|who| Action::Flee { who }),
        1 => player_id().prop_map(|who| Action::AdvanceLocation { who }),
    ]
}

fn actions(max: usize) -> impl Strategy<Value = Vec<Action>> {
    prop::collection::vec(action(), 0..max)
}

fn check_invariants(state: &SessionState, config: &SessionConfig) -> Result<(), TestCaseError> {
    prop_assert!(state.arena.enemy_count() <= config.max_enemies);
    for player in &state.players {
        prop_assert!(config.playfield.contains(player.position));
        prop_assert!(player.stats.health <= 100);
        prop_assert_eq!(player.score, player.enemies_defeated * config.rewards.score);
        prop_assert!(player.level >= 1 && player.level <= config.max_level);
    }
    prop_assert_eq!(
        state.is_game_over,
        state.players.iter().any(|p| p.is_defeated())
    );
    if let Some(who) = state.active_combatant() {
        prop_assert!(state.player(who).is_some());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Every intermediate state keeps the bounds, capacity and game-over
    /// invariants.
    #[test]
    fn prop_invariants_hold_after_every_action(sequence in actions(120)) {
        let config = SessionConfig::two_player();
        let (reducer, mut state) = reducer_with(config.clone());
        for action in &sequence {
            state = reducer.reduce(&state, action);
            check_invariants(&state, &config)?;
        }
    }

    /// Reset from any reachable state is the initial state, and resetting
    /// twice changes nothing.
    #[test]
    fn prop_reset_is_idempotent(sequence in actions(80)) {
        let config = SessionConfig::two_player();
        let (reducer, state) = reducer_with(config.clone());
        let reached = reduce_all(&reducer, &state, &sequence);

        let once = reducer.reduce(&reached, &Action::ResetGame);
        let twice = reducer.reduce(&once, &Action::ResetGame);
        prop_assert_eq!(&once, &SessionState::initial(&config));
        prop_assert_eq!(once, twice);
    }

    /// The reducer is a pure function of state and action.
    #[test]
    fn prop_reduce_is_deterministic(sequence in actions(60)) {
        let (reducer, state) = reducer_with(SessionConfig::two_player());
        prop_assert_eq!(
            reduce_all(&reducer, &state, &sequence),
            reduce_all(&reducer, &state, &sequence)
        );
    }

    /// Only reset and messages get past a finished game.
    #[test]
    fn prop_game_over_is_terminal(sequence in actions(40)) {
        let (reducer, mut state) = reducer_with(SessionConfig::two_player());
        state.players[1].stats.health = 0;
        state.is_game_over = true;

        let after = reduce_all(&reducer, &state, &sequence);
        prop_assert_eq!(after, state);
    }

    /// Attacks and counterattacks always land at least one point.
    #[test]
    fn prop_damage_floor(attack in any::<u32>(), defense in any::<u32>(), defending in any::<bool>()) {
        prop_assert!(attack_damage(attack, defense) >= 1);
        prop_assert!(counter_damage(attack, defense, defending) >= 1);
        prop_assert!(counter_damage(attack, defense, true) <= counter_damage(attack, defense, false));
        prop_assert!(flee_penalty(attack, defense) <= attack);
    }
}
