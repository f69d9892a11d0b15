//! Scheduler: the periodic driver that turns elapsed time into actions.
//!
//! Two timers run while the session is neither in combat nor over:
//!
//! - **Spawn** (default 2 s): a Bernoulli draw picks enemy or obstacle, the
//!   [`EntityFactory`] builds it, and a spawn action is emitted. At enemy
//!   capacity nothing spawns, of either kind, and the capacity message is
//!   emitted instead.
//! - **Collision** (default 100 ms): emits `CheckCollision`.
//!
//! The scheduler owns no wall clock. The host advances it by a delta and it
//! reports which timers fire, in chronological order. Timers restart from
//! zero whenever the session's phase changes (combat entered or left, game
//! over, new location) and on reset, so a timer never fires into a session
//! that moved on.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::action::Action;
use crate::catalog::Catalog;
use crate::config::{Playfield, SessionConfig};
use crate::entity::{EntityInner, EntityTag};
use crate::factory::EntityFactory;
use crate::resolver::CAPACITY_MESSAGE;
use crate::state::SessionState;

/// Stream index of the scheduler RNG.
const SCHEDULER_STREAM: u64 = 0;

/// Which timer fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// The spawn timer.
    Spawn,
    /// The collision timer.
    Collision,
}

/// A periodic timer driven by explicit time deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    period: Duration,
    elapsed: Duration,
}

impl Timer {
    /// Creates a timer that first fires after one full `period`.
    #[must_use]
    pub const fn new(period: Duration) -> Self {
        Self {
            period,
            elapsed: Duration::ZERO,
        }
    }

    /// The firing period.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Time until the next firing.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.period.saturating_sub(self.elapsed)
    }

    /// Lets `dt` pass, without firing.
    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.period);
    }

    /// Starts a new period.
    pub fn restart(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

/// The part of the state that decides whether timers run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Phase {
    in_combat: bool,
    game_over: bool,
    location_index: usize,
}

impl Phase {
    fn of(state: &SessionState) -> Self {
        Self {
            in_combat: state.is_in_combat(),
            game_over: state.is_game_over,
            location_index: state.location_index,
        }
    }

    const fn is_running(self) -> bool {
        !self.in_combat && !self.game_over
    }
}

/// Periodic spawn and collision driver.
#[derive(Debug, Clone)]
pub struct Scheduler {
    spawn: Timer,
    collision: Timer,
    enemy_spawn_chance: f64,
    max_enemies: usize,
    playfield: Playfield,
    rng: ChaCha8Rng,
    phase: Option<Phase>,
}

impl Scheduler {
    /// Creates a scheduler for `config` with both timers at zero.
    #[must_use]
    pub fn new(config: &SessionConfig) -> Self {
        let chance = config.enemy_spawn_chance;
        Self {
            spawn: Timer::new(config.spawn_period),
            collision: Timer::new(config.collision_period),
            enemy_spawn_chance: if chance.is_nan() { 0.0 } else { chance.clamp(0.0, 1.0) },
            max_enemies: config.max_enemies,
            playfield: config.playfield,
            rng: seeded(config.seed),
            phase: None,
        }
    }

    /// Returns to the freshly created state for `seed`.
    pub fn reset(&mut self, seed: u64) {
        self.rng = seeded(seed);
        self.restart();
        self.phase = None;
    }

    /// Restarts both timers from zero.
    pub fn restart(&mut self) {
        self.spawn.restart();
        self.collision.restart();
        tracing::debug!(target: "citybrawl::scheduler", "timers.restarted");
    }

    /// Observes `state`, restarting the timers if its phase changed.
    pub fn sync(&mut self, state: &SessionState) {
        let phase = Phase::of(state);
        if self.phase.is_some_and(|previous| previous != phase) {
            self.restart();
        }
        self.phase = Some(phase);
    }

    /// Returns true if timers run in `state`.
    #[must_use]
    pub fn is_running(state: &SessionState) -> bool {
        Phase::of(state).is_running()
    }

    /// The spawn timer.
    #[must_use]
    pub const fn spawn_timer(&self) -> &Timer {
        &self.spawn
    }

    /// The collision timer.
    #[must_use]
    pub const fn collision_timer(&self) -> &Timer {
        &self.collision
    }

    /// The first timer due within `budget` and the wait until it fires.
    ///
    /// On a tie the spawn timer goes first.
    #[must_use]
    pub fn next_due(&self, budget: Duration) -> Option<(Trigger, Duration)> {
        let spawn = self.spawn.remaining();
        let collision = self.collision.remaining();
        let (trigger, wait) = if spawn <= collision {
            (Trigger::Spawn, spawn)
        } else {
            (Trigger::Collision, collision)
        };
        (wait <= budget).then_some((trigger, wait))
    }

    /// Lets `dt` pass on both timers.
    pub fn advance(&mut self, dt: Duration) {
        self.spawn.advance(dt);
        self.collision.advance(dt);
    }

    /// Fires `trigger`: restarts its timer and returns the action to dispatch.
    pub fn fire(&mut self, trigger: Trigger, state: &SessionState, catalog: &Catalog) -> Option<Action> {
        match trigger {
            Trigger::Collision => {
                self.collision.restart();
                Some(Action::CheckCollision)
            }
            Trigger::Spawn => {
                self.spawn.restart();
                self.spawn_action(state, catalog)
            }
        }
    }

    fn spawn_action(&mut self, state: &SessionState, catalog: &Catalog) -> Option<Action> {
        if state.arena.enemy_count() >= self.max_enemies {
            tracing::debug!(target: "citybrawl::scheduler", "spawn.skipped");
            return Some(Action::message(CAPACITY_MESSAGE));
        }
        let kind = if self.rng.gen_bool(self.enemy_spawn_chance) {
            EntityTag::Enemy
        } else {
            EntityTag::Obstacle
        };

        let location = catalog.get(state.location_index)?;
        let inner = EntityFactory::spawn(location, kind, &self.playfield, &mut self.rng)?;
        tracing::debug!(
            target: "citybrawl::scheduler",
            %kind,
            name = inner.name(),
            location = %location.name,
            "spawn.fired"
        );
        Some(match inner {
            EntityInner::Enemy(enemy) => Action::SpawnEnemy(enemy),
            EntityInner::Obstacle(obstacle) => Action::SpawnObstacle(obstacle),
        })
    }
}

fn seeded(seed: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(SCHEDULER_STREAM);
    rng
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{CombatStats, EnemyComponents, EntityId};
    use crate::player::PlayerId;
    use crate::state::Engagement;
    use glam::Vec2;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    mod timer_tests {
        use super::*;

        #[test]
        fn remaining_counts_down() {
            let mut timer = Timer::new(ms(100));
            timer.advance(ms(30));
            assert_eq!(timer.remaining(), ms(70));
            timer.advance(ms(500));
            assert_eq!(timer.remaining(), Duration::ZERO);
            timer.restart();
            assert_eq!(timer.remaining(), ms(100));
        }
    }

    mod due_tests {
        use super::*;

        #[test]
        fn collision_is_due_first_by_default() {
            let scheduler = Scheduler::new(&SessionConfig::default());
            assert_eq!(scheduler.next_due(ms(99)), None);
            assert_eq!(scheduler.next_due(ms(100)), Some((Trigger::Collision, ms(100))));
        }

        #[test]
        fn spawn_wins_ties() {
            let config = SessionConfig {
                spawn_period: ms(100),
                ..SessionConfig::default()
            };
            let scheduler = Scheduler::new(&config);
            assert_eq!(scheduler.next_due(ms(100)), Some((Trigger::Spawn, ms(100))));
        }

        #[test]
        fn firing_restarts_only_that_timer() {
            let catalog = Catalog::san_francisco();
            let config = SessionConfig::default();
            let state = SessionState::initial(&config);
            let mut scheduler = Scheduler::new(&config);

            scheduler.advance(ms(100));
            let action = scheduler.fire(Trigger::Collision, &state, &catalog);
            assert_eq!(action, Some(Action::CheckCollision));
            assert_eq!(scheduler.collision_timer().remaining(), ms(100));
            assert_eq!(scheduler.spawn_timer().remaining(), ms(1900));
        }
    }

    mod spawn_tests {
        use super::*;

        #[test]
        fn certain_enemy_chance_spawns_enemies() {
            let catalog = Catalog::san_francisco();
            let config = SessionConfig {
                enemy_spawn_chance: 1.0,
                ..SessionConfig::default()
            };
            let state = SessionState::initial(&config);
            let mut scheduler = Scheduler::new(&config);
            for _ in 0..10 {
                let action = scheduler.fire(Trigger::Spawn, &state, &catalog);
                match action {
                    Some(Action::SpawnEnemy(enemy)) => {
                        assert_eq!(enemy.name, "Matt");
                        assert!(config.playfield.contains(enemy.position));
                    }
                    other => panic!("expected enemy spawn, got {other:?}"),
                }
            }
        }

        #[test]
        fn zero_enemy_chance_spawns_obstacles() {
            let catalog = Catalog::san_francisco();
            let config = SessionConfig {
                enemy_spawn_chance: 0.0,
                ..SessionConfig::default()
            };
            let state = SessionState::initial(&config);
            let mut scheduler = Scheduler::new(&config);
            let action = scheduler.fire(Trigger::Spawn, &state, &catalog);
            assert!(matches!(action, Some(Action::SpawnObstacle(_))));
        }

        #[test]
        fn enemy_draw_at_capacity_reports_limit() {
            let catalog = Catalog::san_francisco();
            let config = SessionConfig {
                enemy_spawn_chance: 1.0,
                max_enemies: 1,
                ..SessionConfig::default()
            };
            let mut state = SessionState::initial(&config);
            state.arena.spawn(EntityInner::Enemy(EnemyComponents::new(
                "Matt",
                "m.png",
                Vec2::ZERO,
                CombatStats::new(60, 6, 3, 2),
            )));
            let mut scheduler = Scheduler::new(&config);
            let action = scheduler.fire(Trigger::Spawn, &state, &catalog);
            assert_eq!(action, Some(Action::message(CAPACITY_MESSAGE)));
        }

        #[test]
        fn obstacle_draw_at_capacity_spawns_nothing() {
            let catalog = Catalog::san_francisco();
            let config = SessionConfig {
                enemy_spawn_chance: 0.0,
                max_enemies: 1,
                ..SessionConfig::default()
            };
            let mut state = SessionState::initial(&config);
            state.arena.spawn(EntityInner::Enemy(EnemyComponents::new(
                "Matt",
                "m.png",
                Vec2::ZERO,
                CombatStats::new(60, 6, 3, 2),
            )));
            let mut scheduler = Scheduler::new(&config);
            for _ in 0..20 {
                let action = scheduler.fire(Trigger::Spawn, &state, &catalog);
                assert_eq!(action, Some(Action::message(CAPACITY_MESSAGE)));
            }
            assert_eq!(scheduler.spawn_timer().remaining(), config.spawn_period);
        }

        #[test]
        fn same_seed_same_spawns() {
            let catalog = Catalog::san_francisco();
            let config = SessionConfig::default().with_seed(77);
            let state = SessionState::initial(&config);
            let mut a = Scheduler::new(&config);
            let mut b = Scheduler::new(&config);
            for _ in 0..20 {
                assert_eq!(
                    a.fire(Trigger::Spawn, &state, &catalog),
                    b.fire(Trigger::Spawn, &state, &catalog)
                );
            }
        }
    }

    mod phase_tests {
        use super::*;

        #[test]
        fn phase_change_restarts_timers() {
            let config = SessionConfig::default();
            let mut state = SessionState::initial(&config);
            let mut scheduler = Scheduler::new(&config);
            scheduler.sync(&state);
            scheduler.advance(ms(50));

            state.combat = Some(Engagement {
                player: PlayerId::PRIMARY,
                enemy_id: EntityId::new(0),
                enemy: EnemyComponents::new("Matt", "m.png", Vec2::ZERO, CombatStats::new(60, 6, 3, 2)),
            });
            scheduler.sync(&state);
            assert_eq!(scheduler.collision_timer().remaining(), ms(100));
            assert!(!Scheduler::is_running(&state));
        }

        #[test]
        fn unchanged_phase_keeps_progress() {
            let config = SessionConfig::default();
            let state = SessionState::initial(&config);
            let mut scheduler = Scheduler::new(&config);
            scheduler.sync(&state);
            scheduler.advance(ms(50));
            scheduler.sync(&state);
            assert_eq!(scheduler.collision_timer().remaining(), ms(50));
        }
    }
}
