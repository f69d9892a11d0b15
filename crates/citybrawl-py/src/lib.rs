//! # City Brawl Python Bindings
//!
//! PyO3 bindings exposing the City Brawl session core to Python hosts.
//!
//! ## Usage
//!
//! ```python
//! import citybrawl
//!
//! session = citybrawl.PySession(seed=42, two_player=False)
//!
//! # Drive the timers with the host's frame delta
//! session.tick(dt_ms=16.0)
//! session.move_player(0, dx=5.0, dy=0.0)
//!
//! if session.in_combat:
//!     session.attack()
//!     print(session.message)
//!
//! obs = session.observe()  # flat numpy array, see `observe`
//! ```

use std::time::Duration;

use citybrawl_core::action::Action;
use citybrawl_core::catalog::Catalog;
use citybrawl_core::config::{FleePolicy, SessionConfig};
use citybrawl_core::entity::{EnemyComponents, EntityId, ObstacleComponents};
use citybrawl_core::player::{Player, PlayerId};
use citybrawl_core::Session;
use glam::Vec2;
use numpy::{PyArray1, ToPyArray};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Values per player in the observation vector.
const PLAYER_FEATURES: usize = 8;

fn to_py_err(err: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn player_id(index: u8) -> PlayerId {
    PlayerId::new(index)
}

/// Session wrapper for Python.
///
/// Owns the catalog, the reducer, the scheduler and the current state.
/// Every mutating method returns nothing; read the properties afterwards.
#[pyclass]
pub struct PySession {
    inner: Session,
}

#[pymethods]
impl PySession {
    /// Create a new session.
    ///
    /// # Arguments
    ///
    /// * `seed` - Master seed for spawns and flee rolls
    /// * `two_player` - Use the two-player roster
    /// * `flee_chance` - If set, fleeing succeeds with this probability instead
    ///   of always costing the flee penalty
    /// * `catalog_json` - Optional custom catalog as `{"locations": [...]}`
    /// * `config_json` - Optional full config; overrides the flags above
    #[new]
    #[pyo3(signature = (seed=0, two_player=false, flee_chance=None, catalog_json=None, config_json=None))]
    fn new(
        seed: u64,
        two_player: bool,
        flee_chance: Option<f64>,
        catalog_json: Option<&str>,
        config_json: Option<&str>,
    ) -> PyResult<Self> {
        let config = match config_json {
            Some(json) => serde_json::from_str::<SessionConfig>(json).map_err(to_py_err)?,
            None => {
                let base = if two_player {
                    SessionConfig::two_player()
                } else {
                    SessionConfig::single_player()
                };
                let base = base.with_seed(seed);
                match flee_chance {
                    Some(success) => base.with_flee(FleePolicy::Chance { success }),
                    None => base,
                }
            }
        };
        let inner = match catalog_json {
            Some(json) => Session::from_catalog_json(json, config),
            None => Session::new(Catalog::san_francisco(), config),
        }
        .map_err(to_py_err)?;
        Ok(Self { inner })
    }

    // -------------------------------------------------------------------------
    // Actions
    // -------------------------------------------------------------------------

    /// Move a player by (dx, dy). Ignored during combat.
    #[pyo3(signature = (player, dx, dy))]
    fn move_player(&mut self, player: u8, dx: f32, dy: f32) {
        self.inner
            .dispatch(Action::move_by(player_id(player), Vec2::new(dx, dy)));
    }

    /// Attack the current enemy.
    #[pyo3(signature = (player=0))]
    fn attack(&mut self, player: u8) {
        self.inner.dispatch(Action::AttackEnemy {
            who: player_id(player),
        });
    }

    /// Brace for the next counterattack.
    #[pyo3(signature = (player=0))]
    fn defend(&mut self, player: u8) {
        self.inner.dispatch(Action::Defend {
            who: player_id(player),
        });
    }

    /// Try to leave combat.
    #[pyo3(signature = (player=0))]
    fn flee(&mut self, player: u8) {
        self.inner.dispatch(Action::Flee {
            who: player_id(player),
        });
    }

    /// Leave combat without reward or penalty.
    #[pyo3(signature = (player=0))]
    fn end_combat(&mut self, player: u8) {
        self.inner.dispatch(Action::EndCombat {
            who: player_id(player),
        });
    }

    /// Try to move on to the next location.
    #[pyo3(signature = (player=0))]
    fn advance(&mut self, player: u8) {
        self.inner.dispatch(Action::AdvanceLocation {
            who: player_id(player),
        });
    }

    /// Run a collision check now instead of waiting for the timer.
    fn check_collision(&mut self) {
        self.inner.dispatch(Action::CheckCollision);
    }

    /// Replace the status message.
    fn set_message(&mut self, text: String) {
        self.inner.dispatch(Action::SetMessage(text));
    }

    /// Dispatch any action given as JSON, e.g. `{"Flee": {"who": 0}}`.
    fn dispatch_json(&mut self, json: &str) -> PyResult<()> {
        let action: Action = serde_json::from_str(json).map_err(to_py_err)?;
        self.inner.dispatch(action);
        Ok(())
    }

    /// Advance the timers by `dt_ms` milliseconds.
    ///
    /// Releases the GIL while the timers run.
    fn tick(&mut self, py: Python, dt_ms: f64) -> PyResult<()> {
        let dt = Duration::try_from_secs_f64(dt_ms / 1000.0).map_err(to_py_err)?;
        py.allow_threads(|| {
            self.inner.on_tick(dt);
        });
        Ok(())
    }

    /// Reset the session, optionally with a new seed.
    ///
    /// # Example
    ///
    /// ```python
    /// session.reset(seed=42)  # replay from a known seed
    /// session.reset()         # same seed as before
    /// ```
    #[pyo3(signature = (seed=None))]
    fn reset(&mut self, seed: Option<u64>) {
        self.inner.reset(seed);
    }

    // -------------------------------------------------------------------------
    // Views
    // -------------------------------------------------------------------------

    /// Players in roster order.
    #[getter]
    fn players(&self) -> Vec<PyPlayer> {
        self.inner.state().players.iter().map(PyPlayer::from).collect()
    }

    /// Enemies on the playfield, in spawn order.
    #[getter]
    fn enemies(&self) -> Vec<PyEnemy> {
        self.inner
            .state()
            .arena
            .enemies()
            .map(|(id, enemy)| PyEnemy::new(Some(id), enemy))
            .collect()
    }

    /// Obstacles on the playfield, in spawn order.
    #[getter]
    fn obstacles(&self) -> Vec<PyObstacle> {
        self.inner
            .state()
            .arena
            .obstacles()
            .map(|(id, obstacle)| PyObstacle::new(id, obstacle))
            .collect()
    }

    /// The enemy currently being fought, if any.
    #[getter]
    fn current_enemy(&self) -> Option<PyEnemy> {
        self.inner
            .state()
            .combat
            .as_ref()
            .map(|engagement| PyEnemy::new(Some(engagement.enemy_id), &engagement.enemy))
    }

    /// Roster index of the player in combat, if any.
    #[getter]
    fn active_combatant(&self) -> Option<usize> {
        self.inner.state().active_combatant().map(PlayerId::index)
    }

    /// Current status message.
    #[getter]
    fn message(&self) -> String {
        self.inner.state().message.clone()
    }

    /// Whether a fight is in progress.
    #[getter]
    fn in_combat(&self) -> bool {
        self.inner.state().is_in_combat()
    }

    /// Whether the game has ended.
    #[getter]
    fn game_over(&self) -> bool {
        self.inner.state().is_game_over
    }

    /// Index of the current location.
    #[getter]
    fn location_index(&self) -> usize {
        self.inner.state().location_index
    }

    /// Name of the current location.
    #[getter]
    fn location_name(&self) -> Option<String> {
        self.inner
            .catalog()
            .get(self.inner.state().location_index)
            .map(|location| location.name.clone())
    }

    /// Combined score of all players.
    #[getter]
    fn total_score(&self) -> u32 {
        self.inner.state().total_score()
    }

    /// Fingerprint of the full state, for replay checks.
    fn state_hash(&self) -> u64 {
        self.inner.state_hash()
    }

    /// The state as a JSON string.
    fn state_json(&self) -> PyResult<String> {
        serde_json::to_string(self.inner.state()).map_err(to_py_err)
    }

    /// Flat observation vector as a numpy array.
    ///
    /// Layout: for each player `[x, y, health, attack, defense, score, level,
    /// is_defending]`, followed by `[in_combat, enemy_health, game_over,
    /// location_index, enemy_count, obstacle_count]`.
    #[allow(clippy::cast_precision_loss)]
    fn observe<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f32>> {
        let state = self.inner.state();
        let mut obs = Vec::with_capacity(state.players.len() * PLAYER_FEATURES + 6);
        for player in &state.players {
            obs.extend_from_slice(&[
                player.position.x,
                player.position.y,
                player.stats.health as f32,
                player.stats.attack as f32,
                player.stats.defense as f32,
                player.score as f32,
                player.level as f32,
                f32::from(u8::from(player.is_defending)),
            ]);
        }
        obs.extend_from_slice(&[
            f32::from(u8::from(state.is_in_combat())),
            state.current_enemy().map_or(0.0, |e| e.stats.health as f32),
            f32::from(u8::from(state.is_game_over)),
            state.location_index as f32,
            state.arena.enemy_count() as f32,
            state.arena.obstacle_count() as f32,
        ]);
        obs.to_pyarray(py)
    }

    fn __repr__(&self) -> String {
        let state = self.inner.state();
        format!(
            "Session(location={}, players={}, enemies={}, in_combat={}, game_over={})",
            state.location_index,
            state.players.len(),
            state.arena.enemy_count(),
            state.is_in_combat(),
            state.is_game_over
        )
    }
}

/// Player snapshot.
#[pyclass(frozen)]
#[derive(Clone)]
pub struct PyPlayer {
    #[pyo3(get)]
    pub index: usize,
    #[pyo3(get)]
    pub x: f32,
    #[pyo3(get)]
    pub y: f32,
    #[pyo3(get)]
    pub health: u32,
    #[pyo3(get)]
    pub attack: u32,
    #[pyo3(get)]
    pub defense: u32,
    #[pyo3(get)]
    pub speed: u32,
    #[pyo3(get)]
    pub score: u32,
    #[pyo3(get)]
    pub level: u32,
    #[pyo3(get)]
    pub experience: u32,
    #[pyo3(get)]
    pub enemies_defeated: u32,
    #[pyo3(get)]
    pub is_defending: bool,
}

impl From<&Player> for PyPlayer {
    fn from(p: &Player) -> Self {
        Self {
            index: p.id.index(),
            x: p.position.x,
            y: p.position.y,
            health: p.stats.health,
            attack: p.stats.attack,
            defense: p.stats.defense,
            speed: p.stats.speed,
            score: p.score,
            level: p.level,
            experience: p.experience,
            enemies_defeated: p.enemies_defeated,
            is_defending: p.is_defending,
        }
    }
}

#[pymethods]
impl PyPlayer {
    /// Get position as (x, y) tuple.
    #[getter]
    fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    fn __repr__(&self) -> String {
        format!(
            "Player(index={}, hp={}, score={}, level={})",
            self.index, self.health, self.score, self.level
        )
    }
}

/// Enemy snapshot.
#[pyclass(frozen)]
#[derive(Clone)]
pub struct PyEnemy {
    /// Entity id, stable while the enemy lives.
    #[pyo3(get)]
    pub id: Option<u64>,
    #[pyo3(get)]
    pub name: String,
    #[pyo3(get)]
    pub sprite: String,
    #[pyo3(get)]
    pub x: f32,
    #[pyo3(get)]
    pub y: f32,
    #[pyo3(get)]
    pub health: u32,
    #[pyo3(get)]
    pub attack: u32,
    #[pyo3(get)]
    pub defense: u32,
}

impl PyEnemy {
    fn new(id: Option<EntityId>, e: &EnemyComponents) -> Self {
        Self {
            id: id.map(EntityId::as_u64),
            name: e.name.clone(),
            sprite: e.sprite.clone(),
            x: e.position.x,
            y: e.position.y,
            health: e.stats.health,
            attack: e.stats.attack,
            defense: e.stats.defense,
        }
    }
}

#[pymethods]
impl PyEnemy {
    fn __repr__(&self) -> String {
        format!("Enemy(name={:?}, hp={})", self.name, self.health)
    }
}

/// Obstacle snapshot.
#[pyclass(frozen)]
#[derive(Clone)]
pub struct PyObstacle {
    #[pyo3(get)]
    pub id: u64,
    #[pyo3(get)]
    pub name: String,
    #[pyo3(get)]
    pub sprite: String,
    #[pyo3(get)]
    pub x: f32,
    #[pyo3(get)]
    pub y: f32,
}

impl PyObstacle {
    fn new(id: EntityId, o: &ObstacleComponents) -> Self {
        Self {
            id: id.as_u64(),
            name: o.name.clone(),
            sprite: o.sprite.clone(),
            x: o.position.x,
            y: o.position.y,
        }
    }
}

#[pymethods]
impl PyObstacle {
    fn __repr__(&self) -> String {
        format!("Obstacle(name={:?}, x={:.1}, y={:.1})", self.name, self.x, self.y)
    }
}

/// Python module definition.
#[pymodule]
fn _citybrawl(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySession>()?;
    m.add_class::<PyPlayer>()?;
    m.add_class::<PyEnemy>()?;
    m.add_class::<PyObstacle>()?;
    Ok(())
}
