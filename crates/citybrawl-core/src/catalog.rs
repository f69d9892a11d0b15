//! World catalog: locations and the templates spawned in them.
//!
//! The catalog is immutable data. It is validated once when it is built, so
//! the rest of the session can rely on every location having at least one
//! enemy template and one obstacle template.
//!
//! # Example
//!
//! ```
//! use citybrawl_core::catalog::Catalog;
//!
//! let catalog = Catalog::san_francisco();
//! assert_eq!(catalog.get(0).map(|l| l.name.as_str()), Some("Chinatown"));
//!
//! let bad = r#"{"locations": [{"name": "Void", "background": "void.jpg",
//!     "enemy_templates": [], "obstacle_templates": []}]}"#;
//! assert!(Catalog::from_json(bad).is_err());
//! ```

use serde::{Deserialize, Serialize};

use crate::entity::components::CombatStats;
use crate::error::CatalogError;

/// Blueprint for an enemy. Position is assigned at spawn time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyTemplate {
    /// Display name.
    pub name: String,
    /// Sprite reference.
    pub sprite: String,
    /// Stats every instance starts with.
    pub stats: CombatStats,
}

impl EnemyTemplate {
    /// Creates an enemy template.
    #[must_use]
    pub fn new(name: impl Into<String>, sprite: impl Into<String>, stats: CombatStats) -> Self {
        Self {
            name: name.into(),
            sprite: sprite.into(),
            stats,
        }
    }
}

/// Blueprint for an obstacle. Position is assigned at spawn time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleTemplate {
    /// Display name.
    pub name: String,
    /// Sprite reference.
    pub sprite: String,
}

impl ObstacleTemplate {
    /// Creates an obstacle template.
    #[must_use]
    pub fn new(name: impl Into<String>, sprite: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sprite: sprite.into(),
        }
    }
}

/// A themed map segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Display name.
    pub name: String,
    /// Background reference for the presentation layer.
    pub background: String,
    /// Enemy pool. Never empty in a validated catalog.
    pub enemy_templates: Vec<EnemyTemplate>,
    /// Obstacle pool. Never empty in a validated catalog.
    pub obstacle_templates: Vec<ObstacleTemplate>,
    /// Defeated-enemy count a player needs to enter this location.
    /// `None` means the location is not gated.
    #[serde(default)]
    pub required_enemies_defeated: Option<u32>,
}

impl Location {
    /// Returns true if `enemies_defeated` satisfies this location's gate.
    #[must_use]
    pub fn admits(&self, enemies_defeated: u32) -> bool {
        self.required_enemies_defeated
            .map_or(true, |required| enemies_defeated >= required)
    }
}

#[derive(Deserialize)]
struct CatalogData {
    locations: Vec<Location>,
}

/// Validated, ordered list of locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    locations: Vec<Location>,
}

impl Catalog {
    /// Builds a catalog, rejecting it if it breaks the data contract.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NoLocations`] if `locations` is empty
    /// - [`CatalogError::EmptyEnemyPool`] / [`CatalogError::EmptyObstaclePool`]
    ///   if any location cannot spawn
    /// - [`CatalogError::ThresholdsNotAscending`] if a later location is
    ///   gated below an earlier one
    pub fn new(locations: Vec<Location>) -> Result<Self, CatalogError> {
        if let Err(err) = validate(&locations) {
            tracing::warn!(target: "citybrawl::catalog", error = %err, "catalog.rejected");
            return Err(err);
        }
        tracing::debug!(
            target: "citybrawl::catalog",
            locations = locations.len(),
            "catalog.loaded"
        );
        Ok(Self { locations })
    }

    /// Parses and validates a catalog from JSON of the form
    /// `{"locations": [...]}`.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Parse`] for malformed JSON, otherwise as [`Catalog::new`].
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(json)?;
        Self::new(data.locations)
    }

    /// Returns the location at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Location> {
        self.locations.get(index)
    }

    /// All locations in progression order.
    #[must_use]
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Number of locations. Always at least 1.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Always false for a validated catalog.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// The built-in San Francisco tour.
    #[must_use]
    pub fn san_francisco() -> Self {
        let matt = EnemyTemplate::new("Matt", "enemies/matt.png", CombatStats::new(60, 6, 3, 2));
        let bathtub =
            EnemyTemplate::new("Bathtub", "enemies/bathtub.png", CombatStats::new(50, 5, 2, 3));
        let toothbrush = EnemyTemplate::new(
            "Toothbrush",
            "enemies/toothbrush.png",
            CombatStats::new(30, 3, 1, 2),
        );
        let deo = EnemyTemplate::new("Deo", "enemies/deo.png", CombatStats::new(40, 4, 1, 4));
        let household = vec![bathtub, toothbrush, deo];

        let obstacle = |name: &str, slug: &str| ObstacleTemplate::new(name, format!("obstacles/{slug}.png"));

        let location = |name: &str,
                        slug: &str,
                        enemy_templates: Vec<EnemyTemplate>,
                        obstacle_templates: Vec<ObstacleTemplate>,
                        required: Option<u32>| Location {
            name: name.to_string(),
            background: format!("locations/{slug}.jpg"),
            enemy_templates,
            obstacle_templates,
            required_enemies_defeated: required,
        };

        Self {
            locations: vec![
                location(
                    "Chinatown",
                    "chinatown",
                    vec![matt],
                    vec![obstacle("Lantern Stall", "lantern-stall"), obstacle("Fire Hydrant", "fire-hydrant")],
                    None,
                ),
                location(
                    "Fisherman's Wharf",
                    "fishermans-wharf",
                    household.clone(),
                    vec![obstacle("Seagull", "seagull"), obstacle("Crab Pot", "crab-pot")],
                    Some(3),
                ),
                location(
                    "Golden Gate Park",
                    "golden-gate-park",
                    household.clone(),
                    vec![obstacle("Bison", "bison"), obstacle("Fog Bank", "fog-bank")],
                    Some(6),
                ),
                location(
                    "Haight Ashbury",
                    "haight-ashbury",
                    household.clone(),
                    vec![obstacle("Painted Van", "painted-van"), obstacle("Drum Circle", "drum-circle")],
                    Some(10),
                ),
                location(
                    "Pier 39",
                    "pier-39",
                    household,
                    vec![obstacle("Sea Lion", "sea-lion"), obstacle("Cable Car", "cable-car")],
                    Some(15),
                ),
            ],
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::san_francisco()
    }
}

fn validate(locations: &[Location]) -> Result<(), CatalogError> {
    if locations.is_empty() {
        return Err(CatalogError::NoLocations);
    }

    let mut highest_gate = 0;
    for location in locations {
        if location.enemy_templates.is_empty() {
            return Err(CatalogError::EmptyEnemyPool {
                location: location.name.clone(),
            });
        }
        if location.obstacle_templates.is_empty() {
            return Err(CatalogError::EmptyObstaclePool {
                location: location.name.clone(),
            });
        }
        if let Some(required) = location.required_enemies_defeated {
            if required < highest_gate {
                return Err(CatalogError::ThresholdsNotAscending {
                    location: location.name.clone(),
                });
            }
            highest_gate = required;
        }
    }
    Ok(())
}
