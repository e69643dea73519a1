//! Simulation configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other. Session-tunable values live in
//! [`SimConfig`] (TOML-loadable); fixed engine constants are module-level
//! `const`s.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::types::Team;
use crate::entity::kind::{BuildingKind, UnitKind};

// === ENGINE CONSTANTS ===

/// Simulation rate: one tick is 1/60 of a simulated second.
///
/// Cooldowns and production timers are expressed in ticks, so a 30-tick
/// cooldown fires twice per simulated second at this rate.
pub const TICKS_PER_SECOND: u32 = 60;

/// Distance (world units) at which a unit counts as having reached its
/// move target and clears it.
///
/// Must stay comfortably above the largest per-tick step (tank 1.5,
/// infantry 2.0) or units oscillate around the target point forever.
pub const ARRIVE_DISTANCE: f32 = 5.0;

/// Construction progress gained per tick by an unfinished building.
///
/// At 0.2/tick a site takes 500 ticks (just over 8 simulated seconds)
/// to go from 0 to 100.
pub const CONSTRUCTION_RATE: f32 = 0.2;

/// Grid offset, in tiles, from a producing building's origin to the cell
/// where finished units appear: one tile right, three tiles down, just
/// clear of the tallest (3-tile) footprint.
pub const PRODUCTION_SPAWN_OFFSET: (i32, i32) = (1, 3);

/// Upper bound on rejection-sampling attempts when scattering resource
/// deposits over the map.
///
/// The generator may under-place deposits on maps with little open grass;
/// the bound guarantees generation always terminates.
pub const RESOURCE_PLACEMENT_ATTEMPTS: u32 = 100;

// === SESSION CONFIG ===

/// Parameters for one terrain feature pass (water, mountain, or forest).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FeatureParams {
    /// Fraction of the smoothed-noise range claimed by this feature.
    /// Higher coverage means larger blobs.
    pub coverage: f32,
    /// Per-cell acceptance probability once the coverage test passes.
    /// Lower values thin a blob out into scattered patches.
    pub threshold: f32,
    /// Rounds of 3x3 neighbor averaging applied to the raw noise.
    /// More passes produce smoother, rounder regions.
    pub smoothing_passes: u32,
}

/// Terrain generation parameters, one feature pass per overwriting layer
/// (water first, then mountain, then forest) plus resource scattering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub water: FeatureParams,
    pub mountain: FeatureParams,
    pub forest: FeatureParams,
    /// Target number of gold deposits. Placement is rejection-sampled and
    /// bounded by [`RESOURCE_PLACEMENT_ATTEMPTS`], so unlucky maps may
    /// receive fewer.
    pub gold_deposits: usize,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            water: FeatureParams { coverage: 0.2, threshold: 0.3, smoothing_passes: 10 },
            mountain: FeatureParams { coverage: 0.1, threshold: 0.4, smoothing_passes: 8 },
            forest: FeatureParams { coverage: 0.15, threshold: 0.6, smoothing_passes: 12 },
            gold_deposits: 15,
        }
    }
}

/// One unit in the opening placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitPlacement {
    pub kind: UnitKind,
    pub team: Team,
    /// Grid cell, converted to world units at spawn time.
    pub grid: [i32; 2],
}

/// One building in the opening placement. Buildings placed this way start
/// completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingPlacement {
    pub kind: BuildingKind,
    pub team: Team,
    pub grid: [i32; 2],
}

/// Opening placement applied by `GameSession::new` after terrain
/// generation. The default mirrors the standard skirmish fixture: three
/// workers and a command center per side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub units: Vec<UnitPlacement>,
    pub buildings: Vec<BuildingPlacement>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        let unit = |team, x, y| UnitPlacement { kind: UnitKind::Worker, team, grid: [x, y] };
        let center = |team, x, y| BuildingPlacement {
            kind: BuildingKind::CommandCenter,
            team,
            grid: [x, y],
        };
        Self {
            units: vec![
                unit(Team::Player, 10, 10),
                unit(Team::Player, 12, 10),
                unit(Team::Player, 14, 10),
                unit(Team::Enemy, 40, 40),
                unit(Team::Enemy, 42, 40),
                unit(Team::Enemy, 44, 40),
            ],
            buildings: vec![center(Team::Player, 5, 5), center(Team::Enemy, 45, 45)],
        }
    }
}

/// Full configuration for one simulation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Map width in tiles.
    pub map_width: usize,
    /// Map height in tiles.
    pub map_height: usize,
    /// World units per tile edge. Grid coordinates convert to world
    /// coordinates by straight multiplication with this value.
    pub tile_size: f32,
    /// Seed for the terrain generator's RNG. Two sessions with the same
    /// seed and terrain parameters produce bit-identical maps.
    pub seed: u64,
    pub terrain: TerrainConfig,
    pub scenario: ScenarioConfig,
    /// Flat resource counters shown by the UI layer. This core never
    /// spends them.
    pub starting_gold: u32,
    pub starting_wood: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            map_width: 100,
            map_height: 100,
            tile_size: 32.0,
            seed: 0,
            terrain: TerrainConfig::default(),
            scenario: ScenarioConfig::default(),
            starting_gold: 1000,
            starting_wood: 500,
        }
    }
}

impl SimConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a config from TOML text. Missing fields take their defaults,
    /// so a file may override only what it cares about.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: SimConfig = toml::from_str(text)?;
        Ok(config)
    }

    /// Loads a config file from disk.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.map_width == 0 || self.map_height == 0 {
            return Err(SimError::InvalidConfig(format!(
                "map dimensions must be positive, got {}x{}",
                self.map_width, self.map_height
            )));
        }

        if self.tile_size <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "tile_size must be positive, got {}",
                self.tile_size
            )));
        }

        for (name, params) in [
            ("water", &self.terrain.water),
            ("mountain", &self.terrain.mountain),
            ("forest", &self.terrain.forest),
        ] {
            if !(0.0..=1.0).contains(&params.coverage) {
                return Err(SimError::InvalidConfig(format!(
                    "{} coverage must be in [0, 1], got {}",
                    name, params.coverage
                )));
            }
            if !(0.0..=1.0).contains(&params.threshold) {
                return Err(SimError::InvalidConfig(format!(
                    "{} threshold must be in [0, 1], got {}",
                    name, params.threshold
                )));
            }
        }

        let in_bounds = |grid: &[i32; 2]| {
            grid[0] >= 0
                && grid[1] >= 0
                && (grid[0] as usize) < self.map_width
                && (grid[1] as usize) < self.map_height
        };
        for placement in &self.scenario.units {
            if !in_bounds(&placement.grid) {
                return Err(SimError::InvalidConfig(format!(
                    "unit placement {:?} is outside the {}x{} map",
                    placement.grid, self.map_width, self.map_height
                )));
            }
        }
        for placement in &self.scenario.buildings {
            if !in_bounds(&placement.grid) {
                return Err(SimError::InvalidConfig(format!(
                    "building placement {:?} is outside the {}x{} map",
                    placement.grid, self.map_width, self.map_height
                )));
            }
        }

        Ok(())
    }
}
