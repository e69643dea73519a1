//! Game session - one running match and the engine that owns it
//!
//! A [`GameSession`] bundles the generated terrain, the entity registry,
//! the command queue, and the match clock. [`Engine`] holds at most one
//! session and turns every access before `start_session` into a
//! [`SimError::SessionNotStarted`] instead of a panic.

use serde::{Deserialize, Serialize};

use crate::core::config::{SimConfig, TICKS_PER_SECOND};
use crate::core::error::{Result, SimError};
use crate::core::types::{Team, Tick};
use crate::entity::registry::{EntityRegistry, SimulationEvent};
use crate::simulation::command::{self, Command};
use crate::terrain::{self, TileMap};

/// Match verdict, judged purely on surviving entity counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    InProgress,
    /// The enemy has nothing left on the map.
    Victory,
    /// The player has nothing left on the map.
    Defeat,
    /// Mutual annihilation on the same tick.
    Draw,
}

/// Flat stockpile counters. The simulation core reports these but never
/// spends them; costs live in the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    pub gold: u32,
    pub wood: u32,
}

/// One running match.
#[derive(Debug, Clone)]
pub struct GameSession {
    map: TileMap,
    registry: EntityRegistry,
    pending: Vec<Command>,
    pub resources: Resources,
    elapsed_ticks: Tick,
}

impl GameSession {
    /// Validate the config, generate terrain, and apply the opening
    /// placement. Scenario buildings start completed.
    pub fn new(config: &SimConfig) -> Result<Self> {
        config.validate()?;
        let map = terrain::generate(config);
        let mut registry = EntityRegistry::new(config.tile_size);
        for placement in &config.scenario.units {
            registry.spawn_unit(
                placement.kind,
                placement.grid[0],
                placement.grid[1],
                placement.team,
            );
        }
        for placement in &config.scenario.buildings {
            registry.spawn_building(
                placement.kind,
                placement.grid[0],
                placement.grid[1],
                placement.team,
            );
        }
        tracing::info!(
            seed = config.seed,
            units = config.scenario.units.len(),
            buildings = config.scenario.buildings.len(),
            "session started"
        );
        Ok(Self {
            map,
            registry,
            pending: Vec::new(),
            resources: Resources { gold: config.starting_gold, wood: config.starting_wood },
            elapsed_ticks: 0,
        })
    }

    /// Queue a command for the next tick. Always accepted; validity is
    /// judged when the queue drains.
    pub fn queue(&mut self, command: Command) {
        self.pending.push(command);
    }

    pub fn pending_commands(&self) -> usize {
        self.pending.len()
    }

    /// Drain the command queue, then advance the world one tick.
    pub fn tick(&mut self) -> Vec<SimulationEvent> {
        for command in self.pending.drain(..) {
            command::apply(&mut self.registry, command);
        }
        let events = self.registry.tick(&self.map);
        self.elapsed_ticks += 1;
        events
    }

    /// Judge the match from surviving entity counts. Buildings count as
    /// presence: a player with only a command center left is still in the
    /// game.
    pub fn outcome(&self) -> Outcome {
        let player = self.registry.entities_by_team(Team::Player).count();
        let enemy = self.registry.entities_by_team(Team::Enemy).count();
        match (player, enemy) {
            (0, 0) => Outcome::Draw,
            (_, 0) => Outcome::Victory,
            (0, _) => Outcome::Defeat,
            _ => Outcome::InProgress,
        }
    }

    pub fn elapsed_ticks(&self) -> Tick {
        self.elapsed_ticks
    }

    /// Wall-clock equivalent of the tick counter at the fixed rate.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed_ticks as f32 / TICKS_PER_SECOND as f32
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.registry
    }

    pub fn map(&self) -> &TileMap {
        &self.map
    }
}

/// Top-level owner used by the binaries. Holds at most one session.
#[derive(Debug, Default)]
pub struct Engine {
    session: Option<GameSession>,
}

impl Engine {
    pub fn new() -> Self {
        Self { session: None }
    }

    /// Build a fresh session from the config, replacing any running one.
    pub fn start_session(&mut self, config: &SimConfig) -> Result<()> {
        if self.session.is_some() {
            tracing::info!("discarding previous session");
        }
        self.session = Some(GameSession::new(config)?);
        Ok(())
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Result<&GameSession> {
        self.session.as_ref().ok_or(SimError::SessionNotStarted)
    }

    pub fn session_mut(&mut self) -> Result<&mut GameSession> {
        self.session.as_mut().ok_or(SimError::SessionNotStarted)
    }
}
