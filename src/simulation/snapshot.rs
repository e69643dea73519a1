//! Read-only serializable views of a running session
//!
//! These views decouple observers (binaries, logs, external tools) from
//! the registry's internal layout: everything here is plain data, safe to
//! serialize and hand across a process boundary.

use serde::Serialize;

use crate::core::types::{EntityId, Team, Tick, Vec2};
use crate::entity::registry::{Entity, EntityKind};
use crate::entity::unit::UnitActivity;
use crate::simulation::session::{GameSession, Outcome, Resources};
use crate::terrain::tile_map::{TerrainKind, TileMap};

/// Flat view of one entity, unit and building fields merged.
#[derive(Debug, Clone, Serialize)]
pub struct EntityView {
    pub id: EntityId,
    pub team: Team,
    /// Kind name, e.g. `soldier` or `command_center`.
    pub kind: &'static str,
    pub pos: Vec2,
    pub health: u32,
    pub max_health: u32,
    /// Units only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<UnitActivity>,
    /// Buildings only: 0 to 100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub construction_progress: Option<f32>,
    /// Buildings only: ticks left on the active production order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production_remaining: Option<u32>,
}

impl EntityView {
    pub fn from_entity(entity: &Entity) -> Self {
        let (kind, activity, construction_progress, production_remaining) = match &entity.kind {
            EntityKind::Unit(unit) => (unit.kind.name(), Some(unit.activity()), None, None),
            EntityKind::Building(building) => (
                building.kind.name(),
                None,
                Some(building.construction_progress),
                building.production.as_ref().map(|order| order.remaining),
            ),
        };
        Self {
            id: entity.id,
            team: entity.team,
            kind,
            pos: entity.pos,
            health: entity.health,
            max_health: entity.max_health,
            activity,
            construction_progress,
            production_remaining,
        }
    }
}

/// Tile counts per terrain kind, cheaper to ship than the full grid.
#[derive(Debug, Clone, Serialize)]
pub struct TerrainSummary {
    pub width: usize,
    pub height: usize,
    pub water: usize,
    pub mountain: usize,
    pub forest: usize,
    pub gold: usize,
}

impl TerrainSummary {
    pub fn from_map(map: &TileMap) -> Self {
        Self {
            width: map.width,
            height: map.height,
            water: map.count(TerrainKind::Water),
            mountain: map.count(TerrainKind::Mountain),
            forest: map.count(TerrainKind::Forest),
            gold: map.count(TerrainKind::Gold),
        }
    }
}

/// Full point-in-time view of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub tick: Tick,
    pub outcome: Outcome,
    pub resources: Resources,
    pub terrain: TerrainSummary,
    /// Live entities in registry order.
    pub entities: Vec<EntityView>,
}

impl SessionSnapshot {
    pub fn capture(session: &GameSession) -> Self {
        Self {
            tick: session.elapsed_ticks(),
            outcome: session.outcome(),
            resources: session.resources,
            terrain: TerrainSummary::from_map(session.map()),
            entities: session.registry().iter().map(EntityView::from_entity).collect(),
        }
    }
}
