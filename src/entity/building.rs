//! Building behavior - construction, unit production, turret fire
//!
//! One [`update_building`] pass per live building per tick. Unfinished
//! sites only accrue construction progress; the tick that completes them
//! does nothing else, so production and turret fire start the following
//! tick at the earliest.

use serde::{Deserialize, Serialize};

use crate::core::config::{CONSTRUCTION_RATE, PRODUCTION_SPAWN_OFFSET};
use crate::core::types::{EntityId, Vec2};
use crate::entity::kind::{BuildingKind, UnitKind};
use crate::entity::registry::{EntityRegistry, SimulationEvent};

/// A queued unit with its countdown. One order at a time per building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionOrder {
    pub kind: UnitKind,
    /// Ticks until the unit appears.
    pub remaining: u32,
}

/// Building-specific state. Shared combat fields live on the entity
/// record; only turrets ever use them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingState {
    pub kind: BuildingKind,
    /// Footprint in world units (tiles scaled by tile size).
    pub footprint: Vec2,
    /// 0 to 100. Completed buildings sit at 100.
    pub construction_progress: f32,
    pub is_completed: bool,
    pub production: Option<ProductionOrder>,
    /// Turret-held weak reference, re-validated every tick.
    pub attack_target: Option<EntityId>,
}

/// Advance the building at `idx` by one tick.
pub(crate) fn update_building(
    reg: &mut EntityRegistry,
    idx: usize,
    events: &mut Vec<SimulationEvent>,
) {
    // Construction. Completion clamps progress and restores full health,
    // wiping any chip damage the site took while being built.
    let mut finished = false;
    {
        let entity = &mut reg.entities[idx];
        let Some(building) = entity.as_building_mut() else { return };
        if !building.is_completed {
            building.construction_progress += CONSTRUCTION_RATE;
            if building.construction_progress >= 100.0 {
                building.construction_progress = 100.0;
                building.is_completed = true;
                finished = true;
            }
            if finished {
                entity.health = entity.max_health;
                tracing::debug!(id = %entity.id, "construction complete");
                events.push(SimulationEvent::ConstructionComplete { building: entity.id });
            }
            return;
        }
    }

    // Production countdown. The order clears on the same tick the unit
    // appears, freeing the building for its next order.
    let mut produced = None;
    {
        let Some(building) = reg.entities[idx].as_building_mut() else { return };
        if let Some(order) = building.production.as_mut() {
            if order.remaining > 0 {
                order.remaining -= 1;
            }
            if order.remaining == 0 {
                produced = Some(order.kind);
                building.production = None;
            }
        }
    }
    if let Some(kind) = produced {
        let (team, grid, building_id) = {
            let entity = &reg.entities[idx];
            (entity.team, reg.grid_of(entity.pos), entity.id)
        };
        let (dx, dy) = PRODUCTION_SPAWN_OFFSET;
        let unit = reg.spawn_unit(kind, grid.0 + dx, grid.1 + dy, team);
        tracing::debug!(building = %building_id, unit = %unit, kind = kind.name(), "production complete");
        events.push(SimulationEvent::ProductionComplete { building: building_id, unit, kind });
    }

    // Turret fire. Passive buildings stop here.
    if !reg.entities[idx].can_attack {
        return;
    }
    if reg.entities[idx].cooldown_remaining > 0 {
        reg.entities[idx].cooldown_remaining -= 1;
    }

    // Acquisition runs only while unengaged, so after a kill the turret
    // waits a tick before picking its next victim.
    let held = reg.entities[idx].as_building().and_then(|b| b.attack_target);
    if held.is_none() {
        if let Some(found) = reg.closest_opponent_in_range(idx) {
            let turret = reg.entities[idx].id;
            if let Some(building) = reg.entities[idx].as_building_mut() {
                building.attack_target = Some(found);
            }
            tracing::debug!(turret = %turret, target = %found, "turret acquired target");
            events.push(SimulationEvent::TargetAcquired { turret, target: found });
        }
    }

    let held = reg.entities[idx].as_building().and_then(|b| b.attack_target);
    if let Some(target_id) = held {
        match reg.get(target_id).map(|t| t.pos) {
            None => {
                // Victim died or was removed
                if let Some(building) = reg.entities[idx].as_building_mut() {
                    building.attack_target = None;
                }
            }
            Some(target_pos) => {
                let entity = &reg.entities[idx];
                let dist = entity.pos.distance(&target_pos);
                if dist <= entity.attack_range {
                    if entity.cooldown_remaining == 0 {
                        reg.resolve_attack(idx, target_id, events);
                    }
                } else if let Some(building) = reg.entities[idx].as_building_mut() {
                    // Out of reach: forget it rather than chase
                    building.attack_target = None;
                }
            }
        }
    }
}
