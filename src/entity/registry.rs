//! Entity registry - exclusive owner of the live-entity set
//!
//! Every lookup, spawn, and removal routes through [`EntityRegistry`].
//! Cross-entity relations (attack targets, production spawns) are held as
//! bare [`EntityId`]s and resolved through the registry on every use, so a
//! reference to a removed entity degrades to "gone" instead of dangling.
//! Ids are monotonic and never reused.

use ahash::AHashMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, Rect, Team, Vec2};
use crate::entity::building::{self, BuildingState, ProductionOrder};
use crate::entity::kind::{BuildingKind, UnitKind};
use crate::entity::unit::{self, UnitState};
use crate::terrain::tile_map::TileMap;

/// Variant payload distinguishing units from buildings. Shared fields live
/// on [`Entity`]; the tick driver dispatches on this tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Unit(UnitState),
    Building(BuildingState),
}

/// One live entity. Common state is flat; kind-specific state hangs off
/// [`EntityKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub team: Team,
    /// Position in world units.
    pub pos: Vec2,
    /// Collision and hit-test radius in world units.
    pub radius: f32,
    pub health: u32,
    pub max_health: u32,
    pub can_move: bool,
    pub can_attack: bool,
    pub attack_damage: u32,
    pub attack_range: f32,
    pub cooldown_max: u32,
    pub cooldown_remaining: u32,
    pub kind: EntityKind,
}

impl Entity {
    /// Health 0 means logically dead: skipped by updates, invisible to
    /// queries and targeting, physically removed by the next reap pass.
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Circle hit test used for point selection.
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.pos.distance_squared(&point) <= self.radius * self.radius
    }

    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        rect.intersects_circle(self.pos, self.radius)
    }

    pub fn is_building(&self) -> bool {
        matches!(self.kind, EntityKind::Building(_))
    }

    pub fn as_unit(&self) -> Option<&UnitState> {
        match &self.kind {
            EntityKind::Unit(unit) => Some(unit),
            EntityKind::Building(_) => None,
        }
    }

    pub fn as_unit_mut(&mut self) -> Option<&mut UnitState> {
        match &mut self.kind {
            EntityKind::Unit(unit) => Some(unit),
            EntityKind::Building(_) => None,
        }
    }

    pub fn as_building(&self) -> Option<&BuildingState> {
        match &self.kind {
            EntityKind::Building(b) => Some(b),
            EntityKind::Unit(_) => None,
        }
    }

    pub fn as_building_mut(&mut self) -> Option<&mut BuildingState> {
        match &mut self.kind {
            EntityKind::Building(b) => Some(b),
            EntityKind::Unit(_) => None,
        }
    }
}

/// Observable outcomes of one tick, in the order they happened.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    AttackHit { attacker: EntityId, target: EntityId, damage: u32 },
    EntityDied { id: EntityId, team: Team },
    ProductionComplete { building: EntityId, unit: EntityId, kind: UnitKind },
    ConstructionComplete { building: EntityId },
    TargetAcquired { turret: EntityId, target: EntityId },
}

/// Insertion-ordered owner of all live entities in a session.
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    pub(crate) entities: Vec<Entity>,
    index: AHashMap<EntityId, usize>,
    next_id: u64,
    tile_size: f32,
}

impl EntityRegistry {
    pub fn new(tile_size: f32) -> Self {
        Self {
            entities: Vec::new(),
            index: AHashMap::new(),
            next_id: 0,
            tile_size,
        }
    }

    /// Spawn a unit at a grid cell (world = grid * tile_size), applying the
    /// kind's base stats. Never fails.
    pub fn spawn_unit(&mut self, kind: UnitKind, grid_x: i32, grid_y: i32, team: Team) -> EntityId {
        let stats = kind.stats();
        let entity = Entity {
            id: EntityId(0), // assigned by insert
            team,
            pos: self.grid_to_world(grid_x, grid_y),
            radius: stats.radius,
            health: stats.max_health,
            max_health: stats.max_health,
            can_move: true,
            can_attack: true,
            attack_damage: stats.attack_damage,
            attack_range: stats.attack_range,
            cooldown_max: stats.cooldown,
            cooldown_remaining: 0,
            kind: EntityKind::Unit(UnitState {
                kind,
                move_target: None,
                attack_target: None,
                move_speed: stats.move_speed,
            }),
        };
        self.insert(entity)
    }

    /// Spawn a completed building at a grid cell.
    pub fn spawn_building(
        &mut self,
        kind: BuildingKind,
        grid_x: i32,
        grid_y: i32,
        team: Team,
    ) -> EntityId {
        self.spawn_building_inner(kind, grid_x, grid_y, team, true)
    }

    /// Spawn an under-construction site. Sites gain construction progress
    /// each tick and cannot attack or produce until complete; completion
    /// restores them to full health.
    pub fn spawn_building_site(
        &mut self,
        kind: BuildingKind,
        grid_x: i32,
        grid_y: i32,
        team: Team,
    ) -> EntityId {
        self.spawn_building_inner(kind, grid_x, grid_y, team, false)
    }

    fn spawn_building_inner(
        &mut self,
        kind: BuildingKind,
        grid_x: i32,
        grid_y: i32,
        team: Team,
        completed: bool,
    ) -> EntityId {
        let stats = kind.stats();
        let footprint = Vec2::new(
            stats.footprint.0 as f32 * self.tile_size,
            stats.footprint.1 as f32 * self.tile_size,
        );
        let radius = footprint.x.max(footprint.y) / 2.0;
        let health = if completed { stats.max_health } else { (stats.max_health / 10).max(1) };
        let entity = Entity {
            id: EntityId(0),
            team,
            pos: self.grid_to_world(grid_x, grid_y),
            radius,
            health,
            max_health: stats.max_health,
            can_move: false,
            can_attack: stats.can_attack,
            attack_damage: stats.attack_damage,
            attack_range: stats.attack_range,
            cooldown_max: stats.cooldown,
            cooldown_remaining: 0,
            kind: EntityKind::Building(BuildingState {
                kind,
                footprint,
                construction_progress: if completed { 100.0 } else { 0.0 },
                is_completed: completed,
                production: None,
                attack_target: None,
            }),
        };
        self.insert(entity)
    }

    fn insert(&mut self, mut entity: Entity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        entity.id = id;
        self.index.insert(id, self.entities.len());
        self.entities.push(entity);
        id
    }

    /// Resolve a weak reference. Dead or removed entities come back `None`.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        let entity = &self.entities[*self.index.get(&id)?];
        entity.is_alive().then_some(entity)
    }

    pub(crate) fn slot_of(&self, id: EntityId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// First live entity (insertion order) whose hit circle contains the
    /// point.
    pub fn entity_at(&self, point: Vec2) -> Option<EntityId> {
        self.iter().find(|e| e.contains_point(point)).map(|e| e.id)
    }

    /// Live entities whose bounding circle intersects the rectangle, in
    /// insertion order.
    pub fn entities_in_rect(&self, rect: &Rect) -> Vec<EntityId> {
        self.iter().filter(|e| e.intersects_rect(rect)).map(|e| e.id).collect()
    }

    pub fn entities_by_team(&self, team: Team) -> impl Iterator<Item = &Entity> + '_ {
        self.iter().filter(move |e| e.team == team)
    }

    pub fn buildings_by_team(&self, team: Team) -> impl Iterator<Item = &Entity> + '_ {
        self.entities_by_team(team).filter(|e| e.is_building())
    }

    /// All live entities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter().filter(|e| e.is_alive())
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reduce an entity's health, clamping at zero. Returns whether this
    /// killed it. Damage against an already-dead or missing entity is a
    /// no-op reported as no kill.
    pub fn apply_damage(&mut self, id: EntityId, amount: u32) -> bool {
        let Some(idx) = self.slot_of(id) else { return false };
        let entity = &mut self.entities[idx];
        if !entity.is_alive() {
            return false;
        }
        entity.health = entity.health.saturating_sub(amount);
        !entity.is_alive()
    }

    /// Point a unit at a destination. Clears any attack order. Returns
    /// whether the order applied (live, movable unit).
    pub fn set_move_target(&mut self, id: EntityId, dest: Vec2) -> bool {
        let Some(idx) = self.slot_of(id) else { return false };
        if !self.entities[idx].is_alive() || !self.entities[idx].can_move {
            return false;
        }
        match self.entities[idx].as_unit_mut() {
            Some(unit) => {
                unit.move_target = Some(dest);
                unit.attack_target = None;
                true
            }
            None => false,
        }
    }

    /// Point a unit at an enemy. Also sets the chase destination to the
    /// target's current position. Returns whether the order applied (live
    /// unit, live opposing target).
    pub fn set_attack_target(&mut self, id: EntityId, target: EntityId) -> bool {
        let Some((target_pos, target_team)) = self.get(target).map(|t| (t.pos, t.team)) else {
            return false;
        };
        let Some(idx) = self.slot_of(id) else { return false };
        if !self.entities[idx].is_alive() || self.entities[idx].team == target_team {
            return false;
        }
        match self.entities[idx].as_unit_mut() {
            Some(unit) => {
                unit.attack_target = Some(target);
                unit.move_target = Some(target_pos);
                true
            }
            None => false,
        }
    }

    /// Queue a production order on a completed building. Rejected (false)
    /// if the building is missing, incomplete, already producing, or does
    /// not offer the kind.
    pub fn start_production(&mut self, id: EntityId, kind: UnitKind) -> bool {
        let Some(idx) = self.slot_of(id) else { return false };
        if !self.entities[idx].is_alive() {
            return false;
        }
        let Some(building) = self.entities[idx].as_building_mut() else { return false };
        if !building.is_completed
            || building.production.is_some()
            || !building.kind.production_options().contains(&kind)
        {
            return false;
        }
        building.production = Some(ProductionOrder {
            kind,
            remaining: kind.production_time(),
        });
        true
    }

    /// Advance every entity by one tick.
    ///
    /// Iterates a snapshot of the live set in insertion order and updates
    /// each entity against current registry state, so later entities
    /// observe earlier entities' same-tick moves and deaths. Afterwards
    /// every entity at health 0 is reaped. `_terrain` is part of the tick
    /// interface for behaviors; the current movement rules never consult
    /// passability.
    pub fn tick(&mut self, _terrain: &TileMap) -> Vec<SimulationEvent> {
        let mut events = Vec::new();

        let snapshot: Vec<EntityId> =
            self.entities.iter().filter(|e| e.is_alive()).map(|e| e.id).collect();
        for id in snapshot {
            let Some(idx) = self.slot_of(id) else { continue };
            // Killed earlier in this same tick: no update, no longer a
            // valid target for anyone processed after it either.
            if !self.entities[idx].is_alive() {
                continue;
            }
            if self.entities[idx].is_building() {
                building::update_building(self, idx, &mut events);
            } else {
                unit::update_unit(self, idx, &mut events);
            }
        }

        self.reap(&mut events);
        events
    }

    fn reap(&mut self, events: &mut Vec<SimulationEvent>) {
        if self.entities.iter().all(|e| e.is_alive()) {
            return;
        }
        for entity in self.entities.iter().filter(|e| !e.is_alive()) {
            tracing::debug!(id = %entity.id, team = ?entity.team, "entity destroyed");
            events.push(SimulationEvent::EntityDied { id: entity.id, team: entity.team });
        }
        self.entities.retain(|e| e.is_alive());
        self.index.clear();
        for (slot, entity) in self.entities.iter().enumerate() {
            self.index.insert(entity.id, slot);
        }
    }

    /// Attacker at `attacker_idx` lands one hit on `target`: damage, then
    /// cooldown resets to its maximum.
    pub(crate) fn resolve_attack(
        &mut self,
        attacker_idx: usize,
        target: EntityId,
        events: &mut Vec<SimulationEvent>,
    ) {
        let damage = self.entities[attacker_idx].attack_damage;
        let attacker = self.entities[attacker_idx].id;
        self.apply_damage(target, damage);
        let entity = &mut self.entities[attacker_idx];
        entity.cooldown_remaining = entity.cooldown_max;
        events.push(SimulationEvent::AttackHit { attacker, target, damage });
    }

    /// Nearest live opposing entity strictly inside the attacker's range.
    /// Ties go to the entity earliest in insertion order.
    pub(crate) fn closest_opponent_in_range(&self, attacker_idx: usize) -> Option<EntityId> {
        let attacker = &self.entities[attacker_idx];
        self.iter()
            .filter(|e| e.team != attacker.team)
            .map(|e| (e.id, attacker.pos.distance(&e.pos)))
            .filter(|(_, dist)| *dist < attacker.attack_range)
            .min_by_key(|(_, dist)| OrderedFloat(*dist))
            .map(|(id, _)| id)
    }

    /// True if a circle of `radius` at `candidate` would overlap any live
    /// entity other than the one at `moving_idx`. Touching exactly is not
    /// an overlap.
    pub(crate) fn overlaps_any(&self, moving_idx: usize, candidate: Vec2, radius: f32) -> bool {
        self.entities.iter().enumerate().any(|(i, other)| {
            i != moving_idx
                && other.is_alive()
                && candidate.distance(&other.pos) < radius + other.radius
        })
    }

    pub(crate) fn grid_to_world(&self, grid_x: i32, grid_y: i32) -> Vec2 {
        Vec2::new(grid_x as f32 * self.tile_size, grid_y as f32 * self.tile_size)
    }

    pub(crate) fn grid_of(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / self.tile_size).floor() as i32,
            (pos.y / self.tile_size).floor() as i32,
        )
    }
}
