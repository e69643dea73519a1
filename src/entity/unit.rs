//! Unit behavior - cooldowns, target pursuit, combat, movement
//!
//! Each live unit runs one [`update_unit`] pass per tick, in three fixed
//! phases: cooldown decay, attack-target handling, then movement. The
//! ordering is load-bearing: a hit that lands in phase two suppresses the
//! move in phase three only through the distance it measured, so a target
//! killed by that very hit still holds the attacker in place for the rest
//! of the tick.

use serde::{Deserialize, Serialize};

use crate::core::config::ARRIVE_DISTANCE;
use crate::core::types::{EntityId, Vec2};
use crate::entity::kind::UnitKind;
use crate::entity::registry::{EntityRegistry, SimulationEvent};

/// What a unit is currently doing, derived from its orders. An attack
/// order takes precedence over a plain move order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitActivity {
    Idle,
    Moving,
    Attacking,
}

/// Unit-specific state. Shared combat fields (health, damage, cooldown)
/// live on the entity record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitState {
    pub kind: UnitKind,
    /// Destination in world units. Doubles as the chase point while an
    /// attack order is held.
    pub move_target: Option<Vec2>,
    /// Weak reference to the victim. Resolved through the registry every
    /// tick; a dead victim clears the order.
    pub attack_target: Option<EntityId>,
    /// World units per tick.
    pub move_speed: f32,
}

impl UnitState {
    pub fn activity(&self) -> UnitActivity {
        if self.attack_target.is_some() {
            UnitActivity::Attacking
        } else if self.move_target.is_some() {
            UnitActivity::Moving
        } else {
            UnitActivity::Idle
        }
    }
}

/// Advance the unit at `idx` by one tick.
pub(crate) fn update_unit(reg: &mut EntityRegistry, idx: usize, events: &mut Vec<SimulationEvent>) {
    // Phase 1: cooldown decay.
    if reg.entities[idx].cooldown_remaining > 0 {
        reg.entities[idx].cooldown_remaining -= 1;
    }

    // Phase 2: attack-target handling. Records the distance to a live
    // target so phase 3 can decide between chasing and holding position.
    let mut engaged_distance = None;
    let held_target = reg.entities[idx].as_unit().and_then(|u| u.attack_target);
    if let Some(target_id) = held_target {
        match reg.get(target_id).map(|t| t.pos) {
            None => {
                // Target died or was removed. Drop the order but keep the
                // chase point: the unit walks to where it last saw the
                // victim.
                if let Some(unit) = reg.entities[idx].as_unit_mut() {
                    unit.attack_target = None;
                }
            }
            Some(target_pos) => {
                let dist = reg.entities[idx].pos.distance(&target_pos);
                if let Some(unit) = reg.entities[idx].as_unit_mut() {
                    unit.move_target = Some(target_pos);
                }
                engaged_distance = Some(dist);
                let entity = &reg.entities[idx];
                if entity.can_attack && dist <= entity.attack_range && entity.cooldown_remaining == 0
                {
                    reg.resolve_attack(idx, target_id, events);
                }
            }
        }
    }

    // Phase 3: movement. Skipped while standing inside attack range of a
    // live target.
    let entity = &reg.entities[idx];
    if !entity.can_move {
        return;
    }
    let Some(unit) = entity.as_unit() else { return };
    let Some(dest) = unit.move_target else { return };
    if let Some(dist) = engaged_distance {
        if dist <= entity.attack_range {
            return;
        }
    }

    let offset = dest - entity.pos;
    if offset.length() > ARRIVE_DISTANCE {
        let candidate = entity.pos + offset.normalize() * unit.move_speed;
        let radius = entity.radius;
        // All-or-nothing: a step that would overlap any live entity is
        // rejected outright, leaving the unit where it stands this tick.
        if !reg.overlaps_any(idx, candidate, radius) {
            reg.entities[idx].pos = candidate;
        }
    } else {
        // Arrived. A held attack order keeps the chase point alive so the
        // pursuit can continue next tick.
        let chasing = unit.attack_target.is_some();
        if !chasing {
            if let Some(unit) = reg.entities[idx].as_unit_mut() {
                unit.move_target = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Team;
    use crate::terrain::tile_map::TileMap;

    // tile_size 10 keeps grid spawns close enough for precise distance
    // setups.
    fn registry() -> EntityRegistry {
        EntityRegistry::new(10.0)
    }

    fn test_map() -> TileMap {
        TileMap::new(100, 100, 10.0)
    }

    #[test]
    fn test_cooldown_decays_one_per_tick_and_stops_at_zero() {
        let mut reg = registry();
        let map = test_map();
        let id = reg.spawn_unit(UnitKind::Soldier, 0, 0, Team::Player);
        let idx = reg.slot_of(id).unwrap();
        reg.entities[idx].cooldown_remaining = 3;

        reg.tick(&map);
        assert_eq!(reg.get(id).unwrap().cooldown_remaining, 2);
        reg.tick(&map);
        reg.tick(&map);
        assert_eq!(reg.get(id).unwrap().cooldown_remaining, 0);
        reg.tick(&map);
        assert_eq!(reg.get(id).unwrap().cooldown_remaining, 0);
    }

    #[test]
    fn test_idle_unit_stays_put() {
        let mut reg = registry();
        let map = test_map();
        let id = reg.spawn_unit(UnitKind::Worker, 5, 5, Team::Player);
        for _ in 0..10 {
            reg.tick(&map);
        }
        assert_eq!(reg.get(id).unwrap().pos, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_moves_toward_destination_at_speed() {
        let mut reg = registry();
        let map = test_map();
        let id = reg.spawn_unit(UnitKind::Worker, 0, 0, Team::Player);
        assert!(reg.set_move_target(id, Vec2::new(100.0, 0.0)));

        reg.tick(&map);
        assert_eq!(reg.get(id).unwrap().pos, Vec2::new(2.0, 0.0));
        reg.tick(&map);
        assert_eq!(reg.get(id).unwrap().pos, Vec2::new(4.0, 0.0));
    }

    #[test]
    fn test_arrival_threshold_clears_move_order() {
        let mut reg = registry();
        let map = test_map();
        let id = reg.spawn_unit(UnitKind::Worker, 0, 0, Team::Player);

        // Exactly at the threshold counts as arrived: no step, order gone
        reg.set_move_target(id, Vec2::new(5.0, 0.0));
        reg.tick(&map);
        let entity = reg.get(id).unwrap();
        assert_eq!(entity.pos, Vec2::new(0.0, 0.0));
        assert_eq!(entity.as_unit().unwrap().move_target, None);

        // Just beyond it still moves
        reg.set_move_target(id, Vec2::new(6.0, 0.0));
        reg.tick(&map);
        assert_eq!(reg.get(id).unwrap().pos, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_blocked_step_is_rejected_whole() {
        let mut reg = registry();
        let map = test_map();
        let mover = reg.spawn_unit(UnitKind::Worker, 0, 0, Team::Player);
        // Blocker 30 units away; worker radii sum to 28
        reg.spawn_unit(UnitKind::Worker, 3, 0, Team::Enemy);
        reg.set_move_target(mover, Vec2::new(30.0, 0.0));

        // First step lands at 2.0: gap 28, touching is allowed
        reg.tick(&map);
        assert_eq!(reg.get(mover).unwrap().pos, Vec2::new(2.0, 0.0));

        // Second step would close to 26: rejected, position held
        reg.tick(&map);
        assert_eq!(reg.get(mover).unwrap().pos, Vec2::new(2.0, 0.0));
        // The move order stays; the unit is stuck, not arrived
        assert!(reg.get(mover).unwrap().as_unit().unwrap().move_target.is_some());
    }

    #[test]
    fn test_chase_point_follows_live_target() {
        let mut reg = registry();
        let map = test_map();
        let hunter = reg.spawn_unit(UnitKind::Soldier, 0, 0, Team::Player);
        let prey = reg.spawn_unit(UnitKind::Worker, 10, 0, Team::Enemy);
        assert!(reg.set_attack_target(hunter, prey));

        reg.tick(&map);
        assert_eq!(reg.get(hunter).unwrap().pos, Vec2::new(2.0, 0.0));

        // Prey relocates; the hunter's chase point tracks it
        let prey_idx = reg.slot_of(prey).unwrap();
        reg.entities[prey_idx].pos = Vec2::new(100.0, 50.0);
        reg.tick(&map);
        let unit = reg.get(hunter).unwrap().as_unit().unwrap().clone();
        assert_eq!(unit.move_target, Some(Vec2::new(100.0, 50.0)));
        assert_eq!(unit.attack_target, Some(prey));
    }

    #[test]
    fn test_strike_in_range_damages_and_resets_cooldown() {
        let mut reg = registry();
        let map = test_map();
        // Soldier range is 25; distance 20 is inside
        let soldier = reg.spawn_unit(UnitKind::Soldier, 0, 0, Team::Player);
        let worker = reg.spawn_unit(UnitKind::Worker, 2, 0, Team::Enemy);
        reg.set_attack_target(soldier, worker);

        let events = reg.tick(&map);
        assert!(events.contains(&SimulationEvent::AttackHit {
            attacker: soldier,
            target: worker,
            damage: 10,
        }));
        assert_eq!(reg.get(worker).unwrap().health, 40);
        assert_eq!(reg.get(soldier).unwrap().cooldown_remaining, 30);
        // Holding position inside range: no movement happened
        assert_eq!(reg.get(soldier).unwrap().pos, Vec2::new(0.0, 0.0));
    }

    #[test]
    fn test_damage_lands_once_per_cooldown_cycle() {
        let mut reg = registry();
        let map = test_map();
        let soldier = reg.spawn_unit(UnitKind::Soldier, 0, 0, Team::Player);
        let worker = reg.spawn_unit(UnitKind::Worker, 2, 0, Team::Enemy);
        reg.set_attack_target(soldier, worker);

        // Hit on tick 1, then nothing until the cooldown runs out
        reg.tick(&map);
        assert_eq!(reg.get(worker).unwrap().health, 40);
        for _ in 0..29 {
            reg.tick(&map);
        }
        assert_eq!(reg.get(worker).unwrap().health, 40, "no damage mid-cycle");
        // Tick 31: cooldown reaches zero and the next hit lands
        reg.tick(&map);
        assert_eq!(reg.get(worker).unwrap().health, 30);
    }

    #[test]
    fn test_pursuit_resumes_when_target_leaves_range() {
        let mut reg = registry();
        let map = test_map();
        let soldier = reg.spawn_unit(UnitKind::Soldier, 0, 0, Team::Player);
        let worker = reg.spawn_unit(UnitKind::Worker, 2, 0, Team::Enemy);
        reg.set_attack_target(soldier, worker);
        reg.tick(&map);

        // Target teleports far away: the soldier starts walking again
        let worker_idx = reg.slot_of(worker).unwrap();
        reg.entities[worker_idx].pos = Vec2::new(200.0, 0.0);
        reg.tick(&map);
        assert_eq!(reg.get(soldier).unwrap().pos, Vec2::new(2.0, 0.0));
        assert_eq!(reg.get(soldier).unwrap().cooldown_remaining, 29);
    }

    #[test]
    fn test_dead_target_drops_order_but_keeps_pursuit_point() {
        let mut reg = registry();
        let map = test_map();
        let soldier = reg.spawn_unit(UnitKind::Soldier, 0, 0, Team::Player);
        let worker = reg.spawn_unit(UnitKind::Worker, 10, 0, Team::Enemy);
        reg.set_attack_target(soldier, worker);
        reg.apply_damage(worker, 1000);

        reg.tick(&map);
        let entity = reg.get(soldier).unwrap();
        let unit = entity.as_unit().unwrap();
        assert_eq!(unit.attack_target, None);
        // Last known position survives as a plain move order...
        assert_eq!(unit.move_target, Some(Vec2::new(100.0, 0.0)));
        // ...and was already walked toward this tick
        assert_eq!(entity.pos, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_move_order_cancels_attack_order() {
        let mut reg = registry();
        let soldier = reg.spawn_unit(UnitKind::Soldier, 0, 0, Team::Player);
        let worker = reg.spawn_unit(UnitKind::Worker, 10, 0, Team::Enemy);
        reg.set_attack_target(soldier, worker);
        reg.set_move_target(soldier, Vec2::new(0.0, 50.0));

        let unit = reg.get(soldier).unwrap().as_unit().unwrap().clone();
        assert_eq!(unit.attack_target, None);
        assert_eq!(unit.move_target, Some(Vec2::new(0.0, 50.0)));
    }

    #[test]
    fn test_activity_precedence() {
        let mut state = UnitState {
            kind: UnitKind::Worker,
            move_target: None,
            attack_target: None,
            move_speed: 2.0,
        };
        assert_eq!(state.activity(), UnitActivity::Idle);
        state.move_target = Some(Vec2::new(1.0, 1.0));
        assert_eq!(state.activity(), UnitActivity::Moving);
        state.attack_target = Some(EntityId(7));
        assert_eq!(state.activity(), UnitActivity::Attacking);
    }
}
