//! Property-based invariant tests
//!
//! Randomized scenarios checking the contracts that must hold for every
//! input: separation after movement, health clamping, dead-entity
//! reaping, and terrain determinism.

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

use steelmarch::core::config::{
    FeatureParams, ScenarioConfig, SimConfig, TerrainConfig, UnitPlacement,
};
use steelmarch::core::types::{EntityId, Team};
use steelmarch::entity::kind::UnitKind;
use steelmarch::simulation::command::Command;
use steelmarch::simulation::session::GameSession;
use steelmarch::terrain::{self, TerrainKind};

fn arb_unit_kind() -> impl Strategy<Value = UnitKind> {
    prop_oneof![Just(UnitKind::Worker), Just(UnitKind::Soldier), Just(UnitKind::Tank)]
}

fn arb_team() -> impl Strategy<Value = Team> {
    prop_oneof![Just(Team::Player), Just(Team::Enemy)]
}

/// Units on a coarse lattice: cells are 4 grid tiles (40 world units)
/// apart, which is exactly the largest radii sum (tank + tank), so no
/// pair starts overlapping.
fn arb_lattice_units() -> impl Strategy<Value = Vec<UnitPlacement>> {
    proptest::collection::hash_map((0..8usize, 0..8usize), (arb_unit_kind(), arb_team()), 1..8)
        .prop_map(|cells| {
            cells
                .into_iter()
                .map(|((cx, cy), (kind, team))| UnitPlacement {
                    kind,
                    team,
                    grid: [(cx * 4) as i32, (cy * 4) as i32],
                })
                .collect()
        })
}

fn lattice_config(units: Vec<UnitPlacement>) -> SimConfig {
    SimConfig {
        map_width: 64,
        map_height: 64,
        tile_size: 10.0,
        scenario: ScenarioConfig { units, buildings: vec![] },
        ..SimConfig::default()
    }
}

fn assert_all_pairs_separated(session: &GameSession) -> Result<(), TestCaseError> {
    let entities: Vec<_> = session.registry().iter().collect();
    for (i, a) in entities.iter().enumerate() {
        for b in entities.iter().skip(i + 1) {
            let dist = a.pos.distance(&b.pos);
            prop_assert!(
                dist >= a.radius + b.radius,
                "entities {} and {} overlap: dist {} < {}",
                a.id,
                b.id,
                dist,
                a.radius + b.radius
            );
        }
    }
    Ok(())
}

/// Order every unit to attack the nearest opposing entity.
fn issue_attack_orders(session: &mut GameSession) {
    let mut orders: Vec<Command> = Vec::new();
    for entity in session.registry().iter() {
        if entity.is_building() {
            continue;
        }
        let nearest = session
            .registry()
            .entities_by_team(entity.team.opponent())
            .min_by(|a, b| {
                entity
                    .pos
                    .distance_squared(&a.pos)
                    .total_cmp(&entity.pos.distance_squared(&b.pos))
            })
            .map(|e| e.id);
        if let Some(target) = nearest {
            orders.push(Command::Attack { entity: entity.id, target });
        }
    }
    for order in orders {
        session.queue(order);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Movement never closes a pair of live entities inside the sum of
    /// their radii, no matter where they are ordered to go.
    #[test]
    fn prop_movement_preserves_separation(
        units in arb_lattice_units(),
        dests in proptest::collection::vec((0.0f32..640.0, 0.0f32..640.0), 8),
    ) {
        let mut session = GameSession::new(&lattice_config(units)).unwrap();
        let ids: Vec<EntityId> = session.registry().iter().map(|e| e.id).collect();
        for (id, (x, y)) in ids.iter().zip(dests.iter().cycle()) {
            session.queue(Command::Move {
                entity: *id,
                dest: steelmarch::core::types::Vec2::new(*x, *y),
            });
        }

        for _ in 0..40 {
            session.tick();
            assert_all_pairs_separated(&session)?;
        }
    }

    /// Under free-for-all combat, observable health always sits in
    /// 1..=max and anything that reached zero is gone by the time the
    /// tick returns.
    #[test]
    fn prop_combat_clamps_health_and_reaps_dead(units in arb_lattice_units()) {
        let mut session = GameSession::new(&lattice_config(units)).unwrap();

        for _ in 0..60 {
            issue_attack_orders(&mut session);
            let events = session.tick();

            for entity in session.registry().iter() {
                prop_assert!(entity.health >= 1);
                prop_assert!(entity.health <= entity.max_health);
            }
            // Every death reported this tick is really gone
            for event in &events {
                if let steelmarch::entity::registry::SimulationEvent::EntityDied { id, .. } = event
                {
                    prop_assert!(session.registry().get(*id).is_none());
                }
            }
        }
    }

    /// Identical seed and parameters give bit-identical terrain.
    #[test]
    fn prop_terrain_is_deterministic_per_seed(
        seed in any::<u64>(),
        coverage in 0.0f32..=1.0,
        threshold in 0.0f32..=1.0,
        passes in 0u32..5,
        width in 4usize..32,
        height in 4usize..32,
    ) {
        let feature = FeatureParams { coverage, threshold, smoothing_passes: passes };
        let config = SimConfig {
            map_width: width,
            map_height: height,
            seed,
            terrain: TerrainConfig {
                water: feature,
                mountain: feature,
                forest: feature,
                gold_deposits: 10,
            },
            ..SimConfig::default()
        };
        prop_assert_eq!(terrain::generate(&config), terrain::generate(&config));
    }

    /// The generator never places more gold than asked for, whatever the
    /// map looks like.
    #[test]
    fn prop_gold_respects_target(
        seed in any::<u64>(),
        target in 0usize..30,
        water_coverage in 0.0f32..=1.0,
    ) {
        let config = SimConfig {
            map_width: 32,
            map_height: 32,
            seed,
            terrain: TerrainConfig {
                water: FeatureParams {
                    coverage: water_coverage,
                    threshold: 0.9,
                    smoothing_passes: 2,
                },
                gold_deposits: target,
                ..TerrainConfig::default()
            },
            ..SimConfig::default()
        };
        let map = terrain::generate(&config);
        prop_assert!(map.count(TerrainKind::Gold) <= target);
    }
}
