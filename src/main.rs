//! Steelmarch - Entry Point
//!
//! Interactive console front end for the simulation engine. It starts a
//! session from the default skirmish config, then loops reading orders
//! from stdin, queueing them, and advancing ticks on demand.

use steelmarch::core::config::SimConfig;
use steelmarch::core::error::Result;
use steelmarch::core::types::{EntityId, Team, Vec2};
use steelmarch::entity::kind::UnitKind;
use steelmarch::entity::registry::SimulationEvent;
use steelmarch::simulation::command::Command;
use steelmarch::simulation::session::{Engine, GameSession};
use steelmarch::terrain::TerrainKind;

use std::io::{self, Write};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "steelmarch=info".into()),
        )
        .init();

    tracing::info!("Steelmarch starting...");

    let mut engine = Engine::new();
    engine.start_session(&SimConfig::default())?;

    println!("\n=== STEELMARCH ===");
    println!("Fixed-tick RTS simulation engine");
    println!();
    println!("Commands:");
    println!("  tick / t                 - Advance simulation by one tick");
    println!("  run <n>                  - Run n simulation ticks");
    println!("  status / s               - Show session status");
    println!("  units                    - List all live entities");
    println!("  move <id> <x> <y>        - Order a unit to a world position");
    println!("  attack <id> <target>     - Order a unit to attack an enemy");
    println!("  produce <id> <kind>      - Queue a unit at a building");
    println!("  new [seed]               - Restart with a fresh session");
    println!("  quit / q                 - Exit");
    println!();

    loop {
        display_status(engine.session()?);

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "q" {
            break;
        }

        if input == "tick" || input == "t" {
            let events = engine.session_mut()?.tick();
            report_events(&events);
            continue;
        }

        if input == "status" || input == "s" {
            display_detailed_status(engine.session()?);
            continue;
        }

        if input == "units" {
            display_entities(engine.session()?);
            continue;
        }

        if let Some(rest) = input.strip_prefix("run ") {
            match rest.trim().parse::<u32>() {
                Ok(n) => {
                    println!("Running {} ticks...", n);
                    let session = engine.session_mut()?;
                    for _ in 0..n {
                        let events = session.tick();
                        report_events(&events);
                    }
                    println!("Now at tick {}.", session.elapsed_ticks());
                }
                Err(_) => println!("Usage: run <number>"),
            }
            continue;
        }

        if input == "new" || input.starts_with("new ") {
            let seed = input
                .strip_prefix("new")
                .and_then(|rest| rest.trim().parse::<u64>().ok())
                .unwrap_or_else(rand::random);
            let config = SimConfig { seed, ..SimConfig::default() };
            engine.start_session(&config)?;
            println!("Fresh session started (seed {}).", seed);
            continue;
        }

        match parse_order(input) {
            Some(command) => {
                engine.session_mut()?.queue(command);
                println!("Queued. Orders apply on the next tick.");
            }
            None => {
                println!("Unknown command. Try: tick, run <n>, status, units, move, attack, produce, new, quit");
            }
        }
    }

    let session = engine.session()?;
    println!(
        "\nGoodbye! Final state: {} entities, {} ticks ({:.1}s simulated), outcome {:?}.",
        session.registry().len(),
        session.elapsed_ticks(),
        session.elapsed_seconds(),
        session.outcome()
    );
    Ok(())
}

/// Parse `move`, `attack`, and `produce` orders. Anything else is `None`.
fn parse_order(input: &str) -> Option<Command> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    match tokens.as_slice() {
        ["move", id, x, y] => Some(Command::Move {
            entity: EntityId(id.parse().ok()?),
            dest: Vec2::new(x.parse().ok()?, y.parse().ok()?),
        }),
        ["attack", id, target] => Some(Command::Attack {
            entity: EntityId(id.parse().ok()?),
            target: EntityId(target.parse().ok()?),
        }),
        ["produce", id, kind] => Some(Command::Produce {
            building: EntityId(id.parse().ok()?),
            kind: UnitKind::from_name(kind)?,
        }),
        _ => None,
    }
}

fn report_events(events: &[SimulationEvent]) {
    for event in events {
        match event {
            SimulationEvent::AttackHit { attacker, target, damage } => {
                println!("  [combat] {} hit {} for {}", attacker, target, damage);
            }
            SimulationEvent::EntityDied { id, team } => {
                println!("  [combat] {} ({:?}) destroyed", id, team);
            }
            SimulationEvent::ProductionComplete { building, unit, kind } => {
                println!("  [production] {} finished {} ({})", building, kind.name(), unit);
            }
            SimulationEvent::ConstructionComplete { building } => {
                println!("  [construction] {} completed", building);
            }
            SimulationEvent::TargetAcquired { turret, target } => {
                println!("  [combat] turret {} locked onto {}", turret, target);
            }
        }
    }
}

/// One-line summary shown before each prompt.
fn display_status(session: &GameSession) {
    let player = session.registry().entities_by_team(Team::Player).count();
    let enemy = session.registry().entities_by_team(Team::Enemy).count();
    println!();
    println!(
        "--- Tick {} ({:.1}s) | Player: {} | Enemy: {} | Gold: {} Wood: {} | {:?} ---",
        session.elapsed_ticks(),
        session.elapsed_seconds(),
        player,
        enemy,
        session.resources.gold,
        session.resources.wood,
        session.outcome()
    );
}

fn display_detailed_status(session: &GameSession) {
    let map = session.map();
    println!();
    println!("=== Session (tick {}) ===", session.elapsed_ticks());
    println!("  Map: {}x{} tiles, {} units/tile", map.width, map.height, map.tile_size);
    let features =
        [TerrainKind::Water, TerrainKind::Mountain, TerrainKind::Forest, TerrainKind::Gold];
    let counts = features.map(|kind| format!("{} {}", map.count(kind), kind.name()));
    println!("  Terrain: {}", counts.join(", "));
    println!("  Pending commands: {}", session.pending_commands());
    println!("  Outcome: {:?}", session.outcome());
}

fn display_entities(session: &GameSession) {
    println!();
    for view in session.registry().iter().map(steelmarch::simulation::EntityView::from_entity) {
        let detail = match (view.activity, view.construction_progress) {
            (Some(activity), _) => format!("{:?}", activity).to_lowercase(),
            (_, Some(progress)) if progress < 100.0 => format!("building {:.0}%", progress),
            _ => match view.production_remaining {
                Some(remaining) => format!("producing ({} ticks left)", remaining),
                None => "idle".to_string(),
            },
        };
        println!(
            "  #{} {:?} {} at ({:.0}, {:.0}) - {}/{} hp - {}",
            view.id, view.team, view.kind, view.pos.x, view.pos.y, view.health, view.max_health, detail
        );
    }
}
