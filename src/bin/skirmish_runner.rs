//! Headless Skirmish Runner
//!
//! Runs a scripted auto-battle to completion and prints a JSON summary,
//! for batch experiments over seeds and scenario configs. Both sides play
//! the same trivial commander: every idle unit is ordered to attack the
//! nearest opposing entity, re-targeted whenever its victim dies.

use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

use steelmarch::core::config::SimConfig;
use steelmarch::core::error::Result;
use steelmarch::core::types::{EntityId, Team};
use steelmarch::entity::registry::SimulationEvent;
use steelmarch::simulation::command::Command;
use steelmarch::simulation::session::{GameSession, Outcome};
use steelmarch::simulation::snapshot::SessionSnapshot;

/// Headless skirmish runner - auto-battles for batch experiments
#[derive(Parser, Debug)]
#[command(name = "skirmish_runner")]
#[command(about = "Run an auto-battle skirmish and print a result summary")]
struct Args {
    /// Scenario config (TOML). Defaults to the standard skirmish.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Terrain seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum ticks before the run is called off as a stalemate
    #[arg(long, default_value_t = 5000)]
    max_ticks: u64,

    /// Keep every free command center producing workers
    #[arg(long, default_value_t = false)]
    auto_produce: bool,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Log every event to stderr
    #[arg(long, default_value_t = false)]
    verbose: bool,
}

#[derive(Serialize)]
struct SkirmishResult {
    outcome: Outcome,
    ticks: u64,
    simulated_seconds: f32,
    player_remaining: usize,
    enemy_remaining: usize,
    attacks_landed: usize,
    entities_lost: usize,
    units_produced: usize,
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "steelmarch=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    config.seed = seed;

    let mut session = GameSession::new(&config)?;

    let mut attacks_landed = 0;
    let mut entities_lost = 0;
    let mut units_produced = 0;

    while session.outcome() == Outcome::InProgress && session.elapsed_ticks() < args.max_ticks {
        issue_orders(&mut session, args.auto_produce);
        let events = session.tick();
        for event in &events {
            match event {
                SimulationEvent::AttackHit { .. } => attacks_landed += 1,
                SimulationEvent::EntityDied { .. } => entities_lost += 1,
                SimulationEvent::ProductionComplete { .. } => units_produced += 1,
                _ => {}
            }
            if args.verbose {
                eprintln!("[{}] {:?}", session.elapsed_ticks(), event);
            }
        }
    }

    let result = SkirmishResult {
        outcome: session.outcome(),
        ticks: session.elapsed_ticks(),
        simulated_seconds: session.elapsed_seconds(),
        player_remaining: session.registry().entities_by_team(Team::Player).count(),
        enemy_remaining: session.registry().entities_by_team(Team::Enemy).count(),
        attacks_landed,
        entities_lost,
        units_produced,
        seed,
    };

    match args.format.as_str() {
        "json" => {
            let json =
                serde_json::to_string_pretty(&result).expect("Failed to serialize result");
            println!("{}", json);
        }
        _ => {
            println!("Outcome: {:?} after {} ticks ({:.1}s simulated)", result.outcome, result.ticks, result.simulated_seconds);
            println!("Remaining: {} player, {} enemy", result.player_remaining, result.enemy_remaining);
            println!(
                "Attacks landed: {}, entities lost: {}, units produced: {}",
                result.attacks_landed, result.entities_lost, result.units_produced
            );
            println!("Seed: {}", result.seed);
            let snapshot = SessionSnapshot::capture(&session);
            println!(
                "Terrain: {} water / {} mountain / {} forest / {} gold",
                snapshot.terrain.water,
                snapshot.terrain.mountain,
                snapshot.terrain.forest,
                snapshot.terrain.gold
            );
        }
    }
    Ok(())
}

/// Queue this tick's orders for both sides.
fn issue_orders(session: &mut GameSession, auto_produce: bool) {
    let mut orders: Vec<Command> = Vec::new();
    for team in [Team::Player, Team::Enemy] {
        for entity in session.registry().entities_by_team(team) {
            let Some(unit) = entity.as_unit() else {
                if auto_produce {
                    if let Some(building) = entity.as_building() {
                        if building.is_completed && building.production.is_none() {
                            if let Some(&kind) = building.kind.production_options().first() {
                                orders.push(Command::Produce { building: entity.id, kind });
                            }
                        }
                    }
                }
                continue;
            };
            if unit.attack_target.is_some() {
                continue;
            }
            if let Some(target) = nearest_opponent(session, entity.id, team) {
                orders.push(Command::Attack { entity: entity.id, target });
            }
        }
    }
    for order in orders {
        session.queue(order);
    }
}

fn nearest_opponent(session: &GameSession, from: EntityId, team: Team) -> Option<EntityId> {
    let origin = session.registry().get(from)?.pos;
    session
        .registry()
        .entities_by_team(team.opponent())
        .min_by(|a, b| {
            origin
                .distance_squared(&a.pos)
                .total_cmp(&origin.distance_squared(&b.pos))
        })
        .map(|e| e.id)
}
