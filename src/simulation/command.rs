//! Player commands - queued between ticks, applied at tick start

use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, Vec2};
use crate::entity::kind::UnitKind;
use crate::entity::registry::EntityRegistry;

/// An order issued from outside the simulation.
///
/// Commands are validated when the queue drains at the start of a tick,
/// not when issued. By apply time the subject or target may be dead, the
/// target may be friendly, the building may be busy, or the id may never
/// have existed; any of those turns the command into a logged no-op
/// rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Move { entity: EntityId, dest: Vec2 },
    Attack { entity: EntityId, target: EntityId },
    Produce { building: EntityId, kind: UnitKind },
}

/// Apply one command against current registry state. Returns whether it
/// took effect.
pub(crate) fn apply(registry: &mut EntityRegistry, command: Command) -> bool {
    let applied = match command {
        Command::Move { entity, dest } => registry.set_move_target(entity, dest),
        Command::Attack { entity, target } => registry.set_attack_target(entity, target),
        Command::Produce { building, kind } => registry.start_production(building, kind),
    };
    if !applied {
        tracing::debug!(?command, "command dropped: subject or target invalid");
    }
    applied
}
