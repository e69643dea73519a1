//! Entity layer - kind tables, the shared record, per-kind behavior, and
//! the registry that owns them all

pub mod building;
pub mod kind;
pub mod registry;
pub mod unit;

pub use building::{BuildingState, ProductionOrder};
pub use kind::{BuildingKind, BuildingStats, UnitKind, UnitStats};
pub use registry::{Entity, EntityKind, EntityRegistry, SimulationEvent};
pub use unit::{UnitActivity, UnitState};
