//! Session layer - command intake, the tick loop, and observable views

pub mod command;
pub mod session;
pub mod snapshot;

pub use command::Command;
pub use session::{Engine, GameSession, Outcome, Resources};
pub use snapshot::{EntityView, SessionSnapshot, TerrainSummary};
