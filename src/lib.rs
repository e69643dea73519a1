//! Steelmarch - Fixed-Tick RTS Simulation Engine

pub mod core;
pub mod entity;
pub mod simulation;
pub mod terrain;
