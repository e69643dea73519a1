//! Terrain layer - tile grid and procedural generation

pub mod generator;
pub mod tile_map;

pub use generator::generate;
pub use tile_map::{TerrainKind, TileMap};
