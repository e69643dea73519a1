//! Tile grid and passability queries

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;

/// Terrain kind of a single tile. `Grass` is the base kind every map
/// starts from; the generator layers the others on top.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainKind {
    #[default]
    Grass,
    Water,
    Mountain,
    Forest,
    Gold,
}

impl TerrainKind {
    /// Whether ground units could stand on this tile. Exposed for callers;
    /// the current movement rules do not enforce it.
    pub fn passable(&self) -> bool {
        !matches!(self, TerrainKind::Water | TerrainKind::Mountain)
    }

    /// Lowercase display label, kept in step with the serde wire form.
    pub fn name(&self) -> &'static str {
        match self {
            TerrainKind::Grass => "grass",
            TerrainKind::Water => "water",
            TerrainKind::Mountain => "mountain",
            TerrainKind::Forest => "forest",
            TerrainKind::Gold => "gold",
        }
    }
}

/// Row-major tile grid for one session. Immutable after generation except
/// through the generator's own `set` calls.
#[derive(Debug, Clone, PartialEq)]
pub struct TileMap {
    pub width: usize,
    pub height: usize,
    /// World units per tile edge.
    pub tile_size: f32,
    tiles: Vec<TerrainKind>,
}

impl TileMap {
    pub fn new(width: usize, height: usize, tile_size: f32) -> Self {
        Self {
            width,
            height,
            tile_size,
            tiles: vec![TerrainKind::default(); width * height],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<TerrainKind> {
        if x < self.width && y < self.height {
            Some(self.tiles[y * self.width + x])
        } else {
            None
        }
    }

    /// Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, kind: TerrainKind) {
        if x < self.width && y < self.height {
            self.tiles[y * self.width + x] = kind;
        }
    }

    /// Convert a world position to tile coordinates. Positions off the map
    /// (including any negative coordinate) return `None`.
    #[inline]
    pub fn world_to_tile(&self, pos: Vec2) -> Option<(usize, usize)> {
        let x = (pos.x / self.tile_size).floor();
        let y = (pos.y / self.tile_size).floor();
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            Some((x, y))
        } else {
            None
        }
    }

    /// Terrain kind under a world position, if on the map.
    pub fn tile_at(&self, pos: Vec2) -> Option<TerrainKind> {
        let (x, y) = self.world_to_tile(pos)?;
        self.get(x, y)
    }

    /// False off the map and on water/mountain tiles.
    pub fn is_passable(&self, pos: Vec2) -> bool {
        match self.tile_at(pos) {
            Some(kind) => kind.passable(),
            None => false,
        }
    }

    /// Number of tiles of the given kind, mostly useful for generation
    /// diagnostics and tests.
    pub fn count(&self, kind: TerrainKind) -> usize {
        self.tiles.iter().filter(|&&t| t == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_map_is_all_grass() {
        let map = TileMap::new(8, 6, 32.0);
        assert_eq!(map.count(TerrainKind::Grass), 48);
        assert_eq!(map.get(7, 5), Some(TerrainKind::Grass));
        assert_eq!(map.get(8, 0), None);
        assert_eq!(map.get(0, 6), None);
    }

    #[test]
    fn test_set_out_of_bounds_is_ignored() {
        let mut map = TileMap::new(4, 4, 32.0);
        map.set(4, 0, TerrainKind::Water);
        map.set(0, 100, TerrainKind::Water);
        assert_eq!(map.count(TerrainKind::Water), 0);

        map.set(3, 3, TerrainKind::Water);
        assert_eq!(map.get(3, 3), Some(TerrainKind::Water));
    }

    #[test]
    fn test_world_to_tile_floors() {
        let map = TileMap::new(10, 10, 32.0);
        assert_eq!(map.world_to_tile(Vec2::new(0.0, 0.0)), Some((0, 0)));
        assert_eq!(map.world_to_tile(Vec2::new(31.9, 31.9)), Some((0, 0)));
        assert_eq!(map.world_to_tile(Vec2::new(32.0, 64.0)), Some((1, 2)));
        // Slightly negative positions are off the map, not tile 0
        assert_eq!(map.world_to_tile(Vec2::new(-0.1, 5.0)), None);
        // The far edge is exclusive
        assert_eq!(map.world_to_tile(Vec2::new(320.0, 0.0)), None);
        assert_eq!(map.world_to_tile(Vec2::new(319.9, 319.9)), Some((9, 9)));
    }

    #[test]
    fn test_kind_names_match_wire_form() {
        let kinds = [
            TerrainKind::Grass,
            TerrainKind::Water,
            TerrainKind::Mountain,
            TerrainKind::Forest,
            TerrainKind::Gold,
        ];
        for kind in kinds {
            let wire = serde_json::to_string(&kind).unwrap();
            assert_eq!(wire, format!("\"{}\"", kind.name()));
        }
    }

    #[test]
    fn test_passability() {
        assert!(TerrainKind::Grass.passable());
        assert!(TerrainKind::Forest.passable());
        assert!(TerrainKind::Gold.passable());
        assert!(!TerrainKind::Water.passable());
        assert!(!TerrainKind::Mountain.passable());

        let mut map = TileMap::new(4, 4, 32.0);
        map.set(1, 1, TerrainKind::Water);
        map.set(2, 1, TerrainKind::Mountain);
        map.set(3, 1, TerrainKind::Forest);
        assert!(!map.is_passable(Vec2::new(40.0, 40.0)));
        assert!(!map.is_passable(Vec2::new(72.0, 40.0)));
        assert!(map.is_passable(Vec2::new(104.0, 40.0)));
        assert!(map.is_passable(Vec2::new(0.0, 0.0)));
        // Off the map is never passable
        assert!(!map.is_passable(Vec2::new(-1.0, 0.0)));
        assert!(!map.is_passable(Vec2::new(500.0, 0.0)));
    }
}
