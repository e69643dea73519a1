//! Procedural terrain generation
//!
//! Each feature (water, mountain, forest) runs one independent pass:
//! per-cell uniform noise, several rounds of 3x3 neighbor averaging, then
//! a coverage + threshold test. Later passes overwrite earlier ones, so
//! declaration order matters. Gold deposits are rejection-sampled onto
//! whatever grass is left.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::config::{FeatureParams, SimConfig, RESOURCE_PLACEMENT_ATTEMPTS};
use crate::terrain::tile_map::{TerrainKind, TileMap};

/// Generate the tile map for a session. Deterministic: the same seed and
/// parameters always produce a bit-identical grid.
pub fn generate(config: &SimConfig) -> TileMap {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut map = TileMap::new(config.map_width, config.map_height, config.tile_size);

    apply_feature_pass(&mut map, TerrainKind::Water, &config.terrain.water, &mut rng);
    apply_feature_pass(&mut map, TerrainKind::Mountain, &config.terrain.mountain, &mut rng);
    apply_feature_pass(&mut map, TerrainKind::Forest, &config.terrain.forest, &mut rng);
    place_deposits(&mut map, TerrainKind::Gold, config.terrain.gold_deposits, &mut rng);

    tracing::debug!(
        water = map.count(TerrainKind::Water),
        mountain = map.count(TerrainKind::Mountain),
        forest = map.count(TerrainKind::Forest),
        gold = map.count(TerrainKind::Gold),
        "terrain generated"
    );

    map
}

fn apply_feature_pass(
    map: &mut TileMap,
    kind: TerrainKind,
    params: &FeatureParams,
    rng: &mut ChaCha8Rng,
) {
    let noise = smoothed_noise(map.width, map.height, params.smoothing_passes, rng);

    for y in 0..map.height {
        for x in 0..map.width {
            // The threshold roll only happens for cells that pass the
            // coverage test; the RNG stream depends on it.
            if noise[y * map.width + x] < params.coverage && rng.gen::<f32>() < params.threshold {
                map.set(x, y, kind);
            }
        }
    }
}

/// Uniform `[0, 1)` noise blurred by `passes` rounds of 3x3 averaging.
/// Edge cells average over their in-bounds neighbors only.
fn smoothed_noise(width: usize, height: usize, passes: u32, rng: &mut ChaCha8Rng) -> Vec<f32> {
    let mut noise: Vec<f32> = (0..width * height).map(|_| rng.gen::<f32>()).collect();

    for _ in 0..passes {
        let mut smoothed = vec![0.0f32; width * height];
        for y in 0..height {
            for x in 0..width {
                let mut total = 0.0;
                let mut count = 0u32;
                for dy in -1i32..=1 {
                    for dx in -1i32..=1 {
                        let nx = x as i32 + dx;
                        let ny = y as i32 + dy;
                        if nx >= 0 && ny >= 0 && (nx as usize) < width && (ny as usize) < height {
                            total += noise[ny as usize * width + nx as usize];
                            count += 1;
                        }
                    }
                }
                smoothed[y * width + x] = total / count as f32;
            }
        }
        noise = smoothed;
    }

    noise
}

/// Scatter up to `target` deposits on remaining grass cells. Bounded
/// rejection sampling: busy maps may end up with fewer deposits than
/// asked for, which is tolerated.
fn place_deposits(map: &mut TileMap, kind: TerrainKind, target: usize, rng: &mut ChaCha8Rng) {
    if target == 0 || map.width == 0 || map.height == 0 {
        return;
    }

    let mut placed = 0;
    let mut attempts = 0;
    while placed < target && attempts < RESOURCE_PLACEMENT_ATTEMPTS {
        attempts += 1;
        let x = rng.gen_range(0..map.width);
        let y = rng.gen_range(0..map.height);
        if map.get(x, y) == Some(TerrainKind::Grass) {
            map.set(x, y, kind);
            placed += 1;
        }
    }

    if placed < target {
        tracing::debug!(placed, target, "deposit placement under-delivered");
    }
}
