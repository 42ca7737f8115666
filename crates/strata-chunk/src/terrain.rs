use std::error::Error;

use strata_blocks::{BlockId, BlockRegistry};
use strata_world::{CHUNK_WIDTH, ChunkCoord, FractalNoise, HeightField, WorldGenConfig};

use crate::buf::ChunkBuf;

/// Produces the initial content of a chunk. Must be a pure function of `coord`.
pub trait ChunkGenerator: Send + Sync {
    fn generate(&self, coord: ChunkCoord) -> ChunkBuf;
}

#[derive(Clone, Copy, Debug)]
struct Layers {
    stone: BlockId,
    dirt: BlockId,
    grass: BlockId,
    sand: BlockId,
    water: BlockId,
}

/// Heightmap terrain with a flat water table.
pub struct TerrainGenerator {
    field: Box<dyn HeightField>,
    cfg: WorldGenConfig,
    layers: Layers,
}

impl TerrainGenerator {
    /// Fractal-noise terrain as configured by `cfg`.
    pub fn new(cfg: WorldGenConfig, reg: &BlockRegistry) -> Result<Self, Box<dyn Error>> {
        let field = Box::new(FractalNoise::new(&cfg));
        Self::with_field(field, cfg, reg)
    }

    pub fn with_field(
        field: Box<dyn HeightField>,
        cfg: WorldGenConfig,
        reg: &BlockRegistry,
    ) -> Result<Self, Box<dyn Error>> {
        cfg.validate()?;
        let resolve = |name: &str| {
            reg.id_by_name(name)
                .filter(|&id| reg.get(id).is_some())
                .ok_or_else(|| format!("worldgen block '{name}' is not registered"))
        };
        let layers = Layers {
            stone: resolve(&cfg.blocks.stone)?,
            dirt: resolve(&cfg.blocks.dirt)?,
            grass: resolve(&cfg.blocks.grass)?,
            sand: resolve(&cfg.blocks.sand)?,
            water: resolve(&cfg.blocks.water)?,
        };
        log::info!(
            target: "gen",
            "terrain generator: seed {}, {} octaves at {}, water level {}",
            cfg.seed,
            cfg.octaves,
            cfg.frequency,
            cfg.water_level
        );
        Ok(Self { field, cfg, layers })
    }

    pub fn config(&self) -> &WorldGenConfig {
        &self.cfg
    }

    /// Surface height of the world column `(wx, wz)`.
    #[inline]
    pub fn surface_y(&self, wx: i32, wz: i32) -> i32 {
        self.cfg.surface_y(self.field.height_at(wx as f32, wz as f32))
    }
}

impl ChunkGenerator for TerrainGenerator {
    fn generate(&self, coord: ChunkCoord) -> ChunkBuf {
        generate_chunk_buffer(self, coord)
    }
}

/// Fills one chunk column by column: stone, a topsoil band capped by the
/// surface block, then water up to the water level.
pub fn generate_chunk_buffer(g: &TerrainGenerator, coord: ChunkCoord) -> ChunkBuf {
    let mut buf = ChunkBuf::new_air(coord);
    let base = coord.base_block();
    let wl = g.cfg.water_level;
    let soil = g.cfg.topsoil_depth;
    let l = g.layers;
    for z in 0..CHUNK_WIDTH {
        for x in 0..CHUNK_WIDTH {
            let top = g.surface_y(base.x + x as i32, base.z + z as i32);
            for k in 0..top {
                let id = if k == top - 1 {
                    if k <= wl { l.sand } else { l.grass }
                } else if k > top - 1 - soil {
                    if k <= wl { l.sand } else { l.dirt }
                } else {
                    l.stone
                };
                buf.blocks[ChunkBuf::idx(x, k as usize, z)] = id;
            }
            for k in top..=wl {
                buf.blocks[ChunkBuf::idx(x, k as usize, z)] = l.water;
            }
        }
    }
    buf
}
