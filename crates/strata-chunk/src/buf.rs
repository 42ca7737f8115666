use strata_blocks::{AIR, BlockId};
use strata_world::{CHUNK_HEIGHT, CHUNK_VOLUME, CHUNK_WIDTH, ChunkCoord, LocalPos};

const W: usize = CHUNK_WIDTH;

/// Dense block storage for one chunk column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkBuf {
    pub coord: ChunkCoord,
    pub blocks: Vec<BlockId>,
}

impl ChunkBuf {
    pub fn new_air(coord: ChunkCoord) -> Self {
        Self {
            coord,
            blocks: vec![AIR; CHUNK_VOLUME],
        }
    }

    /// Wraps an existing block array, padding or truncating it to the chunk volume.
    pub fn from_blocks_local(coord: ChunkCoord, blocks: Vec<BlockId>) -> Self {
        let mut b = blocks;
        if b.len() != CHUNK_VOLUME {
            b.resize(CHUNK_VOLUME, AIR);
        }
        ChunkBuf { coord, blocks: b }
    }

    #[inline]
    pub fn idx(x: usize, y: usize, z: usize) -> usize {
        (y * W + z) * W + x
    }

    /// Inverse of [`ChunkBuf::idx`].
    #[inline]
    pub fn pos_of(i: usize) -> LocalPos {
        LocalPos::new(i % W, i / (W * W), (i / W) % W)
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> BlockId {
        self.blocks[Self::idx(x, y, z)]
    }

    #[inline]
    pub fn get(&self, p: LocalPos) -> BlockId {
        self.get_local(p.x, p.y, p.z)
    }

    #[inline]
    pub fn set(&mut self, p: LocalPos, id: BlockId) -> BlockId {
        let i = Self::idx(p.x, p.y, p.z);
        std::mem::replace(&mut self.blocks[i], id)
    }

    /// Fills the inclusive local box with `id`; coordinates are clamped to the chunk.
    pub fn fill(&mut self, min: LocalPos, max: LocalPos, id: BlockId) {
        let (x1, y1, z1) = (
            max.x.min(W - 1),
            max.y.min(CHUNK_HEIGHT - 1),
            max.z.min(W - 1),
        );
        for y in min.y..=y1 {
            for z in min.z..=z1 {
                for x in min.x..=x1 {
                    self.blocks[Self::idx(x, y, z)] = id;
                }
            }
        }
    }

    #[inline]
    pub fn has_non_air(&self) -> bool {
        self.blocks.iter().any(|&b| b != AIR)
    }

    /// Blocks on the X plane `x`, indexed `[y * W + z]`.
    pub fn plane_x(&self, x: usize) -> Vec<BlockId> {
        let mut out = Vec::with_capacity(CHUNK_HEIGHT * W);
        for y in 0..CHUNK_HEIGHT {
            for z in 0..W {
                out.push(self.get_local(x, y, z));
            }
        }
        out
    }

    /// Blocks on the Z plane `z`, indexed `[y * W + x]`.
    pub fn plane_z(&self, z: usize) -> Vec<BlockId> {
        let mut out = Vec::with_capacity(CHUNK_HEIGHT * W);
        for y in 0..CHUNK_HEIGHT {
            let row = Self::idx(0, y, z);
            out.extend_from_slice(&self.blocks[row..row + W]);
        }
        out
    }
}
