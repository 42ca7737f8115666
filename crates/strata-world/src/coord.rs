use serde::{Deserialize, Serialize};
use strata_geom::{IVec3, Vec3};

use crate::{CHUNK_HEIGHT, CHUNK_WIDTH};

const W: i32 = CHUNK_WIDTH as i32;
const H: i32 = CHUNK_HEIGHT as i32;

/// Column coordinate of a chunk on the X/Z plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }

    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cz: self.cz + dz,
        }
    }

    #[inline]
    pub fn distance_sq(self, other: ChunkCoord) -> i64 {
        let dx = i64::from(self.cx - other.cx);
        let dz = i64::from(self.cz - other.cz);
        dx * dx + dz * dz
    }

    /// Ring index around `other` (max of the axis distances).
    #[inline]
    pub fn chebyshev(self, other: ChunkCoord) -> i32 {
        (self.cx - other.cx).abs().max((self.cz - other.cz).abs())
    }

    /// Chunk containing a world-space point: `floor(pos / W)` on X and Z.
    #[inline]
    pub fn from_world(pos: Vec3) -> Self {
        // Floor to the block first so points always agree with `from_block`.
        Self::from_block(pos.floor())
    }

    /// Chunk containing an integer block position.
    #[inline]
    pub fn from_block(b: IVec3) -> Self {
        Self::new(b.x.div_euclid(W), b.z.div_euclid(W))
    }

    /// World block position of local `(0, 0, 0)`.
    #[inline]
    pub fn base_block(self) -> IVec3 {
        IVec3::new(self.cx * W, 0, self.cz * W)
    }

    /// The four horizontally adjacent chunks: -X, +X, +Z, -Z.
    #[inline]
    pub fn horizontal_neighbors(self) -> [ChunkCoord; 4] {
        [
            self.offset(-1, 0),
            self.offset(1, 0),
            self.offset(0, 1),
            self.offset(0, -1),
        ]
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<ChunkCoord> for (i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cz)
    }
}

/// Block position inside a chunk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LocalPos {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl LocalPos {
    #[inline]
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    /// Splits a world block position into its chunk and local position.
    /// Returns `None` when `y` lies outside `[0, H)`.
    #[inline]
    pub fn split(b: IVec3) -> Option<(ChunkCoord, LocalPos)> {
        if !(0..H).contains(&b.y) {
            return None;
        }
        let local = LocalPos::new(
            b.x.rem_euclid(W) as usize,
            b.y as usize,
            b.z.rem_euclid(W) as usize,
        );
        Some((ChunkCoord::from_block(b), local))
    }

    /// World block position of this local position in chunk `coord`.
    #[inline]
    pub fn to_world(self, coord: ChunkCoord) -> IVec3 {
        coord.base_block() + IVec3::new(self.x as i32, self.y as i32, self.z as i32)
    }

    /// Whether the block sits on an X or Z face of its chunk.
    #[inline]
    pub fn on_border(self) -> bool {
        self.x == 0 || self.z == 0 || self.x == CHUNK_WIDTH - 1 || self.z == CHUNK_WIDTH - 1
    }
}
