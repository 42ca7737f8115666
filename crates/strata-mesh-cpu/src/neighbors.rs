use std::sync::Arc;

use strata_blocks::BlockId;
use strata_chunk::Chunk;
use strata_world::{CHUNK_WIDTH, ChunkCoord};

use crate::face::Face;

const W: usize = CHUNK_WIDTH;

/// Lookup of loaded chunks adjacent to the one being meshed.
pub trait NeighborSource: Send + Sync {
    /// The generated chunk bound to `coord`, if it is resident.
    fn neighbor(&self, coord: ChunkCoord) -> Option<Arc<Chunk>>;
}

/// No neighbors loaded; every chunk border is treated as the edge of the world.
impl NeighborSource for () {
    fn neighbor(&self, _coord: ChunkCoord) -> Option<Arc<Chunk>> {
        None
    }
}

/// The block planes just outside each horizontal border of a chunk.
/// `None` means the neighbor is not loaded.
#[derive(Clone, Debug, Default)]
pub struct BorderPlanes {
    planes: [Option<Vec<BlockId>>; 4],
}

impl BorderPlanes {
    pub fn none() -> Self {
        Self::default()
    }

    /// Copies the facing planes out of each loaded neighbor. Each neighbor is
    /// locked briefly and on its own.
    pub fn gather(coord: ChunkCoord, src: &(impl NeighborSource + ?Sized)) -> Self {
        let mut out = Self::none();
        for (i, (face, n)) in Face::HORIZONTAL
            .into_iter()
            .zip(coord.horizontal_neighbors())
            .enumerate()
        {
            let Some(chunk) = src.neighbor(n) else {
                continue;
            };
            out.planes[i] = match face {
                Face::Left => chunk.plane_x(W - 1),
                Face::Right => chunk.plane_x(0),
                Face::Front => chunk.plane_z(0),
                _ => chunk.plane_z(W - 1),
            };
        }
        out
    }

    /// Sets the plane seen through `face`. Layout is `[y * W + t]`, where `t` is
    /// the local z for Left/Right and the local x for Front/Back.
    pub fn with_plane(mut self, face: Face, plane: Vec<BlockId>) -> Self {
        if let Some(i) = Self::slot(face) {
            self.planes[i] = Some(plane);
        }
        self
    }

    /// Block across the border from local `(y, t)` through `face`.
    #[inline]
    pub fn get(&self, face: Face, y: usize, t: usize) -> Option<BlockId> {
        let plane = self.planes[Self::slot(face)?].as_ref()?;
        plane.get(y * W + t).copied()
    }

    #[inline]
    fn slot(face: Face) -> Option<usize> {
        match face {
            Face::Left => Some(0),
            Face::Right => Some(1),
            Face::Front => Some(2),
            Face::Back => Some(3),
            Face::Top | Face::Bottom => None,
        }
    }
}
