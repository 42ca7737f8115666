use strata_blocks::{BlockId, BlockRegistry};
use strata_chunk::{Chunk, ChunkBuf, ChunkMesh};
use strata_geom::IVec3;
use strata_world::{CHUNK_HEIGHT, CHUNK_WIDTH};

use crate::emit::emit_face;
use crate::face::Face;
use crate::neighbors::{BorderPlanes, NeighborSource};
use crate::order::spiral_order;

const W: usize = CHUNK_WIDTH;
const H: usize = CHUNK_HEIGHT;

/// Block adjacent to `(x, y, z)` through a horizontal face, crossing into the
/// neighbor plane at the chunk border. `None` when that neighbor is not loaded.
#[inline]
fn horizontal_neighbor(
    buf: &ChunkBuf,
    borders: &BorderPlanes,
    face: Face,
    x: usize,
    y: usize,
    z: usize,
) -> Option<BlockId> {
    match face {
        Face::Left if x == 0 => borders.get(face, y, z),
        Face::Right if x == W - 1 => borders.get(face, y, z),
        Face::Front if z == W - 1 => borders.get(face, y, x),
        Face::Back if z == 0 => borders.get(face, y, x),
        _ => {
            let (dx, _, dz) = face.delta();
            let nx = (x as i32 + dx) as usize;
            let nz = (z as i32 + dz) as usize;
            Some(buf.get_local(nx, y, nz))
        }
    }
}

#[inline]
fn face_visible(
    buf: &ChunkBuf,
    reg: &BlockRegistry,
    borders: &BorderPlanes,
    id: BlockId,
    face: Face,
    x: usize,
    y: usize,
    z: usize,
) -> bool {
    match face {
        Face::Top => y + 1 >= H || reg.shows_through(buf.get_local(x, y + 1, z), id),
        Face::Bottom => y == 0 || reg.shows_through(buf.get_local(x, y - 1, z), id),
        _ => match horizontal_neighbor(buf, borders, face, x, y, z) {
            None => true,
            Some(n) => reg.shows_through(n, id) || reg.height(n) != reg.height(id),
        },
    }
}

/// Meshes one chunk. Blocks are visited nearest-to-`observer` first; solid and
/// transparent faces go to separate vertex lists.
pub fn build_chunk_mesh(
    buf: &ChunkBuf,
    observer: IVec3,
    reg: &BlockRegistry,
    borders: &BorderPlanes,
) -> ChunkMesh {
    let mut mesh = ChunkMesh::empty();
    for i in spiral_order(buf, observer) {
        let id = buf.blocks[i];
        let Some(ty) = reg.get(id) else {
            continue;
        };
        let p = ChunkBuf::pos_of(i);
        let out = if ty.transparent {
            &mut mesh.transparent
        } else {
            &mut mesh.solid
        };
        for face in Face::ALL {
            if face_visible(buf, reg, borders, id, face, p.x, p.y, p.z) {
                emit_face(out, face, p.x, p.y, p.z, ty.tile(face.slot()), ty.height);
            }
        }
    }
    mesh
}

/// Snapshot, mesh, and publish one chunk. The chunk lock is held only while the
/// snapshot is copied. Returns `true` if a mesh was published.
pub fn generate_mesh(chunk: &Chunk, reg: &BlockRegistry, src: &(impl NeighborSource + ?Sized)) -> bool {
    let Some(snap) = chunk.snapshot() else {
        return false;
    };
    let coord = snap.buf.coord;
    let borders = BorderPlanes::gather(coord, src);
    let mesh = build_chunk_mesh(&snap.buf, snap.observer, reg, &borders);
    let faces = mesh.face_count();
    let published = chunk.publish(snap.epoch, mesh);
    if published {
        log::trace!(target: "mesh", "chunk ({}, {}) meshed: {faces} faces", coord.cx, coord.cz);
    } else {
        log::trace!(target: "mesh", "chunk ({}, {}) rebound during build; dropped", coord.cx, coord.cz);
    }
    published
}
