//! CPU mesher: face culling and bit-packed vertex emission for chunk columns.
#![forbid(unsafe_code)]

mod build;
mod emit;
mod face;
mod neighbors;
mod order;

pub use build::{build_chunk_mesh, generate_mesh};
pub use emit::{VertexFields, emit_face, pack_vertex, unpack_vertex};
pub use face::Face;
pub use neighbors::{BorderPlanes, NeighborSource};
pub use order::spiral_order;
