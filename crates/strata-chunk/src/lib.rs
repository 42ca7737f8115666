//! Chunk storage, world generation, and the live chunk with its mesh slot.
#![forbid(unsafe_code)]

mod buf;
mod chunk;
mod mesh;
mod terrain;

pub use buf::ChunkBuf;
pub use chunk::{Chunk, ChunkSnapshot};
pub use mesh::ChunkMesh;
pub use terrain::{ChunkGenerator, TerrainGenerator, generate_chunk_buffer};
