//! Chunk coordinates, noise field, and worldgen parameters.
#![forbid(unsafe_code)]

pub mod coord;
pub mod noise;
pub mod worldgen;

pub use coord::{ChunkCoord, LocalPos};
pub use noise::{FlatField, FractalNoise, HeightField};
pub use worldgen::WorldGenConfig;

/// Chunk extent along X and Z, in blocks.
pub const CHUNK_WIDTH: usize = 15;
/// Chunk extent along Y; chunks are full-height columns.
pub const CHUNK_HEIGHT: usize = 255;
/// Blocks per chunk.
pub const CHUNK_VOLUME: usize = CHUNK_WIDTH * CHUNK_HEIGHT * CHUNK_WIDTH;
