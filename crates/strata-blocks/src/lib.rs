//! Block types, texture atlas, and registry crate.
#![forbid(unsafe_code)]

pub mod atlas;
pub mod config;
pub mod registry;
pub mod types;

pub use atlas::TextureAtlas;
pub use registry::{BlockRegistry, BlockType};
pub use types::{AIR, BlockId, FULL_HEIGHT, FaceSlot};
