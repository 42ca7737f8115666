//! The resident chunk window around an observer, its streaming loop, block
//! edits and ray casts.
#![forbid(unsafe_code)]

mod level;
mod order;
pub mod raycast;
mod streamer;
mod window;

pub use level::{BlockRef, Level, LevelConfig, RayHit, WindowPass};
pub use order::ring_order;
pub use streamer::Streamer;
pub use window::ChunkWindow;
