//! Job scheduling for chunk meshing and world generation.
#![forbid(unsafe_code)]

mod debounce;
mod gen_pool;
mod heap;
mod observer;
mod scheduler;

pub use debounce::Debounce;
pub use gen_pool::GenPool;
pub use heap::{Handle, IndexedHeap};
pub use observer::{Observer, ObserverCell};
pub use scheduler::{MeshScheduler, SchedulerConfig, SchedulerStats};
