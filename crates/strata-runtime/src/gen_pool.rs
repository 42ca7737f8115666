use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use strata_chunk::{Chunk, ChunkGenerator};

#[derive(Default)]
struct Pending {
    count: Mutex<usize>,
    zero: Condvar,
}

impl Pending {
    fn inc(&self) {
        *self.count.lock() += 1;
    }

    fn dec(&self) {
        let mut n = self.count.lock();
        *n = n.saturating_sub(1);
        if *n == 0 {
            self.zero.notify_all();
        }
    }
}

/// Fills chunks with generated content, on a rayon pool or inline on the
/// caller's thread when built with zero workers.
pub struct GenPool {
    pool: Option<ThreadPool>,
    generator: Arc<dyn ChunkGenerator>,
    pending: Arc<Pending>,
    stopped: Arc<AtomicBool>,
}

impl GenPool {
    pub fn new(workers: usize, generator: Arc<dyn ChunkGenerator>) -> Result<Self, ThreadPoolBuildError> {
        let pool = if workers > 0 {
            Some(
                ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| format!("strata-gen-{i}"))
                    .build()?,
            )
        } else {
            None
        };
        Ok(Self {
            pool,
            generator,
            pending: Arc::new(Pending::default()),
            stopped: Arc::new(AtomicBool::new(false)),
        })
    }

    #[inline]
    pub fn is_inline(&self) -> bool {
        self.pool.is_none()
    }

    pub fn pending(&self) -> usize {
        *self.pending.count.lock()
    }

    /// Generates the column the chunk is currently bound to and installs it.
    /// `done` runs after the content is in place; it is skipped when the chunk
    /// was rebound in the meantime or the pool is stopping.
    pub fn submit<F>(&self, chunk: Arc<Chunk>, done: F)
    where
        F: FnOnce(&Arc<Chunk>) + Send + 'static,
    {
        let coord = chunk.coord();
        let generator = self.generator.clone();
        let pending = self.pending.clone();
        let stopped = self.stopped.clone();
        pending.inc();
        let job = move || {
            if !stopped.load(Ordering::Acquire) {
                let buf = generator.generate(coord);
                if chunk.set_content(buf) {
                    log::trace!(target: "gen", "chunk ({}, {}) generated", coord.cx, coord.cz);
                    done(&chunk);
                } else {
                    log::trace!(target: "gen", "chunk ({}, {}) rebound before install", coord.cx, coord.cz);
                }
            }
            pending.dec();
        };
        match &self.pool {
            Some(pool) => pool.spawn(job),
            None => job(),
        }
    }

    /// Blocks until no job is outstanding or `timeout` passes.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut n = self.pending.count.lock();
        while *n > 0 {
            if self.pending.zero.wait_until(&mut n, deadline).timed_out() {
                return *n == 0;
            }
        }
        true
    }

    /// Makes queued jobs return without generating.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }
}

impl Drop for GenPool {
    fn drop(&mut self) {
        self.stop();
    }
}
