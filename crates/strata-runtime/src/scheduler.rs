use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use hashbrown::{HashMap, HashSet};
use parking_lot::{Condvar, Mutex};
use strata_blocks::BlockRegistry;
use strata_chunk::Chunk;
use strata_mesh_cpu::{NeighborSource, generate_mesh};

use crate::debounce::Debounce;
use crate::heap::{Handle, IndexedHeap};
use crate::observer::ObserverCell;

#[derive(Clone, Copy, Debug)]
pub struct SchedulerConfig {
    pub workers: usize,
    /// Minimum time between full re-prioritizations on observer movement.
    pub refix_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            refix_interval: Duration::from_millis(50),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub queued: usize,
    pub in_flight: usize,
    pub published: u64,
    /// Builds discarded because the chunk was rebound or had no content.
    pub dropped: u64,
    pub refixes: u64,
}

type ScoreFn = Box<dyn Fn(&Arc<Chunk>) -> i64 + Send>;

struct Queue {
    heap: IndexedHeap<Arc<Chunk>, i64, ScoreFn>,
    /// Queued chunks by identity.
    entries: HashMap<usize, Handle>,
    /// Chunks a worker is building right now.
    building: HashSet<usize>,
    /// Building chunks that were enqueued again; re-added when the build ends.
    rebuild: HashSet<usize>,
    refix: Debounce,
    /// A refix was suppressed by the debounce and still has to run.
    refix_pending: bool,
}

impl Queue {
    fn is_idle(&self) -> bool {
        self.heap.is_empty() && self.building.is_empty()
    }

    /// Adds `chunk` or refreshes its priority. Returns `true` if a new entry
    /// was added.
    fn push(&mut self, chunk: &Arc<Chunk>) -> bool {
        let k = key(chunk);
        if self.building.contains(&k) {
            self.rebuild.insert(k);
            return false;
        }
        if let Some(&h) = self.entries.get(&k) {
            self.heap.fix(h);
            return false;
        }
        let h = self.heap.add(chunk.clone());
        self.entries.insert(k, h);
        true
    }

    fn refix(&mut self, now: Instant, refixes: &AtomicU64) -> bool {
        if !self.refix.ready(now) {
            self.refix_pending = true;
            return false;
        }
        self.heap.fix_all();
        self.refix_pending = false;
        refixes.fetch_add(1, Ordering::Relaxed);
        true
    }
}

struct Shared {
    queue: Mutex<Queue>,
    work: Condvar,
    idle: Condvar,
    stop: AtomicBool,
    published: AtomicU64,
    dropped: AtomicU64,
    refixes: AtomicU64,
    registry: Arc<BlockRegistry>,
    neighbors: Arc<dyn NeighborSource>,
}

#[inline]
fn key(chunk: &Arc<Chunk>) -> usize {
    Arc::as_ptr(chunk) as usize
}

/// Priority queue of chunks awaiting a mesh rebuild, drained by a fixed set of
/// worker threads.
///
/// A chunk is queued at most once; chunks nearest the observer's chunk are
/// built first. Priorities are recomputed when the observer moves, no more
/// often than `refix_interval`; a suppressed recompute runs on the next pop
/// after the interval.
pub struct MeshScheduler {
    shared: Arc<Shared>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    worker_count: usize,
}

impl MeshScheduler {
    pub fn new(
        cfg: SchedulerConfig,
        observer: Arc<ObserverCell>,
        registry: Arc<BlockRegistry>,
        neighbors: Arc<dyn NeighborSource>,
    ) -> Self {
        let score: ScoreFn = Box::new(move |c: &Arc<Chunk>| {
            c.coord().distance_sq(observer.load().chunk())
        });
        Self {
            shared: Arc::new(Shared {
                queue: Mutex::new(Queue {
                    heap: IndexedHeap::new(score),
                    entries: HashMap::new(),
                    building: HashSet::new(),
                    rebuild: HashSet::new(),
                    refix: Debounce::new(cfg.refix_interval),
                    refix_pending: false,
                }),
                work: Condvar::new(),
                idle: Condvar::new(),
                stop: AtomicBool::new(false),
                published: AtomicU64::new(0),
                dropped: AtomicU64::new(0),
                refixes: AtomicU64::new(0),
                registry,
                neighbors,
            }),
            workers: Mutex::new(Vec::new()),
            worker_count: cfg.workers.max(1),
        }
    }

    /// Spawns the workers. Calling it again while running is a no-op.
    pub fn start(&self) -> io::Result<()> {
        let mut workers = self.workers.lock();
        if !workers.is_empty() || self.shared.stop.load(Ordering::Acquire) {
            return Ok(());
        }
        for i in 0..self.worker_count {
            let shared = self.shared.clone();
            let handle = thread::Builder::new()
                .name(format!("strata-mesh-{i}"))
                .spawn(move || worker_loop(shared))?;
            workers.push(handle);
        }
        log::info!(target: "mesh", "started {} mesh workers", self.worker_count);
        Ok(())
    }

    /// Queues `chunk` for a rebuild. A chunk already queued keeps its one entry
    /// and has its priority refreshed. A chunk being built is queued again once
    /// that build ends, so at most one build per chunk runs at a time.
    pub fn enqueue(&self, chunk: &Arc<Chunk>) {
        let added = self.shared.queue.lock().push(chunk);
        if added {
            self.shared.work.notify_one();
        }
    }

    /// Re-prioritizes the queue for a new observer position.
    pub fn observer_moved(&self) {
        let mut q = self.shared.queue.lock();
        q.refix(Instant::now(), &self.shared.refixes);
    }

    pub fn stats(&self) -> SchedulerStats {
        let q = self.shared.queue.lock();
        SchedulerStats {
            queued: q.heap.len(),
            in_flight: q.building.len(),
            published: self.shared.published.load(Ordering::Relaxed),
            dropped: self.shared.dropped.load(Ordering::Relaxed),
            refixes: self.shared.refixes.load(Ordering::Relaxed),
        }
    }

    /// Blocks until nothing is queued or building, or `timeout` passes.
    /// Returns `true` if the queue went idle.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut q = self.shared.queue.lock();
        while !q.is_idle() {
            if self.shared.idle.wait_until(&mut q, deadline).timed_out() {
                return q.is_idle();
            }
        }
        true
    }

    /// Stops the workers and joins them. Queued chunks are abandoned.
    pub fn stop(&self) {
        {
            // Set under the lock so no worker can miss the wakeup between its
            // stop check and its wait.
            let _q = self.shared.queue.lock();
            if self.shared.stop.swap(true, Ordering::AcqRel) {
                return;
            }
        }
        self.shared.work.notify_all();
        self.shared.idle.notify_all();
        for worker in self.workers.lock().drain(..) {
            if worker.join().is_err() {
                log::error!(target: "mesh", "mesh worker panicked");
            }
        }
        log::info!(target: "mesh", "mesh workers stopped");
    }
}

impl Drop for MeshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn worker_loop(shared: Arc<Shared>) {
    loop {
        let chunk = {
            let mut q = shared.queue.lock();
            loop {
                if shared.stop.load(Ordering::Acquire) {
                    return;
                }
                if q.refix_pending {
                    q.refix(Instant::now(), &shared.refixes);
                }
                if let Some(chunk) = q.heap.pop() {
                    let k = key(&chunk);
                    q.entries.remove(&k);
                    q.building.insert(k);
                    break chunk;
                }
                shared.work.wait(&mut q);
            }
        };

        if generate_mesh(&chunk, &shared.registry, shared.neighbors.as_ref()) {
            shared.published.fetch_add(1, Ordering::Relaxed);
        } else {
            shared.dropped.fetch_add(1, Ordering::Relaxed);
        }

        let mut q = shared.queue.lock();
        let k = key(&chunk);
        q.building.remove(&k);
        if q.rebuild.remove(&k) && q.push(&chunk) {
            log::trace!(target: "mesh", "chunk changed while building; queued again");
            shared.work.notify_one();
        }
        if q.is_idle() {
            shared.idle.notify_all();
        }
    }
}
