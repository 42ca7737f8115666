use std::error::Error;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use strata_blocks::{AIR, BlockId, BlockRegistry};
use strata_chunk::{Chunk, ChunkGenerator};
use strata_geom::{IVec3, Vec3};
use strata_runtime::{GenPool, MeshScheduler, Observer, ObserverCell, SchedulerConfig, SchedulerStats};
use strata_world::{CHUNK_WIDTH, ChunkCoord, LocalPos};

use crate::raycast;
use crate::window::ChunkWindow;

#[derive(Clone, Copy, Debug)]
pub struct LevelConfig {
    pub render_distance: i32,
    pub mesh_workers: usize,
    /// `0` generates inline on the thread running [`Level::ensure_window`].
    pub gen_workers: usize,
    pub refix_interval: Duration,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            render_distance: 16,
            mesh_workers: 4,
            gen_workers: 2,
            refix_interval: Duration::from_millis(50),
        }
    }
}

/// Outcome of one [`Level::ensure_window`] pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowPass {
    /// Every slot of the window holds its expected chunk.
    Completed,
    /// The observer changed chunk (or render distance) mid-pass.
    Interrupted,
}

/// A block resolved to its owning chunk.
pub struct BlockRef<'a> {
    level: &'a Level,
    chunk: Arc<Chunk>,
    coord: ChunkCoord,
    local: LocalPos,
}

impl BlockRef<'_> {
    #[inline]
    pub fn position(&self) -> IVec3 {
        self.local.to_world(self.coord)
    }

    /// Current block, or `None` if the chunk has been rebound since this
    /// reference was resolved.
    pub fn get(&self) -> Option<BlockId> {
        self.chunk.read_block(self.coord, self.local)
    }

    /// Writes the block and schedules the affected meshes: the owning chunk
    /// and, for blocks on an X/Z face, the chunk across that face. Returns the
    /// previous block; `None` if the chunk has been rebound.
    pub fn set(&self, id: BlockId) -> Option<BlockId> {
        let old = self.chunk.edit_block(self.coord, self.local, id)?;
        if old == id {
            return Some(old);
        }
        let p = self.position();
        log::debug!(target: "edit", "block ({}, {}, {}): {old} -> {id}", p.x, p.y, p.z);
        let scheduler = &self.level.scheduler;
        scheduler.enqueue(&self.chunk);
        if self.local.on_border() {
            let last = CHUNK_WIDTH - 1;
            let sides = [
                (self.local.x == 0, -1, 0),
                (self.local.x == last, 1, 0),
                (self.local.z == 0, 0, -1),
                (self.local.z == last, 0, 1),
            ];
            for (dx, dz) in sides.into_iter().filter_map(|(hit, dx, dz)| hit.then_some((dx, dz))) {
                if let Some(n) = self.level.window.generated_at(self.coord.offset(dx, dz)) {
                    scheduler.enqueue(&n);
                }
            }
        }
        Some(old)
    }
}

impl std::fmt::Debug for BlockRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockRef")
            .field("position", &self.position())
            .field("chunk", &self.chunk)
            .finish()
    }
}

/// A ray-cast result: the first solid block and, when loaded, the block in
/// front of it (where a placed block would go).
#[derive(Debug)]
pub struct RayHit<'a> {
    pub target: BlockRef<'a>,
    pub front: Option<BlockRef<'a>>,
}

/// The chunks resident around the observer and the machinery that keeps them
/// generated and meshed.
pub struct Level {
    observer: Arc<ObserverCell>,
    window: Arc<ChunkWindow>,
    scheduler: Arc<MeshScheduler>,
    gen_pool: GenPool,
    registry: Arc<BlockRegistry>,
    last_block: Mutex<IVec3>,
}

impl Level {
    /// Builds a level around `position` and starts its mesh workers. The window
    /// stays empty until the first [`ensure_window`](Level::ensure_window).
    pub fn new(
        cfg: LevelConfig,
        registry: Arc<BlockRegistry>,
        generator: Arc<dyn ChunkGenerator>,
        position: Vec3,
    ) -> Result<Self, Box<dyn Error>> {
        let initial = Observer::new(position, cfg.render_distance.max(0));
        let observer = Arc::new(ObserverCell::new(initial));
        let window = Arc::new(ChunkWindow::new(initial.render_distance, initial.chunk()));
        let scheduler = Arc::new(MeshScheduler::new(
            SchedulerConfig {
                workers: cfg.mesh_workers,
                refix_interval: cfg.refix_interval,
            },
            observer.clone(),
            registry.clone(),
            window.clone(),
        ));
        scheduler.start()?;
        let gen_pool = GenPool::new(cfg.gen_workers, generator)?;
        log::info!(
            target: "stream",
            "level ready: render distance {}, {} mesh workers, {} gen workers",
            initial.render_distance,
            cfg.mesh_workers.max(1),
            cfg.gen_workers
        );
        Ok(Self {
            observer,
            window,
            scheduler,
            gen_pool,
            registry,
            last_block: Mutex::new(position.floor()),
        })
    }

    #[inline]
    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    #[inline]
    pub fn observer(&self) -> Observer {
        self.observer.load()
    }

    #[inline]
    pub fn observer_cell(&self) -> &Arc<ObserverCell> {
        &self.observer
    }

    /// Signal raised whenever the observer is updated.
    #[inline]
    pub fn observer_moved(&self) -> &Receiver<()> {
        self.observer.moved()
    }

    #[inline]
    pub fn window(&self) -> &ChunkWindow {
        &self.window
    }

    /// Publishes a new observer. When it has entered another block, every
    /// resident chunk refreshes its clamped observer point and those whose
    /// point changed are queued for a rebuild; then the queue is re-prioritized.
    pub fn set_observer(&self, position: Vec3, render_distance: i32) {
        self.observer.store(Observer::new(position, render_distance.max(0)));
        let block = position.floor();
        {
            let mut last = self.last_block.lock();
            if *last == block {
                return;
            }
            *last = block;
        }
        for chunk in self.window.chunks() {
            if chunk.set_observer(position) {
                self.scheduler.enqueue(&chunk);
            }
        }
        self.scheduler.observer_moved();
    }

    /// One streaming pass: moves the window to the observer and makes every
    /// slot hold its expected chunk, nearest rings first. Created or rebound
    /// chunks get an empty mesh at once and are handed to generation.
    pub fn ensure_window(&self) -> WindowPass {
        let obs = self.observer.load();
        let center = obs.chunk();
        self.window.reshape(obs.render_distance, center);
        let mut bound = 0usize;
        for &(dx, dz) in self.window.ring_order().iter() {
            let now = self.observer.load();
            if now.chunk() != center || now.render_distance != obs.render_distance {
                log::debug!(
                    target: "stream",
                    "observer left ({}, {}) after {bound} binds; restarting",
                    center.cx,
                    center.cz
                );
                return WindowPass::Interrupted;
            }
            let Some(chunk) = self.window.bind(center.offset(dx, dz)) else {
                continue;
            };
            chunk.set_observer(now.position);
            self.generate(chunk);
            bound += 1;
        }
        if bound > 0 {
            log::debug!(target: "stream", "window at ({}, {}): {bound} chunks bound", center.cx, center.cz);
        }
        WindowPass::Completed
    }

    fn generate(&self, chunk: Arc<Chunk>) {
        let scheduler = self.scheduler.clone();
        let window = self.window.clone();
        self.gen_pool.submit(chunk, move |c| {
            scheduler.enqueue(c);
            // neighbors mesh their borders against this chunk now
            for n in c.coord().horizontal_neighbors() {
                if let Some(n) = window.generated_at(n) {
                    scheduler.enqueue(&n);
                }
            }
        });
    }

    #[inline]
    pub fn chunk_at(&self, coord: ChunkCoord) -> Option<Arc<Chunk>> {
        self.window.chunk_at(coord)
    }

    /// Resident chunks, nearest to the observer first.
    pub fn resident(&self) -> Vec<(ChunkCoord, Arc<Chunk>)> {
        self.window.resident()
    }

    /// The generated block at world block position `b`. `None` outside the
    /// world's height range or outside the loaded window.
    pub fn block(&self, b: IVec3) -> Option<BlockRef<'_>> {
        let (coord, local) = LocalPos::split(b)?;
        let chunk = self.window.generated_at(coord)?;
        Some(BlockRef {
            level: self,
            chunk,
            coord,
            local,
        })
    }

    /// The block containing world position `pos`.
    #[inline]
    pub fn block_at(&self, pos: Vec3) -> Option<BlockRef<'_>> {
        self.block(pos.floor())
    }

    /// First non-air block within `max_len` of `origin` along `dir`. Blocks in
    /// unloaded chunks are passed through.
    pub fn cast_ray(&self, origin: Vec3, dir: Vec3, max_len: f32) -> Option<RayHit<'_>> {
        let hit = raycast::first_hit(origin, dir, max_len, |b| {
            self.block(b)
                .and_then(|r| r.get())
                .is_some_and(|id| id != AIR)
        })?;
        let target = self.block(hit.block)?;
        let front = self.block(hit.previous);
        let p = hit.block;
        log::trace!(target: "edit", "ray hit ({}, {}, {})", p.x, p.y, p.z);
        Some(RayHit { target, front })
    }

    pub fn stats(&self) -> SchedulerStats {
        self.scheduler.stats()
    }

    /// Chunks with generation outstanding.
    pub fn pending_generation(&self) -> usize {
        self.gen_pool.pending()
    }

    /// Waits until generation and meshing have both drained, or `timeout`
    /// passes. Returns `true` if both went idle.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            if !self.gen_pool.wait_idle(left) {
                return false;
            }
            let left = deadline.saturating_duration_since(Instant::now());
            if !self.scheduler.wait_idle(left) {
                return false;
            }
            // a finished build never queues generation, so one clean check suffices
            if self.gen_pool.pending() == 0 {
                return true;
            }
        }
    }

    /// Stops generation and joins the mesh workers.
    pub fn shutdown(&self) {
        self.gen_pool.stop();
        self.scheduler.stop();
    }
}

impl Drop for Level {
    fn drop(&mut self) {
        self.shutdown();
    }
}
