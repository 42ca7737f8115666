use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crossbeam_channel::{Receiver, Sender, bounded};
use parking_lot::{Mutex, RwLock};
use strata_blocks::BlockId;
use strata_geom::{IVec3, Vec3};
use strata_world::{CHUNK_HEIGHT, CHUNK_WIDTH, ChunkCoord, LocalPos};

use crate::buf::ChunkBuf;
use crate::mesh::ChunkMesh;

struct ChunkState {
    buf: ChunkBuf,
    generated: bool,
    /// Observer position clamped into this column, chunk-local.
    observer: IVec3,
    /// Observer point used by the last snapshot taken for meshing.
    meshed_observer: Option<IVec3>,
}

/// Consistent copy of a chunk taken for meshing.
#[derive(Clone, Debug)]
pub struct ChunkSnapshot {
    pub buf: ChunkBuf,
    pub observer: IVec3,
    pub epoch: u64,
}

/// A resident chunk column.
///
/// Block data and the observer cache live behind one mutex. The published mesh
/// is a separate `Arc` swapped in whole, so readers never see a partial mesh.
/// `epoch` increments every time the chunk is rebound to another coordinate;
/// meshes built from an older epoch are dropped at publish time.
pub struct Chunk {
    slot: AtomicUsize,
    epoch: AtomicU64,
    state: Mutex<ChunkState>,
    mesh: RwLock<Arc<ChunkMesh>>,
    updates_tx: Sender<()>,
    updates_rx: Receiver<()>,
}

impl Chunk {
    pub fn new(slot: usize, coord: ChunkCoord) -> Self {
        let (updates_tx, updates_rx) = bounded(1);
        Self {
            slot: AtomicUsize::new(slot),
            epoch: AtomicU64::new(0),
            state: Mutex::new(ChunkState {
                buf: ChunkBuf::new_air(coord),
                generated: false,
                observer: IVec3::default(),
                meshed_observer: None,
            }),
            mesh: RwLock::new(Arc::new(ChunkMesh::empty())),
            updates_tx,
            updates_rx,
        }
    }

    #[inline]
    pub fn slot(&self) -> usize {
        self.slot.load(Ordering::Acquire)
    }

    pub fn set_slot(&self, slot: usize) {
        self.slot.store(slot, Ordering::Release);
        // Renderers key buffers by slot; have them pick the mesh up again.
        self.notify();
    }

    #[inline]
    pub fn coord(&self) -> ChunkCoord {
        self.state.lock().buf.coord
    }

    #[inline]
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    #[inline]
    pub fn is_generated(&self) -> bool {
        self.state.lock().generated
    }

    /// Repurposes this chunk for `coord`: clears its blocks and publishes an
    /// empty mesh so the renderer drops the old geometry.
    pub fn rebind(&self, coord: ChunkCoord) {
        let mut st = self.state.lock();
        st.buf = ChunkBuf::new_air(coord);
        st.generated = false;
        st.meshed_observer = None;
        self.epoch.fetch_add(1, Ordering::AcqRel);
        *self.mesh.write() = Arc::new(ChunkMesh::empty());
        drop(st);
        self.notify();
    }

    /// Installs generated content. Returns `false` and leaves the chunk alone when
    /// it has been rebound to another coordinate since generation was requested.
    pub fn set_content(&self, buf: ChunkBuf) -> bool {
        let mut st = self.state.lock();
        if st.buf.coord != buf.coord {
            return false;
        }
        st.buf = buf;
        st.generated = true;
        true
    }

    #[inline]
    pub fn get_block(&self, p: LocalPos) -> BlockId {
        self.state.lock().buf.get(p)
    }

    /// Reads a block if the chunk is still bound to `coord` and generated.
    pub fn read_block(&self, coord: ChunkCoord, p: LocalPos) -> Option<BlockId> {
        let st = self.state.lock();
        (st.generated && st.buf.coord == coord).then(|| st.buf.get(p))
    }

    /// Writes a block if the chunk is still bound to `coord` and generated.
    /// Returns the previous block.
    pub fn edit_block(&self, coord: ChunkCoord, p: LocalPos, id: BlockId) -> Option<BlockId> {
        let mut st = self.state.lock();
        (st.generated && st.buf.coord == coord).then(|| st.buf.set(p, id))
    }

    /// Clamps the observer into this column and caches it. Returns `true` when the
    /// clamped point differs from the one the current mesh was built with.
    pub fn set_observer(&self, position: Vec3) -> bool {
        let mut st = self.state.lock();
        let base = st.buf.coord.base_block();
        let b = position.floor();
        let w = CHUNK_WIDTH as i32 - 1;
        let local = IVec3::new(
            (b.x - base.x).clamp(0, w),
            b.y.clamp(0, CHUNK_HEIGHT as i32 - 1),
            (b.z - base.z).clamp(0, w),
        );
        st.observer = local;
        st.generated && st.meshed_observer != Some(local)
    }

    /// Copies everything a mesh build needs. `None` until the chunk has content.
    pub fn snapshot(&self) -> Option<ChunkSnapshot> {
        let mut st = self.state.lock();
        if !st.generated {
            return None;
        }
        st.meshed_observer = Some(st.observer);
        Some(ChunkSnapshot {
            buf: st.buf.clone(),
            observer: st.observer,
            epoch: self.epoch(),
        })
    }

    /// Blocks on the X plane `x` of a generated chunk, indexed `[y * W + z]`.
    pub fn plane_x(&self, x: usize) -> Option<Vec<BlockId>> {
        let st = self.state.lock();
        st.generated.then(|| st.buf.plane_x(x))
    }

    /// Blocks on the Z plane `z` of a generated chunk, indexed `[y * W + x]`.
    pub fn plane_z(&self, z: usize) -> Option<Vec<BlockId>> {
        let st = self.state.lock();
        st.generated.then(|| st.buf.plane_z(z))
    }

    /// Swaps in a freshly built mesh and raises the update signal. Drops the mesh
    /// and returns `false` if the chunk was rebound after the snapshot was taken.
    pub fn publish(&self, epoch: u64, mesh: ChunkMesh) -> bool {
        let st = self.state.lock();
        if self.epoch() != epoch {
            return false;
        }
        *self.mesh.write() = Arc::new(mesh);
        drop(st);
        self.notify();
        true
    }

    /// Current mesh, regardless of the update signal.
    #[inline]
    pub fn mesh(&self) -> Arc<ChunkMesh> {
        self.mesh.read().clone()
    }

    /// Consumes the update signal; returns the current mesh if one was pending.
    pub fn poll_mesh(&self) -> Option<Arc<ChunkMesh>> {
        self.updates_rx.try_recv().ok().map(|()| self.mesh())
    }

    /// Raises the update signal. A signal that is already pending absorbs this one.
    #[inline]
    fn notify(&self) {
        let _ = self.updates_tx.try_send(());
    }
}

impl std::fmt::Debug for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunk")
            .field("slot", &self.slot())
            .field("coord", &self.coord())
            .field("epoch", &self.epoch())
            .finish()
    }
}
