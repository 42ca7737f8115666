use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use strata_chunk::Chunk;
use strata_mesh_cpu::NeighborSource;
use strata_world::ChunkCoord;

use crate::order::ring_order;

struct WindowState {
    radius: i32,
    side: usize,
    center: ChunkCoord,
    slots: Vec<Option<Arc<Chunk>>>,
    order: Arc<[(i32, i32)]>,
}

impl WindowState {
    fn new(radius: i32, center: ChunkCoord) -> Self {
        let radius = radius.max(0);
        let side = (2 * radius + 1) as usize;
        Self {
            radius,
            side,
            center,
            slots: vec![None; side * side],
            order: ring_order(radius).into(),
        }
    }

    /// Toroidal slot of `coord`: each axis taken modulo the window side.
    #[inline]
    fn slot_of(&self, coord: ChunkCoord) -> usize {
        let n = self.side as i32;
        coord.cx.rem_euclid(n) as usize * self.side + coord.cz.rem_euclid(n) as usize
    }

    fn get(&self, coord: ChunkCoord) -> Option<&Arc<Chunk>> {
        self.slots[self.slot_of(coord)]
            .as_ref()
            .filter(|c| c.coord() == coord)
    }
}

/// Square window of chunk columns, `2r+1` on a side, stored as a torus.
///
/// A coordinate always maps to the same slot for a given side length, so
/// moving the center never relocates chunks; a slot whose chunk carries the
/// wrong coordinate is stale and gets rebound in place by [`bind`].
///
/// [`bind`]: ChunkWindow::bind
pub struct ChunkWindow {
    state: RwLock<WindowState>,
    layout_generation: AtomicU64,
}

impl ChunkWindow {
    pub fn new(radius: i32, center: ChunkCoord) -> Self {
        Self {
            state: RwLock::new(WindowState::new(radius, center)),
            layout_generation: AtomicU64::new(0),
        }
    }

    pub fn radius(&self) -> i32 {
        self.state.read().radius
    }

    pub fn side(&self) -> usize {
        self.state.read().side
    }

    pub fn center(&self) -> ChunkCoord {
        self.state.read().center
    }

    /// Ring order of the current radius.
    pub fn ring_order(&self) -> Arc<[(i32, i32)]> {
        self.state.read().order.clone()
    }

    /// Bumped every time the slot array is reallocated; renderers keying
    /// buffers by slot drop them all when it changes.
    #[inline]
    pub fn layout_generation(&self) -> u64 {
        self.layout_generation.load(Ordering::Acquire)
    }

    /// Moves the window to `center` with `radius`, reallocating when the radius
    /// changed. Chunks still inside the new window are carried over.
    pub fn reshape(&self, radius: i32, center: ChunkCoord) {
        let mut st = self.state.write();
        st.center = center;
        if st.radius == radius.max(0) {
            return;
        }
        let mut next = WindowState::new(radius, center);
        let mut kept = 0usize;
        for chunk in st.slots.drain(..).flatten() {
            let coord = chunk.coord();
            if coord.chebyshev(center) > next.radius {
                continue;
            }
            let slot = next.slot_of(coord);
            chunk.set_slot(slot);
            next.slots[slot] = Some(chunk);
            kept += 1;
        }
        log::info!(
            target: "stream",
            "render distance {} -> {}: {} of {} slots carried over",
            st.radius,
            next.radius,
            kept,
            next.slots.len()
        );
        *st = next;
        self.layout_generation.fetch_add(1, Ordering::AcqRel);
    }

    /// The chunk bound to `coord`, if one is resident.
    pub fn chunk_at(&self, coord: ChunkCoord) -> Option<Arc<Chunk>> {
        self.state.read().get(coord).cloned()
    }

    /// The chunk bound to `coord`, if resident and generated.
    pub fn generated_at(&self, coord: ChunkCoord) -> Option<Arc<Chunk>> {
        self.chunk_at(coord).filter(|c| c.is_generated())
    }

    /// Makes the slot of `coord` hold a chunk bound to `coord`. Returns the chunk
    /// if it was created or rebound and needs content; `None` if it was already
    /// in place.
    pub fn bind(&self, coord: ChunkCoord) -> Option<Arc<Chunk>> {
        let mut st = self.state.write();
        let slot = st.slot_of(coord);
        match st.slots[slot].clone() {
            Some(c) if c.coord() == coord => None,
            Some(c) => {
                log::debug!(
                    target: "stream",
                    "slot {slot}: evict ({}, {}) for ({}, {})",
                    c.coord().cx,
                    c.coord().cz,
                    coord.cx,
                    coord.cz
                );
                c.rebind(coord);
                Some(c)
            }
            None => {
                let c = Arc::new(Chunk::new(slot, coord));
                st.slots[slot] = Some(c.clone());
                Some(c)
            }
        }
    }

    /// Every chunk held by a slot, in slot order.
    pub fn chunks(&self) -> Vec<Arc<Chunk>> {
        self.state.read().slots.iter().flatten().cloned().collect()
    }

    /// Resident chunks whose coordinate lies inside the window, nearest rings
    /// first.
    pub fn resident(&self) -> Vec<(ChunkCoord, Arc<Chunk>)> {
        let st = self.state.read();
        st.order
            .iter()
            .filter_map(|&(dx, dz)| {
                let coord = st.center.offset(dx, dz);
                st.get(coord).map(|c| (coord, c.clone()))
            })
            .collect()
    }
}

impl NeighborSource for ChunkWindow {
    fn neighbor(&self, coord: ChunkCoord) -> Option<Arc<Chunk>> {
        self.generated_at(coord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_wrap_around() {
        let w = ChunkWindow::new(1, ChunkCoord::new(0, 0));
        let a = w.bind(ChunkCoord::new(-1, 0)).unwrap();
        assert_eq!(a.slot(), 2 * 3);
        assert!(w.bind(ChunkCoord::new(-1, 0)).is_none());
        // (2, 0) shares the slot of (-1, 0) and takes it over
        let b = w.bind(ChunkCoord::new(2, 0)).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(w.chunk_at(ChunkCoord::new(-1, 0)).is_none());
        assert_eq!(b.coord(), ChunkCoord::new(2, 0));
    }

    #[test]
    fn reshape_carries_over_chunks_inside() {
        let w = ChunkWindow::new(2, ChunkCoord::new(0, 0));
        for &(dx, dz) in ring_order(2).iter() {
            w.bind(ChunkCoord::new(dx, dz));
        }
        let center = w.chunk_at(ChunkCoord::new(0, 0)).unwrap();
        w.reshape(1, ChunkCoord::new(0, 0));
        assert_eq!(w.layout_generation(), 1);
        assert_eq!(w.side(), 3);
        assert_eq!(w.chunks().len(), 9);
        assert!(Arc::ptr_eq(&w.chunk_at(ChunkCoord::new(0, 0)).unwrap(), &center));
        assert!(w.chunk_at(ChunkCoord::new(2, 2)).is_none());
        for c in w.chunks() {
            let coord = c.coord();
            assert_eq!(c.slot(), coord.cx.rem_euclid(3) as usize * 3 + coord.cz.rem_euclid(3) as usize);
        }
        // same radius: only the center moves
        w.reshape(1, ChunkCoord::new(5, 5));
        assert_eq!(w.layout_generation(), 1);
    }
}
