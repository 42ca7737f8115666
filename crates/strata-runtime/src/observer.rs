use crossbeam_channel::{Receiver, Sender, bounded};
use parking_lot::RwLock;
use strata_geom::Vec3;
use strata_world::ChunkCoord;

/// Where the level is viewed from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observer {
    pub position: Vec3,
    /// Window radius in chunks.
    pub render_distance: i32,
}

impl Observer {
    pub fn new(position: Vec3, render_distance: i32) -> Self {
        Self {
            position,
            render_distance,
        }
    }

    #[inline]
    pub fn chunk(&self) -> ChunkCoord {
        ChunkCoord::from_world(self.position)
    }
}

/// Shared observer with a coalescing "moved" signal.
pub struct ObserverCell {
    current: RwLock<Observer>,
    moved_tx: Sender<()>,
    moved_rx: Receiver<()>,
}

impl ObserverCell {
    pub fn new(initial: Observer) -> Self {
        let (moved_tx, moved_rx) = bounded(1);
        Self {
            current: RwLock::new(initial),
            moved_tx,
            moved_rx,
        }
    }

    #[inline]
    pub fn load(&self) -> Observer {
        *self.current.read()
    }

    /// Replaces the observer and raises the moved signal.
    pub fn store(&self, o: Observer) {
        *self.current.write() = o;
        let _ = self.moved_tx.try_send(());
    }

    /// Receiver side of the moved signal, for `select!`.
    #[inline]
    pub fn moved(&self) -> &Receiver<()> {
        &self.moved_rx
    }

    /// Consumes a pending moved signal.
    pub fn take_moved(&self) -> bool {
        self.moved_rx.try_recv().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_coalesce_into_one_signal() {
        let cell = ObserverCell::new(Observer::new(Vec3::ZERO, 2));
        assert!(!cell.take_moved());
        cell.store(Observer::new(Vec3::new(20.0, 70.0, -1.0), 2));
        cell.store(Observer::new(Vec3::new(31.0, 70.0, -1.0), 3));
        assert!(cell.take_moved());
        assert!(!cell.take_moved());
        let o = cell.load();
        assert_eq!(o.render_distance, 3);
        assert_eq!(o.chunk(), ChunkCoord::new(2, -1));
    }
}
