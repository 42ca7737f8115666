use hashbrown::HashMap;
use strata_level::Level;
use strata_world::ChunkCoord;

/// What a renderer would hold on the GPU for one slot.
#[derive(Clone, Copy, Debug)]
struct SlotBuffers {
    coord: ChunkCoord,
    solid: usize,
    transparent: usize,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SyncStats {
    pub uploaded: usize,
    pub released: usize,
}

/// Renderer stand-in: mirrors published meshes into per-slot buffers the way
/// a GPU backend keys vertex buffers by chunk slot.
#[derive(Default)]
pub struct SlotTable {
    slots: HashMap<usize, SlotBuffers>,
    layout_generation: u64,
    uploads: u64,
    releases: u64,
}

impl SlotTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Polls every resident chunk nearest first and applies its pending mesh.
    /// An empty mesh releases the slot; a mesh for another coordinate replaces
    /// the slot's buffers and counts as a release too.
    pub fn sync(&mut self, level: &Level) -> SyncStats {
        let layout = level.window().layout_generation();
        if layout != self.layout_generation {
            self.releases += self.slots.len() as u64;
            self.slots.clear();
            self.layout_generation = layout;
        }
        let mut stats = SyncStats::default();
        for (coord, chunk) in level.resident() {
            let Some(mesh) = chunk.poll_mesh() else {
                continue;
            };
            let slot = chunk.slot();
            if mesh.is_empty() {
                if self.slots.remove(&slot).is_some() {
                    stats.released += 1;
                }
                continue;
            }
            let previous = self.slots.insert(
                slot,
                SlotBuffers {
                    coord,
                    solid: mesh.solid.len(),
                    transparent: mesh.transparent.len(),
                },
            );
            if previous.is_some_and(|b| b.coord != coord) {
                stats.released += 1;
            }
            stats.uploaded += 1;
        }
        self.uploads += stats.uploaded as u64;
        self.releases += stats.released as u64;
        stats
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.slots.values().map(|b| b.solid + b.transparent).sum()
    }

    pub fn uploads(&self) -> u64 {
        self.uploads
    }

    pub fn releases(&self) -> u64 {
        self.releases
    }
}
