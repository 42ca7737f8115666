/// Packed vertex lists for one chunk, split by draw pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChunkMesh {
    pub solid: Vec<u32>,
    pub transparent: Vec<u32>,
}

impl ChunkMesh {
    pub const VERTICES_PER_FACE: usize = 6;

    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.solid.is_empty() && self.transparent.is_empty()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.solid.len() + self.transparent.len()
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.vertex_count() / Self::VERTICES_PER_FACE
    }
}
