use strata_blocks::FaceSlot;

/// Block face, numbered by its vertex orientation code.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    /// +Y
    Top = 0,
    /// -Y
    Bottom = 1,
    /// -X
    Left = 2,
    /// +X
    Right = 3,
    /// +Z
    Front = 4,
    /// -Z
    Back = 5,
}

impl Face {
    /// Emission order within a block.
    pub const ALL: [Face; 6] = [
        Face::Top,
        Face::Bottom,
        Face::Left,
        Face::Right,
        Face::Front,
        Face::Back,
    ];

    /// The four faces that can border another chunk, in `BorderPlanes` order.
    pub const HORIZONTAL: [Face; 4] = [Face::Left, Face::Right, Face::Front, Face::Back];

    /// Orientation code `[0..6)`.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_index(i: usize) -> Option<Face> {
        Face::ALL.get(i).copied()
    }

    /// Integer grid delta `(dx,dy,dz)` when stepping out of this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::Top => (0, 1, 0),
            Face::Bottom => (0, -1, 0),
            Face::Left => (-1, 0, 0),
            Face::Right => (1, 0, 0),
            Face::Front => (0, 0, 1),
            Face::Back => (0, 0, -1),
        }
    }

    #[inline]
    pub fn is_horizontal(self) -> bool {
        !matches!(self, Face::Top | Face::Bottom)
    }

    /// Texture slot for registry lookup.
    #[inline]
    pub fn slot(self) -> FaceSlot {
        FaceSlot::ALL[self.index()]
    }
}
