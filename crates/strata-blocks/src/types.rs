/// Block identifier; `0` is air.
pub type BlockId = u8;

pub const AIR: BlockId = 0;

/// Height level of a full cube.
pub const FULL_HEIGHT: u8 = 15;

/// Per-face texture slot, in vertex orientation-code order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum FaceSlot {
    Top = 0,
    Bottom = 1,
    Left = 2,
    Right = 3,
    Front = 4,
    Back = 5,
}

impl FaceSlot {
    pub const ALL: [FaceSlot; 6] = [
        FaceSlot::Top,
        FaceSlot::Bottom,
        FaceSlot::Left,
        FaceSlot::Right,
        FaceSlot::Front,
        FaceSlot::Back,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}
