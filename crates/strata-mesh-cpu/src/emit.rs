use strata_blocks::FULL_HEIGHT;
use strata_blocks::atlas::ATLAS_WIDTH;

use crate::face::Face;

// Vertex word, most to least significant:
// x(4) | y(8) | z(4) | orientation(4) | texture(8) | height(4)
const X_SHIFT: u32 = 28;
const Y_SHIFT: u32 = 20;
const Z_SHIFT: u32 = 16;
const ORIENTATION_SHIFT: u32 = 12;
const TEXTURE_SHIFT: u32 = 4;

const TL: u8 = 0;
const TR: u8 = 1;
const BL: u8 = ATLAS_WIDTH;
const BR: u8 = ATLAS_WIDTH + 1;

/// One face corner: block-relative offset plus the atlas corner it samples.
#[derive(Clone, Copy)]
struct Corner {
    dx: u32,
    dy: u32,
    dz: u32,
    uv: u8,
}

const fn c(dx: u32, dy: u32, dz: u32, uv: u8) -> Corner {
    Corner { dx, dy, dz, uv }
}

/// Two triangles per face, in the winding and corner order the renderer expects.
const CORNERS: [[Corner; 6]; 6] = [
    // top
    [
        c(0, 1, 0, BR),
        c(1, 1, 1, TL),
        c(1, 1, 0, BL),
        c(0, 1, 0, BR),
        c(0, 1, 1, TR),
        c(1, 1, 1, TL),
    ],
    // bottom
    [
        c(0, 0, 0, TR),
        c(1, 0, 0, TL),
        c(1, 0, 1, BL),
        c(1, 0, 1, BL),
        c(0, 0, 1, BR),
        c(0, 0, 0, TR),
    ],
    // left
    [
        c(0, 0, 0, BL),
        c(0, 0, 1, BR),
        c(0, 1, 0, TL),
        c(0, 0, 1, BR),
        c(0, 1, 1, TR),
        c(0, 1, 0, TL),
    ],
    // right
    [
        c(1, 0, 0, BR),
        c(1, 1, 0, TR),
        c(1, 0, 1, BL),
        c(1, 0, 1, BL),
        c(1, 1, 0, TR),
        c(1, 1, 1, TL),
    ],
    // front
    [
        c(0, 0, 1, BL),
        c(1, 0, 1, BR),
        c(1, 1, 1, TR),
        c(0, 0, 1, BL),
        c(1, 1, 1, TR),
        c(0, 1, 1, TL),
    ],
    // back
    [
        c(0, 0, 0, BR),
        c(1, 1, 0, TL),
        c(1, 0, 0, BL),
        c(0, 0, 0, BR),
        c(0, 1, 0, TR),
        c(1, 1, 0, TL),
    ],
];

#[inline]
pub fn pack_vertex(x: u32, y: u32, z: u32, orientation: u32, texture: u32, height: u32) -> u32 {
    debug_assert!(x < 16 && y < 256 && z < 16 && orientation < 16 && texture < 256 && height < 16);
    x << X_SHIFT
        | y << Y_SHIFT
        | z << Z_SHIFT
        | orientation << ORIENTATION_SHIFT
        | texture << TEXTURE_SHIFT
        | height
}

/// Decoded vertex word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexFields {
    pub x: u32,
    pub y: u32,
    pub z: u32,
    pub orientation: u32,
    pub texture: u32,
    pub height: u32,
}

impl VertexFields {
    #[inline]
    pub fn face(&self) -> Option<Face> {
        Face::from_index(self.orientation as usize)
    }
}

#[inline]
pub fn unpack_vertex(v: u32) -> VertexFields {
    VertexFields {
        x: v >> X_SHIFT,
        y: (v >> Y_SHIFT) & 0xFF,
        z: (v >> Z_SHIFT) & 0xF,
        orientation: (v >> ORIENTATION_SHIFT) & 0xF,
        texture: (v >> TEXTURE_SHIFT) & 0xFF,
        height: v & 0xF,
    }
}

/// Appends the six vertices of one face of the block at local `(x, y, z)`.
/// Corners on the upper edge carry the block's `height` level; lower corners
/// carry a full level.
#[inline]
pub fn emit_face(out: &mut Vec<u32>, face: Face, x: usize, y: usize, z: usize, tile: u8, height: u8) {
    let o = face.index() as u32;
    for k in CORNERS[face.index()] {
        let h = if k.dy == 1 { height } else { FULL_HEIGHT };
        out.push(pack_vertex(
            x as u32 + k.dx,
            y as u32 + k.dy,
            z as u32 + k.dz,
            o,
            u32::from(tile) + u32::from(k.uv),
            u32::from(h),
        ));
    }
}
