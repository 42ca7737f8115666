//! Voxel grid traversal.

use strata_geom::{IVec3, Vec3};

/// First solid cell on a ray and the cell visited just before it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridHit {
    pub block: IVec3,
    pub previous: IVec3,
}

#[inline]
fn axis(origin: f32, dir: f32) -> (i32, f32, f32) {
    if dir > 0.0 {
        let inv = 1.0 / dir;
        (1, (origin.floor() + 1.0 - origin) * inv, inv)
    } else if dir < 0.0 {
        let inv = 1.0 / -dir;
        (-1, (origin - origin.floor()) * inv, inv)
    } else {
        (0, f32::INFINITY, f32::INFINITY)
    }
}

/// Walks the unit grid from `origin` along `dir` (DDA), stepping one cell at a
/// time across the nearest cell boundary, and returns the first cell for which
/// `solid` holds. The cell containing `origin` is not tested. Stops once the
/// distance travelled exceeds `max_len`. A zero or non-finite direction hits
/// nothing.
pub fn first_hit<F>(origin: Vec3, dir: Vec3, max_len: f32, mut solid: F) -> Option<GridHit>
where
    F: FnMut(IVec3) -> bool,
{
    let len = dir.length();
    if !len.is_finite() || len < 1e-6 || !(max_len > 0.0) {
        return None;
    }
    let d = dir / len;

    let (sx, mut tmx, tdx) = axis(origin.x, d.x);
    let (sy, mut tmy, tdy) = axis(origin.y, d.y);
    let (sz, mut tmz, tdz) = axis(origin.z, d.z);

    let mut cell = origin.floor();
    // each unit of travel crosses at most three boundaries
    let max_steps = 3 * max_len.min(65_536.0).ceil() as usize + 3;
    for _ in 0..max_steps {
        let previous = cell;
        let t = if tmx < tmy && tmx < tmz {
            cell.x += sx;
            let t = tmx;
            tmx += tdx;
            t
        } else if tmy < tmz {
            cell.y += sy;
            let t = tmy;
            tmy += tdy;
            t
        } else {
            cell.z += sz;
            let t = tmz;
            tmz += tdz;
            t
        };
        if t > max_len {
            break;
        }
        if solid(cell) {
            return Some(GridHit {
                block: cell,
                previous,
            });
        }
    }
    None
}
