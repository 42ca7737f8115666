/// Offsets of a `(2r+1)²` window from its center, in Chebyshev rings `0..=r`.
/// Within a ring, offsets are in row-major order of the window.
pub fn ring_order(radius: i32) -> Vec<(i32, i32)> {
    let r = radius.max(0);
    let side = 2 * r + 1;
    let mut out = Vec::with_capacity((side * side) as usize);
    for ring in 0..=r {
        for i in 0..side {
            for j in 0..side {
                let (dx, dz) = (i - r, j - r);
                if dx.abs().max(dz.abs()) == ring {
                    out.push((dx, dz));
                }
            }
        }
    }
    out
}
