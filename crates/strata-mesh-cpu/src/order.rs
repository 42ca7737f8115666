use strata_blocks::AIR;
use strata_chunk::ChunkBuf;
use strata_geom::IVec3;

/// Storage indices of every non-air block, nearest to `observer` first.
/// Distance is Manhattan in chunk-local space; ties keep storage order.
pub fn spiral_order(buf: &ChunkBuf, observer: IVec3) -> Vec<usize> {
    let mut keyed: Vec<(u32, usize)> = buf
        .blocks
        .iter()
        .enumerate()
        .filter(|&(_, &b)| b != AIR)
        .map(|(i, _)| {
            let p = ChunkBuf::pos_of(i);
            let d = IVec3::new(p.x as i32, p.y as i32, p.z as i32).manhattan(observer);
            (d, i)
        })
        .collect();
    keyed.sort_unstable();
    keyed.into_iter().map(|(_, i)| i).collect()
}
