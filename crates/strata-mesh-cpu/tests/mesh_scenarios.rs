use proptest::prelude::*;
use strata_blocks::{AIR, BlockId, BlockRegistry};
use strata_chunk::{Chunk, ChunkBuf, ChunkMesh};
use strata_geom::IVec3;
use strata_mesh_cpu::{BorderPlanes, Face, build_chunk_mesh, generate_mesh, unpack_vertex};
use strata_world::{CHUNK_HEIGHT, CHUNK_WIDTH, ChunkCoord, LocalPos};

const W: usize = CHUNK_WIDTH;

fn reg() -> BlockRegistry {
    BlockRegistry::builtin().unwrap()
}

fn id(reg: &BlockRegistry, name: &str) -> BlockId {
    reg.id_by_name(name).unwrap()
}

/// (face, min x, min y, min z) of every emitted face.
fn faces(list: &[u32]) -> Vec<(Face, u32, u32, u32)> {
    assert_eq!(list.len() % 6, 0);
    list.chunks(6)
        .map(|quad| {
            let v: Vec<_> = quad.iter().map(|&v| unpack_vertex(v)).collect();
            let face = v[0].face().unwrap();
            assert!(v.iter().all(|f| f.face() == Some(face)));
            (
                face,
                v.iter().map(|f| f.x).min().unwrap(),
                v.iter().map(|f| f.y).min().unwrap(),
                v.iter().map(|f| f.z).min().unwrap(),
            )
        })
        .collect()
}

fn count(list: &[(Face, u32, u32, u32)], face: Face) -> usize {
    list.iter().filter(|f| f.0 == face).count()
}

fn mesh(buf: &ChunkBuf, reg: &BlockRegistry) -> ChunkMesh {
    build_chunk_mesh(buf, IVec3::new(0, 0, 0), reg, &BorderPlanes::none())
}

#[test]
fn stone_column_emits_only_exposed_faces() {
    let reg = reg();
    let mut buf = ChunkBuf::new_air(ChunkCoord::new(0, 0));
    buf.fill(LocalPos::new(0, 0, 0), LocalPos::new(W - 1, 9, W - 1), id(&reg, "stone"));
    let m = mesh(&buf, &reg);
    assert!(m.transparent.is_empty());
    let f = faces(&m.solid);

    assert_eq!(count(&f, Face::Top), W * W);
    assert!(f.iter().filter(|f| f.0 == Face::Top).all(|f| f.2 == 10));
    assert_eq!(count(&f, Face::Bottom), W * W);
    assert!(f.iter().filter(|f| f.0 == Face::Bottom).all(|f| f.2 == 0));
    for side in [Face::Left, Face::Right, Face::Front, Face::Back] {
        assert_eq!(count(&f, side), W * 10, "{side:?}");
    }
    assert!(f.iter().filter(|f| f.0.is_horizontal()).all(|f| f.2 < 10));
    assert_eq!(f.len(), 2 * W * W + 4 * W * 10);
}

#[test]
fn world_edges_always_emit() {
    let reg = reg();
    let stone = id(&reg, "stone");
    let mut buf = ChunkBuf::new_air(ChunkCoord::new(0, 0));
    buf.set(LocalPos::new(3, 0, 3), stone);
    buf.set(LocalPos::new(3, CHUNK_HEIGHT - 1, 3), stone);
    buf.set(LocalPos::new(3, CHUNK_HEIGHT - 2, 3), stone);
    let f = faces(&mesh(&buf, &reg).solid);
    assert!(f.contains(&(Face::Bottom, 3, 0, 3)));
    assert!(f.contains(&(Face::Top, 3, CHUNK_HEIGHT as u32, 3)));
    // the block under the ceiling block is covered on top
    assert!(!f.contains(&(Face::Top, 3, CHUNK_HEIGHT as u32 - 1, 3)));
}

#[test]
fn removing_a_block_updates_exposed_faces() {
    let reg = reg();
    let stone = id(&reg, "stone");
    let mut buf = ChunkBuf::new_air(ChunkCoord::new(0, 0));
    buf.fill(LocalPos::new(5, 10, 5), LocalPos::new(7, 12, 7), stone);
    let before = faces(&mesh(&buf, &reg).solid);
    assert_eq!(before.len(), 6 * 9);
    assert!(before.contains(&(Face::Top, 6, 13, 6)));

    buf.set(LocalPos::new(6, 12, 6), AIR);
    let after = faces(&mesh(&buf, &reg).solid);
    assert!(!after.contains(&(Face::Top, 6, 13, 6)));
    // block below shows its top; four walls face into the hole
    assert!(after.contains(&(Face::Top, 6, 12, 6)));
    assert!(after.contains(&(Face::Right, 6, 12, 6)));
    assert!(after.contains(&(Face::Left, 7, 12, 6)));
    assert!(after.contains(&(Face::Front, 6, 12, 6)));
    assert!(after.contains(&(Face::Back, 6, 12, 7)));
    assert_eq!(after.len(), before.len() + 4);
}

#[test]
fn transparent_faces_use_their_own_list() {
    let reg = reg();
    let (stone, water, glass) = (id(&reg, "stone"), id(&reg, "water"), id(&reg, "glass"));
    let mut buf = ChunkBuf::new_air(ChunkCoord::new(0, 0));
    buf.set(LocalPos::new(4, 20, 4), stone);
    buf.set(LocalPos::new(5, 20, 4), water);
    buf.set(LocalPos::new(4, 30, 4), glass);
    buf.set(LocalPos::new(5, 30, 4), glass);
    let m = mesh(&buf, &reg);
    let solid = faces(&m.solid);
    let clear = faces(&m.transparent);

    // stone shows through water; water is shorter than stone
    assert!(solid.contains(&(Face::Right, 5, 20, 4)));
    assert!(clear.contains(&(Face::Left, 5, 20, 4)));
    assert_eq!(solid.len(), 6);
    // water: 5 open faces plus the one against stone
    assert_eq!(clear.iter().filter(|f| f.2 == 20 || f.2 == 21).count(), 6);
    // glass against glass is culled
    assert!(!clear.contains(&(Face::Right, 5, 30, 4)));
    assert!(!clear.contains(&(Face::Left, 5, 30, 4)));
    assert_eq!(clear.iter().filter(|f| f.2 == 30 || f.2 == 31).count(), 10);

    let tops: Vec<_> = m
        .transparent
        .iter()
        .map(|&v| unpack_vertex(v))
        .filter(|v| v.orientation == 0 && v.y == 21)
        .collect();
    assert_eq!(tops.len(), 6);
    assert!(tops.iter().all(|v| v.height == 13));
}

#[test]
fn border_faces_follow_neighbor_planes() {
    let reg = reg();
    let stone = id(&reg, "stone");
    let mut buf = ChunkBuf::new_air(ChunkCoord::new(0, 0));
    buf.fill(LocalPos::new(0, 0, 0), LocalPos::new(W - 1, 0, W - 1), stone);
    let mut solid_plane = vec![AIR; CHUNK_HEIGHT * W];
    solid_plane[..W].fill(stone);
    let borders = BorderPlanes::none()
        .with_plane(Face::Left, solid_plane.clone())
        .with_plane(Face::Front, vec![AIR; CHUNK_HEIGHT * W])
        .with_plane(Face::Back, solid_plane);
    let f = faces(&build_chunk_mesh(&buf, IVec3::default(), &reg, &borders).solid);
    assert_eq!(count(&f, Face::Left), 0);
    assert_eq!(count(&f, Face::Back), 0);
    // loaded but open
    assert_eq!(count(&f, Face::Front), W);
    // not loaded: edge of the loaded world
    assert_eq!(count(&f, Face::Right), W);
}

#[test]
fn textures_come_from_the_registry() {
    let reg = reg();
    let grass = id(&reg, "grass");
    let mut buf = ChunkBuf::new_air(ChunkCoord::new(0, 0));
    buf.set(LocalPos::new(1, 1, 1), grass);
    let m = mesh(&buf, &reg);
    let ty = reg.get(grass).unwrap();
    for v in m.solid.iter().map(|&v| unpack_vertex(v)) {
        let face = v.face().unwrap();
        let base = u32::from(ty.tile(face.slot()));
        assert!([0, 1, 16, 17].contains(&(v.texture - base)), "{face:?}");
    }
}

#[test]
fn nearest_block_is_emitted_first() {
    let reg = reg();
    let stone = id(&reg, "stone");
    let mut buf = ChunkBuf::new_air(ChunkCoord::new(0, 0));
    buf.set(LocalPos::new(0, 5, 0), stone);
    buf.set(LocalPos::new(14, 100, 14), stone);
    let m = build_chunk_mesh(&buf, IVec3::new(14, 100, 14), &reg, &BorderPlanes::none());
    let first = unpack_vertex(m.solid[0]);
    assert!(first.x >= 14 && first.z >= 14 && first.y >= 100);
}

#[test]
fn generate_mesh_publishes_only_generated_chunks() {
    let reg = reg();
    let coord = ChunkCoord::new(2, 2);
    let chunk = Chunk::new(0, coord);
    assert!(!generate_mesh(&chunk, &reg, &()));

    let mut buf = ChunkBuf::new_air(coord);
    buf.set(LocalPos::new(7, 7, 7), id(&reg, "dirt"));
    assert!(chunk.set_content(buf));
    assert!(generate_mesh(&chunk, &reg, &()));
    let m = chunk.poll_mesh().unwrap();
    assert_eq!(m.face_count(), 6);
}

proptest! {
    // a solid box away from everything emits exactly its surface
    #[test]
    fn box_emits_its_surface(
        x0 in 0usize..W, y0 in 0usize..40, z0 in 0usize..W,
        sx in 1usize..6, sy in 1usize..6, sz in 1usize..6,
    ) {
        let reg = reg();
        let (x1, y1, z1) = ((x0 + sx - 1).min(W - 1), y0 + sy - 1, (z0 + sz - 1).min(W - 1));
        let (a, b, c) = (x1 - x0 + 1, y1 - y0 + 1, z1 - z0 + 1);
        let mut buf = ChunkBuf::new_air(ChunkCoord::new(0, 0));
        buf.fill(LocalPos::new(x0, y0, z0), LocalPos::new(x1, y1, z1), id(&reg, "stone"));
        let m = mesh(&buf, &reg);
        prop_assert_eq!(m.face_count(), 2 * (a * b + b * c + a * c));
    }
}
