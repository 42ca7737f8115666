use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;

use strata_blocks::BlockRegistry;
use strata_chunk::{ChunkGenerator, TerrainGenerator};
use strata_geom::IVec3;
use strata_mesh_cpu::{BorderPlanes, build_chunk_mesh};
use strata_world::{ChunkCoord, WorldGenConfig};

fn bench_build_terrain_chunk(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_chunk_mesh");
    let reg = BlockRegistry::builtin().unwrap();
    let tg = TerrainGenerator::new(WorldGenConfig::default(), &reg).unwrap();
    let buf = tg.generate(ChunkCoord::new(0, 0));
    group.bench_function("terrain_15x255x15", |b| {
        b.iter(|| {
            let out = build_chunk_mesh(&buf, IVec3::new(7, 70, 7), &reg, &BorderPlanes::none());
            black_box(out);
        })
    });
    group.finish();
}

fn bench_generate_chunk(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_chunk");
    let reg = BlockRegistry::builtin().unwrap();
    let tg = TerrainGenerator::new(WorldGenConfig::default(), &reg).unwrap();
    group.bench_function("terrain_column", |b| {
        b.iter(|| black_box(tg.generate(ChunkCoord::new(4, -9))))
    });
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().measurement_time(Duration::from_secs(5));
    targets = bench_build_terrain_chunk, bench_generate_chunk
}
criterion_main!(benches);
