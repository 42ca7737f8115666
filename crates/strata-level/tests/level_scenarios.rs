use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use strata_blocks::{AIR, BlockId, BlockRegistry};
use strata_chunk::{ChunkBuf, ChunkGenerator};
use strata_geom::{IVec3, Vec3};
use strata_level::{Level, LevelConfig, Streamer, WindowPass};
use strata_runtime::{Observer, ObserverCell};
use strata_world::{ChunkCoord, LocalPos};

const STONE: BlockId = 6;

/// Stone below `top`, air above.
struct Floor {
    top: usize,
}

impl ChunkGenerator for Floor {
    fn generate(&self, coord: ChunkCoord) -> ChunkBuf {
        let mut buf = ChunkBuf::new_air(coord);
        if self.top > 0 {
            buf.fill(LocalPos::new(0, 0, 0), LocalPos::new(14, self.top - 1, 14), STONE);
        }
        buf
    }
}

/// One stone block in an empty world.
struct Single(IVec3);

impl ChunkGenerator for Single {
    fn generate(&self, coord: ChunkCoord) -> ChunkBuf {
        let mut buf = ChunkBuf::new_air(coord);
        if let Some((c, local)) = LocalPos::split(self.0) {
            if c == coord {
                buf.set(local, STONE);
            }
        }
        buf
    }
}

/// Moves the observer far away while generating its first chunk.
struct Mover {
    cell: OnceLock<Arc<ObserverCell>>,
    moved: AtomicBool,
}

impl ChunkGenerator for Mover {
    fn generate(&self, coord: ChunkCoord) -> ChunkBuf {
        if !self.moved.swap(true, Ordering::SeqCst) {
            if let Some(cell) = self.cell.get() {
                cell.store(Observer::new(Vec3::new(97.0, 70.0, 7.5), 1));
            }
        }
        ChunkBuf::new_air(coord)
    }
}

fn level(radius: i32, generator: Arc<dyn ChunkGenerator>, at: Vec3) -> Level {
    let cfg = LevelConfig {
        render_distance: radius,
        mesh_workers: 2,
        gen_workers: 0,
        refix_interval: Duration::ZERO,
    };
    Level::new(cfg, Arc::new(BlockRegistry::builtin().unwrap()), generator, at).unwrap()
}

fn coords(level: &Level) -> Vec<ChunkCoord> {
    let mut v: Vec<_> = level.resident().into_iter().map(|(c, _)| c).collect();
    v.sort_by_key(|c| (c.cx, c.cz));
    v
}

fn settle(level: &Level) {
    assert!(level.wait_idle(Duration::from_secs(20)));
}

#[test]
fn radius_one_window_holds_nine_chunks() {
    let l = level(1, Arc::new(Floor { top: 10 }), Vec3::new(7.5, 70.0, 7.5));
    assert_eq!(l.ensure_window(), WindowPass::Completed);
    let mut expected = Vec::new();
    for cx in -1..=1 {
        for cz in -1..=1 {
            expected.push(ChunkCoord::new(cx, cz));
        }
    }
    assert_eq!(coords(&l), expected);
    assert_eq!(l.resident()[0].0, ChunkCoord::new(0, 0));

    settle(&l);
    for (coord, chunk) in l.resident() {
        assert_eq!(chunk.coord(), coord);
        assert!(chunk.is_generated());
        assert!(!chunk.mesh().is_empty(), "{coord:?}");
    }
    // a second pass finds every slot in place
    assert_eq!(l.ensure_window(), WindowPass::Completed);
    assert_eq!(coords(&l), expected);
}

#[test]
fn sliding_away_and_back_keeps_surviving_chunks() {
    let home = Vec3::new(7.5, 70.0, 7.5);
    let l = level(2, Arc::new(Floor { top: 10 }), home);
    l.ensure_window();
    settle(&l);

    let kept = IVec3::new(16, 40, 3);
    let lost = IVec3::new(-20, 40, 3);
    assert_eq!(l.block(kept).unwrap().set(STONE), Some(AIR));
    assert_eq!(l.block(lost).unwrap().set(STONE), Some(AIR));
    let kept_chunk = l.chunk_at(ChunkCoord::new(1, 0)).unwrap();

    l.set_observer(Vec3::new(22.5, 70.0, 7.5), 2);
    assert_eq!(l.ensure_window(), WindowPass::Completed);
    assert!(l.chunk_at(ChunkCoord::new(-2, 0)).is_none());
    assert!(l.chunk_at(ChunkCoord::new(3, 0)).is_some());

    l.set_observer(home, 2);
    assert_eq!(l.ensure_window(), WindowPass::Completed);
    let back = l.chunk_at(ChunkCoord::new(1, 0)).unwrap();
    assert!(Arc::ptr_eq(&back, &kept_chunk));
    assert_eq!(l.block(kept).unwrap().get(), Some(STONE));
    // the evicted column was regenerated from scratch
    assert_eq!(l.block(lost).unwrap().get(), Some(AIR));
    settle(&l);
}

#[test]
fn ray_down_hits_the_stone_block() {
    let stone = IVec3::new(0, 60, 0);
    let origin = Vec3::new(0.5, 65.5, 0.5);
    let l = level(1, Arc::new(Single(stone)), origin);
    l.ensure_window();

    let hit = l.cast_ray(origin, Vec3::new(0.0, -1.0, 0.0), 10.0).unwrap();
    assert_eq!(hit.target.position(), stone);
    assert_eq!(hit.target.get(), Some(STONE));
    let front = hit.front.unwrap();
    assert_eq!(front.position(), IVec3::new(0, 61, 0));
    assert_eq!(front.get(), Some(AIR));

    assert!(l.cast_ray(origin, Vec3::new(0.0, -1.0, 0.0), 4.0).is_none());
    assert!(l.cast_ray(origin, Vec3::ZERO, 10.0).is_none());
    assert!(l.cast_ray(origin, Vec3::new(0.0, 1.0, 0.0), 10.0).is_none());
    settle(&l);
}

#[test]
fn out_of_range_positions_are_not_found() {
    let l = level(1, Arc::new(Floor { top: 10 }), Vec3::new(7.5, 70.0, 7.5));
    assert!(l.block(IVec3::new(0, 5, 0)).is_none(), "nothing bound yet");
    l.ensure_window();
    assert!(l.block(IVec3::new(0, 5, 0)).is_some());
    assert!(l.block(IVec3::new(0, -1, 0)).is_none());
    assert!(l.block(IVec3::new(0, 255, 0)).is_none());
    assert!(l.block(IVec3::new(45, 5, 0)).is_none());
    assert!(l.block_at(Vec3::new(-0.5, 9.9, -14.9)).is_some());
    assert_eq!(l.block_at(Vec3::new(-14.5, 9.9, 0.0)).unwrap().get(), Some(STONE));
    settle(&l);
}

#[test]
fn border_edit_rebuilds_the_neighbor() {
    let l = level(1, Arc::new(Floor { top: 30 }), Vec3::new(7.5, 70.0, 7.5));
    l.ensure_window();
    settle(&l);
    for (_, c) in l.resident() {
        c.poll_mesh();
    }
    let at = |cx, cz| l.chunk_at(ChunkCoord::new(cx, cz)).unwrap();
    let home_faces = at(0, 0).mesh().face_count();
    let west_faces = at(-1, 0).mesh().face_count();

    assert_eq!(l.block(IVec3::new(0, 20, 7)).unwrap().set(AIR), Some(STONE));
    settle(&l);

    assert_eq!(at(0, 0).poll_mesh().unwrap().face_count(), home_faces + 5);
    assert_eq!(at(-1, 0).poll_mesh().unwrap().face_count(), west_faces + 1);
    assert!(at(1, 0).poll_mesh().is_none());
    assert!(at(0, 1).poll_mesh().is_none());
    assert!(at(0, -1).poll_mesh().is_none());
}

#[test]
fn growing_the_radius_carries_chunks_over() {
    let at = Vec3::new(7.5, 70.0, 7.5);
    let l = level(1, Arc::new(Floor { top: 10 }), at);
    l.ensure_window();
    let center = l.chunk_at(ChunkCoord::new(0, 0)).unwrap();
    l.block(IVec3::new(3, 50, 3)).unwrap().set(STONE);

    l.set_observer(at, 2);
    assert_eq!(l.ensure_window(), WindowPass::Completed);
    assert_eq!(l.window().layout_generation(), 1);
    assert_eq!(l.resident().len(), 25);
    assert!(Arc::ptr_eq(&l.chunk_at(ChunkCoord::new(0, 0)).unwrap(), &center));
    assert_eq!(l.block(IVec3::new(3, 50, 3)).unwrap().get(), Some(STONE));
    settle(&l);
}

#[test]
fn pass_restarts_when_the_observer_changes_chunk() {
    let mover = Arc::new(Mover {
        cell: OnceLock::new(),
        moved: AtomicBool::new(false),
    });
    let l = level(1, mover.clone(), Vec3::new(7.5, 70.0, 7.5));
    assert!(mover.cell.set(l.observer_cell().clone()).is_ok());

    assert_eq!(l.ensure_window(), WindowPass::Interrupted);
    assert_eq!(coords(&l), [ChunkCoord::new(0, 0)]);

    assert_eq!(l.ensure_window(), WindowPass::Completed);
    let c = coords(&l);
    assert_eq!(c.len(), 9);
    assert!(c.iter().all(|c| (5..=7).contains(&c.cx) && (-1..=1).contains(&c.cz)));
    settle(&l);
}

#[test]
fn observer_moves_requeue_changed_chunks() {
    let l = level(1, Arc::new(Floor { top: 10 }), Vec3::new(7.5, 70.0, 7.5));
    l.ensure_window();
    settle(&l);
    let before = l.stats().published;

    // same block: nothing to rebuild
    l.set_observer(Vec3::new(7.9, 70.2, 7.1), 1);
    assert_eq!(l.stats().queued + l.stats().in_flight, 0);

    // a new height changes the clamped point of every chunk
    l.set_observer(Vec3::new(7.5, 90.0, 7.5), 1);
    settle(&l);
    let stats = l.stats();
    assert!(stats.published >= before + 9, "{stats:?}");
    assert!(stats.refixes >= 1);
}

#[test]
fn streamer_follows_the_observer() {
    let l = Arc::new(level(1, Arc::new(Floor { top: 5 }), Vec3::new(7.5, 70.0, 7.5)));
    let streamer = Streamer::spawn(l.clone()).unwrap();

    let wait_for = |coord: ChunkCoord| {
        let deadline = Instant::now() + Duration::from_secs(20);
        while l.chunk_at(coord).is_none_or(|c| !c.is_generated()) {
            assert!(Instant::now() < deadline, "{coord:?} never loaded");
            std::thread::sleep(Duration::from_millis(2));
        }
    };
    wait_for(ChunkCoord::new(1, 1));

    l.set_observer(Vec3::new(7.5 + 15.0 * 4.0, 70.0, 7.5), 1);
    wait_for(ChunkCoord::new(5, 1));
    assert!(l.chunk_at(ChunkCoord::new(0, 0)).is_none());

    streamer.stop();
    streamer.stop();
    settle(&l);
}
