use std::error::Error;
use std::sync::Arc;
use std::time::{Duration, Instant};

use strata_blocks::{AIR, BlockId, BlockRegistry};
use strata_chunk::{ChunkGenerator, TerrainGenerator};
use strata_geom::Vec3;
use strata_level::{Level, Streamer};
use strata_runtime::Debounce;
use strata_world::WorldGenConfig;

use crate::config::EngineConfig;
use crate::renderer::SlotTable;

const FRAME: Duration = Duration::from_millis(16);
const STATS_EVERY: u32 = 60;
const EYE_HEIGHT: f32 = 1.6;

/// Scripted run parameters that are not engine configuration.
#[derive(Clone, Copy, Debug)]
pub struct Script {
    pub frames: u32,
    /// Blocks per frame along +X.
    pub speed: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EditStep {
    Remove,
    Place,
    Done,
}

/// Ray-cast edits at the spot the observer looks at, rate-limited.
struct Editor {
    step: EditStep,
    debounce: Debounce,
    reach: f32,
    place: BlockId,
}

impl Editor {
    fn new(cfg: &EngineConfig, place: BlockId) -> Self {
        Self {
            step: EditStep::Remove,
            debounce: Debounce::new(cfg.edit_interval()),
            reach: cfg.reach,
            place,
        }
    }

    fn tick(&mut self, level: &Level, eye: Vec3, look: Vec3) {
        if self.step == EditStep::Done || !self.debounce.ready(Instant::now()) {
            return;
        }
        let Some(hit) = level.cast_ray(eye, look, self.reach) else {
            return;
        };
        match self.step {
            EditStep::Remove => {
                let p = hit.target.position();
                if let Some(old) = hit.target.set(AIR) {
                    log::info!(target: "edit", "removed block {old} at ({}, {}, {})", p.x, p.y, p.z);
                    self.step = EditStep::Place;
                }
            }
            EditStep::Place => {
                let Some(front) = hit.front else {
                    return;
                };
                let p = front.position();
                if front.set(self.place).is_some() {
                    log::info!(target: "edit", "placed block {} at ({}, {}, {})", self.place, p.x, p.y, p.z);
                    self.step = EditStep::Done;
                }
            }
            EditStep::Done => {}
        }
    }
}

fn load_registry(cfg: &EngineConfig) -> Result<BlockRegistry, Box<dyn Error>> {
    match &cfg.blocks {
        Some(path) => {
            let reg = BlockRegistry::load_from_path(path)?;
            log::info!("loaded {} block types from {}", reg.len(), path.display());
            Ok(reg)
        }
        None => BlockRegistry::builtin(),
    }
}

fn load_worldgen(cfg: &EngineConfig, seed: Option<i32>) -> Result<WorldGenConfig, Box<dyn Error>> {
    let mut wg = match &cfg.worldgen {
        Some(path) => {
            let wg = WorldGenConfig::load_from_path(path)?;
            log::info!("worldgen config loaded from {}", path.display());
            wg
        }
        None => WorldGenConfig::default(),
    };
    if let Some(seed) = seed {
        wg.seed = seed;
    }
    Ok(wg)
}

/// Streams and meshes the world while walking the observer along +X, applies
/// one removal and one placement halfway, then shuts everything down.
pub fn run(cfg: &EngineConfig, seed: Option<i32>, script: Script) -> Result<(), Box<dyn Error>> {
    let registry = Arc::new(load_registry(cfg)?);
    let terrain = Arc::new(TerrainGenerator::new(load_worldgen(cfg, seed)?, &registry)?);
    let place = registry.id_by_name("stone").unwrap_or(AIR);

    let ground = terrain.surface_y(7, 7) as f32;
    let start = Vec3::new(7.5, ground + EYE_HEIGHT, 7.5);
    let generator: Arc<dyn ChunkGenerator> = terrain.clone();
    let level = Arc::new(Level::new(cfg.level_config(), registry, generator, start)?);
    let streamer = Streamer::spawn(level.clone())?;

    let mut table = SlotTable::new();
    let mut editor = Editor::new(cfg, place);
    let look = Vec3::new(1.0, -1.0, 0.25);
    let t0 = Instant::now();
    for frame in 0..script.frames {
        let x = start.x + script.speed * frame as f32;
        let ground = terrain.surface_y(x.floor() as i32, 7) as f32;
        let eye = Vec3::new(x, ground + EYE_HEIGHT, start.z);
        level.set_observer(eye, cfg.render_distance);

        let sync = table.sync(&level);
        if sync.uploaded + sync.released > 0 {
            log::trace!(target: "stream", "frame {frame}: {} uploads, {} releases", sync.uploaded, sync.released);
        }
        if frame >= script.frames / 2 {
            editor.tick(&level, eye, look);
        }
        if frame % STATS_EVERY == 0 {
            let s = level.stats();
            log::info!(
                "frame {frame}: {} slots, {} vertices; queue {} (+{} building), {} published, {} refixes, {} generating",
                table.len(),
                table.vertex_count(),
                s.queued,
                s.in_flight,
                s.published,
                s.refixes,
                level.pending_generation()
            );
        }
        std::thread::sleep(FRAME);
    }

    streamer.stop();
    if !level.wait_idle(Duration::from_secs(30)) {
        log::warn!("work still pending at shutdown");
    }
    table.sync(&level);
    let s = level.stats();
    log::info!(
        "{} frames in {:.2?}: {} slots, {} uploads, {} releases, {} meshes published ({} dropped)",
        script.frames,
        t0.elapsed(),
        table.len(),
        table.uploads(),
        table.releases(),
        s.published,
        s.dropped
    );
    if editor.step != EditStep::Done {
        log::warn!(target: "edit", "scripted edits incomplete ({:?})", editor.step);
    }
    level.shutdown();
    Ok(())
}
