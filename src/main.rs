mod config;
mod driver;
mod renderer;

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use crate::config::EngineConfig;
use crate::driver::Script;

#[derive(Parser, Debug)]
#[command(name = "strata", about = "Headless voxel chunk streaming and meshing driver")]
struct Cli {
    /// Engine config TOML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Window radius in chunks
    #[arg(long)]
    render_distance: Option<i32>,
    /// Mesh worker threads
    #[arg(long)]
    mesh_workers: Option<usize>,
    /// World generation threads (0 = inline on the streaming thread)
    #[arg(long)]
    gen_workers: Option<usize>,
    /// World seed, overriding the worldgen config
    #[arg(long, allow_hyphen_values = true)]
    seed: Option<i32>,
    /// Frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u32,
    /// Observer speed in blocks per frame
    #[arg(long, default_value_t = 0.25)]
    speed: f32,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(path) => {
            let cfg = EngineConfig::load_from_path(path)?;
            log::info!("engine config loaded from {}", path.display());
            cfg
        }
        None => EngineConfig::default(),
    };
    if let Some(rd) = cli.render_distance {
        cfg.render_distance = rd;
    }
    if let Some(n) = cli.mesh_workers {
        cfg.mesh_workers = n;
    }
    if let Some(n) = cli.gen_workers {
        cfg.gen_workers = n;
    }
    cfg.validate()?;

    driver::run(
        &cfg,
        cli.seed,
        Script {
            frames: cli.frames,
            speed: cli.speed,
        },
    )
}
