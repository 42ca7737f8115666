use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

use crate::CHUNK_HEIGHT;

#[derive(Clone, Debug, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default = "default_seed")]
    pub seed: i32,
    #[serde(default = "default_frequency")]
    pub frequency: f32,
    #[serde(default = "default_octaves")]
    pub octaves: i32,
    #[serde(default = "default_gain")]
    pub gain: f32,
    #[serde(default = "default_lacunarity")]
    pub lacunarity: f32,
    /// Surface height when the noise reads -1.
    #[serde(default = "default_surface_base")]
    pub surface_base: i32,
    /// Blocks of surface height per unit of noise.
    #[serde(default = "default_surface_amplitude")]
    pub surface_amplitude: f32,
    #[serde(default = "default_water_level")]
    pub water_level: i32,
    /// Top layers of a column, surface block included, that use topsoil blocks.
    #[serde(default = "default_topsoil_depth")]
    pub topsoil_depth: i32,
    #[serde(default)]
    pub blocks: SurfaceBlocks,
}

fn default_seed() -> i32 {
    1337
}
fn default_frequency() -> f32 {
    0.005
}
fn default_octaves() -> i32 {
    6
}
fn default_gain() -> f32 {
    0.5
}
fn default_lacunarity() -> f32 {
    2.0
}
fn default_surface_base() -> i32 {
    35
}
fn default_surface_amplitude() -> f32 {
    30.0
}
fn default_water_level() -> i32 {
    60
}
fn default_topsoil_depth() -> i32 {
    4
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            frequency: default_frequency(),
            octaves: default_octaves(),
            gain: default_gain(),
            lacunarity: default_lacunarity(),
            surface_base: default_surface_base(),
            surface_amplitude: default_surface_amplitude(),
            water_level: default_water_level(),
            topsoil_depth: default_topsoil_depth(),
            blocks: SurfaceBlocks::default(),
        }
    }
}

impl WorldGenConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: WorldGenConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        let h = CHUNK_HEIGHT as i32;
        if !(0..h).contains(&self.water_level) {
            return Err(format!("water_level {} outside 0..{h}", self.water_level).into());
        }
        if self.octaves < 1 {
            return Err("octaves must be at least 1".into());
        }
        if self.topsoil_depth < 0 {
            return Err("topsoil_depth must not be negative".into());
        }
        Ok(())
    }

    /// Surface height for a noise sample: `floor((n + 1) * amplitude) + base`,
    /// clamped so every column keeps at least one block and stays below the ceiling.
    #[inline]
    pub fn surface_y(&self, noise: f32) -> i32 {
        let y = ((noise + 1.0) * self.surface_amplitude).floor() as i32 + self.surface_base;
        y.clamp(1, CHUNK_HEIGHT as i32 - 1)
    }
}

/// Block names used for each terrain layer.
#[derive(Clone, Debug, Deserialize)]
pub struct SurfaceBlocks {
    #[serde(default = "default_stone")]
    pub stone: String,
    #[serde(default = "default_dirt")]
    pub dirt: String,
    #[serde(default = "default_grass")]
    pub grass: String,
    #[serde(default = "default_sand")]
    pub sand: String,
    #[serde(default = "default_water")]
    pub water: String,
}

fn default_stone() -> String {
    "stone".into()
}
fn default_dirt() -> String {
    "dirt".into()
}
fn default_grass() -> String {
    "grass".into()
}
fn default_sand() -> String {
    "sand".into()
}
fn default_water() -> String {
    "water".into()
}

impl Default for SurfaceBlocks {
    fn default() -> Self {
        Self {
            stone: default_stone(),
            dirt: default_dirt(),
            grass: default_grass(),
            sand: default_sand(),
            water: default_water(),
        }
    }
}
