use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use strata_level::LevelConfig;

fn default_render_distance() -> i32 {
    16
}
fn default_mesh_workers() -> usize {
    4
}
fn default_gen_workers() -> usize {
    2
}
fn default_refix_interval_ms() -> u64 {
    50
}
fn default_reach() -> f32 {
    16.0
}
fn default_edit_interval_ms() -> u64 {
    100
}

/// Engine settings, read from TOML. Every field is optional.
#[derive(Clone, Debug, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_render_distance")]
    pub render_distance: i32,
    #[serde(default = "default_mesh_workers")]
    pub mesh_workers: usize,
    /// `0` generates chunks on the streaming thread.
    #[serde(default = "default_gen_workers")]
    pub gen_workers: usize,
    #[serde(default = "default_refix_interval_ms")]
    pub refix_interval_ms: u64,
    /// Maximum ray length for block edits.
    #[serde(default = "default_reach")]
    pub reach: f32,
    #[serde(default = "default_edit_interval_ms")]
    pub edit_interval_ms: u64,
    /// Block registry TOML; the stock blocks when absent.
    #[serde(default)]
    pub blocks: Option<PathBuf>,
    /// World generation TOML; defaults when absent.
    #[serde(default)]
    pub worldgen: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            render_distance: default_render_distance(),
            mesh_workers: default_mesh_workers(),
            gen_workers: default_gen_workers(),
            refix_interval_ms: default_refix_interval_ms(),
            reach: default_reach(),
            edit_interval_ms: default_edit_interval_ms(),
            blocks: None,
            worldgen: None,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: EngineConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Loads `path`; relative asset paths inside it resolve against its directory.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)?;
        let mut cfg = Self::from_toml_str(&s)?;
        if let Some(dir) = path.parent() {
            cfg.blocks = cfg.blocks.map(|p| dir.join(p));
            cfg.worldgen = cfg.worldgen.map(|p| dir.join(p));
        }
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.render_distance < 0 {
            return Err(format!("render_distance must be >= 0, got {}", self.render_distance).into());
        }
        if !(self.reach > 0.0) {
            return Err(format!("reach must be positive, got {}", self.reach).into());
        }
        Ok(())
    }

    pub fn level_config(&self) -> LevelConfig {
        LevelConfig {
            render_distance: self.render_distance,
            mesh_workers: self.mesh_workers,
            gen_workers: self.gen_workers,
            refix_interval: Duration::from_millis(self.refix_interval_ms),
        }
    }

    #[inline]
    pub fn edit_interval(&self) -> Duration {
        Duration::from_millis(self.edit_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.render_distance, 16);
        assert_eq!(cfg.mesh_workers, 4);
        assert_eq!(cfg.gen_workers, 2);
        assert_eq!(cfg.level_config().refix_interval, Duration::from_millis(50));
        assert_eq!(cfg.edit_interval(), Duration::from_millis(100));
        assert!(cfg.blocks.is_none());
    }

    #[test]
    fn fields_override_defaults() {
        let cfg = EngineConfig::from_toml_str(
            "render_distance = 3\ngen_workers = 0\nreach = 5.5\nworldgen = \"wg.toml\"\n",
        )
        .unwrap();
        assert_eq!(cfg.render_distance, 3);
        assert_eq!(cfg.gen_workers, 0);
        assert_eq!(cfg.reach, 5.5);
        assert_eq!(cfg.worldgen.as_deref(), Some(Path::new("wg.toml")));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(EngineConfig::from_toml_str("render_distance = -1").is_err());
        assert!(EngineConfig::from_toml_str("reach = 0.0").is_err());
        assert!(EngineConfig::from_toml_str("mesh_workers = \"four\"").is_err());
    }
}
