use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};

use crate::worldgen::WorldGenConfig;

/// Deterministic 2D height source used by terrain generation.
pub trait HeightField: Send + Sync {
    /// Noise value at a world column, roughly in `[-1, 1]`.
    fn height_at(&self, x: f32, z: f32) -> f32;
}

/// Perlin FBm noise.
pub struct FractalNoise {
    noise: FastNoiseLite,
}

impl FractalNoise {
    pub fn new(cfg: &WorldGenConfig) -> Self {
        let mut noise = FastNoiseLite::with_seed(cfg.seed);
        noise.set_noise_type(Some(NoiseType::Perlin));
        noise.set_frequency(Some(cfg.frequency));
        noise.set_fractal_type(Some(FractalType::FBm));
        noise.set_fractal_octaves(Some(cfg.octaves));
        noise.set_fractal_gain(Some(cfg.gain));
        noise.set_fractal_lacunarity(Some(cfg.lacunarity));
        Self { noise }
    }
}

impl HeightField for FractalNoise {
    #[inline]
    fn height_at(&self, x: f32, z: f32) -> f32 {
        self.noise.get_noise_2d(x, z)
    }
}

/// Constant field; every column gets the same height.
#[derive(Clone, Copy, Debug)]
pub struct FlatField(pub f32);

impl HeightField for FlatField {
    #[inline]
    fn height_at(&self, _x: f32, _z: f32) -> f32 {
        self.0
    }
}
