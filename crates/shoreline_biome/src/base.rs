//! # Base Biome
//!
//! Grass or sand, before water is considered. Zones win near spawn;
//! everywhere else a low-frequency noise field splits the world roughly
//! half and half.

use crate::biome::BiomeType;
use crate::config::BiomeConfig;
use crate::noise::NoiseField;
use crate::zone::{distance_from_origin, ZoneClassifier};

/// Produces the `{Grass, Sand}` classification. Never returns water.
pub struct BaseBiomeCalculator {
    zones: ZoneClassifier,
    noise: NoiseField,
    scale: f64,
    sand_threshold: f64,
}

impl BaseBiomeCalculator {
    /// Builds the calculator from a validated config.
    #[must_use]
    pub fn new(config: &BiomeConfig) -> Self {
        Self {
            zones: ZoneClassifier::new(config),
            noise: NoiseField::new(config.base_seed, config.octaves),
            scale: config.base_scale,
            sand_threshold: config.sand_base_threshold,
        }
    }

    /// Base biome at a finite world coordinate.
    #[inline]
    #[must_use]
    pub fn base_biome(&self, x: f64, y: f64) -> BiomeType {
        if let Some(fixed) = self.zones.classify(distance_from_origin(x, y)) {
            return fixed;
        }
        self.noise_biome(x, y)
    }

    #[inline]
    fn noise_biome(&self, x: f64, y: f64) -> BiomeType {
        let n = self.noise.sample(x * self.scale, y * self.scale);
        if n < self.sand_threshold {
            BiomeType::Sand
        } else {
            BiomeType::Grass
        }
    }

    /// The zone classifier this calculator consults first.
    #[must_use]
    pub const fn zones(&self) -> &ZoneClassifier {
        &self.zones
    }
}
