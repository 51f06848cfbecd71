//! # Water Overlay
//!
//! Upgrades selected sand to water. Grass is never touched; sand becomes
//! water only where a second, independent noise field clears its threshold
//! and the beach buffer around the point is free of grass.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::base::BaseBiomeCalculator;
use crate::biome::BiomeType;
use crate::buffer::BufferValidator;
use crate::config::BiomeConfig;
use crate::noise::NoiseField;

/// Produces the final `{Grass, Sand, Water}` classification.
pub struct WaterOverlayCalculator {
    noise: NoiseField,
    scale: f64,
    threshold: f64,
    candidates: AtomicU64,
    placed: AtomicU64,
}

impl WaterOverlayCalculator {
    /// Builds the overlay from a validated config.
    #[must_use]
    pub fn new(config: &BiomeConfig) -> Self {
        Self {
            noise: NoiseField::new(config.water_seed, config.octaves),
            scale: config.water_scale,
            threshold: config.water_in_sand_threshold,
            candidates: AtomicU64::new(0),
            placed: AtomicU64::new(0),
        }
    }

    /// Final biome at a finite world coordinate.
    #[must_use]
    pub fn final_biome(
        &self,
        base: &BaseBiomeCalculator,
        buffer: &BufferValidator,
        x: f64,
        y: f64,
    ) -> BiomeType {
        match base.base_biome(x, y) {
            BiomeType::Grass => BiomeType::Grass,
            BiomeType::Sand => self.overlay_sand(base, buffer, x, y),
            // The base layer never produces water
            BiomeType::Water => BiomeType::Water,
        }
    }

    fn overlay_sand(
        &self,
        base: &BaseBiomeCalculator,
        buffer: &BufferValidator,
        x: f64,
        y: f64,
    ) -> BiomeType {
        if !self.passes_threshold(x, y) {
            return BiomeType::Sand;
        }
        self.candidates.fetch_add(1, Ordering::Relaxed);

        // The buffer check is the expensive step, so it runs last
        if buffer.is_valid_beach_buffer(base, x, y) {
            self.placed.fetch_add(1, Ordering::Relaxed);
            BiomeType::Water
        } else {
            BiomeType::Sand
        }
    }

    /// Whether the water field alone would put water here.
    #[inline]
    #[must_use]
    pub fn passes_threshold(&self, x: f64, y: f64) -> bool {
        self.noise.sample(x * self.scale, y * self.scale) >= self.threshold
    }

    /// `(candidates, placed)` counters.
    #[must_use]
    pub fn counters(&self) -> (u64, u64) {
        (
            self.candidates.load(Ordering::Relaxed),
            self.placed.load(Ordering::Relaxed),
        )
    }
}
