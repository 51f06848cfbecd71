//! # Biome Configuration
//!
//! Process-wide constants that fully determine the world. Every participant
//! in a multiplayer session must run with an identical `BiomeConfig`; the
//! terrain itself is never transmitted.
//!
//! Loaded once at startup, usually from TOML:
//!
//! ```toml
//! inner_grass_radius = 10000.0
//! sand_band_width = 5000.0
//! water_in_sand_threshold = 0.515
//!
//! [cache]
//! grid_size = 64.0
//! max_entries = 65536
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BiomeError, BiomeResult};
use crate::noise::WorldSeed;

/// Seed purpose for the grass/sand split.
pub const BASE_SEED_PURPOSE: u64 = 1;
/// Seed purpose for the water-in-sand overlay.
pub const WATER_SEED_PURPOSE: u64 = 2;

/// Radius of the guaranteed grass area around spawn.
pub const DEFAULT_INNER_GRASS_RADIUS: f64 = 10_000.0;
/// Width of the fixed sand ring outside the spawn grass.
pub const DEFAULT_SAND_BAND_WIDTH: f64 = 5_000.0;
/// Base-biome noise frequency. Regions are a few thousand units across.
pub const DEFAULT_BASE_SCALE: f64 = 0.0002;
/// Water noise frequency. Lakes are a few hundred units across.
pub const DEFAULT_WATER_SCALE: f64 = 0.002;
/// Octaves summed by both noise fields.
pub const DEFAULT_OCTAVES: u32 = 2;
/// Base noise below this is sand, otherwise grass.
pub const DEFAULT_SAND_BASE_THRESHOLD: f64 = 0.5;
/// Water noise at or above this turns eligible sand into water.
pub const DEFAULT_WATER_IN_SAND_THRESHOLD: f64 = 0.515;
/// Minimum distance between any water point and any grass.
pub const DEFAULT_BEACH_BUFFER_DISTANCE: f64 = 128.0;
/// Distance from spawn beyond which the buffer check samples fewer points.
pub const DEFAULT_FAR_FIELD_RADIUS: f64 = 250_000.0;
/// Seed of the interior jitter points used by the buffer check.
pub const DEFAULT_JITTER_SEED: u64 = 0x5EA5_1DE5;
/// Side of one buffer-cache grid cell, in world units.
pub const DEFAULT_CACHE_GRID_SIZE: f64 = 64.0;
/// Entry count at which the buffer cache is flushed.
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 65_536;

/// Upper bound on octaves; more adds cost without visible change.
const MAX_OCTAVES: u32 = 8;

/// Spatial cache tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Side of one grid cell, in world units. Must not exceed the beach
    /// buffer distance.
    pub grid_size: f64,
    /// Entry count at which the whole cache is flushed.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_CACHE_GRID_SIZE,
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
        }
    }
}

/// Immutable biome engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BiomeConfig {
    /// Radius `R` of the spawn grass zone.
    pub inner_grass_radius: f64,
    /// Width `W` of the sand band `[R, R + W)`.
    pub sand_band_width: f64,
    /// Seed of the grass/sand noise field.
    pub base_seed: WorldSeed,
    /// Seed of the water overlay noise field. Must differ from `base_seed`.
    pub water_seed: WorldSeed,
    /// Coordinate multiplier for the base field.
    pub base_scale: f64,
    /// Coordinate multiplier for the water field.
    pub water_scale: f64,
    /// Octaves per noise sample.
    pub octaves: u32,
    /// Base noise below this is sand.
    pub sand_base_threshold: f64,
    /// Water noise at or above this becomes water (if the buffer allows).
    pub water_in_sand_threshold: f64,
    /// Minimum separation between water and grass.
    pub beach_buffer_distance: f64,
    /// Beyond this distance from spawn the buffer check uses fewer samples.
    pub far_field_radius: f64,
    /// Seed of the buffer check's interior jitter points.
    pub jitter_seed: u64,
    /// Buffer cache tuning.
    pub cache: CacheConfig,
}

impl Default for BiomeConfig {
    fn default() -> Self {
        let world = WorldSeed::default();
        Self {
            inner_grass_radius: DEFAULT_INNER_GRASS_RADIUS,
            sand_band_width: DEFAULT_SAND_BAND_WIDTH,
            base_seed: world.derive(BASE_SEED_PURPOSE),
            water_seed: world.derive(WATER_SEED_PURPOSE),
            base_scale: DEFAULT_BASE_SCALE,
            water_scale: DEFAULT_WATER_SCALE,
            octaves: DEFAULT_OCTAVES,
            sand_base_threshold: DEFAULT_SAND_BASE_THRESHOLD,
            water_in_sand_threshold: DEFAULT_WATER_IN_SAND_THRESHOLD,
            beach_buffer_distance: DEFAULT_BEACH_BUFFER_DISTANCE,
            far_field_radius: DEFAULT_FAR_FIELD_RADIUS,
            jitter_seed: DEFAULT_JITTER_SEED,
            cache: CacheConfig::default(),
        }
    }
}

impl BiomeConfig {
    /// Builds a configuration whose noise seeds derive from one world seed.
    #[must_use]
    pub fn with_world_seed(seed: WorldSeed) -> Self {
        Self {
            base_seed: seed.derive(BASE_SEED_PURPOSE),
            water_seed: seed.derive(WATER_SEED_PURPOSE),
            ..Self::default()
        }
    }

    /// Parses and validates a TOML document. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// `ConfigParse` for malformed TOML or unknown keys, `InvalidConfig`
    /// when the values break an invariant.
    pub fn from_toml_str(text: &str) -> BiomeResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| BiomeError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// `Io` when the file cannot be read, otherwise as [`Self::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> BiomeResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| BiomeError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Serializes to TOML.
    ///
    /// # Errors
    ///
    /// `ConfigParse` if serialization fails (it does not for valid configs).
    pub fn to_toml_string(&self) -> BiomeResult<String> {
        toml::to_string(self).map_err(|e| BiomeError::ConfigParse(e.to_string()))
    }

    /// Outer edge of the fixed sand band, `R + W`.
    #[inline]
    #[must_use]
    pub fn sand_band_outer_radius(&self) -> f64 {
        self.inner_grass_radius + self.sand_band_width
    }

    /// Checks every invariant the engine relies on.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` naming the first violated rule.
    pub fn validate(&self) -> BiomeResult<()> {
        positive("inner_grass_radius", self.inner_grass_radius)?;
        positive("sand_band_width", self.sand_band_width)?;
        positive("base_scale", self.base_scale)?;
        positive("water_scale", self.water_scale)?;
        positive("beach_buffer_distance", self.beach_buffer_distance)?;
        positive("far_field_radius", self.far_field_radius)?;
        positive("cache.grid_size", self.cache.grid_size)?;
        unit_interval("sand_base_threshold", self.sand_base_threshold)?;
        unit_interval("water_in_sand_threshold", self.water_in_sand_threshold)?;

        if !self.sand_band_outer_radius().is_finite() {
            return Err(BiomeError::InvalidConfig(
                "inner_grass_radius + sand_band_width overflows".into(),
            ));
        }
        if self.octaves == 0 || self.octaves > MAX_OCTAVES {
            return Err(BiomeError::InvalidConfig(format!(
                "octaves must be in 1..={MAX_OCTAVES}, got {}",
                self.octaves
            )));
        }
        if self.base_seed == self.water_seed {
            return Err(BiomeError::InvalidConfig(
                "base_seed and water_seed must differ".into(),
            ));
        }
        if self.cache.grid_size > self.beach_buffer_distance {
            return Err(BiomeError::InvalidConfig(format!(
                "cache.grid_size ({}) must not exceed beach_buffer_distance ({})",
                self.cache.grid_size, self.beach_buffer_distance
            )));
        }
        if self.cache.max_entries == 0 {
            return Err(BiomeError::InvalidConfig(
                "cache.max_entries must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> BiomeResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(BiomeError::InvalidConfig(format!(
            "{name} must be finite and positive, got {value}"
        )))
    }
}

fn unit_interval(name: &str, value: f64) -> BiomeResult<()> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(BiomeError::InvalidConfig(format!(
            "{name} must lie strictly between 0 and 1, got {value}"
        )))
    }
}
