//! # SHORELINE Biome
//!
//! Deterministic biome classification for an unbounded 2D world.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same config always produces the same world, on every machine
//! 2. **Stateless answers**: A query is a pure function of `(config, x, y)`
//! 3. **Safe spawn**: Fixed radial zones guarantee grass at the origin
//! 4. **Clean shores**: Water never sits within the beach buffer of grass
//!
//! ## Core Components
//!
//! - `NoiseField`: Seeded simplex fBm mapped to `[0, 1)`
//! - `ZoneClassifier`: Inner grass, sand band, noise-decided outer world
//! - `BaseBiomeCalculator`: Grass / sand split
//! - `BufferValidator`: Beach buffer sampling with a grid-cell cache
//! - `WaterOverlayCalculator`: Turns qualifying sand into water
//! - `BiomeManager`: Lifecycle and the query API
//!
//! ## Example
//!
//! ```rust,ignore
//! use shoreline_biome::{BiomeManager, BiomeType};
//!
//! let mut manager = BiomeManager::with_defaults();
//! manager.initialize();
//!
//! assert_eq!(manager.biome_at(0.0, 0.0)?, BiomeType::Grass);
//! assert!(!manager.is_valid_beach_buffer(0.0, 0.0)?);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod base;
pub mod biome;
pub mod buffer;
pub mod cache;
pub mod census;
pub mod config;
pub mod error;
pub mod manager;
pub mod noise;
pub mod stats;
pub mod water;
pub mod zone;

pub use base::BaseBiomeCalculator;
pub use biome::BiomeType;
pub use buffer::{BufferValidator, SamplePattern};
pub use cache::{GridKey, SpatialCache};
pub use census::{CensusRegion, CensusReport};
pub use config::{BiomeConfig, CacheConfig};
pub use error::{BiomeError, BiomeResult};
pub use manager::BiomeManager;
pub use noise::{NoiseField, SimplexNoise, WorldSeed};
pub use stats::{BufferStats, CacheStats, PerformanceStats};
pub use water::WaterOverlayCalculator;
pub use zone::{BiomeZone, ZoneClassifier, ZoneKind};
