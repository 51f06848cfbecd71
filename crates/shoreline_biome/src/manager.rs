//! # Biome Manager
//!
//! The single entry point other systems talk to. Owns one engine (noise
//! fields, zone classifier, buffer validator and its cache) and gates every
//! query on the lifecycle.
//!
//! ## Lifecycle
//!
//! ```text
//!   new() ──► initialize() ──► queries (&self, any thread) ──► dispose()
//!                  ▲                                              │
//!                  └──────────────────────────────────────────────┘
//! ```
//!
//! `initialize` and `dispose` take `&mut self`, so a manager can never be
//! disposed while another thread is still querying it.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::base::BaseBiomeCalculator;
use crate::biome::BiomeType;
use crate::buffer::BufferValidator;
use crate::census::{self, CensusRegion, CensusReport};
use crate::config::BiomeConfig;
use crate::error::{ensure_finite, BiomeError, BiomeResult};
use crate::stats::PerformanceStats;
use crate::water::WaterOverlayCalculator;
use crate::zone::BiomeZone;

/// Everything built by `initialize()`.
struct BiomeEngine {
    base: BaseBiomeCalculator,
    buffer: BufferValidator,
    water: WaterOverlayCalculator,
    base_queries: AtomicU64,
    final_queries: AtomicU64,
}

impl BiomeEngine {
    fn new(config: &BiomeConfig) -> Self {
        Self {
            base: BaseBiomeCalculator::new(config),
            buffer: BufferValidator::new(config),
            water: WaterOverlayCalculator::new(config),
            base_queries: AtomicU64::new(0),
            final_queries: AtomicU64::new(0),
        }
    }

    fn base_biome(&self, x: f64, y: f64) -> BiomeType {
        self.base_queries.fetch_add(1, Ordering::Relaxed);
        self.base.base_biome(x, y)
    }

    fn final_biome(&self, x: f64, y: f64) -> BiomeType {
        self.final_queries.fetch_add(1, Ordering::Relaxed);
        self.water.final_biome(&self.base, &self.buffer, x, y)
    }
}

/// Deterministic biome oracle.
///
/// Two managers built from equal configs return identical answers for
/// every coordinate, on every machine.
pub struct BiomeManager {
    config: BiomeConfig,
    engine: Option<BiomeEngine>,
}

impl BiomeManager {
    /// Creates an uninitialized manager.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the config fails validation.
    pub fn new(config: BiomeConfig) -> BiomeResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            engine: None,
        })
    }

    /// Creates an uninitialized manager with the default config.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            config: BiomeConfig::default(),
            engine: None,
        }
    }

    /// Builds the noise fields, patterns and cache. Calling it again on an
    /// initialized manager does nothing.
    pub fn initialize(&mut self) {
        if self.engine.is_some() {
            return;
        }
        self.engine = Some(BiomeEngine::new(&self.config));
        tracing::info!(
            "Biome manager initialized: spawn grass {} + sand band {}, buffer {}",
            self.config.inner_grass_radius,
            self.config.sand_band_width,
            self.config.beach_buffer_distance
        );
    }

    /// Drops the engine and its caches. Queries fail until `initialize()`
    /// is called again. Disposing twice does nothing.
    pub fn dispose(&mut self) {
        if let Some(engine) = self.engine.take() {
            engine.buffer.clear_cache();
            tracing::info!(
                "Biome manager disposed after {} final queries",
                engine.final_queries.load(Ordering::Relaxed)
            );
        }
    }

    /// True between `initialize()` and `dispose()`.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.engine.is_some()
    }

    /// The config this manager was built with.
    #[must_use]
    pub const fn config(&self) -> &BiomeConfig {
        &self.config
    }

    fn engine(&self) -> BiomeResult<&BiomeEngine> {
        self.engine.as_ref().ok_or(BiomeError::NotInitialized)
    }

    fn checked(&self, x: f64, y: f64) -> BiomeResult<&BiomeEngine> {
        let engine = self.engine()?;
        ensure_finite(x, y)?;
        Ok(engine)
    }

    /// Base biome: zones first, then the base noise. Never `Water`.
    ///
    /// # Errors
    ///
    /// `NotInitialized` or `NonFiniteCoordinate`.
    pub fn base_biome_at(&self, x: f64, y: f64) -> BiomeResult<BiomeType> {
        Ok(self.checked(x, y)?.base_biome(x, y))
    }

    /// Final biome with the water overlay applied.
    ///
    /// # Errors
    ///
    /// `NotInitialized` or `NonFiniteCoordinate`.
    pub fn biome_at(&self, x: f64, y: f64) -> BiomeResult<BiomeType> {
        Ok(self.checked(x, y)?.final_biome(x, y))
    }

    /// Whether water at `(x, y)` would keep the beach buffer clear of grass.
    ///
    /// # Errors
    ///
    /// `NotInitialized` or `NonFiniteCoordinate`.
    pub fn is_valid_beach_buffer(&self, x: f64, y: f64) -> BiomeResult<bool> {
        let engine = self.checked(x, y)?;
        Ok(engine.buffer.is_valid_beach_buffer(&engine.base, x, y))
    }

    /// Whether a unit can stand at `(x, y)`.
    ///
    /// # Errors
    ///
    /// `NotInitialized` or `NonFiniteCoordinate`.
    pub fn is_walkable(&self, x: f64, y: f64) -> BiomeResult<bool> {
        Ok(!self.biome_at(x, y)?.blocks_movement())
    }

    /// The radial zones, innermost first.
    ///
    /// # Errors
    ///
    /// `NotInitialized`.
    pub fn biome_zones(&self) -> BiomeResult<Vec<BiomeZone>> {
        Ok(self.engine()?.base.zones().zones().to_vec())
    }

    /// Empties the buffer cache. Results are unaffected.
    ///
    /// # Errors
    ///
    /// `NotInitialized`.
    pub fn clear_performance_caches(&self) -> BiomeResult<()> {
        self.engine()?.buffer.clear_cache();
        Ok(())
    }

    /// Snapshot of every counter.
    ///
    /// # Errors
    ///
    /// `NotInitialized`.
    pub fn performance_stats(&self) -> BiomeResult<PerformanceStats> {
        let engine = self.engine()?;
        let (water_candidates, water_placed) = engine.water.counters();
        Ok(PerformanceStats {
            base_queries: engine.base_queries.load(Ordering::Relaxed),
            final_queries: engine.final_queries.load(Ordering::Relaxed),
            water_candidates,
            water_placed,
            buffer: engine.buffer.stats(),
            cache: engine.buffer.cache_stats(),
        })
    }

    /// Samples a region and counts base and final biomes.
    ///
    /// # Errors
    ///
    /// `NotInitialized`, or `InvalidConfig` for a degenerate region.
    pub fn census(&self, region: &CensusRegion) -> BiomeResult<CensusReport> {
        let engine = self.engine()?;
        census::run(
            region,
            |x, y| Ok(engine.base_biome(x, y)),
            |x, y| Ok(engine.final_biome(x, y)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::ZoneKind;

    fn ready() -> BiomeManager {
        let mut manager = BiomeManager::with_defaults();
        manager.initialize();
        manager
    }

    #[test]
    fn test_queries_fail_before_initialize() {
        let manager = BiomeManager::with_defaults();
        assert!(!manager.is_initialized());
        assert_eq!(manager.biome_at(0.0, 0.0), Err(BiomeError::NotInitialized));
        assert_eq!(manager.base_biome_at(0.0, 0.0), Err(BiomeError::NotInitialized));
        assert_eq!(manager.is_valid_beach_buffer(0.0, 0.0), Err(BiomeError::NotInitialized));
        assert_eq!(manager.biome_zones(), Err(BiomeError::NotInitialized));
        assert_eq!(manager.performance_stats(), Err(BiomeError::NotInitialized));
        assert_eq!(manager.clear_performance_caches(), Err(BiomeError::NotInitialized));
    }

    #[test]
    fn test_not_initialized_wins_over_bad_coordinate() {
        let manager = BiomeManager::with_defaults();
        assert_eq!(manager.biome_at(f64::NAN, 0.0), Err(BiomeError::NotInitialized));
    }

    #[test]
    fn test_lifecycle_round_trip() {
        let mut manager = ready();
        manager.initialize();
        assert!(manager.is_initialized());
        assert_eq!(manager.biome_at(0.0, 0.0), Ok(BiomeType::Grass));

        manager.dispose();
        manager.dispose();
        assert!(!manager.is_initialized());
        assert_eq!(manager.biome_at(0.0, 0.0), Err(BiomeError::NotInitialized));

        manager.initialize();
        assert_eq!(manager.biome_at(0.0, 0.0), Ok(BiomeType::Grass));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = BiomeConfig {
            beach_buffer_distance: -1.0,
            ..BiomeConfig::default()
        };
        assert!(matches!(BiomeManager::new(config), Err(BiomeError::InvalidConfig(_))));
    }

    #[test]
    fn test_non_finite_rejected() {
        let manager = ready();
        assert!(matches!(
            manager.biome_at(f64::NAN, 1.0),
            Err(BiomeError::NonFiniteCoordinate { .. })
        ));
        assert!(matches!(
            manager.is_valid_beach_buffer(0.0, f64::INFINITY),
            Err(BiomeError::NonFiniteCoordinate { .. })
        ));
    }

    #[test]
    fn test_zones_match_config() {
        let manager = ready();
        let zones = manager.biome_zones().expect("initialized");

        assert_eq!(zones.len(), 3);
        assert_eq!(zones[0].kind, ZoneKind::Fixed(BiomeType::Grass));
        assert_eq!(zones[1].kind, ZoneKind::Fixed(BiomeType::Sand));
        assert_eq!(zones[2].kind, ZoneKind::Noise);
        assert!((zones[1].min_distance - 10_000.0).abs() < f64::EPSILON);
        assert!((zones[2].min_distance - 15_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stats_count_queries() {
        let manager = ready();
        let _ = manager.base_biome_at(100.0, 100.0);
        let _ = manager.biome_at(100.0, 100.0);
        let _ = manager.biome_at(50_000.0, 50_000.0);

        let stats = manager.performance_stats().expect("initialized");
        assert_eq!(stats.base_queries, 1);
        assert_eq!(stats.final_queries, 2);
    }

    #[test]
    fn test_clearing_caches_keeps_results() {
        let manager = ready();
        let points: Vec<(f64, f64)> = (0..200)
            .map(|i| (30_000.0 + f64::from(i) * 61.0, -40_000.0 + f64::from(i) * 13.0))
            .collect();

        let before: Vec<_> = points.iter().map(|&(x, y)| manager.biome_at(x, y)).collect();
        manager.clear_performance_caches().expect("initialized");
        assert_eq!(manager.performance_stats().expect("initialized").cache.entries, 0);
        let after: Vec<_> = points.iter().map(|&(x, y)| manager.biome_at(x, y)).collect();

        assert_eq!(before, after);
    }

    #[test]
    fn test_walkable_matches_biome() {
        let manager = ready();
        for i in 0..300 {
            let x = 18_000.0 + f64::from(i) * 211.0;
            let y = 25_000.0;
            let biome = manager.biome_at(x, y).expect("valid query");
            assert_eq!(manager.is_walkable(x, y), Ok(biome != BiomeType::Water));
        }
    }

    #[test]
    fn test_manager_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BiomeManager>();
    }
}
