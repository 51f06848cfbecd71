//! # Performance Statistics
//!
//! Plain snapshots of the engine's relaxed atomic counters. Counters never
//! affect a classification; they exist so the latency and cache contracts
//! can be checked from the outside.

use std::fmt;

/// Spatial cache counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that had to compute.
    pub misses: u64,
    /// Whole-cache flushes triggered by reaching capacity.
    pub flushes: u64,
    /// Cells currently cached.
    pub entries: usize,
    /// Entry count that triggers a flush.
    pub max_entries: usize,
}

impl CacheStats {
    /// Fraction of lookups served from the cache, 0 when nothing was looked up.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Beach buffer check counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BufferStats {
    /// Total buffer checks.
    pub checks: u64,
    /// Rejected because the buffer disc reaches the spawn grass zone.
    pub fast_rejections: u64,
    /// Accepted because the buffer disc lies inside the fixed sand band.
    pub band_acceptances: u64,
    /// Rejected by a cached grid-cell verdict.
    pub cell_rejections: u64,
    /// Checks that used the reduced far-field pattern.
    pub far_field_checks: u64,
    /// Base-biome samples evaluated by buffer checks.
    pub samples_taken: u64,
}

/// Everything `BiomeManager::performance_stats` reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PerformanceStats {
    /// Base-biome queries served.
    pub base_queries: u64,
    /// Final-biome queries served.
    pub final_queries: u64,
    /// Sand coordinates whose water noise passed the threshold.
    pub water_candidates: u64,
    /// Candidates that passed the buffer check and became water.
    pub water_placed: u64,
    /// Buffer check counters.
    pub buffer: BufferStats,
    /// Buffer cache counters.
    pub cache: CacheStats,
}

impl fmt::Display for PerformanceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "queries: base={} final={}",
            self.base_queries, self.final_queries
        )?;
        writeln!(
            f,
            "water: candidates={} placed={}",
            self.water_candidates, self.water_placed
        )?;
        writeln!(
            f,
            "buffer: checks={} fast_reject={} band_accept={} cell_reject={} far_field={} samples={}",
            self.buffer.checks,
            self.buffer.fast_rejections,
            self.buffer.band_acceptances,
            self.buffer.cell_rejections,
            self.buffer.far_field_checks,
            self.buffer.samples_taken
        )?;
        write!(
            f,
            "cache: entries={}/{} hits={} misses={} flushes={} hit_rate={:.1}%",
            self.cache.entries,
            self.cache.max_entries,
            self.cache.hits,
            self.cache.misses,
            self.cache.flushes,
            self.cache.hit_rate() * 100.0
        )
    }
}
