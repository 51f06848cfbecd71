//! # Beach Buffer Validation
//!
//! Water may never appear within `beach_buffer_distance` (B) of grass.
//! There is no closed form for "distance to the nearest grass" over a noise
//! field, so the check samples the base biome on a fixed pattern around the
//! candidate point.
//!
//! ## Check order (cheapest first)
//!
//! 1. **Spawn rejection** - the disc reaches the inner grass zone.
//! 2. **Band acceptance** - the disc lies inside the fixed sand band, where
//!    every point is sand by construction.
//! 3. **Cell rejection** - the cached verdict for the coordinate's grid cell
//!    found grass within `B - half_cell_diagonal` of the cell centre. That
//!    grass is within B of every point in the cell. Cells beyond the far-field
//!    radius compute their verdict with the reduced pattern.
//! 4. **Pattern sampling** - the centre, 16 points on the B circle, 8 on the
//!    B/2 circle and 5 seeded interior points. Far from spawn a reduced
//!    pattern (8 + 4, no interior points) is used instead.
//!
//! Every step is a pure function of the coordinate and the config, so the
//! answer never depends on what was cached before.

use std::f64::consts::{PI, TAU};
use std::sync::atomic::{AtomicU64, Ordering};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::base::BaseBiomeCalculator;
use crate::biome::BiomeType;
use crate::cache::{GridKey, SpatialCache};
use crate::config::BiomeConfig;
use crate::stats::{BufferStats, CacheStats};
use crate::zone::{distance_from_origin, ZoneClassifier};

/// Points on the full-radius ring.
pub const OUTER_RING_POINTS: usize = 16;
/// Points on the half-radius ring.
pub const INNER_RING_POINTS: usize = 8;
/// Seeded interior points.
pub const JITTER_POINTS: usize = 5;
/// Outer ring points in the far-field pattern.
pub const FAR_OUTER_RING_POINTS: usize = 8;
/// Inner ring points in the far-field pattern.
pub const FAR_INNER_RING_POINTS: usize = 4;

/// Interior points stay this fraction of the radius away from the centre
/// at most, so they never duplicate the outer ring.
const JITTER_MAX_FRACTION: f64 = 0.9;

/// A fixed set of offsets sampled around a candidate point.
///
/// Built once per engine. The trigonometry runs at construction only; the
/// query path is additions and noise samples.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplePattern {
    offsets: Vec<[f64; 2]>,
}

impl SamplePattern {
    /// The standard 16 + 8 + 5 pattern for a disc of `radius`.
    #[must_use]
    pub fn standard(radius: f64, jitter_seed: u64) -> Self {
        let mut offsets = Vec::with_capacity(OUTER_RING_POINTS + INNER_RING_POINTS + JITTER_POINTS);
        push_ring(&mut offsets, OUTER_RING_POINTS, radius, 0.0);
        push_ring(&mut offsets, INNER_RING_POINTS, radius * 0.5, PI / 8.0);

        let mut rng = ChaCha8Rng::seed_from_u64(jitter_seed);
        for _ in 0..JITTER_POINTS {
            let r = radius * JITTER_MAX_FRACTION * rng.gen::<f64>().sqrt();
            let angle = rng.gen::<f64>() * TAU;
            offsets.push([r * angle.cos(), r * angle.sin()]);
        }

        Self { offsets }
    }

    /// The reduced 8 + 4 pattern used far from spawn.
    #[must_use]
    pub fn far_field(radius: f64) -> Self {
        let mut offsets = Vec::with_capacity(FAR_OUTER_RING_POINTS + FAR_INNER_RING_POINTS);
        push_ring(&mut offsets, FAR_OUTER_RING_POINTS, radius, 0.0);
        push_ring(&mut offsets, FAR_INNER_RING_POINTS, radius * 0.5, PI / 8.0);
        Self { offsets }
    }

    /// Offsets relative to the candidate point.
    #[must_use]
    pub fn offsets(&self) -> &[[f64; 2]] {
        &self.offsets
    }

    /// Number of offsets (the centre is sampled in addition to these).
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// True for a pattern with no offsets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

#[allow(clippy::cast_precision_loss)]
fn push_ring(offsets: &mut Vec<[f64; 2]>, count: usize, radius: f64, phase: f64) {
    for k in 0..count {
        let angle = phase + TAU * k as f64 / count as f64;
        offsets.push([radius * angle.cos(), radius * angle.sin()]);
    }
}

/// Decides whether a coordinate keeps the beach buffer clear of grass.
pub struct BufferValidator {
    zones: ZoneClassifier,
    distance: f64,
    far_field_radius: f64,
    standard: SamplePattern,
    far_field: SamplePattern,
    cell_pattern: SamplePattern,
    far_cell_pattern: SamplePattern,
    cache: SpatialCache<bool>,
    checks: AtomicU64,
    fast_rejections: AtomicU64,
    band_acceptances: AtomicU64,
    cell_rejections: AtomicU64,
    far_field_checks: AtomicU64,
    samples_taken: AtomicU64,
}

impl BufferValidator {
    /// Builds the validator from a validated config.
    #[must_use]
    pub fn new(config: &BiomeConfig) -> Self {
        let distance = config.beach_buffer_distance;
        let grid_size = config.cache.grid_size;
        // Any point of a cell is within half a diagonal of its centre
        let half_diagonal = grid_size * std::f64::consts::FRAC_1_SQRT_2;
        let cell_radius = (distance - half_diagonal).max(0.0);

        Self {
            zones: ZoneClassifier::new(config),
            distance,
            far_field_radius: config.far_field_radius,
            standard: SamplePattern::standard(distance, config.jitter_seed),
            far_field: SamplePattern::far_field(distance),
            cell_pattern: SamplePattern::standard(cell_radius, config.jitter_seed),
            far_cell_pattern: SamplePattern::far_field(cell_radius),
            cache: SpatialCache::new(grid_size, config.cache.max_entries),
            checks: AtomicU64::new(0),
            fast_rejections: AtomicU64::new(0),
            band_acceptances: AtomicU64::new(0),
            cell_rejections: AtomicU64::new(0),
            far_field_checks: AtomicU64::new(0),
            samples_taken: AtomicU64::new(0),
        }
    }

    /// True iff no sampled point within the buffer distance of `(x, y)`
    /// has base biome grass. `(x, y)` must be finite.
    #[must_use]
    pub fn is_valid_beach_buffer(&self, base: &BaseBiomeCalculator, x: f64, y: f64) -> bool {
        self.checks.fetch_add(1, Ordering::Relaxed);
        let d = distance_from_origin(x, y);

        if self.zones.disc_touches_inner_grass(d, self.distance) {
            self.fast_rejections.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        if self.zones.disc_inside_sand_band(d, self.distance) {
            self.band_acceptances.fetch_add(1, Ordering::Relaxed);
            return true;
        }

        if let Some(key) = self.cache.key_for(x, y) {
            let blocked = self
                .cache
                .get_or_insert_with(key, |key| self.cell_blocked(base, key));
            if blocked {
                self.cell_rejections.fetch_add(1, Ordering::Relaxed);
                return false;
            }
        }

        let pattern = if d >= self.far_field_radius {
            self.far_field_checks.fetch_add(1, Ordering::Relaxed);
            &self.far_field
        } else {
            &self.standard
        };
        self.pattern_clear(base, pattern, x, y)
    }

    /// Whether grass lies close enough to the cell centre to rule out
    /// every point in the cell.
    fn cell_blocked(&self, base: &BaseBiomeCalculator, key: GridKey) -> bool {
        let (cx, cy) = key.center(self.cache.grid_size());
        let pattern = if distance_from_origin(cx, cy) >= self.far_field_radius {
            &self.far_cell_pattern
        } else {
            &self.cell_pattern
        };
        !self.pattern_clear(base, pattern, cx, cy)
    }

    /// Samples the centre and every offset; false on the first grass.
    fn pattern_clear(&self, base: &BaseBiomeCalculator, pattern: &SamplePattern, x: f64, y: f64) -> bool {
        let mut taken = 1u64;
        let mut clear = base.base_biome(x, y) != BiomeType::Grass;

        if clear {
            for &[dx, dy] in pattern.offsets() {
                taken += 1;
                if base.base_biome(x + dx, y + dy) == BiomeType::Grass {
                    clear = false;
                    break;
                }
            }
        }

        self.samples_taken.fetch_add(taken, Ordering::Relaxed);
        clear
    }

    /// The standard sampling pattern.
    #[must_use]
    pub const fn standard_pattern(&self) -> &SamplePattern {
        &self.standard
    }

    /// Buffer distance in world units.
    #[must_use]
    pub const fn distance(&self) -> f64 {
        self.distance
    }

    /// Drops every cached cell verdict.
    pub fn clear_cache(&self) {
        self.cache.clear();
        tracing::debug!("Beach buffer cache cleared");
    }

    /// Snapshot of the check counters.
    #[must_use]
    pub fn stats(&self) -> BufferStats {
        BufferStats {
            checks: self.checks.load(Ordering::Relaxed),
            fast_rejections: self.fast_rejections.load(Ordering::Relaxed),
            band_acceptances: self.band_acceptances.load(Ordering::Relaxed),
            cell_rejections: self.cell_rejections.load(Ordering::Relaxed),
            far_field_checks: self.far_field_checks.load(Ordering::Relaxed),
            samples_taken: self.samples_taken.load(Ordering::Relaxed),
        }
    }

    /// Snapshot of the cache counters.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
