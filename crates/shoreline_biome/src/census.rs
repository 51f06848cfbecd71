//! # Biome Census
//!
//! Samples uniformly random coordinates over a square region and counts
//! what the engine returns. This is how the 50 / 30 / 20 distribution
//! targets are measured, both in tests and from the `biome_census` binary.
//!
//! The sampler is seeded, so a census is itself reproducible.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::biome::BiomeType;
use crate::config::BiomeConfig;
use crate::error::{BiomeError, BiomeResult};
use crate::zone::distance_from_origin;

/// Rejection sampling gives up after this many draws per requested sample.
const MAX_DRAWS_PER_SAMPLE: usize = 1_000;

/// Square sampling region with an optional excluded disc around spawn.
#[derive(Clone, Debug, PartialEq)]
pub struct CensusRegion {
    /// Centre X of the square.
    pub center_x: f64,
    /// Centre Y of the square.
    pub center_y: f64,
    /// Half the side length of the square.
    pub half_extent: f64,
    /// Points closer than this to the origin are redrawn.
    pub exclude_radius: f64,
    /// Number of accepted samples.
    pub samples: usize,
    /// Seed of the coordinate sampler.
    pub seed: u64,
}

impl CensusRegion {
    /// A region around the origin that skips the fixed spawn zones, so
    /// only noise-decided terrain is counted.
    #[must_use]
    pub fn outside_zones(config: &BiomeConfig, half_extent: f64, samples: usize, seed: u64) -> Self {
        Self {
            center_x: 0.0,
            center_y: 0.0,
            half_extent,
            exclude_radius: config.sand_band_outer_radius(),
            samples,
            seed,
        }
    }

    fn validate(&self) -> BiomeResult<()> {
        let finite = [self.center_x, self.center_y, self.half_extent, self.exclude_radius]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.half_extent <= 0.0 || self.exclude_radius < 0.0 {
            return Err(BiomeError::InvalidConfig(format!(
                "census region must be finite with a positive extent: {self:?}"
            )));
        }

        // The sampler draws from a span of 2 * half_extent around the centre
        let spans_finite = (2.0 * self.half_extent).is_finite()
            && (self.center_x - self.half_extent).is_finite()
            && (self.center_x + self.half_extent).is_finite()
            && (self.center_y - self.half_extent).is_finite()
            && (self.center_y + self.half_extent).is_finite();
        if !spans_finite {
            return Err(BiomeError::InvalidConfig(format!(
                "census region overflows the coordinate range: {self:?}"
            )));
        }

        // The corner farthest from the origin must clear the excluded disc
        let far_x = self.center_x.abs() + self.half_extent;
        let far_y = self.center_y.abs() + self.half_extent;
        if distance_from_origin(far_x, far_y) <= self.exclude_radius {
            return Err(BiomeError::InvalidConfig(
                "census region lies entirely inside the excluded disc".into(),
            ));
        }
        Ok(())
    }
}

/// Counts gathered by a census.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CensusReport {
    /// Accepted samples.
    pub samples: usize,
    /// Final grass.
    pub grass: usize,
    /// Final sand.
    pub sand: usize,
    /// Final water.
    pub water: usize,
    /// Base grass.
    pub base_grass: usize,
    /// Base sand (includes everything that became water).
    pub base_sand: usize,
}

impl CensusReport {
    #[allow(clippy::cast_precision_loss)]
    fn ratio(part: usize, whole: usize) -> f64 {
        if whole == 0 {
            0.0
        } else {
            part as f64 / whole as f64
        }
    }

    /// Final grass share.
    #[must_use]
    pub fn grass_fraction(&self) -> f64 {
        Self::ratio(self.grass, self.samples)
    }

    /// Final sand share.
    #[must_use]
    pub fn sand_fraction(&self) -> f64 {
        Self::ratio(self.sand, self.samples)
    }

    /// Final water share.
    #[must_use]
    pub fn water_fraction(&self) -> f64 {
        Self::ratio(self.water, self.samples)
    }

    /// Base grass share.
    #[must_use]
    pub fn base_grass_fraction(&self) -> f64 {
        Self::ratio(self.base_grass, self.samples)
    }

    /// Base sand share.
    #[must_use]
    pub fn base_sand_fraction(&self) -> f64 {
        Self::ratio(self.base_sand, self.samples)
    }

    /// Share of base sand that became water.
    #[must_use]
    pub fn water_in_sand_fraction(&self) -> f64 {
        Self::ratio(self.water, self.base_sand)
    }
}

/// Runs a census with the given classifiers.
///
/// `base` and `final_biome` receive coordinates inside the region only.
pub(crate) fn run<B, F>(region: &CensusRegion, mut base: B, mut final_biome: F) -> BiomeResult<CensusReport>
where
    B: FnMut(f64, f64) -> BiomeResult<BiomeType>,
    F: FnMut(f64, f64) -> BiomeResult<BiomeType>,
{
    region.validate()?;

    let mut rng = ChaCha8Rng::seed_from_u64(region.seed);
    let mut report = CensusReport::default();
    let max_draws = region.samples.saturating_mul(MAX_DRAWS_PER_SAMPLE);
    let mut draws = 0usize;

    while report.samples < region.samples {
        if draws >= max_draws {
            return Err(BiomeError::InvalidConfig(format!(
                "census gave up after {draws} draws with {} of {} samples",
                report.samples, region.samples
            )));
        }
        draws += 1;

        let x = region.center_x + rng.gen_range(-region.half_extent..region.half_extent);
        let y = region.center_y + rng.gen_range(-region.half_extent..region.half_extent);
        if distance_from_origin(x, y) < region.exclude_radius {
            continue;
        }

        match base(x, y)? {
            BiomeType::Grass => report.base_grass += 1,
            BiomeType::Sand | BiomeType::Water => report.base_sand += 1,
        }
        match final_biome(x, y)? {
            BiomeType::Grass => report.grass += 1,
            BiomeType::Sand => report.sand += 1,
            BiomeType::Water => report.water += 1,
        }
        report.samples += 1;
    }

    Ok(report)
}
