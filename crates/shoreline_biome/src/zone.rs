//! # Spawn Zones
//!
//! Three concentric bands around the origin override noise near spawn:
//!
//! ```text
//!   [0, R)        inner grass   - always GRASS, a safe place to start
//!   [R, R+W)      sand band     - always SAND
//!   [R+W, MAX]    outer         - decided by noise
//! ```

use serde::Serialize;

use crate::biome::BiomeType;
use crate::config::BiomeConfig;

/// Euclidean distance from the origin.
///
/// Plain `sqrt(x*x + y*y)` rather than `hypot`: the square root is
/// correctly rounded everywhere, so every platform gets the same bits.
/// Overflows to infinity for astronomically large inputs, which simply
/// lands in the outer zone.
#[inline]
#[must_use]
pub fn distance_from_origin(x: f64, y: f64) -> f64 {
    (x * x + y * y).sqrt()
}

/// What a zone decides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ZoneKind {
    /// Every point in the zone has this biome.
    Fixed(BiomeType),
    /// The zone defers to the noise fields.
    Noise,
}

/// One radial band `[min_distance, max_distance)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BiomeZone {
    /// Inclusive inner radius.
    pub min_distance: f64,
    /// Exclusive outer radius; `f64::MAX` for the last zone.
    pub max_distance: f64,
    /// What the zone decides.
    pub kind: ZoneKind,
}

impl BiomeZone {
    /// Returns true if `distance` falls in this band.
    #[inline]
    #[must_use]
    pub fn contains(&self, distance: f64) -> bool {
        distance >= self.min_distance && distance < self.max_distance
    }
}

/// O(1) radial classifier.
#[derive(Clone, Copy, Debug)]
pub struct ZoneClassifier {
    inner_radius: f64,
    band_outer_radius: f64,
}

impl ZoneClassifier {
    /// Builds the classifier from a validated config.
    #[must_use]
    pub fn new(config: &BiomeConfig) -> Self {
        Self {
            inner_radius: config.inner_grass_radius,
            band_outer_radius: config.sand_band_outer_radius(),
        }
    }

    /// Fixed biome at `distance` from the origin, or `None` to defer to noise.
    #[inline]
    #[must_use]
    pub fn classify(&self, distance: f64) -> Option<BiomeType> {
        if distance < self.inner_radius {
            Some(BiomeType::Grass)
        } else if distance < self.band_outer_radius {
            Some(BiomeType::Sand)
        } else {
            None
        }
    }

    /// Whether a disc of `radius` centred `distance` from the origin reaches
    /// into the inner grass zone.
    #[inline]
    #[must_use]
    pub fn disc_touches_inner_grass(&self, distance: f64, radius: f64) -> bool {
        distance - radius < self.inner_radius
    }

    /// Whether a disc of `radius` centred `distance` from the origin lies
    /// entirely inside the sand band.
    #[inline]
    #[must_use]
    pub fn disc_inside_sand_band(&self, distance: f64, radius: f64) -> bool {
        distance - radius >= self.inner_radius && distance + radius < self.band_outer_radius
    }

    /// Radius of the inner grass zone.
    #[must_use]
    pub const fn inner_radius(&self) -> f64 {
        self.inner_radius
    }

    /// Outer edge of the sand band.
    #[must_use]
    pub const fn band_outer_radius(&self) -> f64 {
        self.band_outer_radius
    }

    /// The three zones, ordered by distance.
    #[must_use]
    pub fn zones(&self) -> [BiomeZone; 3] {
        [
            BiomeZone {
                min_distance: 0.0,
                max_distance: self.inner_radius,
                kind: ZoneKind::Fixed(BiomeType::Grass),
            },
            BiomeZone {
                min_distance: self.inner_radius,
                max_distance: self.band_outer_radius,
                kind: ZoneKind::Fixed(BiomeType::Sand),
            },
            BiomeZone {
                min_distance: self.band_outer_radius,
                max_distance: f64::MAX,
                kind: ZoneKind::Noise,
            },
        ]
    }
}
