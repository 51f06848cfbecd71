//! # Biome Types
//!
//! The closed set of terrain kinds every consumer matches on.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Terrain classification at a world coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum BiomeType {
    /// Grassland. The spawn area is always grass.
    Grass = 0,
    /// Sand. Either the fixed band around spawn or noise-selected beach.
    Sand = 1,
    /// Water. Only ever overlays sand, never within the beach buffer of grass.
    Water = 2,
}

impl BiomeType {
    /// All variants, in discriminant order.
    pub const ALL: [Self; 3] = [Self::Grass, Self::Sand, Self::Water];

    /// Returns the compact wire value.
    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Converts from the compact wire value.
    #[inline]
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Grass),
            1 => Some(Self::Sand),
            2 => Some(Self::Water),
            _ => None,
        }
    }

    /// Returns true for water.
    #[inline]
    #[must_use]
    pub const fn is_water(self) -> bool {
        matches!(self, Self::Water)
    }

    /// Whether a walking entity is stopped by this terrain.
    #[inline]
    #[must_use]
    pub const fn blocks_movement(self) -> bool {
        match self {
            Self::Grass | Self::Sand => false,
            Self::Water => true,
        }
    }

    /// Lowercase name used in logs and reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Grass => "grass",
            Self::Sand => "sand",
            Self::Water => "water",
        }
    }
}

impl fmt::Display for BiomeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
