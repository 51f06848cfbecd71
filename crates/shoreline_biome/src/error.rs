//! # Biome Error Types
//!
//! Every error here is a contract violation by the caller or a broken
//! configuration. None of them is an expected runtime condition.

use thiserror::Error;

/// Errors that can occur in the biome engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BiomeError {
    /// A query was made before `initialize()` or after `dispose()`.
    #[error("biome manager is not initialized")]
    NotInitialized,

    /// A coordinate was NaN or infinite.
    #[error("non-finite coordinate ({x}, {y})")]
    NonFiniteCoordinate {
        /// The X coordinate as received.
        x: f64,
        /// The Y coordinate as received.
        y: f64,
    },

    /// The configuration violates an invariant.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration text could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),

    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(String),
}

/// Result type for biome operations.
pub type BiomeResult<T> = Result<T, BiomeError>;

/// Rejects NaN and infinite coordinates.
#[inline]
pub(crate) fn ensure_finite(x: f64, y: f64) -> BiomeResult<()> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(BiomeError::NonFiniteCoordinate { x, y })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_coordinates_pass() {
        assert!(ensure_finite(0.0, -0.0).is_ok());
        assert!(ensure_finite(1.0e300, -1.0e300).is_ok());
    }

    #[test]
    fn test_non_finite_coordinates_rejected() {
        assert!(matches!(
            ensure_finite(f64::NAN, 0.0),
            Err(BiomeError::NonFiniteCoordinate { .. })
        ));
        assert!(matches!(
            ensure_finite(0.0, f64::NEG_INFINITY),
            Err(BiomeError::NonFiniteCoordinate { .. })
        ));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            BiomeError::NotInitialized.to_string(),
            "biome manager is not initialized"
        );
        assert_eq!(
            BiomeError::InvalidConfig("octaves must be at least 1".into()).to_string(),
            "invalid configuration: octaves must be at least 1"
        );
    }
}
