//! # Lifecycle & Error Tests
//!
//! Queries outside `initialize()` .. `dispose()` fail, bad input fails
//! loudly, and extreme coordinates never panic.

use shoreline_biome::{BiomeConfig, BiomeError, BiomeManager, BiomeType};

/// Test: Every query fails before initialize and after dispose.
#[test]
fn test_not_initialized_outside_lifecycle() {
    let mut manager = BiomeManager::with_defaults();
    assert_eq!(manager.biome_at(1.0, 1.0), Err(BiomeError::NotInitialized));
    assert_eq!(manager.is_walkable(1.0, 1.0), Err(BiomeError::NotInitialized));

    manager.initialize();
    assert_eq!(manager.biome_at(1.0, 1.0), Ok(BiomeType::Grass));
    assert_eq!(manager.is_walkable(1.0, 1.0), Ok(true));

    manager.dispose();
    assert_eq!(manager.biome_at(1.0, 1.0), Err(BiomeError::NotInitialized));
    assert_eq!(manager.base_biome_at(1.0, 1.0), Err(BiomeError::NotInitialized));
    assert_eq!(manager.is_valid_beach_buffer(1.0, 1.0), Err(BiomeError::NotInitialized));
}

/// Test: A re-initialized manager gives the same answers as before.
#[test]
fn test_reinitialize_is_deterministic() {
    let mut manager = BiomeManager::with_defaults();
    manager.initialize();
    let before: Vec<_> = (0..500)
        .map(|i| manager.biome_at(25_000.0 + f64::from(i) * 97.0, -31_000.0))
        .collect();

    manager.dispose();
    manager.initialize();
    let after: Vec<_> = (0..500)
        .map(|i| manager.biome_at(25_000.0 + f64::from(i) * 97.0, -31_000.0))
        .collect();

    assert_eq!(before, after);
    assert_eq!(
        manager.performance_stats().expect("initialized").final_queries,
        500,
        "counters restart with the engine"
    );
}

/// Test: NaN and infinities are rejected, never classified.
#[test]
fn test_non_finite_coordinates_rejected() {
    let mut manager = BiomeManager::with_defaults();
    manager.initialize();

    for (x, y) in [
        (f64::NAN, 0.0),
        (0.0, f64::NAN),
        (f64::INFINITY, 0.0),
        (0.0, f64::NEG_INFINITY),
    ] {
        assert!(
            matches!(manager.biome_at(x, y), Err(BiomeError::NonFiniteCoordinate { .. })),
            "({x}, {y}) must be rejected"
        );
        assert!(matches!(
            manager.base_biome_at(x, y),
            Err(BiomeError::NonFiniteCoordinate { .. })
        ));
        assert!(matches!(
            manager.is_valid_beach_buffer(x, y),
            Err(BiomeError::NonFiniteCoordinate { .. })
        ));
    }
}

/// Test: Astronomically distant coordinates classify without panicking.
#[test]
fn test_huge_coordinates() {
    let mut manager = BiomeManager::with_defaults();
    manager.initialize();

    for (x, y) in [
        (1.0e12, -1.0e12),
        (-1.0e12, 3.0e11),
        (1.0e300, 1.0e300),
        (-1.0e300, 5.0),
        (f64::MAX, f64::MIN),
    ] {
        let biome = manager.biome_at(x, y).expect("finite coordinates are valid");
        assert!(BiomeType::ALL.contains(&biome));
        assert_eq!(manager.biome_at(x, y), Ok(biome), "({x}, {y}) must be stable");
        assert_ne!(manager.base_biome_at(x, y), Ok(BiomeType::Water));
    }
}

/// Test: Configs load from TOML and bad ones are refused.
#[test]
fn test_config_from_toml() {
    let config = BiomeConfig::from_toml_str(
        r"
        inner_grass_radius = 2000.0
        sand_band_width = 500.0

        [cache]
        max_entries = 1024
        ",
    )
    .expect("partial config should fill defaults");

    let mut manager = BiomeManager::new(config).expect("valid config");
    manager.initialize();
    assert_eq!(manager.base_biome_at(2_100.0, 0.0), Ok(BiomeType::Sand));
    assert_eq!(manager.biome_at(1_900.0, 0.0), Ok(BiomeType::Grass));

    let zones = manager.biome_zones().expect("initialized");
    assert!((zones[2].min_distance - 2_500.0).abs() < f64::EPSILON);

    assert!(matches!(
        BiomeConfig::from_toml_str("octaves = 0"),
        Err(BiomeError::InvalidConfig(_))
    ));
    assert!(matches!(
        BiomeConfig::from_toml_str("unknown_key = 1"),
        Err(BiomeError::ConfigParse(_))
    ));
}
