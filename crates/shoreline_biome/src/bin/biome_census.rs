//! # Biome Census
//!
//! Command-line tool that samples a world and prints its biome distribution.

use std::process::ExitCode;
use std::time::Instant;

use shoreline_biome::{BiomeConfig, BiomeManager, BiomeResult, CensusRegion};

const DEFAULT_SAMPLES: usize = 20_000;
const DEFAULT_HALF_EXTENT: f64 = 200_000.0;
const DEFAULT_SEED: u64 = 1;

fn flag_value<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn print_usage() {
    println!("Usage: biome_census [config.toml] [options]");
    println!();
    println!("Options:");
    println!("  --samples <n>   Number of samples (default {DEFAULT_SAMPLES})");
    println!("  --extent <d>    Half side of the sampled square (default {DEFAULT_HALF_EXTENT})");
    println!("  --seed <s>      Sampler seed (default {DEFAULT_SEED})");
}

/// Loads the config, runs the census and prints the report.
fn run(args: &[String]) -> BiomeResult<()> {
    let config_path = args
        .iter()
        .skip(1)
        .find(|a| std::path::Path::new(a.as_str()).extension().is_some_and(|e| e == "toml"));

    let config = match config_path {
        Some(path) => {
            println!("Loading config: {path}");
            BiomeConfig::from_toml_file(path)?
        }
        None => BiomeConfig::default(),
    };

    let samples = flag_value(args, "--samples").unwrap_or(DEFAULT_SAMPLES);
    let half_extent = flag_value(args, "--extent").unwrap_or(DEFAULT_HALF_EXTENT);
    let seed = flag_value(args, "--seed").unwrap_or(DEFAULT_SEED);

    let region = CensusRegion::outside_zones(&config, half_extent, samples, seed);

    let mut manager = BiomeManager::new(config)?;
    manager.initialize();

    println!(
        "Sampling {} points in ±{} (excluding r < {})...",
        region.samples, region.half_extent, region.exclude_radius
    );

    let start = Instant::now();
    let report = manager.census(&region)?;
    let elapsed = start.elapsed();

    println!();
    println!("┌─ DISTRIBUTION ─────────────────────────────────────────────────┐");
    println!("│ Grass:              {:>6.2}%  (target 50%)", report.grass_fraction() * 100.0);
    println!("│ Sand:               {:>6.2}%  (target 30%)", report.sand_fraction() * 100.0);
    println!("│ Water:              {:>6.2}%  (target 20%)", report.water_fraction() * 100.0);
    println!("│ Base grass:         {:>6.2}%  (target 50%)", report.base_grass_fraction() * 100.0);
    println!("│ Water in sand:      {:>6.2}%  (target 40%)", report.water_in_sand_fraction() * 100.0);
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    let stats = manager.performance_stats()?;
    println!("┌─ PERFORMANCE ──────────────────────────────────────────────────┐");
    for line in stats.to_string().lines() {
        println!("│ {line}");
    }
    println!("│ elapsed: {:.1} ms", elapsed.as_secs_f64() * 1_000.0);
    println!("└──────────────────────────────────────────────────────────────────┘");

    manager.dispose();
    Ok(())
}

fn main() -> ExitCode {
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║         SHORELINE BIOME CENSUS                                   ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help") {
        print_usage();
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
