//! Benchmark for biome query latency.
//!
//! TARGET: base query under 1µs, final query under 10µs on average
//!
//! Run with: cargo bench --package shoreline_biome --bench biome_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use shoreline_biome::BiomeManager;

fn ready() -> BiomeManager {
    let mut manager = BiomeManager::with_defaults();
    manager.initialize();
    manager
}

fn benchmark_base_query(c: &mut Criterion) {
    let manager = ready();

    c.bench_function("base_biome_at", |b| {
        let mut x = 20_000.0f64;
        b.iter(|| {
            x += 37.0;
            black_box(manager.base_biome_at(black_box(x), black_box(x * 0.7)))
        });
    });
}

fn benchmark_final_query(c: &mut Criterion) {
    let manager = ready();

    c.bench_function("biome_at_scattered", |b| {
        let mut x = 20_000.0f64;
        b.iter(|| {
            x += 37.0;
            black_box(manager.biome_at(black_box(x), black_box(x * 0.7)))
        });
    });
}

fn benchmark_buffer_check(c: &mut Criterion) {
    let manager = ready();

    c.bench_function("is_valid_beach_buffer", |b| {
        let mut x = 20_000.0f64;
        b.iter(|| {
            x += 37.0;
            black_box(manager.is_valid_beach_buffer(black_box(x), black_box(-x * 0.3)))
        });
    });
}

fn benchmark_tile_grid(c: &mut Criterion) {
    let manager = ready();

    let mut group = c.benchmark_group("tile_grid");

    // 256x256 tiles at 4 unit spacing, the way a renderer walks a view
    group.throughput(Throughput::Elements(256 * 256));
    group.sample_size(10);
    group.bench_function("256x256_final_biomes", |b| {
        b.iter(|| {
            for ty in 0..256u32 {
                for tx in 0..256u32 {
                    let x = 60_000.0 + f64::from(tx) * 4.0;
                    let y = -45_000.0 + f64::from(ty) * 4.0;
                    let _ = black_box(manager.biome_at(x, y));
                }
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_base_query,
    benchmark_final_query,
    benchmark_buffer_check,
    benchmark_tile_grid
);
criterion_main!(benches);
