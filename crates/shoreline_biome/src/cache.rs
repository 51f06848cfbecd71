//! # Spatial Cache
//!
//! Grid-bucketed memoization shared by every query thread.
//!
//! The world is cut into square cells of `grid_size` units. A cached value
//! must be a pure function of its [`GridKey`], never of the coordinate that
//! happened to populate it; that is what keeps the cache invisible.
//!
//! The beach buffer validator memoizes rejections only: a blocked cell
//! answers from the cache, while a point that keeps a clean buffer samples
//! its full pattern on every query.
//!
//! ## Eviction
//!
//! None. When the map reaches `max_entries` it is flushed entirely. Values
//! are cheap to recompute and a flush is rare, so an LRU would cost more on
//! every hit than it saves on the occasional miss.
//!
//! ## Concurrency
//!
//! Values are computed outside the lock. Two threads missing on the same
//! cell both compute it and both write it; since the value is pure, either
//! write is correct.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::stats::CacheStats;

/// Largest cell index (per axis) a key may hold. Beyond this, cell centres
/// are no longer exactly representable and the caller must bypass the cache.
const MAX_CELL_INDEX: f64 = 4_503_599_627_370_496.0; // 2^52

/// Integer cell coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridKey {
    /// Cell column, `floor(x / grid_size)`.
    pub x: i64,
    /// Cell row, `floor(y / grid_size)`.
    pub y: i64,
}

impl GridKey {
    /// Cell containing a world coordinate, or `None` when the coordinate
    /// is too far out to key exactly.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_world(x: f64, y: f64, grid_size: f64) -> Option<Self> {
        let cx = (x / grid_size).floor();
        let cy = (y / grid_size).floor();
        if cx.abs() < MAX_CELL_INDEX && cy.abs() < MAX_CELL_INDEX {
            Some(Self {
                x: cx as i64,
                y: cy as i64,
            })
        } else {
            None
        }
    }

    /// World coordinate of the cell's centre.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn center(self, grid_size: f64) -> (f64, f64) {
        (
            (self.x as f64 + 0.5) * grid_size,
            (self.y as f64 + 0.5) * grid_size,
        )
    }
}

/// Thread-safe, bulk-flushed, grid-keyed cache.
pub struct SpatialCache<V> {
    grid_size: f64,
    max_entries: usize,
    entries: RwLock<HashMap<GridKey, V>>,
    hits: AtomicU64,
    misses: AtomicU64,
    flushes: AtomicU64,
}

impl<V: Copy> SpatialCache<V> {
    /// Creates an empty cache. `max_entries` is clamped to at least 1.
    #[must_use]
    pub fn new(grid_size: f64, max_entries: usize) -> Self {
        let max_entries = max_entries.max(1);
        Self {
            grid_size,
            max_entries,
            entries: RwLock::new(HashMap::with_capacity(max_entries.min(4096))),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            flushes: AtomicU64::new(0),
        }
    }

    /// Cell containing `(x, y)` for this cache's grid.
    #[inline]
    #[must_use]
    pub fn key_for(&self, x: f64, y: f64) -> Option<GridKey> {
        GridKey::from_world(x, y, self.grid_size)
    }

    /// Looks a cell up, counting the hit or miss.
    #[must_use]
    pub fn get(&self, key: GridKey) -> Option<V> {
        let found = self.entries.read().get(&key).copied();
        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Stores a value, flushing everything first if the cache is full.
    pub fn insert(&self, key: GridKey, value: V) {
        let mut entries = self.entries.write();
        if entries.len() >= self.max_entries && !entries.contains_key(&key) {
            let dropped = entries.len();
            entries.clear();
            self.flushes.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("Spatial cache full, flushed {} entries", dropped);
        }
        entries.insert(key, value);
    }

    /// Returns the cached value, or computes, stores and returns it.
    ///
    /// `compute` runs without holding the lock and receives the key, so
    /// the value it produces can only depend on the cell.
    pub fn get_or_insert_with(&self, key: GridKey, compute: impl FnOnce(GridKey) -> V) -> V {
        if let Some(value) = self.get(key) {
            return value;
        }
        let value = compute(key);
        self.insert(key, value);
        value
    }

    /// Drops every entry. Counters keep running.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of cached cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True when no cell is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Side of one cell in world units.
    #[must_use]
    pub const fn grid_size(&self) -> f64 {
        self.grid_size
    }

    /// Snapshot of the counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            flushes: self.flushes.load(Ordering::Relaxed),
            entries: self.len(),
            max_entries: self.max_entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_floors_negative_coordinates() {
        assert_eq!(GridKey::from_world(-0.5, 63.9, 64.0), Some(GridKey { x: -1, y: 0 }));
        assert_eq!(GridKey::from_world(-64.0, 64.0, 64.0), Some(GridKey { x: -1, y: 1 }));
        assert_eq!(GridKey::from_world(-64.1, 128.0, 64.0), Some(GridKey { x: -2, y: 2 }));
    }

    #[test]
    fn test_key_rejects_unrepresentable_cells() {
        assert!(GridKey::from_world(1.0e300, 0.0, 64.0).is_none());
        assert!(GridKey::from_world(0.0, -1.0e20, 64.0).is_none());
        assert!(GridKey::from_world(1.0e12, -1.0e12, 64.0).is_some());
    }

    #[test]
    fn test_center_lies_in_cell() {
        let key = GridKey { x: -3, y: 7 };
        let (cx, cy) = key.center(64.0);
        assert_eq!(GridKey::from_world(cx, cy, 64.0), Some(key));
        assert!((cx + 160.0).abs() < f64::EPSILON);
        assert!((cy - 480.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_and_miss_counting() {
        let cache: SpatialCache<bool> = SpatialCache::new(64.0, 16);
        let key = GridKey { x: 1, y: 2 };

        assert_eq!(cache.get(key), None);
        cache.insert(key, true);
        assert_eq!(cache.get(key), Some(true));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_bulk_flush_at_capacity() {
        let cache: SpatialCache<u32> = SpatialCache::new(64.0, 4);
        for i in 0..4 {
            cache.insert(GridKey { x: i, y: 0 }, 7);
        }
        assert_eq!(cache.len(), 4);

        // Overwriting an existing key never flushes
        cache.insert(GridKey { x: 0, y: 0 }, 8);
        assert_eq!(cache.len(), 4);
        assert_eq!(cache.stats().flushes, 0);

        cache.insert(GridKey { x: 99, y: 0 }, 9);
        assert_eq!(cache.len(), 1, "a full cache is flushed, not trimmed");
        assert_eq!(cache.stats().flushes, 1);
        assert_eq!(cache.get(GridKey { x: 99, y: 0 }), Some(9));
    }

    #[test]
    fn test_get_or_insert_with_computes_once() {
        let cache: SpatialCache<i64> = SpatialCache::new(64.0, 8);
        let key = GridKey { x: 5, y: -5 };
        let mut calls = 0;

        let first = cache.get_or_insert_with(key, |k| {
            calls += 1;
            k.x * 10 + k.y
        });
        let second = cache.get_or_insert_with(key, |_| unreachable!("value is cached"));

        assert_eq!(first, 45);
        assert_eq!(second, 45);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_clear() {
        let cache: SpatialCache<bool> = SpatialCache::new(64.0, 8);
        cache.insert(GridKey { x: 0, y: 0 }, false);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_population() {
        let cache: SpatialCache<i64> = SpatialCache::new(64.0, 1_000_000);

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for i in 0..500 {
                        let key = GridKey { x: i, y: i % 7 };
                        let value = cache.get_or_insert_with(key, |k| k.x + k.y);
                        assert_eq!(value, i + i % 7);
                    }
                });
            }
        });

        assert_eq!(cache.len(), 500);
    }
}
