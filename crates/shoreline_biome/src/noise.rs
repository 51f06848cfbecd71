//! # Deterministic Noise Fields
//!
//! Seeded, spatially coherent 2D noise.
//!
//! ## Why Simplex?
//!
//! - Fewer directional artifacts than Perlin
//! - Three corner contributions per sample instead of four
//! - Smooth enough that neighbouring points agree, which is what turns a
//!   threshold into contiguous regions instead of salt-and-pepper noise
//!
//! ## Determinism Guarantee
//!
//! Given the same [`WorldSeed`], every function in this module produces
//! **exactly** the same `f64` on any run, in any process, in any call order.
//! Only IEEE-exact operations (`+ - * floor`) touch the sample path.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Seed for one deterministic noise stream.
///
/// Serialized as a signed 64-bit integer (bit-for-bit reinterpretation) so
/// every seed fits a TOML integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives an independent sub-seed for a specific purpose.
    ///
    /// The base-biome split and the water overlay each get their own
    /// purpose so their fields are uncorrelated.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(0xDEAD_BEEF_CAFE_BABE)
    }
}

impl Serialize for WorldSeed {
    #[allow(clippy::cast_possible_wrap)]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0 as i64)
    }
}

impl<'de> Deserialize<'de> for WorldSeed {
    #[allow(clippy::cast_sign_loss)]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i64::deserialize(deserializer).map(|raw| Self(raw as u64))
    }
}

/// Pre-computed permutation table, built once per seed.
struct PermutationTable {
    /// 256 entries doubled so `perm[i + perm[j]]` never needs a modulo.
    perm: [u8; 512],
}

impl PermutationTable {
    /// Xorshift state used when the seed is zero (xorshift is stuck at 0).
    const ZERO_SEED_STATE: u64 = 0x9E37_79B9_7F4A_7C15;

    /// 12 gradient directions for 2D simplex.
    const GRADIENTS: [[i8; 2]; 12] = [
        [1, 0], [1, 1], [0, 1], [-1, 1],
        [-1, 0], [-1, -1], [0, -1], [1, -1],
        [1, 0], [0, 1], [-1, 0], [0, -1],
    ];

    #[allow(clippy::cast_possible_truncation)]
    fn new(seed: WorldSeed) -> Self {
        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().take(256).enumerate() {
            *slot = i as u8;
        }

        // Fisher-Yates with xorshift64
        let mut state = match seed.value() {
            0 => Self::ZERO_SEED_STATE,
            s => s,
        };
        for i in (1..256usize).rev() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;

            let j = (state % (i as u64 + 1)) as usize;
            perm.swap(i, j);
        }

        for i in 0..256 {
            perm[256 + i] = perm[i];
        }

        Self { perm }
    }

    #[inline]
    fn get(&self, index: usize) -> u8 {
        self.perm[index & 511]
    }

    #[inline]
    fn gradient(hash: u8) -> [i8; 2] {
        Self::GRADIENTS[(hash % 12) as usize]
    }
}

/// 2D Simplex noise generator.
///
/// Produces smooth, continuous values in `[-1, 1]`.
///
/// # Example
///
/// ```rust
/// use shoreline_biome::noise::{SimplexNoise, WorldSeed};
///
/// let noise = SimplexNoise::new(WorldSeed::new(42));
/// let value = noise.sample(100.5, 200.3);
/// assert!((-1.0..=1.0).contains(&value));
/// ```
pub struct SimplexNoise {
    perm_table: PermutationTable,
}

impl SimplexNoise {
    /// Skewing factor for 2D simplex grid: (sqrt(3) - 1) / 2.
    const F2: f64 = 0.366_025_403_784_439;
    /// Unskewing factor for 2D simplex grid: (3 - sqrt(3)) / 6.
    const G2: f64 = 0.211_324_865_405_187;

    /// Creates a new simplex noise generator from a seed.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            perm_table: PermutationTable::new(seed),
        }
    }

    /// Samples 2D simplex noise. Returns a value in `[-1, 1]`.
    ///
    /// Finite inputs of any magnitude are accepted; beyond the range of
    /// `i64` lattice indices the result degrades to `0.0` instead of
    /// wrapping or panicking.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let skew = (x + y) * Self::F2;
        let i = (x + skew).floor() as i64;
        let j = (y + skew).floor() as i64;

        let unskew = (i as f64 + j as f64) * Self::G2;
        let x0 = x - (i as f64 - unskew);
        let y0 = y - (j as f64 - unskew);

        let (i1, j1): (u8, u8) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - f64::from(i1) + Self::G2;
        let y1 = y0 - f64::from(j1) + Self::G2;
        let x2 = x0 - 1.0 + 2.0 * Self::G2;
        let y2 = y0 - 1.0 + 2.0 * Self::G2;

        #[allow(clippy::cast_sign_loss)]
        let ii = (i & 255) as usize;
        #[allow(clippy::cast_sign_loss)]
        let jj = (j & 255) as usize;
        let (i1, j1) = (usize::from(i1), usize::from(j1));

        let p = &self.perm_table;
        let gi0 = p.get(ii + p.get(jj) as usize);
        let gi1 = p.get(ii + i1 + p.get(jj + j1) as usize);
        let gi2 = p.get(ii + 1 + p.get(jj + 1) as usize);

        let n0 = Self::contribution(x0, y0, gi0);
        let n1 = Self::contribution(x1, y1, gi1);
        let n2 = Self::contribution(x2, y2, gi2);

        // 70.0 normalizes the sum to [-1, 1]
        70.0 * (n0 + n1 + n2)
    }

    #[inline]
    fn contribution(x: f64, y: f64, gradient_index: u8) -> f64 {
        let t = 0.5 - x * x - y * y;
        if t < 0.0 {
            0.0
        } else {
            let grad = PermutationTable::gradient(gradient_index);
            let t2 = t * t;
            t2 * t2 * (x * f64::from(grad[0]) + y * f64::from(grad[1]))
        }
    }

    /// Fractal (octaved) noise, normalized back to roughly `[-1, 1]`.
    ///
    /// * `octaves` - number of layers, at least 1
    /// * `persistence` - amplitude decay per octave (typically 0.5)
    /// * `lacunarity` - frequency increase per octave (typically 2.0)
    #[must_use]
    pub fn octaved(
        &self,
        x: f64,
        y: f64,
        octaves: u32,
        persistence: f64,
        lacunarity: f64,
    ) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_amplitude = 0.0;

        for _ in 0..octaves.max(1) {
            total += self.sample(x * frequency, y * frequency) * amplitude;
            max_amplitude += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }

        total / max_amplitude
    }
}

/// A seeded noise field with values in `[0, 1)`.
///
/// This is the contract every classifier in the crate relies on:
/// deterministic, coherent, and independent between seeds.
pub struct NoiseField {
    noise: SimplexNoise,
    octaves: u32,
}

impl NoiseField {
    /// Amplitude decay per octave.
    pub const PERSISTENCE: f64 = 0.5;
    /// Frequency growth per octave.
    pub const LACUNARITY: f64 = 2.0;
    /// Largest value `sample` can return.
    const MAX_VALUE: f64 = 1.0 - f64::EPSILON;

    /// Creates a field for `seed` summing `octaves` layers (minimum 1).
    #[must_use]
    pub fn new(seed: WorldSeed, octaves: u32) -> Self {
        Self {
            noise: SimplexNoise::new(seed),
            octaves: octaves.max(1),
        }
    }

    /// Samples the field. The caller applies any coordinate scale.
    #[inline]
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let raw = self
            .noise
            .octaved(x, y, self.octaves, Self::PERSISTENCE, Self::LACUNARITY);
        ((raw + 1.0) * 0.5).clamp(0.0, Self::MAX_VALUE)
    }

    /// Number of octaves summed per sample.
    #[must_use]
    pub const fn octaves(&self) -> u32 {
        self.octaves
    }
}
