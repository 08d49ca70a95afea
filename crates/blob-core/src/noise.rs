//! Seeded 2D simplex noise.
//!
//! The field is built once from a seed and is immutable afterwards, so the
//! same `(x, y)` always produces the same value. The kernel falloff is
//! `(0.5 - r²)⁴`, which keeps the field C² continuous across simplex edges.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seed used when none is configured; keeps animations reproducible.
pub const DEFAULT_SEED: u64 = 12345;

/// Skew factor `(√3 - 1) / 2`.
const F2: f64 = 0.366_025_403_784_438_6;
/// Unskew factor `(3 - √3) / 6`.
const G2: f64 = 0.211_324_865_405_187_1;
/// Brings the raw kernel sum into roughly [-1, 1].
const NORMALIZE: f64 = 70.0;

const GRADIENTS: [[f64; 2]; 12] = [
    [1.0, 1.0],
    [-1.0, 1.0],
    [1.0, -1.0],
    [-1.0, -1.0],
    [1.0, 0.0],
    [-1.0, 0.0],
    [0.0, 1.0],
    [0.0, -1.0],
    [1.0, 0.0],
    [-1.0, 0.0],
    [0.0, 1.0],
    [0.0, -1.0],
];

#[derive(Clone)]
pub struct NoiseField {
    seed: u64,
    /// Permutation table doubled to 512 entries so lookups never wrap.
    perm: [u8; 512],
}

impl NoiseField {
    pub fn new(seed: u64) -> Self {
        let mut table: Vec<u8> = (0..=255).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        table.shuffle(&mut rng);

        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = table[i & 255];
        }
        Self { seed, perm }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Sample the field at `(x, y)`. The result is always within [-1, 1].
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let (x, y) = (x as f64, y as f64);

        let s = (x + y) * F2;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let t = (i + j) * G2;
        let x0 = x - (i - t);
        let y0 = y - (j - t);

        // Which triangle of the skewed cell we're in.
        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - i1 as f64 + G2;
        let y1 = y0 - j1 as f64 + G2;
        let x2 = x0 - 1.0 + 2.0 * G2;
        let y2 = y0 - 1.0 + 2.0 * G2;

        let ii = (i as i64 & 255) as usize;
        let jj = (j as i64 & 255) as usize;

        let g0 = self.gradient_index(ii, jj);
        let g1 = self.gradient_index(ii + i1, jj + j1);
        let g2 = self.gradient_index(ii + 1, jj + 1);

        let n = corner(g0, x0, y0) + corner(g1, x1, y1) + corner(g2, x2, y2);
        (NORMALIZE * n).clamp(-1.0, 1.0) as f32
    }

    fn gradient_index(&self, i: usize, j: usize) -> usize {
        self.perm[i + self.perm[j] as usize] as usize % GRADIENTS.len()
    }
}

impl Default for NoiseField {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField").field("seed", &self.seed).finish()
    }
}

fn corner(gradient: usize, x: f64, y: f64) -> f64 {
    let t = 0.5 - x * x - y * y;
    if t < 0.0 {
        return 0.0;
    }
    let g = GRADIENTS[gradient];
    let t2 = t * t;
    t2 * t2 * (g[0] * x + g[1] * y)
}
