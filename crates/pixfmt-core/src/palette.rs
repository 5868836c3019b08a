//! The palette subsystem (§4.7): nearest-color search over ≤256 entries with
//! a spatial-coherence seed and a race-tolerant hash cache.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Error, Result};

const MAX_ENTRIES: usize = 256;
/// Hash table size (§4.7) — a cache of prior winners, purely advisory.
const HASH_SIZE: usize = 1111;

/// The built-in 16-entry EGA-style default palette (§4.7 scenario S4).
pub const EGA_DEFAULT: [[u8; 4]; 16] = [
    [0, 0, 0, 255],
    [127, 0, 0, 255],
    [0, 127, 0, 255],
    [127, 127, 0, 255],
    [0, 0, 127, 255],
    [127, 0, 127, 255],
    [0, 127, 127, 255],
    [192, 192, 192, 255],
    [127, 127, 127, 255],
    [255, 0, 0, 255],
    [0, 255, 0, 255],
    [255, 255, 0, 255],
    [0, 0, 255, 255],
    [255, 0, 255, 255],
    [0, 255, 255, 255],
    [255, 255, 255, 255],
];

pub struct Palette {
    /// Perceptual 8-bit RGBA, used for nearest-color search.
    entries_u8: Vec<[u8; 4]>,
    /// Linear-light RGBA double, the other storage form §3 requires.
    entries_linear: Vec<[f64; 4]>,
    /// `radius_table[i]` = other entries sorted ascending by RGB distance from `i`.
    radius_table: Vec<Vec<(usize, f64)>>,
    hash: Vec<AtomicUsize>,
}

fn rgb_distance_sq(a: [u8; 4], b: [u8; 4]) -> f64 {
    let dr = a[0] as f64 - b[0] as f64;
    let dg = a[1] as f64 - b[1] as f64;
    let db = a[2] as f64 - b[2] as f64;
    dr * dr + dg * dg + db * db
}

fn to_linear_double(srgb_u8: [u8; 4]) -> [f64; 4] {
    [
        crate::math::gamma::srgb_gamma_decode(srgb_u8[0] as f64 / 255.0),
        crate::math::gamma::srgb_gamma_decode(srgb_u8[1] as f64 / 255.0),
        crate::math::gamma::srgb_gamma_decode(srgb_u8[2] as f64 / 255.0),
        srgb_u8[3] as f64 / 255.0,
    ]
}

impl Palette {
    /// `palette_set_palette` (§6): clamps to [`MAX_ENTRIES`] with a
    /// diagnostic rather than rejecting (§7 propagation policy).
    pub fn new(name: &str, entries_u8: Vec<[u8; 4]>) -> Self {
        let entries_u8 = if entries_u8.len() > MAX_ENTRIES {
            log::warn!(
                "palette {name:?}: {} entries exceeds the {MAX_ENTRIES} limit, clamping",
                entries_u8.len()
            );
            entries_u8[..MAX_ENTRIES].to_vec()
        } else {
            entries_u8
        };

        let entries_linear = entries_u8.iter().map(|&e| to_linear_double(e)).collect();
        let radius_table = build_radius_table(&entries_u8);
        let hash = (0..HASH_SIZE).map(|i| AtomicUsize::new(i + 1)).collect();

        Palette {
            entries_u8,
            entries_linear,
            radius_table,
            hash,
        }
    }

    pub fn default_ega() -> Self {
        Self::new("default-ega", EGA_DEFAULT.to_vec())
    }

    pub fn len(&self) -> usize {
        self.entries_u8.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries_u8.is_empty()
    }

    pub fn entry_u8(&self, index: usize) -> [u8; 4] {
        self.entries_u8[index]
    }

    pub fn entry_linear(&self, index: usize) -> [f64; 4] {
        self.entries_linear[index]
    }

    fn hash_slot(rgb: [u8; 3]) -> usize {
        let key = (rgb[0] as u32) << 16 | (rgb[1] as u32) << 8 | rgb[2] as u32;
        (key % HASH_SIZE as u32) as usize
    }

    /// Nearest-entry search (§4.7). `best_idx` seeds the search from the
    /// hash cache (falling back to entry 0); the result is independent of
    /// the seed (testable property 6).
    pub fn nearest(&self, rgb: [u8; 3]) -> Result<usize> {
        if self.is_empty() {
            return Err(Error::InvalidArgument("palette has no entries".to_string()));
        }
        let slot = Self::hash_slot(rgb);
        let cached = self.hash[slot].load(Ordering::Relaxed);
        let seed = cached % self.len();

        let target = [rgb[0], rgb[1], rgb[2], 0];
        let mut best_idx = seed;
        let mut best_dist = rgb_distance_sq(target, self.entries_u8[best_idx]);
        let dist_src_seed = best_dist;

        for &(candidate, dist_seed_candidate) in &self.radius_table[seed] {
            if best_dist < (dist_seed_candidate.sqrt() - dist_src_seed.sqrt()).max(0.0).powi(2) {
                break;
            }
            let d = rgb_distance_sq(target, self.entries_u8[candidate]);
            if d < best_dist || (d == best_dist && candidate < best_idx) {
                best_dist = d;
                best_idx = candidate;
            }
        }

        self.hash[slot].store(best_idx, Ordering::Relaxed);
        Ok(best_idx)
    }
}

fn build_radius_table(entries: &[[u8; 4]]) -> Vec<Vec<(usize, f64)>> {
    (0..entries.len())
        .map(|i| {
            let mut others: Vec<(usize, f64)> = (0..entries.len())
                .filter(|&j| j != i)
                .map(|j| (j, rgb_distance_sq(entries[i], entries[j])))
                .collect();
            others.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
            others
        })
        .collect()
}
