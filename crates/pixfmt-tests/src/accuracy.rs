//! Accuracy measurement using perceptual color difference metrics.
//!
//! Uses CIEDE2000 (deltaE2000) as the primary metric for color difference.
//! This is superior to MSE/PSNR which don't correlate with human perception.
//! The Lab conversion and CIEDE2000 formula both come from the `palette`
//! crate rather than `pixfmt-core`'s own Lab math, so this serves as an
//! outside check, not a tautology.

use palette::color_difference::Ciede2000;
use palette::{IntoColor, Lab, Srgb};

/// Statistics from a deltaE comparison.
#[derive(Debug, Clone)]
pub struct DeltaEStats {
    pub mean: f64,
    pub max: f64,
    pub p95: f64,
    pub count: usize,
}

impl DeltaEStats {
    pub fn is_excellent(&self) -> bool {
        self.max < 1.0
    }

    pub fn is_good(&self) -> bool {
        self.max < 2.0
    }

    pub fn is_acceptable(&self) -> bool {
        self.max < 3.5
    }
}

/// deltaE2000 between two CIE Lab colors.
pub fn delta_e_2000(lab1: [f64; 3], lab2: [f64; 3]) -> f64 {
    let a = Lab::new(lab1[0] as f32, lab1[1] as f32, lab1[2] as f32);
    let b = Lab::new(lab2[0] as f32, lab2[1] as f32, lab2[2] as f32);
    a.difference(b) as f64
}

fn srgb_u8_to_lab(r: u8, g: u8, b: u8) -> Lab {
    Srgb::new(r, g, b).into_format::<f32>().into_color()
}

/// Compare two `R'G'B'A u8`-shaped pixel buffers and compute deltaE statistics.
pub fn compare_rgba_buffers(reference: &[u8], result: &[u8]) -> DeltaEStats {
    assert_eq!(reference.len(), result.len());
    assert_eq!(reference.len() % 4, 0);

    let pixel_count = reference.len() / 4;
    let mut delta_es: Vec<f64> = Vec::with_capacity(pixel_count);

    for i in 0..pixel_count {
        let idx = i * 4;
        let lab_ref = srgb_u8_to_lab(reference[idx], reference[idx + 1], reference[idx + 2]);
        let lab_res = srgb_u8_to_lab(result[idx], result[idx + 1], result[idx + 2]);
        delta_es.push(lab_ref.difference(lab_res) as f64);
    }

    delta_es.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mean: f64 = delta_es.iter().sum::<f64>() / delta_es.len() as f64;
    let max = *delta_es.last().unwrap_or(&0.0);
    let p95_idx = (delta_es.len() as f64 * 0.95) as usize;
    let p95 = delta_es.get(p95_idx).copied().unwrap_or(0.0);

    DeltaEStats {
        mean,
        max,
        p95,
        count: pixel_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_color_has_zero_delta_e() {
        let lab = [50.0, 25.0, -25.0];
        assert!(delta_e_2000(lab, lab) < 0.0001);
    }

    #[test]
    fn small_lightness_difference_is_small() {
        let lab1 = [50.0, 0.0, 0.0];
        let lab2 = [51.0, 0.0, 0.0];
        let de = delta_e_2000(lab1, lab2);
        assert!(de > 0.0 && de < 2.0, "deltaE={de}");
    }

    #[test]
    fn identical_rgba_buffers_are_excellent() {
        let buf = [255, 128, 64, 255, 32, 16, 8, 255];
        let stats = compare_rgba_buffers(&buf, &buf);
        assert!(stats.is_excellent());
        assert!(stats.mean < 0.0001);
    }
}
