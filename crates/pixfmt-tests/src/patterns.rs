//! Synthetic pixel pattern generation for property tests.
//!
//! Generates `R'G'B'A u8` buffers (one `[u8; 4]` per pixel) rather than bare
//! RGB8 triples, since every pattern here is eventually fed through a fish
//! that expects a full pixel format.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone, Copy)]
pub enum TestPattern {
    GradientH,
    GradientV,
    ColorCube,
    HueRamp,
    Grayscale,
    Random(u64),
    Black,
    White,
}

/// Generate a pattern as `width * height` RGBA8 pixels, alpha always 255.
pub fn generate_pattern(pattern: TestPattern, width: usize, height: usize) -> Vec<[u8; 4]> {
    let pixel_count = width * height;
    let mut data = vec![[0u8, 0, 0, 255]; pixel_count];

    match pattern {
        TestPattern::GradientH => {
            for y in 0..height {
                for x in 0..width {
                    let v = ((x as f32 / width as f32) * 255.0) as u8;
                    data[y * width + x] = [v, v, v, 255];
                }
            }
        }
        TestPattern::GradientV => {
            for y in 0..height {
                let v = ((y as f32 / height as f32) * 255.0) as u8;
                for x in 0..width {
                    data[y * width + x] = [v, v, v, 255];
                }
            }
        }
        TestPattern::ColorCube => {
            let corners: [[u8; 3]; 8] = [
                [0, 0, 0],
                [255, 0, 0],
                [0, 255, 0],
                [0, 0, 255],
                [255, 255, 0],
                [255, 0, 255],
                [0, 255, 255],
                [255, 255, 255],
            ];
            for (i, px) in data.iter_mut().enumerate() {
                let c = corners[i % 8];
                *px = [c[0], c[1], c[2], 255];
            }
        }
        TestPattern::HueRamp => {
            for (i, px) in data.iter_mut().enumerate() {
                let hue = (i as f32 / pixel_count.max(1) as f32) * 360.0;
                let (r, g, b) = hsl_to_rgb(hue, 1.0, 0.5);
                *px = [r, g, b, 255];
            }
        }
        TestPattern::Grayscale => {
            for (i, px) in data.iter_mut().enumerate() {
                let v = ((i as f32 / pixel_count.max(1) as f32) * 255.0) as u8;
                *px = [v, v, v, 255];
            }
        }
        TestPattern::Random(seed) => {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            for px in data.iter_mut() {
                px[0] = rng.r#gen();
                px[1] = rng.r#gen();
                px[2] = rng.r#gen();
            }
        }
        TestPattern::Black => {}
        TestPattern::White => {
            for px in data.iter_mut() {
                *px = [255, 255, 255, 255];
            }
        }
    }

    data
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (u8, u8, u8) {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (
        ((r + m) * 255.0) as u8,
        ((g + m) * 255.0) as u8,
        ((b + m) * 255.0) as u8,
    )
}

pub mod sizes {
    pub const TINY: (usize, usize) = (8, 8);
    pub const SMALL: (usize, usize) = (64, 64);
    pub const MEDIUM: (usize, usize) = (256, 256);
}
