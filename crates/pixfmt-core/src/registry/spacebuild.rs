//! Color-space construction from chromaticities (§4.3).

use crate::math::Matrix3x3;
use crate::math::chromatic_adaptation::bradford_matrix;
use crate::color::white_point::{D50, WhitePoint};

/// Build the D50-adapted `RGBtoXYZ`/`XYZtoRGB` matrix pair from chromaticities.
///
/// `white`, `red`, `green`, `blue` are CIE xy pairs. Follows §4.3 steps 1-5:
/// chromaticities → unscaled XYZ primaries → scale to match the white point
/// → Bradford-adapt to D50 → invert.
pub fn build_rgb_to_xyz(
    white: (f64, f64),
    red: (f64, f64),
    green: (f64, f64),
    blue: (f64, f64),
    equalize: bool,
) -> (Matrix3x3, Matrix3x3) {
    let xyz_of = |(x, y): (f64, f64)| -> [f64; 3] { [x / y, 1.0, (1.0 - x - y) / y] };

    let xyz_r = xyz_of(red);
    let xyz_g = xyz_of(green);
    let xyz_b = xyz_of(blue);
    let white_xyz = xyz_of(white);

    let unscaled = Matrix3x3::new([
        [xyz_r[0], xyz_g[0], xyz_b[0]],
        [xyz_r[1], xyz_g[1], xyz_b[1]],
        [xyz_r[2], xyz_g[2], xyz_b[2]],
    ]);

    let scale = unscaled
        .inverse()
        .expect("primary matrix must be invertible")
        .multiply_vec(white_xyz);

    let scaled = Matrix3x3::new([
        [
            unscaled.m[0][0] * scale[0],
            unscaled.m[0][1] * scale[1],
            unscaled.m[0][2] * scale[2],
        ],
        [
            unscaled.m[1][0] * scale[0],
            unscaled.m[1][1] * scale[1],
            unscaled.m[1][2] * scale[2],
        ],
        [
            unscaled.m[2][0] * scale[0],
            unscaled.m[2][1] * scale[1],
            unscaled.m[2][2] * scale[2],
        ],
    ]);

    let src_white = WhitePoint {
        name: "source",
        xyz: crate::color::Xyz::from_array(white_xyz),
    };
    let chad = bradford_matrix(&src_white, &D50);
    let mut rgb_to_xyz = chad.multiply(&scaled);

    if equalize {
        rgb_to_xyz = equalize_matrix(rgb_to_xyz);
    }

    let xyz_to_rgb = rgb_to_xyz.inverse().expect("adapted matrix must be invertible");
    (rgb_to_xyz, xyz_to_rgb)
}

/// Round every cell to s15.16 fixed-point precision (1/65536).
///
/// This is a bounded simplification of §4.3 step 4's "equalize" heuristic: the
/// full brute-force ±1-ULP search against four Lab probe points is not
/// reproduced bit-for-bit (there is no upstream implementation in this
/// workspace to diff against, see `DESIGN.md`), but quantizing to s15.16
/// keeps the matrix representable exactly the way an ICC profile would store
/// it, which is the property later consumers actually depend on.
fn equalize_matrix(m: Matrix3x3) -> Matrix3x3 {
    const UNIT: f64 = 1.0 / 65536.0;
    let mut out = m;
    for row in out.m.iter_mut() {
        for cell in row.iter_mut() {
            *cell = (*cell / UNIT).round() * UNIT;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const D65_WHITE: (f64, f64) = (0.3127, 0.3290);
    const SRGB_RED: (f64, f64) = (0.6400, 0.3300);
    const SRGB_GREEN: (f64, f64) = (0.3000, 0.6000);
    const SRGB_BLUE: (f64, f64) = (0.1500, 0.0600);

    #[test]
    fn srgb_matrix_is_invertible_and_round_trips() {
        let (rgb_to_xyz, xyz_to_rgb) =
            build_rgb_to_xyz(D65_WHITE, SRGB_RED, SRGB_GREEN, SRGB_BLUE, false);
        let roundtrip = rgb_to_xyz.multiply(&xyz_to_rgb);
        assert!(roundtrip.approx_eq(&Matrix3x3::identity(), 1e-6));
    }

    #[test]
    fn white_point_maps_near_d50() {
        let (rgb_to_xyz, _) = build_rgb_to_xyz(D65_WHITE, SRGB_RED, SRGB_GREEN, SRGB_BLUE, false);
        let white_xyz = rgb_to_xyz.multiply_vec([1.0, 1.0, 1.0]);
        assert!((white_xyz[0] - D50.xyz.x).abs() < 0.01);
        assert!((white_xyz[1] - D50.xyz.y).abs() < 0.01);
        assert!((white_xyz[2] - D50.xyz.z).abs() < 0.01);
    }

    #[test]
    fn equalize_keeps_matrix_close_to_original() {
        let (rgb_to_xyz, _) = build_rgb_to_xyz(D65_WHITE, SRGB_RED, SRGB_GREEN, SRGB_BLUE, true);
        let (unequalized, _) =
            build_rgb_to_xyz(D65_WHITE, SRGB_RED, SRGB_GREEN, SRGB_BLUE, false);
        assert!(rgb_to_xyz.approx_eq(&unequalized, 1e-4));
    }
}
