//! Model↔model primitives (§4.2): every conversion here is defined in terms
//! of gamma-2.2-companded `R'G'B'` (matching the source's companding
//! convention for `YCbCr`/`HSL`/`HSV`/`HCY`) or, for `CIE Lab`/`LCh`, linear
//! `RGB` via the format's own color space matrix.

use crate::math::gamma::{gamma_decode, gamma_encode};
use crate::math::Matrix3x3;

const COMPANDING_GAMMA: f64 = 2.2;

fn to_prime(linear_rgb: [f64; 3]) -> [f64; 3] {
    linear_rgb.map(|v| gamma_encode(v.clamp(0.0, 1.0), COMPANDING_GAMMA))
}

fn from_prime(prime_rgb: [f64; 3]) -> [f64; 3] {
    prime_rgb.map(|v| gamma_decode(v.clamp(0.0, 1.0), COMPANDING_GAMMA))
}

/// `Y = Wr·R + Wg·G + Wb·B`, weights taken from the space's `RGBtoXYZ[1,*]`
/// row (§4.2).
pub fn rgb_to_y(linear_rgb: [f64; 3], rgb_to_xyz: &Matrix3x3) -> f64 {
    rgb_to_xyz.m[1][0] * linear_rgb[0]
        + rgb_to_xyz.m[1][1] * linear_rgb[1]
        + rgb_to_xyz.m[1][2] * linear_rgb[2]
}

/// Lossy inverse: expand a luminance value to an achromatic RGB triple.
pub fn y_to_rgb(y: f64) -> [f64; 3] {
    [y, y, y]
}

pub fn rgb_to_cmy(linear_rgb: [f64; 3]) -> [f64; 3] {
    [1.0 - linear_rgb[0], 1.0 - linear_rgb[1], 1.0 - linear_rgb[2]]
}

pub fn cmy_to_rgb(cmy: [f64; 3]) -> [f64; 3] {
    [1.0 - cmy[0], 1.0 - cmy[1], 1.0 - cmy[2]]
}

/// Black generation by minimum, with pullout = 1 (full under-color removal).
pub fn cmy_to_cmyk(cmy: [f64; 3]) -> [f64; 4] {
    let k = cmy[0].min(cmy[1]).min(cmy[2]);
    if k >= 1.0 {
        [0.0, 0.0, 0.0, 1.0]
    } else {
        [
            (cmy[0] - k) / (1.0 - k),
            (cmy[1] - k) / (1.0 - k),
            (cmy[2] - k) / (1.0 - k),
            k,
        ]
    }
}

pub fn cmyk_to_cmy(cmyk: [f64; 4]) -> [f64; 3] {
    let k = cmyk[3];
    [
        cmyk[0] * (1.0 - k) + k,
        cmyk[1] * (1.0 - k) + k,
        cmyk[2] * (1.0 - k) + k,
    ]
}

const BT601: [[f64; 3]; 3] = [
    [0.299, 0.587, 0.114],
    [-0.168736, -0.331264, 0.5],
    [0.5, -0.418688, -0.081312],
];
const BT601_INV_CR: f64 = 1.402;
const BT601_INV_CB_G: f64 = -0.344136;
const BT601_INV_CR_G: f64 = -0.714136;
const BT601_INV_CB: f64 = 1.772;

const BT709: [[f64; 3]; 3] = [
    [0.2126, 0.7152, 0.0722],
    [-0.114572, -0.385428, 0.5],
    [0.5, -0.454153, -0.045847],
];
const BT709_INV_CR: f64 = 1.5748;
const BT709_INV_CB_G: f64 = -0.187324;
const BT709_INV_CR_G: f64 = -0.468124;
const BT709_INV_CB: f64 = 1.8556;

fn ycbcr_forward(linear_rgb: [f64; 3], coeffs: &[[f64; 3]; 3]) -> [f64; 3] {
    let p = to_prime(linear_rgb);
    [
        coeffs[0][0] * p[0] + coeffs[0][1] * p[1] + coeffs[0][2] * p[2],
        coeffs[1][0] * p[0] + coeffs[1][1] * p[1] + coeffs[1][2] * p[2],
        coeffs[2][0] * p[0] + coeffs[2][1] * p[1] + coeffs[2][2] * p[2],
    ]
}

/// ITU-R BT.601 `RGB → Y'CbCr`, gamma-2.2 companded.
pub fn rgb_to_ycbcr601(linear_rgb: [f64; 3]) -> [f64; 3] {
    ycbcr_forward(linear_rgb, &BT601)
}

/// ITU-R BT.601 `Y'CbCr → RGB`.
pub fn ycbcr601_to_rgb(ycbcr: [f64; 3]) -> [f64; 3] {
    let [y, cb, cr] = ycbcr;
    let p = [
        y + BT601_INV_CR * cr,
        y + BT601_INV_CB_G * cb + BT601_INV_CR_G * cr,
        y + BT601_INV_CB * cb,
    ];
    from_prime(p)
}

/// ITU-R BT.709 `RGB → Y'CbCr709`, gamma-2.2 companded.
pub fn rgb_to_ycbcr709(linear_rgb: [f64; 3]) -> [f64; 3] {
    ycbcr_forward(linear_rgb, &BT709)
}

pub fn ycbcr709_to_rgb(ycbcr: [f64; 3]) -> [f64; 3] {
    let [y, cb, cr] = ycbcr;
    let p = [
        y + BT709_INV_CR * cr,
        y + BT709_INV_CB_G * cb + BT709_INV_CR_G * cr,
        y + BT709_INV_CB * cb,
    ];
    from_prime(p)
}

/// Hue sector shared by HSL/HSV/HCY forward conversion; returns hue in
/// `[0, 1)`.
fn hue_from_prime(p: [f64; 3], max: f64, min: f64) -> f64 {
    let d = max - min;
    if d == 0.0 {
        return 0.0;
    }
    let [r, g, b] = p;
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    h / 6.0
}

/// Shared HSL/HSV/HCY sector decomposition: given hue `h ∈ [0,1)` and chroma
/// `c`, returns the un-shifted `(r1, g1, b1)` triple on the chroma hexagon.
fn hue_chroma_to_rgb1(h: f64, c: f64) -> [f64; 3] {
    let h6 = (h.rem_euclid(1.0)) * 6.0;
    let x = c * (1.0 - (h6.rem_euclid(2.0) - 1.0).abs());
    match h6 as i32 {
        0 => [c, x, 0.0],
        1 => [x, c, 0.0],
        2 => [0.0, c, x],
        3 => [0.0, x, c],
        4 => [x, 0.0, c],
        _ => [c, 0.0, x],
    }
}

pub fn rgb_to_hsl(linear_rgb: [f64; 3]) -> [f64; 3] {
    let p = to_prime(linear_rgb);
    let max = p[0].max(p[1]).max(p[2]);
    let min = p[0].min(p[1]).min(p[2]);
    let l = (max + min) / 2.0;
    let d = max - min;
    let h = hue_from_prime(p, max, min);
    let s = if d == 0.0 {
        0.0
    } else if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    [h, s, l]
}

pub fn hsl_to_rgb(hsl: [f64; 3]) -> [f64; 3] {
    let [h, s, l] = hsl;
    if s == 0.0 {
        return from_prime([l, l, l]);
    }
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let [r1, g1, b1] = hue_chroma_to_rgb1(h, c);
    let m = l - c / 2.0;
    from_prime([r1 + m, g1 + m, b1 + m])
}

pub fn rgb_to_hsv(linear_rgb: [f64; 3]) -> [f64; 3] {
    let p = to_prime(linear_rgb);
    let max = p[0].max(p[1]).max(p[2]);
    let min = p[0].min(p[1]).min(p[2]);
    let d = max - min;
    let h = hue_from_prime(p, max, min);
    let s = if max == 0.0 { 0.0 } else { d / max };
    [h, s, max]
}

pub fn hsv_to_rgb(hsv: [f64; 3]) -> [f64; 3] {
    let [h, s, v] = hsv;
    let c = v * s;
    let [r1, g1, b1] = hue_chroma_to_rgb1(h, c);
    let m = v - c;
    from_prime([r1 + m, g1 + m, b1 + m])
}

const HCY_WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];

fn hcy_luma(p: [f64; 3]) -> f64 {
    HCY_WEIGHTS[0] * p[0] + HCY_WEIGHTS[1] * p[1] + HCY_WEIGHTS[2] * p[2]
}

pub fn rgb_to_hcy(linear_rgb: [f64; 3]) -> [f64; 3] {
    let p = to_prime(linear_rgb);
    let max = p[0].max(p[1]).max(p[2]);
    let min = p[0].min(p[1]).min(p[2]);
    let h = hue_from_prime(p, max, min);
    let c = max - min;
    let y = hcy_luma(p);
    [h, c, y]
}

/// Inverse HCY: the hexagon point is shifted so the weighted luma of the
/// result is exactly `y` (renormalization around the hexagon's own luma,
/// rather than the midpoint used by HSL/HSV).
pub fn hcy_to_rgb(hcy: [f64; 3]) -> [f64; 3] {
    let [h, c, y] = hcy;
    let [r1, g1, b1] = hue_chroma_to_rgb1(h, c);
    let m = y - hcy_luma([r1, g1, b1]);
    from_prime([
        (r1 + m).clamp(0.0, 1.0),
        (g1 + m).clamp(0.0, 1.0),
        (b1 + m).clamp(0.0, 1.0),
    ])
}

const LAB_EPSILON: f64 = 216.0 / 24389.0;
const LAB_KAPPA: f64 = 24389.0 / 27.0;
/// D50 illuminant (§4.2).
pub const D50_XYZ: [f64; 3] = [0.9642, 1.0000, 0.8249];

fn lab_f(t: f64) -> f64 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        (LAB_KAPPA * t + 16.0) / 116.0
    }
}

fn lab_f_inv(t: f64) -> f64 {
    let cubed = t * t * t;
    if cubed > LAB_EPSILON {
        cubed
    } else {
        (116.0 * t - 16.0) / LAB_KAPPA
    }
}

/// Linear RGB → XYZ (via the space's own matrix) → CIE Lab at D50.
pub fn rgb_to_lab(linear_rgb: [f64; 3], rgb_to_xyz: &Matrix3x3) -> [f64; 3] {
    let xyz = rgb_to_xyz.multiply_vec(linear_rgb);
    let [xn, yn, zn] = D50_XYZ;
    let fx = lab_f(xyz[0] / xn);
    let fy = lab_f(xyz[1] / yn);
    let fz = lab_f(xyz[2] / zn);
    [116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz)]
}

pub fn lab_to_rgb(lab: [f64; 3], xyz_to_rgb: &Matrix3x3) -> [f64; 3] {
    let [l, a, b] = lab;
    let fy = (l + 16.0) / 116.0;
    let fx = fy + a / 500.0;
    let fz = fy - b / 200.0;
    let [xn, yn, zn] = D50_XYZ;
    let y = if l > LAB_KAPPA * LAB_EPSILON {
        yn * fy * fy * fy
    } else {
        yn * l / LAB_KAPPA
    };
    let x = xn * lab_f_inv(fx);
    let z = zn * lab_f_inv(fz);
    xyz_to_rgb.multiply_vec([x, y, z])
}

pub fn lab_to_lch(lab: [f64; 3]) -> [f64; 3] {
    let [l, a, b] = lab;
    let c = (a * a + b * b).sqrt();
    let mut h = b.atan2(a).to_degrees();
    if h < 0.0 {
        h += 360.0;
    }
    [l, c, h]
}

pub fn lch_to_lab(lch: [f64; 3]) -> [f64; 3] {
    let [l, c, h] = lch;
    let radians = h.to_radians();
    [l, c * radians.cos(), c * radians.sin()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;

    #[test]
    fn white_maps_to_hsl_and_hsv_zero_saturation() {
        let hsl = rgb_to_hsl([1.0, 1.0, 1.0]);
        assert_eq!(hsl, [0.0, 0.0, 1.0]);
        let hsv = rgb_to_hsv([1.0, 1.0, 1.0]);
        assert_eq!(hsv, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn red_maps_to_expected_hsl_and_hsv() {
        let hsl = rgb_to_hsl([1.0, 0.0, 0.0]);
        assert!((hsl[0] - 0.0).abs() < 1e-9);
        assert!((hsl[1] - 1.0).abs() < 1e-9);
        assert!((hsl[2] - 0.5).abs() < 1e-9);

        let hsv = rgb_to_hsv([1.0, 0.0, 0.0]);
        assert!((hsv[0] - 0.0).abs() < 1e-9);
        assert!((hsv[1] - 1.0).abs() < 1e-9);
        assert!((hsv[2] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn hsl_roundtrips() {
        let rgb = [0.2, 0.7, 0.4];
        let hsl = rgb_to_hsl(rgb);
        let back = hsl_to_rgb(hsl);
        for i in 0..3 {
            assert!((back[i] - rgb[i]).abs() < 1e-6);
        }
    }

    #[test]
    fn hsv_roundtrips() {
        let rgb = [0.9, 0.1, 0.3];
        let hsv = rgb_to_hsv(rgb);
        let back = hsv_to_rgb(hsv);
        for i in 0..3 {
            assert!((back[i] - rgb[i]).abs() < 1e-6);
        }
    }

    #[test]
    fn hcy_roundtrips() {
        let rgb = [0.6, 0.25, 0.8];
        let hcy = rgb_to_hcy(rgb);
        let back = hcy_to_rgb(hcy);
        for i in 0..3 {
            assert!((back[i] - rgb[i]).abs() < 1e-6);
        }
    }

    #[test]
    fn ycbcr709_white_and_red_match_scenario_s6() {
        let white = rgb_to_ycbcr709([1.0, 1.0, 1.0]);
        assert!((white[0] - 1.0).abs() < 1e-9);
        assert!(white[1].abs() < 1e-9);
        assert!(white[2].abs() < 1e-9);

        let red = rgb_to_ycbcr709([1.0, 0.0, 0.0]);
        assert!((red[0] - 0.2126).abs() < 1e-3);
        assert!((red[1] - (-0.1146)).abs() < 1e-3);
        assert!((red[2] - 0.5).abs() < 1e-3);
    }

    #[test]
    fn ycbcr709_roundtrips() {
        let rgb = [0.3, 0.6, 0.2];
        let ycbcr = rgb_to_ycbcr709(rgb);
        let back = ycbcr709_to_rgb(ycbcr);
        for i in 0..3 {
            assert!((back[i] - rgb[i]).abs() < 1e-6);
        }
    }

    #[test]
    fn cmyk_roundtrips_with_full_ucr() {
        let cmy = rgb_to_cmy([0.2, 0.6, 0.9]);
        let cmyk = cmy_to_cmyk(cmy);
        let back_cmy = cmyk_to_cmy(cmyk);
        for i in 0..3 {
            assert!((back_cmy[i] - cmy[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn lab_roundtrips_via_space_matrix() {
        let registry = Registry::global();
        let space_handle = registry.lookup_space("sRGB").unwrap();
        let space = registry.get_space(space_handle);
        let rgb = [0.6, 0.3, 0.1];
        let lab = rgb_to_lab(rgb, &space.rgb_to_xyz);
        let back = lab_to_rgb(lab, &space.xyz_to_rgb);
        for i in 0..3 {
            assert!((back[i] - rgb[i]).abs() < 1e-5);
        }
    }

    #[test]
    fn lch_roundtrips() {
        let lab = [50.0, 20.0, -30.0];
        let lch = lab_to_lch(lab);
        let back = lch_to_lab(lch);
        for i in 0..3 {
            assert!((back[i] - lab[i]).abs() < 1e-9);
        }
    }
}
