//! Space↔space primitive (§4.2): a single `3×3` matrix product in linear
//! light, `XYZtoRGB_dst · RGBtoXYZ_src`, both already D50-adapted.

use crate::math::Matrix3x3;

/// Compose the source-to-destination matrix. Cached by the planner on the
/// fish's chain entry rather than recomputed per pixel.
pub fn compose(rgb_to_xyz_src: &Matrix3x3, xyz_to_rgb_dst: &Matrix3x3) -> Matrix3x3 {
    xyz_to_rgb_dst.multiply(rgb_to_xyz_src)
}

pub fn apply(composite: &Matrix3x3, linear_rgb: [f64; 3]) -> [f64; 3] {
    composite.multiply_vec(linear_rgb)
}
