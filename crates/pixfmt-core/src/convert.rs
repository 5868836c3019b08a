//! Unpack/pack pixels to and from the canonical pivot (§4.4): "RGBA double
//! in the destination space". Model-specific semantics live in
//! [`crate::primitives::model`]; this module wires a format's component list
//! and storage types to those primitives.

use crate::error::{Error, Result};
use crate::primitives::{alpha, model, numeric};
use crate::registry::{Model, PixelFormat, Registry, Space};

/// Decode one storage unit (of `bits`, float-or-not) to an `f64`.
fn read_raw(bits: u32, is_float: bool, bytes: &[u8]) -> f64 {
    match (bits, is_float) {
        (8, false) => bytes[0] as f64,
        (16, false) => u16::from_ne_bytes([bytes[0], bytes[1]]) as f64,
        (32, false) => u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64,
        (16, true) => numeric::half_bits_to_f64(u16::from_ne_bytes([bytes[0], bytes[1]])),
        (32, true) => f32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64,
        (64, true) => f64::from_ne_bytes(bytes[0..8].try_into().unwrap()),
        _ => panic!("unsupported numeric storage width: {bits} bits, float={is_float}"),
    }
}

fn write_raw(bits: u32, is_float: bool, value: f64, out: &mut [u8]) {
    match (bits, is_float) {
        (8, false) => out[0] = value.round().clamp(0.0, 255.0) as u8,
        (16, false) => out[..2].copy_from_slice(&(value.round().clamp(0.0, 65535.0) as u16).to_ne_bytes()),
        (32, false) => out[..4].copy_from_slice(&(value.round().clamp(0.0, 4294967295.0) as u32).to_ne_bytes()),
        (16, true) => out[..2].copy_from_slice(&numeric::f64_to_half_bits(value).to_ne_bytes()),
        (32, true) => out[..4].copy_from_slice(&(value as f32).to_ne_bytes()),
        (64, true) => out[..8].copy_from_slice(&value.to_ne_bytes()),
        _ => panic!("unsupported numeric storage width: {bits} bits, float={is_float}"),
    }
}

/// Decode one pixel's raw bytes into nominal-range doubles, one per
/// `format.components` slot, in model order.
pub fn unpack_pixel(registry: &Registry, format: &PixelFormat, raw: &[u8]) -> Vec<f64> {
    let mut offset = 0usize;
    let mut values = Vec::with_capacity(format.components.len());
    for slot in &format.components {
        let ty = registry.get_numeric_type(slot.numeric_type);
        let width = (ty.bits as usize).div_ceil(8);
        let stored = read_raw(ty.bits, ty.is_float, &raw[offset..offset + width]);
        values.push(numeric::to_double(&ty, stored));
        offset += width;
    }
    values
}

pub fn pack_pixel(registry: &Registry, format: &PixelFormat, values: &[f64], out: &mut [u8]) {
    let mut offset = 0usize;
    for (slot, &value) in format.components.iter().zip(values) {
        let ty = registry.get_numeric_type(slot.numeric_type);
        let width = (ty.bits as usize).div_ceil(8);
        let stored = numeric::from_double(&ty, value);
        write_raw(ty.bits, ty.is_float, stored, &mut out[offset..offset + width]);
        offset += width;
    }
}

/// `from_fmt → pivot`: model-specific values (already scaled to nominal
/// range) to linear-light RGBA in the format's own space.
pub fn to_pivot(model: &Model, space: &Space, registry: &Registry, values: &[f64]) -> Result<[f64; 4]> {
    let trc = |h| registry.get_trc(h);
    match model.name {
        "RGBA" => Ok([values[0], values[1], values[2], values[3]]),
        "RGB" => Ok([values[0], values[1], values[2], 1.0]),
        "RaGaBaA" => {
            let a = values[3];
            Ok([
                alpha::straighten(values[0], a),
                alpha::straighten(values[1], a),
                alpha::straighten(values[2], a),
                a,
            ])
        }
        "R'G'B'A" => {
            let trcs = [space.trc[0], space.trc[1], space.trc[2]];
            let trc_vals = [trc(trcs[0]), trc(trcs[1]), trc(trcs[2])];
            let linear = crate::primitives::trc::linearize_rgb(
                [values[0], values[1], values[2]],
                [&trc_vals[0], &trc_vals[1], &trc_vals[2]],
            );
            Ok([linear[0], linear[1], linear[2], values[3]])
        }
        "CMY" => {
            let rgb = model::cmy_to_rgb([values[0], values[1], values[2]]);
            Ok([rgb[0], rgb[1], rgb[2], 1.0])
        }
        "CMYK" => {
            let cmy = model::cmyk_to_cmy([values[0], values[1], values[2], values[3]]);
            let rgb = model::cmy_to_rgb(cmy);
            Ok([rgb[0], rgb[1], rgb[2], 1.0])
        }
        "Y" => {
            let rgb = model::y_to_rgb(values[0]);
            Ok([rgb[0], rgb[1], rgb[2], 1.0])
        }
        "YA" => {
            let rgb = model::y_to_rgb(values[0]);
            Ok([rgb[0], rgb[1], rgb[2], values[1]])
        }
        "Y'A" => {
            let trc_val = trc(space.trc[0]);
            let linear = trc_val.to_linear(values[0]);
            let rgb = model::y_to_rgb(linear);
            Ok([rgb[0], rgb[1], rgb[2], values[1]])
        }
        "R~G~B~A" => {
            let universal = crate::registry::Trc::Srgb;
            let linear = crate::primitives::trc::linearize_universal(
                [values[0], values[1], values[2]],
                &universal,
            );
            Ok([linear[0], linear[1], linear[2], values[3]])
        }
        "Y'CbCr" => {
            let rgb = model::ycbcr601_to_rgb([values[0], values[1], values[2]]);
            Ok([rgb[0], rgb[1], rgb[2], 1.0])
        }
        "Y'CbCr709" => {
            let rgb = model::ycbcr709_to_rgb([values[0], values[1], values[2]]);
            Ok([rgb[0], rgb[1], rgb[2], 1.0])
        }
        "HSLA" => {
            let rgb = model::hsl_to_rgb([values[0], values[1], values[2]]);
            Ok([rgb[0], rgb[1], rgb[2], values[3]])
        }
        "HSVA" => {
            let rgb = model::hsv_to_rgb([values[0], values[1], values[2]]);
            Ok([rgb[0], rgb[1], rgb[2], values[3]])
        }
        "HCYA" => {
            let rgb = model::hcy_to_rgb([values[0], values[1], values[2]]);
            Ok([rgb[0], rgb[1], rgb[2], values[3]])
        }
        "HCY" => {
            let rgb = model::hcy_to_rgb([values[0], values[1], values[2]]);
            Ok([rgb[0], rgb[1], rgb[2], 1.0])
        }
        "CIE Lab" => {
            let rgb = model::lab_to_rgb([values[0], values[1], values[2]], &space.xyz_to_rgb);
            Ok([rgb[0], rgb[1], rgb[2], 1.0])
        }
        "CIE LCh(ab)" => {
            let lab = model::lch_to_lab([values[0], values[1], values[2]]);
            let rgb = model::lab_to_rgb(lab, &space.xyz_to_rgb);
            Ok([rgb[0], rgb[1], rgb[2], 1.0])
        }
        other => Err(Error::NoPath {
            from: other.to_string(),
            to: "pivot".to_string(),
        }),
    }
}

/// `pivot → to_fmt`: linear-light RGBA (already in the destination's space)
/// to model-specific nominal values.
pub fn from_pivot(model: &Model, space: &Space, registry: &Registry, pivot: [f64; 4]) -> Result<Vec<f64>> {
    let [r, g, b, a] = pivot;
    let trc = |h| registry.get_trc(h);
    match model.name {
        "RGBA" => Ok(vec![r, g, b, a]),
        "RGB" => Ok(vec![r, g, b]),
        "RaGaBaA" => Ok(vec![
            alpha::premultiply(r, a),
            alpha::premultiply(g, a),
            alpha::premultiply(b, a),
            a,
        ]),
        "R'G'B'A" => {
            let trcs = [space.trc[0], space.trc[1], space.trc[2]];
            let trc_vals = [trc(trcs[0]), trc(trcs[1]), trc(trcs[2])];
            let encoded =
                crate::primitives::trc::encode_rgb([r, g, b], [&trc_vals[0], &trc_vals[1], &trc_vals[2]]);
            Ok(vec![encoded[0], encoded[1], encoded[2], a])
        }
        "CMY" => Ok(model::rgb_to_cmy([r, g, b]).to_vec()),
        "CMYK" => {
            let cmy = model::rgb_to_cmy([r, g, b]);
            Ok(model::cmy_to_cmyk(cmy).to_vec())
        }
        "Y" => Ok(vec![model::rgb_to_y([r, g, b], &space.rgb_to_xyz)]),
        "YA" => Ok(vec![model::rgb_to_y([r, g, b], &space.rgb_to_xyz), a]),
        "Y'A" => {
            let y = model::rgb_to_y([r, g, b], &space.rgb_to_xyz);
            let encoded = trc(space.trc[0]).from_linear(y);
            Ok(vec![encoded, a])
        }
        "R~G~B~A" => {
            let universal = crate::registry::Trc::Srgb;
            let encoded = crate::primitives::trc::encode_universal([r, g, b], &universal);
            Ok(vec![encoded[0], encoded[1], encoded[2], a])
        }
        "Y'CbCr" => Ok(model::rgb_to_ycbcr601([r, g, b]).to_vec()),
        "Y'CbCr709" => Ok(model::rgb_to_ycbcr709([r, g, b]).to_vec()),
        "HSLA" => {
            let hsl = model::rgb_to_hsl([r, g, b]);
            Ok(vec![hsl[0], hsl[1], hsl[2], a])
        }
        "HSVA" => {
            let hsv = model::rgb_to_hsv([r, g, b]);
            Ok(vec![hsv[0], hsv[1], hsv[2], a])
        }
        "HCYA" => {
            let hcy = model::rgb_to_hcy([r, g, b]);
            Ok(vec![hcy[0], hcy[1], hcy[2], a])
        }
        "HCY" => Ok(model::rgb_to_hcy([r, g, b]).to_vec()),
        "CIE Lab" => Ok(model::rgb_to_lab([r, g, b], &space.rgb_to_xyz).to_vec()),
        "CIE LCh(ab)" => {
            let lab = model::rgb_to_lab([r, g, b], &space.rgb_to_xyz);
            Ok(model::lab_to_lch(lab).to_vec())
        }
        other => Err(Error::NoPath {
            from: "pivot".to_string(),
            to: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format;
    use crate::registry::Registry;

    fn pivot_of(registry: &Registry, encoding: &str, values: &[f64]) -> [f64; 4] {
        let handle = format::format(registry, encoding).unwrap();
        let fmt = registry.get_format(handle);
        let model = registry.get_model(fmt.model);
        let space = registry.get_space(fmt.space);
        to_pivot(&model, &space, registry, values).unwrap()
    }

    #[test]
    fn s3_white_and_red_hsl_hsv_via_pivot_roundtrip() {
        let registry = Registry::global();
        let white = pivot_of(registry, "RGBA float", &[1.0, 1.0, 1.0, 1.0]);
        assert_eq!(white, [1.0, 1.0, 1.0, 1.0]);

        let handle = format::format(registry, "HSLA float").unwrap();
        let fmt = registry.get_format(handle);
        let model = registry.get_model(fmt.model);
        let space = registry.get_space(fmt.space);
        let hsla = from_pivot(&model, &space, registry, white).unwrap();
        assert_eq!(hsla, vec![0.0, 0.0, 1.0, 1.0]);
    }

    /// Property 2 (§8): round-trip clipping is idempotent. Clamping the
    /// pivot to `[0, 1]` per channel after a model round-trip, then doing
    /// the same round-trip again, must not move the clamped pivot any
    /// further — the second pass settles exactly where the first left off.
    #[test]
    fn model_round_trip_clipping_is_idempotent_for_every_registered_model() {
        fn clamp01(pivot: [f64; 4]) -> [f64; 4] {
            [
                pivot[0].clamp(0.0, 1.0),
                pivot[1].clamp(0.0, 1.0),
                pivot[2].clamp(0.0, 1.0),
                pivot[3].clamp(0.0, 1.0),
            ]
        }

        let registry = Registry::global();
        let space_handle = registry.space_by_name("sRGB").unwrap();
        let space = registry.get_space(space_handle);

        let sample = [0.3, 0.6, 0.9, 0.6];
        let mut checked = 0usize;
        registry.each_model(|_handle, model| {
            let values: Vec<f64> = sample.iter().copied().take(model.components.len()).collect();

            let pivot1 = match to_pivot(model, &space, registry, &values) {
                Ok(p) => p,
                Err(_) => return,
            };
            let clamped1 = clamp01(pivot1);

            let back1 = from_pivot(model, &space, registry, clamped1).unwrap();
            let pivot2 = to_pivot(model, &space, registry, &back1).unwrap();
            let clamped2 = clamp01(pivot2);

            for i in 0..4 {
                assert!(
                    (clamped2[i] - clamped1[i]).abs() < 1e-3,
                    "model {} channel {i}: first pass {} vs second pass {}",
                    model.name,
                    clamped1[i],
                    clamped2[i]
                );
            }
            checked += 1;
        });
        assert!(checked > 0, "expected at least one routable model to be exercised");
    }

    #[test]
    fn premultiplied_roundtrip_matches_scenario_s5() {
        let registry = Registry::global();
        let handle = format::format(registry, "RaGaBaA float").unwrap();
        let fmt = registry.get_format(handle);
        let model = registry.get_model(fmt.model);
        let space = registry.get_space(fmt.space);

        let premul = [0.3, 0.6, 0.9, 0.6];
        let pivot = to_pivot(&model, &space, registry, &premul).unwrap();
        let back = from_pivot(&model, &space, registry, pivot).unwrap();
        for i in 0..4 {
            assert!((back[i] - premul[i]).abs() < 1e-6);
        }
    }

    #[test]
    fn gray_alpha_preserves_straight_alpha() {
        let registry = Registry::global();
        let handle = format::format(registry, "YA float").unwrap();
        let fmt = registry.get_format(handle);
        let model = registry.get_model(fmt.model);
        let space = registry.get_space(fmt.space);

        let ya = [0.5, 0.75];
        let pivot = to_pivot(&model, &space, registry, &ya).unwrap();
        assert_eq!(pivot[3], 0.75);
        let back = from_pivot(&model, &space, registry, pivot).unwrap();
        assert!((back[0] - ya[0]).abs() < 1e-9);
        assert_eq!(back[1], 0.75);
    }

    #[test]
    fn nonlinear_gray_alpha_round_trips_through_the_space_trc() {
        let registry = Registry::global();
        let handle = format::format(registry, "Y'A float").unwrap();
        let fmt = registry.get_format(handle);
        let model = registry.get_model(fmt.model);
        let space = registry.get_space(fmt.space);

        let yprime_a = [0.6, 1.0];
        let pivot = to_pivot(&model, &space, registry, &yprime_a).unwrap();
        let back = from_pivot(&model, &space, registry, pivot).unwrap();
        assert!((back[0] - yprime_a[0]).abs() < 1e-6);
    }

    #[test]
    fn perceptual_rgba_uses_a_universal_curve_not_the_space_trc() {
        let registry = Registry::global();
        let handle = format::format(registry, "R~G~B~A float").unwrap();
        let fmt = registry.get_format(handle);
        let model = registry.get_model(fmt.model);
        let space = registry.get_space(fmt.space);

        let encoded = [0.4, 0.4, 0.4, 1.0];
        let pivot = to_pivot(&model, &space, registry, &encoded).unwrap();
        let back = from_pivot(&model, &space, registry, pivot).unwrap();
        for i in 0..3 {
            assert!((back[i] - encoded[i]).abs() < 1e-9);
        }
    }
}
