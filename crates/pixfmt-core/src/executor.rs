//! The runtime executor (§4.5) and u8 LUT acceleration layer (§4.6).

use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::convert;
use crate::palette::Palette;
use crate::planner::{Chain, Fish};
use crate::primitives::space;
use crate::registry::{FormatHandle, PixelFormat, Registry};
use crate::simd;

/// Pixel-count threshold past which a byte-compatible fish becomes eligible
/// for LUT promotion (§4.6).
const LUT_PROMOTION_THRESHOLD: u64 = 256 * 128;

/// A lazily built `256³`-entry `u32 → u32` lookup table, packed as
/// `0x00BBGGRR` (alpha preserved from the input byte, never looked up).
pub struct Lut {
    table: Vec<u32>,
}

impl Lut {
    fn build(registry: &Registry, fish: &Fish) -> Self {
        let from_fmt = registry.get_format(fish.from);
        let to_fmt = registry.get_format(fish.to);
        let from_model = registry.get_model(from_fmt.model);
        let from_space = registry.get_space(from_fmt.space);
        let to_model = registry.get_model(to_fmt.model);
        let to_space = registry.get_space(to_fmt.space);
        let composite = space::compose(&from_space.rgb_to_xyz, &to_space.xyz_to_rgb);

        let mut table = vec![0u32; 256 * 256 * 256];
        // Built one 256-entry row (fixed g, b; r sweeping) at a time so the
        // final clamp-and-pack step can run through the SIMD-dispatched
        // batch kernel instead of one scalar pixel at a time.
        let mut row_rgb = [[0.0f64; 3]; 256];
        let mut row_bytes = [0u8; 256 * 3];
        for gb in 0..(256 * 256) {
            let g = ((gb & 0xFF) as f64) / 255.0;
            let b = (((gb >> 8) & 0xFF) as f64) / 255.0;
            let base = gb * 256;

            for (r_byte, slot) in row_rgb.iter_mut().enumerate() {
                let r = r_byte as f64 / 255.0;
                let nominal = vec![r, g, b, 1.0];
                let pivot_src = convert::to_pivot(&from_model, &from_space, registry, &nominal)
                    .unwrap_or([r, g, b, 1.0]);
                let pivot_dst = if from_fmt.space != to_fmt.space {
                    let rgb = space::apply(&composite, [pivot_src[0], pivot_src[1], pivot_src[2]]);
                    [rgb[0], rgb[1], rgb[2], pivot_src[3]]
                } else {
                    pivot_src
                };
                let out = convert::from_pivot(&to_model, &to_space, registry, pivot_dst)
                    .unwrap_or(vec![r, g, b]);
                *slot = [out[0], out[1], out[2]];
            }

            simd::clamp_rgb_batch(&mut row_rgb);
            simd::f64_to_rgb8_batch(&row_rgb, &mut row_bytes);

            for (i, slot) in table[base..base + 256].iter_mut().enumerate() {
                let out_r = row_bytes[i * 3] as u32;
                let out_g = row_bytes[i * 3 + 1] as u32;
                let out_b = row_bytes[i * 3 + 2] as u32;
                *slot = out_r | (out_g << 8) | (out_b << 16);
            }
        }

        Lut { table }
    }

    fn lookup(&self, rgb_packed: u32) -> u32 {
        self.table[rgb_packed as usize]
    }
}

/// A fish is LUT-eligible when both endpoints are 4-channel, non-premultiplied
/// `u8` RGBA formats: the alpha byte passes through untouched and the other
/// three channels' mapping is independent of it.
fn lut_eligible(registry: &Registry, fish: &Fish) -> bool {
    let check = |handle| {
        let format = registry.get_format(handle);
        let model = registry.get_model(format.model);
        format.n_components() == 4
            && format.has_alpha(registry)
            && !model.premultiplied
            && format
                .components
                .iter()
                .all(|c| registry.get_numeric_type(c.numeric_type).bits == 8 && !registry.get_numeric_type(c.numeric_type).is_float)
    };
    check(fish.from) && check(fish.to)
}

fn pack_rgb(bytes: &[u8]) -> u32 {
    bytes[0] as u32 | ((bytes[1] as u32) << 8) | ((bytes[2] as u32) << 16)
}

/// `process(fish, src, dst, n)` (§4.5): transform `n` pixels. Infallible once
/// a fish exists; always returns `n`.
pub fn process(registry: &Registry, fish: &Fish, src: &[u8], dst: &mut [u8], n: usize) -> usize {
    let from_fmt = registry.get_format(fish.from);
    let to_fmt = registry.get_format(fish.to);

    if from_fmt.palette || to_fmt.palette {
        return process_palette(registry, fish, &from_fmt, &to_fmt, src, dst, n);
    }

    let from_bpp = from_fmt.bytes_per_pixel.expect("non-palette format always has a fixed pixel size");
    let to_bpp = to_fmt.bytes_per_pixel.expect("non-palette format always has a fixed pixel size");

    if fish.chain == Chain::Identity {
        dst[..n * to_bpp].copy_from_slice(&src[..n * from_bpp]);
        fish.pixels_processed.fetch_add(n as u64, Ordering::Relaxed);
        return n;
    }

    if let Some(lut) = lut_snapshot(fish) {
        for i in 0..n {
            let src_px = &src[i * from_bpp..(i + 1) * from_bpp];
            let alpha_byte = src_px[3];
            let packed = lut.lookup(pack_rgb(src_px));
            let dst_px = &mut dst[i * to_bpp..(i + 1) * to_bpp];
            dst_px[0] = (packed & 0xFF) as u8;
            dst_px[1] = ((packed >> 8) & 0xFF) as u8;
            dst_px[2] = ((packed >> 16) & 0xFF) as u8;
            dst_px[3] = alpha_byte;
        }
        fish.pixels_processed.fetch_add(n as u64, Ordering::Relaxed);
        return n;
    }

    let from_model = registry.get_model(from_fmt.model);
    let from_space = registry.get_space(from_fmt.space);
    let to_model = registry.get_model(to_fmt.model);
    let to_space = registry.get_space(to_fmt.space);
    let needs_space_convert = from_fmt.space != to_fmt.space;
    let composite = space::compose(&from_space.rgb_to_xyz, &to_space.xyz_to_rgb);

    for i in 0..n {
        let src_px = &src[i * from_bpp..(i + 1) * from_bpp];
        let values = convert::unpack_pixel(registry, &from_fmt, src_px);
        let pivot_src = convert::to_pivot(&from_model, &from_space, registry, &values)
            .expect("fish construction already verified this model routes to the pivot");
        let pivot_dst = if needs_space_convert {
            let rgb = space::apply(&composite, [pivot_src[0], pivot_src[1], pivot_src[2]]);
            [rgb[0], rgb[1], rgb[2], pivot_src[3]]
        } else {
            pivot_src
        };
        let out_values = convert::from_pivot(&to_model, &to_space, registry, pivot_dst)
            .expect("fish construction already verified this model routes from the pivot");
        let dst_px = &mut dst[i * to_bpp..(i + 1) * to_bpp];
        convert::pack_pixel(registry, &to_fmt, &out_values, dst_px);
    }

    let processed = fish.pixels_processed.fetch_add(n as u64, Ordering::Relaxed) + n as u64;
    maybe_promote_lut(registry, fish, processed);

    n
}

/// `process` for fish with a palette-indexed endpoint on either side (§4.7).
/// Bypasses `to_pivot`/`from_pivot` on the palette side entirely: decoding
/// reads the attached table directly, encoding runs `Palette::nearest`.
fn process_palette(
    registry: &Registry,
    fish: &Fish,
    from_fmt: &PixelFormat,
    to_fmt: &PixelFormat,
    src: &[u8],
    dst: &mut [u8],
    n: usize,
) -> usize {
    let from_bpp = from_fmt
        .bytes_per_pixel
        .expect("palette formats carry a fixed index (+ alpha) size");
    let to_bpp = to_fmt
        .bytes_per_pixel
        .expect("palette formats carry a fixed index (+ alpha) size");

    if fish.chain == Chain::Identity {
        dst[..n * to_bpp].copy_from_slice(&src[..n * from_bpp]);
        fish.pixels_processed.fetch_add(n as u64, Ordering::Relaxed);
        return n;
    }

    let from_palette = from_fmt.palette.then(|| palette_or_default(registry, fish.from));
    let to_palette = to_fmt.palette.then(|| palette_or_default(registry, fish.to));
    let from_model = (!from_fmt.palette).then(|| registry.get_model(from_fmt.model));
    let from_space = (!from_fmt.palette).then(|| registry.get_space(from_fmt.space));
    let to_model = (!to_fmt.palette).then(|| registry.get_model(to_fmt.model));
    let to_space = (!to_fmt.palette).then(|| registry.get_space(to_fmt.space));

    for i in 0..n {
        let src_px = &src[i * from_bpp..(i + 1) * from_bpp];
        let pivot = if let Some(palette) = &from_palette {
            let index = (src_px[0] as usize).min(palette.len().saturating_sub(1));
            let mut entry = palette.entry_linear(index);
            if from_fmt.has_alpha(registry) && src_px.len() > 1 {
                entry[3] = src_px[1] as f64 / 255.0;
            }
            entry
        } else {
            let values = convert::unpack_pixel(registry, from_fmt, src_px);
            convert::to_pivot(from_model.as_ref().unwrap(), from_space.as_ref().unwrap(), registry, &values)
                .expect("fish construction already verified this model routes to the pivot")
        };

        let dst_px = &mut dst[i * to_bpp..(i + 1) * to_bpp];
        if let Some(palette) = &to_palette {
            let rgb = [
                (crate::math::gamma::srgb_gamma_encode(pivot[0].clamp(0.0, 1.0)) * 255.0).round() as u8,
                (crate::math::gamma::srgb_gamma_encode(pivot[1].clamp(0.0, 1.0)) * 255.0).round() as u8,
                (crate::math::gamma::srgb_gamma_encode(pivot[2].clamp(0.0, 1.0)) * 255.0).round() as u8,
            ];
            let index = palette.nearest(rgb).unwrap_or(0);
            dst_px[0] = index as u8;
            if to_fmt.has_alpha(registry) && dst_px.len() > 1 {
                dst_px[1] = (pivot[3].clamp(0.0, 1.0) * 255.0).round() as u8;
            }
        } else {
            let out_values = convert::from_pivot(
                to_model.as_ref().unwrap(),
                to_space.as_ref().unwrap(),
                registry,
                pivot,
            )
            .expect("fish construction already verified this model routes from the pivot");
            convert::pack_pixel(registry, to_fmt, &out_values, dst_px);
        }
    }

    fish.pixels_processed.fetch_add(n as u64, Ordering::Relaxed);
    n
}

/// Falls back to the default EGA table when a palette format's color table
/// hasn't been attached via `palette_set_palette` yet, rather than panicking.
fn palette_or_default(registry: &Registry, format: FormatHandle) -> Arc<Palette> {
    registry.get_palette(format).unwrap_or_else(|| {
        log::warn!("palette format has no color table attached; using the default EGA palette");
        Arc::new(Palette::default_ega())
    })
}

fn lut_snapshot(fish: &Fish) -> Option<Arc<Lut>> {
    fish.lut.read().expect("fish LUT lock poisoned").clone()
}

fn maybe_promote_lut(registry: &Registry, fish: &Fish, pixels_processed: u64) {
    if pixels_processed < LUT_PROMOTION_THRESHOLD {
        return;
    }
    if fish.lut.read().expect("fish LUT lock poisoned").is_some() {
        return;
    }
    if !lut_eligible(registry, fish) {
        return;
    }

    let built = Arc::new(Lut::build(registry, fish));
    let mut slot = fish.lut.write().expect("fish LUT lock poisoned");
    if slot.is_none() {
        log::debug!("promoting fish to u8 LUT after {pixels_processed} pixels");
        *slot = Some(built);
    }
    // Else: another thread published first; `built` is dropped here.
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format;
    use crate::planner::fish;

    #[test]
    fn identity_fish_is_a_memcpy() {
        let registry = Registry::global();
        let f = format::format(registry, "RGBA float").unwrap();
        let plan = fish(registry, f, f).unwrap();
        let src = [1.0f32, 0.5, 0.25, 1.0];
        let src_bytes: &[u8] = bytemuck::cast_slice(&src);
        let mut dst = [0u8; 16];
        let n = process(registry, &plan, src_bytes, &mut dst, 1);
        assert_eq!(n, 1);
        assert_eq!(dst, src_bytes);
    }

    #[test]
    fn scenario_s1_srgb_gray_roundtrip() {
        let registry = Registry::global();
        let u8_fmt = format::format(registry, "R'G'B'A u8").unwrap();
        let float_fmt = format::format(registry, "RGBA float").unwrap();

        let to_float = fish(registry, u8_fmt, float_fmt).unwrap();
        let back_to_u8 = fish(registry, float_fmt, u8_fmt).unwrap();

        let src = [127u8, 127, 127, 255];
        let mut mid = [0u8; 16];
        process(registry, &to_float, &src, &mut mid, 1);

        let mut out = [0u8; 4];
        process(registry, &back_to_u8, &mid, &mut out, 1);
        assert_eq!(out, src);
    }

    /// Property 7 (§8): once a fish promotes to its `u8` LUT, the LUT path
    /// must agree byte-exactly with the per-pixel chain it replaced. Driving
    /// all `256³` inputs through `process` would dwarf the rest of the test
    /// suite, so this samples every 17th level per channel (16 steps per
    /// axis, 4096 points) plus the eight cube corners.
    #[test]
    fn lut_promotion_matches_per_pixel_conversion() {
        let registry = Registry::global();
        let from_fmt = format::format(registry, "RGBA u8").unwrap();
        let to_fmt = format::format(registry, "R'G'B'A u8").unwrap();
        let plan = fish(registry, from_fmt, to_fmt).unwrap();

        assert!(lut_eligible(registry, &plan), "fish should be LUT-eligible");

        let warm_up = [10u8, 20, 30, 255];
        let mut scratch = [0u8; 4];
        for _ in 0..LUT_PROMOTION_THRESHOLD {
            process(registry, &plan, &warm_up, &mut scratch, 1);
        }
        let lut = lut_snapshot(&plan).expect("fish should have promoted to a LUT by now");

        let levels: Vec<u8> = (0..=255u16).step_by(17).map(|v| v as u8).collect();
        for &r in &levels {
            for &g in &levels {
                for &b in &levels {
                    let src = [r, g, b, 200];
                    let from_lut = lut.lookup(pack_rgb(&src));

                    let from_model = registry.get_model(registry.get_format(from_fmt).model);
                    let from_space = registry.get_space(registry.get_format(from_fmt).space);
                    let to_model = registry.get_model(registry.get_format(to_fmt).model);
                    let to_space = registry.get_space(registry.get_format(to_fmt).space);
                    let values = convert::unpack_pixel(registry, &registry.get_format(from_fmt), &src);
                    let pivot = convert::to_pivot(&from_model, &from_space, registry, &values).unwrap();
                    let out = convert::from_pivot(&to_model, &to_space, registry, pivot).unwrap();
                    let mut expect = [0u8; 4];
                    convert::pack_pixel(registry, &registry.get_format(to_fmt), &out, &mut expect);
                    let expected_packed = pack_rgb(&expect);

                    assert_eq!(
                        from_lut, expected_packed,
                        "mismatch at r={r} g={g} b={b}"
                    );
                }
            }
        }
    }

    #[test]
    fn scenario_s2_float_to_u8_clips_negatives() {
        let registry = Registry::global();
        let float_fmt = format::format(registry, "RGBA float").unwrap();
        let u8_fmt = format::format(registry, "R'G'B'A u8").unwrap();
        let plan = fish(registry, float_fmt, u8_fmt).unwrap();

        let src: [f32; 4] = [0.2158, -0.55, -0.14, 1.0];
        let src_bytes: &[u8] = bytemuck::cast_slice(&src);
        let mut out = [0u8; 4];
        process(registry, &plan, src_bytes, &mut out, 1);

        assert_eq!(out[1], 0);
        assert_eq!(out[2], 0);
        assert_eq!(out[3], 255);
    }
}
