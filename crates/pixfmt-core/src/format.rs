//! Pixel formats and the format-name grammar (§3, §6).
//!
//! A format name is a compact encoding, not a true grammar: one color-model
//! name, one numeric-type name, optionally suffixed with `-space`. The model
//! name may itself contain spaces (`"CIE Lab"`), so parsing works from the
//! right: the last token is `type[-space]`, everything before it is the
//! model name.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::math::Matrix3x3;
use crate::palette::Palette;
use crate::registry::{
    FormatComponent, FormatHandle, Model, ModelFamily, PixelFormat, Registry, Sampling, Space,
    SpaceClass, SpaceHandle, Trc, TrcHandle,
};

/// Parse `"RGBA float"`, `"R'G'B'A u8"`, `"R'G'B' u8-ACEScg"`, `"CIE Lab float"`
/// into `(model_name, type_name, space_name)`.
fn parse_encoding(encoding: &str) -> Result<(String, String, Option<String>)> {
    let tokens: Vec<&str> = encoding.split_whitespace().collect();
    if tokens.len() < 2 {
        return Err(Error::InvalidFormat(encoding.to_string()));
    }
    let (model_tokens, type_token) = tokens.split_at(tokens.len() - 1);
    let model_name = model_tokens.join(" ");
    let (type_name, space_name) = match type_token[0].split_once('-') {
        Some((ty, space)) => (ty.to_string(), Some(space.to_string())),
        None => (type_token[0].to_string(), None),
    };
    if model_name.is_empty() || type_name.is_empty() {
        return Err(Error::InvalidFormat(encoding.to_string()));
    }
    Ok((model_name, type_name, space_name))
}

/// `format(encoding)` (§6): resolve a format string against the default
/// space (`sRGB` when no `-space` suffix is present).
pub fn format(registry: &Registry, encoding: &str) -> Result<FormatHandle> {
    let (model_name, type_name, space_name) = parse_encoding(encoding)?;
    let space_name = space_name.unwrap_or_else(|| "sRGB".to_string());
    build_format(registry, encoding, &model_name, &type_name, &space_name)
}

/// `format_with_space(encoding, space)` (§6): resolve a format string,
/// ignoring any `-space` suffix it carries in favor of the given space name.
pub fn format_with_space(registry: &Registry, encoding: &str, space: &str) -> Result<FormatHandle> {
    let (model_name, type_name, _) = parse_encoding(encoding)?;
    build_format(registry, encoding, &model_name, &type_name, space)
}

fn build_format(
    registry: &Registry,
    encoding: &str,
    model_name: &str,
    type_name: &str,
    space_name: &str,
) -> Result<FormatHandle> {
    let model_handle = registry
        .model_by_name(model_name)
        .map_err(|_| Error::InvalidFormat(encoding.to_string()))?;
    let numeric_type = registry
        .type_by_name(type_name)
        .map_err(|_| Error::InvalidFormat(encoding.to_string()))?;
    let space_handle = registry.space_by_name(space_name)?;

    let model = registry.get_model(model_handle);
    let sampling = registry.register_sampling(None, Sampling::NONE);

    let components: Vec<FormatComponent> = model
        .components
        .iter()
        .map(|&component| FormatComponent {
            component,
            numeric_type,
            sampling,
        })
        .collect();

    let numeric = registry.get_numeric_type(numeric_type);
    let bytes_per_component = (numeric.bits as usize).div_ceil(8);
    let bytes_per_pixel = Some(bytes_per_component * components.len());

    let pixel_format = PixelFormat {
        model: model_handle,
        space: space_handle,
        components,
        planar: false,
        bytes_per_pixel,
        palette: false,
    };

    Ok(registry.register_format(Some(encoding), pixel_format))
}

/// `format_n(type, n_components)` (§6): an opaque n-channel format with no
/// semantic model, used for bulk byte-level transport where model identity
/// doesn't matter (e.g. feeding into an external codec).
pub fn format_n(registry: &Registry, type_name: &str, n_components: usize) -> Result<FormatHandle> {
    if n_components == 0 {
        return Err(Error::InvalidArgument("n_components must be >= 1".to_string()));
    }
    let numeric_type = registry.type_by_name(type_name)?;
    let space_handle = registry.space_by_name("sRGB")?;
    let sampling = registry.register_sampling(None, Sampling::NONE);

    let component = registry.lookup_component("Y").ok_or_else(|| {
        Error::InvalidFormat("builtin \"Y\" component missing from registry".to_string())
    })?;
    let model = registry.register_model(
        None,
        crate::registry::Model {
            name: "opaque-n",
            components: vec![component; n_components],
            has_alpha: false,
            premultiplied: false,
            family: ModelFamily::Gray,
        },
    );

    let numeric = registry.get_numeric_type(numeric_type);
    let bytes_per_component = (numeric.bits as usize).div_ceil(8);

    let pixel_format = PixelFormat {
        model,
        space: space_handle,
        components: vec![
            FormatComponent {
                component,
                numeric_type,
                sampling,
            };
            n_components
        ],
        planar: false,
        bytes_per_pixel: Some(bytes_per_component * n_components),
        palette: false,
    };

    Ok(registry.register_format(None, pixel_format))
}

pub fn format_get_bytes_per_pixel(registry: &Registry, format: FormatHandle) -> Option<usize> {
    registry.get_format(format).bytes_per_pixel
}

pub fn format_get_n_components(registry: &Registry, format: FormatHandle) -> usize {
    registry.get_format(format).n_components()
}

pub fn format_has_alpha(registry: &Registry, format: FormatHandle) -> bool {
    registry.get_format(format).has_alpha(registry)
}

/// `trc_gamma(γ)` (§6): a bare power-law transfer curve.
pub fn trc_gamma(registry: &Registry, gamma: f64) -> TrcHandle {
    registry.register_trc(None, Trc::Gamma(gamma))
}

/// `trc(name)` (§6): look up a TRC already known to the registry, builtin or
/// previously registered via [`trc_gamma`] or a direct `register_trc` call.
pub fn trc(registry: &Registry, name: &str) -> Result<TrcHandle> {
    registry
        .lookup_trc(name)
        .ok_or_else(|| Error::UnknownName(name.to_string()))
}

/// `space_from_chromaticities(...)` (§4.3, §6): derive and register an RGB
/// space from CIE xy chromaticities, following the same construction
/// [`crate::registry::builtin`] uses for `sRGB`/`linear-sRGB`.
pub fn space_from_chromaticities(
    registry: &Registry,
    name: Option<&'static str>,
    white: (f64, f64),
    red: (f64, f64),
    green: (f64, f64),
    blue: (f64, f64),
    trc: [TrcHandle; 3],
    equalize: bool,
) -> SpaceHandle {
    let (rgb_to_xyz, xyz_to_rgb) =
        crate::registry::spacebuild::build_rgb_to_xyz(white, red, green, blue, equalize);
    registry.register_space(
        name,
        Space {
            name,
            white_xy: white,
            primaries_xy: [red, green, blue],
            trc,
            class: SpaceClass::Rgb,
            rgb_to_xyz,
            xyz_to_rgb,
        },
    )
}

/// `space_from_rgbxyz_matrix(...)` (§4.3, §6): register an RGB space from an
/// already-derived RGB→XYZ matrix, skipping the chromaticity step (e.g. when
/// the matrix came from an ICC profile rather than primaries).
pub fn space_from_rgbxyz_matrix(
    registry: &Registry,
    name: Option<&'static str>,
    white: (f64, f64),
    primaries: [(f64, f64); 3],
    rgb_to_xyz: Matrix3x3,
    trc: [TrcHandle; 3],
) -> Result<SpaceHandle> {
    let xyz_to_rgb = rgb_to_xyz
        .inverse()
        .ok_or_else(|| Error::InvalidArgument("rgb_to_xyz matrix is not invertible".to_string()))?;
    Ok(registry.register_space(
        name,
        Space {
            name,
            white_xy: white,
            primaries_xy: primaries,
            trc,
            class: SpaceClass::Rgb,
            rgb_to_xyz,
            xyz_to_rgb,
        },
    ))
}

static PALETTE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// `new_palette(name, out_u8, out_u8a)` (§4.7, §6): register a fresh
/// palette-indexed model and its two format variants (without and with a
/// straight-alpha byte alongside the index). Each call mints a distinct
/// model — the `name` only labels it for diagnostics, so two palettes
/// created with the same name are still distinct formats. The returned
/// formats carry no color table until [`palette_set_palette`] attaches one.
pub fn new_palette(registry: &Registry, name: &str) -> (FormatHandle, FormatHandle) {
    let id = PALETTE_COUNTER.fetch_add(1, Ordering::Relaxed);
    let model_name: &'static str = Box::leak(format!("palette:{name}:{id}").into_boxed_str());

    let index = registry
        .lookup_component("index")
        .expect("builtin \"index\" component missing from registry");
    let alpha = registry
        .lookup_component("A")
        .expect("builtin \"A\" component missing from registry");
    let numeric_type = registry
        .type_by_name("u8")
        .expect("builtin \"u8\" numeric type missing from registry");
    let space = registry
        .space_by_name("sRGB")
        .expect("builtin \"sRGB\" space missing from registry");
    let sampling = registry.register_sampling(None, Sampling::NONE);

    let model_handle = registry.register_model(
        None,
        Model {
            name: model_name,
            components: vec![index],
            has_alpha: false,
            premultiplied: false,
            family: ModelFamily::Palette,
        },
    );
    let format_no_alpha = registry.register_format(
        None,
        PixelFormat {
            model: model_handle,
            space,
            components: vec![FormatComponent {
                component: index,
                numeric_type,
                sampling,
            }],
            planar: false,
            bytes_per_pixel: Some(1),
            palette: true,
        },
    );

    let model_with_alpha = registry.register_model(
        None,
        Model {
            name: model_name,
            components: vec![index, alpha],
            has_alpha: true,
            premultiplied: false,
            family: ModelFamily::Palette,
        },
    );
    let format_with_alpha = registry.register_format(
        None,
        PixelFormat {
            model: model_with_alpha,
            space,
            components: vec![
                FormatComponent {
                    component: index,
                    numeric_type,
                    sampling,
                },
                FormatComponent {
                    component: alpha,
                    numeric_type,
                    sampling,
                },
            ],
            planar: false,
            bytes_per_pixel: Some(2),
            palette: true,
        },
    );

    (format_no_alpha, format_with_alpha)
}

/// `palette_set_palette(f, src_fmt, data, count)` (§4.7, §6): read `count`
/// pixels of `src_fmt` out of `data` and install them as `f`'s color table.
/// `f` must be a format returned by [`new_palette`].
pub fn palette_set_palette(
    registry: &Registry,
    format: FormatHandle,
    src_fmt: FormatHandle,
    data: &[u8],
    count: usize,
) -> Result<()> {
    if !registry.get_format(format).palette {
        return Err(Error::InvalidArgument("format is not a palette format".to_string()));
    }
    let src = registry.get_format(src_fmt);
    let src_bpp = src
        .bytes_per_pixel
        .ok_or_else(|| Error::InvalidArgument("src_fmt has no fixed pixel size".to_string()))?;
    if data.len() < src_bpp * count {
        return Err(Error::InvalidArgument(format!(
            "data has {} bytes, need {} for {count} {src_bpp}-byte pixels",
            data.len(),
            src_bpp * count
        )));
    }

    let src_model = registry.get_model(src.model);
    let src_space = registry.get_space(src.space);
    let mut entries = Vec::with_capacity(count);
    for i in 0..count {
        let raw = &data[i * src_bpp..(i + 1) * src_bpp];
        let values = crate::convert::unpack_pixel(registry, &src, raw);
        let pivot = crate::convert::to_pivot(&src_model, &src_space, registry, &values)?;
        // `Palette` stores entries as perceptual (sRGB-encoded) u8, deriving
        // its linear-double form from them — encode the linear pivot back
        // through sRGB rather than quantizing it directly.
        entries.push([
            (crate::math::gamma::srgb_gamma_encode(pivot[0].clamp(0.0, 1.0)) * 255.0).round() as u8,
            (crate::math::gamma::srgb_gamma_encode(pivot[1].clamp(0.0, 1.0)) * 255.0).round() as u8,
            (crate::math::gamma::srgb_gamma_encode(pivot[2].clamp(0.0, 1.0)) * 255.0).round() as u8,
            (pivot[3].clamp(0.0, 1.0) * 255.0).round() as u8,
        ]);
    }

    let name = format!("format-{}", format.index());
    registry.set_palette(format, Arc::new(Palette::new(&name, entries)));
    Ok(())
}
