//! TRC application primitive (§4.2): per-channel companding, either driven by
//! a space's own TRC triple or by a universal perceptual (sRGB-shaped) curve.

use crate::registry::Trc;

/// Decode a gamma-encoded RGB triple to linear light using the space's own
/// per-channel TRCs (usually identical across channels).
pub fn linearize_rgb(rgb: [f64; 3], trcs: [&Trc; 3]) -> [f64; 3] {
    [
        trcs[0].to_linear(rgb[0]),
        trcs[1].to_linear(rgb[1]),
        trcs[2].to_linear(rgb[2]),
    ]
}

/// Encode a linear-light RGB triple using the space's own per-channel TRCs.
pub fn encode_rgb(rgb: [f64; 3], trcs: [&Trc; 3]) -> [f64; 3] {
    [
        trcs[0].from_linear(rgb[0]),
        trcs[1].from_linear(rgb[1]),
        trcs[2].from_linear(rgb[2]),
    ]
}

/// Decode using a single universal TRC applied identically to all channels
/// (the `~` "perceptual" component convention, §3).
pub fn linearize_universal(rgb: [f64; 3], trc: &Trc) -> [f64; 3] {
    [trc.to_linear(rgb[0]), trc.to_linear(rgb[1]), trc.to_linear(rgb[2])]
}

pub fn encode_universal(rgb: [f64; 3], trc: &Trc) -> [f64; 3] {
    [trc.from_linear(rgb[0]), trc.from_linear(rgb[1]), trc.from_linear(rgb[2])]
}
