//! Attribute types for each registry kind (§3).

use crate::math::Matrix3x3;
use crate::math::gamma::{ParametricCurve, parametric_curve_eval, parametric_curve_eval_inverse};
use crate::registry::handle::Handle;

/// Minimal bitflag-style struct generator used for [`ComponentFlags`].
///
/// Hand-rolled rather than pulling in the `bitflags` crate for a single
/// seven-field tag set.
macro_rules! bitflag_struct {
    ($(#[$meta:meta])* $name:ident { $($field:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name {
            $(pub $field: bool),+
        }

        impl $name {
            pub const fn none() -> Self {
                Self { $($field: false),+ }
            }
        }
    };
}

/// Marker kinds for `Handle<K>`. These types are never instantiated.
pub struct NumericTypeKind;
pub struct ComponentKind;
pub struct ModelKind;
pub struct SamplingKind;
pub struct TrcKind;
pub struct SpaceKind;
pub struct FormatKind;

pub type NumericTypeHandle = Handle<NumericTypeKind>;
pub type ComponentHandle = Handle<ComponentKind>;
pub type ModelHandle = Handle<ModelKind>;
pub type SamplingHandle = Handle<SamplingKind>;
pub type TrcHandle = Handle<TrcKind>;
pub type SpaceHandle = Handle<SpaceKind>;
pub type FormatHandle = Handle<FormatKind>;

/// A registered numeric storage type (§3 "Numeric type").
#[derive(Debug, Clone, PartialEq)]
pub struct NumericType {
    pub name: &'static str,
    pub bits: u32,
    pub is_float: bool,
    pub is_signed: bool,
    /// Storage-unit range, e.g. `0.0..=255.0` for `u8`.
    pub min: f64,
    pub max: f64,
    /// Nominal physical range the storage range maps onto.
    pub min_val: f64,
    pub max_val: f64,
}

impl NumericType {
    /// `v = (stored - min) / (max - min) * (max_val - min_val) + min_val`
    pub fn to_nominal(&self, stored: f64) -> f64 {
        (stored - self.min) / (self.max - self.min) * (self.max_val - self.min_val) + self.min_val
    }

    /// Inverse of [`Self::to_nominal`], rounding half-to-even at the call site.
    pub fn from_nominal(&self, nominal: f64) -> f64 {
        (nominal - self.min_val) / (self.max_val - self.min_val) * (self.max - self.min) + self.min
    }
}

bitflag_struct! {
    /// Per-component tag set (§3 "Component flags").
    ComponentFlags {
        linear,
        nonlinear,
        perceptual,
        chroma,
        luma,
        alpha,
        premultiplied,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub name: &'static str,
    pub flags: ComponentFlags,
}

/// Broad family classification carried on a [`Model`] (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    Rgb,
    Gray,
    Cmyk,
    Cmy,
    Cie,
    YCbCr,
    Hsl,
    Hsv,
    Hcy,
    /// An indexed-color model (§4.7): components are a table index, not a
    /// color itself. Never routed through [`crate::convert::to_pivot`]/
    /// `from_pivot` — the palette subsystem converts directly against the
    /// attached [`crate::palette::Palette`].
    Palette,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub name: &'static str,
    pub components: Vec<ComponentHandle>,
    pub has_alpha: bool,
    pub premultiplied: bool,
    pub family: ModelFamily,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sampling {
    pub horizontal: u8,
    pub vertical: u8,
}

impl Sampling {
    pub const NONE: Self = Self {
        horizontal: 1,
        vertical: 1,
    };
}

/// A tone-response curve (§3 "Transfer curve (TRC)").
#[derive(Debug, Clone, PartialEq)]
pub enum Trc {
    Linear,
    Gamma(f64),
    Srgb,
    /// One of the five ICC.1:2022 §10.18 parametric curve shapes.
    Parametric(ParametricCurve),
    /// A tabulated curve plus its bisection-built inverse.
    Lut {
        forward: Vec<f64>,
        inverse: Vec<f64>,
    },
}

impl Trc {
    /// encoded → linear
    pub fn to_linear(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);
        match self {
            Trc::Linear => x,
            Trc::Gamma(g) => crate::math::gamma::gamma_decode(x, *g),
            Trc::Srgb => crate::math::gamma::srgb_gamma_decode(x),
            Trc::Parametric(curve) => parametric_curve_eval(curve, x),
            Trc::Lut { forward, .. } => lut_eval(forward, x),
        }
    }

    /// linear → encoded
    pub fn from_linear(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);
        match self {
            Trc::Linear => x,
            Trc::Gamma(g) => crate::math::gamma::gamma_encode(x, *g),
            Trc::Srgb => crate::math::gamma::srgb_gamma_encode(x),
            Trc::Parametric(curve) => parametric_curve_eval_inverse(curve, x),
            Trc::Lut { inverse, .. } => lut_eval(inverse, x),
        }
    }

    /// Build a tabulated curve (and its bisection-derived inverse) of `size` entries.
    pub fn from_table(forward: Vec<f64>) -> Self {
        let inverse = build_inverse_by_bisection(&forward);
        Trc::Lut { forward, inverse }
    }
}

fn lut_eval(table: &[f64], x: f64) -> f64 {
    let n = table.len();
    if n < 2 {
        return table.first().copied().unwrap_or(x);
    }
    let pos = x * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = pos - lo as f64;
    table[lo] * (1.0 - frac) + table[hi] * frac
}

/// Build an inverse table by bisection: for each output level, binary-search
/// the (assumed monotone) forward table for the input that produces it.
fn build_inverse_by_bisection(forward: &[f64]) -> Vec<f64> {
    let n = forward.len();
    let mut inverse = vec![0.0; n];
    for (i, slot) in inverse.iter_mut().enumerate() {
        let target = i as f64 / (n - 1).max(1) as f64;
        let mut lo = 0.0f64;
        let mut hi = 1.0f64;
        for _ in 0..32 {
            let mid = (lo + hi) / 2.0;
            if lut_eval(forward, mid) < target {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        *slot = (lo + hi) / 2.0;
    }
    inverse
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceClass {
    Rgb,
    Gray,
    Cmyk,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Space {
    pub name: Option<&'static str>,
    /// (white, red, green, blue) CIE xy chromaticities.
    pub white_xy: (f64, f64),
    pub primaries_xy: [(f64, f64); 3],
    pub trc: [TrcHandle; 3],
    pub class: SpaceClass,
    pub rgb_to_xyz: Matrix3x3,
    pub xyz_to_rgb: Matrix3x3,
}

/// One `(component, type, sampling)` slot of a [`PixelFormat`] (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatComponent {
    pub component: ComponentHandle,
    pub numeric_type: NumericTypeHandle,
    pub sampling: SamplingHandle,
}

/// A fully interned pixel format (§3 "Pixel format").
#[derive(Debug, Clone, PartialEq)]
pub struct PixelFormat {
    pub model: ModelHandle,
    pub space: SpaceHandle,
    pub components: Vec<FormatComponent>,
    pub planar: bool,
    /// `None` for palette-backed formats, whose "pixel" is an index.
    pub bytes_per_pixel: Option<usize>,
    pub palette: bool,
}

impl PixelFormat {
    pub fn n_components(&self) -> usize {
        self.components.len()
    }

    pub fn has_alpha(&self, registry: &super::Registry) -> bool {
        self.components
            .iter()
            .any(|c| registry.get_component(c.component).flags.alpha)
    }
}
