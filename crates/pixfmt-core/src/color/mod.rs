//! White points and CIE XYZ, used by chromatic adaptation and space
//! construction (§4.3). The model-facing color math (Lab, YCbCr, HSL, ...)
//! lives in [`crate::primitives::model`] instead, operating directly on the
//! pivot's `[f64; 3]`/`[f64; 4]` arrays rather than these named types.

pub mod white_point;
pub mod xyz;

pub use white_point::{WhitePoint, D50, D55, D60, D65, D75, DCI_P3};
pub use xyz::Xyz;
