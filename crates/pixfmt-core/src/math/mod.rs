//! Foundational math shared across the registry and primitives layers:
//! - 3x3 matrix operations for RGB↔XYZ transforms
//! - Gamma and parametric transfer-curve evaluation
//! - Chromatic adaptation (Bradford)

pub mod chromatic_adaptation;
pub mod gamma;
pub mod matrix;

pub use chromatic_adaptation::{
    ChromaticAdaptationMethod, adapt_xyz, adaptation_matrix, bradford_matrix,
};
pub use gamma::{
    ParametricCurve, ParametricCurveType, parametric_curve_eval, srgb_gamma_decode,
    srgb_gamma_encode,
};
pub use matrix::Matrix3x3;
