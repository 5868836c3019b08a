//! # pixfmt-tests
//!
//! Integration tests and an accuracy harness for `pixfmt-core`.
//!
//! There is no reference implementation in this workspace to diff against,
//! so this crate drives the public registry/planner/executor API against
//! the testable properties and literal scenarios the conversion engine is
//! specified against.
//!
//! ## Test categories
//!
//! 1. **Scenarios**: the six literal worked examples (gray round-trip,
//!    float clipping, HSL/HSV identities, palette nearest, premultiplied
//!    round-trip, YCbCr709).
//! 2. **Properties**: the engine-wide invariants (fish caching, LUT/slow-path
//!    agreement, round-trip tolerance, identity short-circuit, ...).

pub mod accuracy;
pub mod patterns;

pub use accuracy::{DeltaEStats, compare_rgba_buffers, delta_e_2000};
