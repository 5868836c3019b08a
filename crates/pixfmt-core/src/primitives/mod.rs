//! The primitive conversion library (§4.2): pure functions on single pixels
//! or contiguous batches, composed by the planner into a fish's chain.

pub mod alpha;
pub mod model;
pub mod numeric;
pub mod space;
pub mod trc;
