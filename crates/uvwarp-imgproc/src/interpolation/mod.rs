//! Pixel interpolation methods for image transformations.
//!
//! Sampling positions are expressed in pixel index space: `(0, 0)` is the
//! first stored pixel and `(width - 1, height - 1)` the last one. Positions
//! outside that range are rejected rather than extrapolated.

mod bilinear;

pub use bilinear::{bilinear_sample, bilinear_sample_into};
