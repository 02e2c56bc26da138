#![deny(missing_docs)]
//! Image types shared by the uvwarp crates.
//!
//! Pixels are stored as a flat `f32` sequence of length
//! `width * height * channels`, row-major and channel-interleaved. This is the
//! boundary contract with the host application: [`ImageView`] and
//! [`ImageViewMut`] wrap caller-owned slices without copying.

/// Error types for the image module.
pub mod error;

/// image buffers and borrowed views.
pub mod image;

pub use crate::error::ImageError;
pub use crate::image::{ImageBuffer, ImageSize, ImageView, ImageViewMut};
