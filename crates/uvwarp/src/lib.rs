#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use uvwarp_image as image;

#[doc(inline)]
pub use uvwarp_imgproc as imgproc;

#[doc(inline)]
pub use uvwarp_linalg as linalg;

/// Selection of images and UV layers for an extraction.
pub mod config;

/// Error types for the extraction driver.
pub mod error;

/// Face collection and batch extraction against a host.
pub mod extract;

/// Interface to the application that owns images and meshes.
pub mod host;

pub use crate::config::ExtractionConfig;
pub use crate::error::ExtractError;
pub use crate::extract::{collect_quad_faces, extract_selected_faces, ExtractionReport};
pub use crate::host::{HostError, InMemoryHost, TextureHost};
