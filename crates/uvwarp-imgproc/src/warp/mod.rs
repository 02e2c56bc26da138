//! Quad-to-quad perspective warping.
//!
//! This module provides the pieces used to paste a quadrilateral patch of one
//! image into a quadrilateral region of another:
//!
//! - [`Homography`] estimation from four point pairs and its inverse
//! - UV to pixel conversion and destination bounding boxes
//! - [`warp_face`] for a single face and [`warp_faces`] for ordered batches
//!
//! # Examples
//!
//! Copying the left half of an image onto the whole destination:
//!
//! ```no_run
//! use uvwarp_image::ImageBuffer;
//! use uvwarp_imgproc::warp::{warp_faces, FaceCorrespondence, WarpOptions};
//!
//! let src = ImageBuffer::from_size_val([64, 64].into(), 4, 1.0).unwrap();
//! let mut dst = ImageBuffer::from_size_val([32, 32].into(), 4, 0.0).unwrap();
//!
//! let face = FaceCorrespondence::new(
//!     [[0.0, 0.0], [0.5, 0.0], [0.5, 1.0], [0.0, 1.0]],
//!     [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
//! );
//! let options = WarpOptions::default();
//! let report = warp_faces(&src.view(), &mut dst.view_mut(), &[face], &options).unwrap();
//! assert_eq!(report.faces_processed, 1);
//! ```

mod batch;
mod homography;
mod quad;

pub use batch::{warp_faces, FaceSkip, WarpReport};
pub use homography::{Homography, DEGENERATE_DENOM_EPSILON, NON_INVERTIBLE_EPSILON};
pub use quad::{
    quad_uv_to_pixel, uv_to_pixel, warp_face, FaceCorrespondence, FacePatch, FacePlan, FaceStats,
    PixelBox, Quad, SampleOrigin, WarpOptions,
};
