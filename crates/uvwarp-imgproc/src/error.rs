use uvwarp_linalg::LinalgError;

use crate::parallel::ParallelError;

/// Per-face failures. The face is skipped and the batch continues.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum HomographyError {
    /// The 8x8 system built from the correspondences is singular, e.g. the
    /// points are collinear or coincident.
    #[error("homography is singular (pivot {pivot:e} at step {step})")]
    SingularMatrix {
        /// Elimination step where the pivot vanished.
        step: usize,
        /// Best available pivot magnitude.
        pivot: f64,
    },

    /// The estimated homography cannot be inverted.
    #[error("homography is not invertible (det = {0:e})")]
    NonInvertible(f64),
}

impl From<LinalgError> for HomographyError {
    fn from(err: LinalgError) -> Self {
        match err {
            LinalgError::SingularMatrix { step, pivot } => {
                HomographyError::SingularMatrix { step, pivot }
            }
            LinalgError::NonInvertible(det) => HomographyError::NonInvertible(det),
        }
    }
}

/// Errors returned by the warping entry points.
#[derive(thiserror::Error, Debug)]
pub enum WarpError {
    /// The call was rejected before any pixel was touched.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The homography of a single face could not be computed.
    #[error(transparent)]
    Homography(#[from] HomographyError),

    /// The worker pool could not be set up.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}
