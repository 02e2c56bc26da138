use uvwarp_imgproc::WarpError;

use crate::host::HostError;

/// Errors that abort a whole extraction. Nothing is written when one is
/// returned.
#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    /// The source or destination image name is unset.
    #[error("Select both source and destination images")]
    ImageNotSelected,

    /// The host does not know the image.
    #[error("Image '{0}' not found")]
    ImageNotFound(String),

    /// The image has no pixels.
    #[error("Image '{0}' has no pixel data")]
    EmptyImage(String),

    /// The host does not know the UV layer.
    #[error("UV map '{0}' not found on mesh")]
    UvLayerNotFound(String),

    /// The two UV layers report a different number of selected faces.
    #[error("UV maps disagree on the selected faces ({0} vs {1})")]
    LayerMismatch(usize, usize),

    /// No selected face is a quad in both layers.
    #[error("No selected quad faces found with the chosen UV maps")]
    NoQuadFaces,

    /// Error from the warping pipeline.
    #[error(transparent)]
    Warp(#[from] WarpError),

    /// The host refused the write back.
    #[error(transparent)]
    Host(#[from] HostError),
}
